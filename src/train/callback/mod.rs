//! Callback system for training events
//!
//! Callbacks hook into the fit loop. The trainer fires, in order:
//! `on_train_begin`, then per epoch `on_epoch_begin`, `on_step_end` for every
//! batch, `on_validation_end` once the validation loss is known and
//! `on_epoch_end`; finally `on_train_end`.
//!
//! # Example
//!
//! ```rust
//! use recompensa::train::callback::{CallbackManager, EarlyStopping, ModelCheckpoint};
//!
//! let mut manager = CallbackManager::new();
//! manager.add(ModelCheckpoint::new("models_final/sac_HalfCheetah-v3_mlp.ckpt"));
//! manager.add(EarlyStopping::new(3, 0.0).monitor_validation());
//! assert_eq!(manager.len(), 2);
//! ```

mod checkpoint;
mod early_stopping;
mod manager;
mod progress;
mod traits;

pub use checkpoint::ModelCheckpoint;
pub use early_stopping::{EarlyStopping, DEFAULT_PATIENCE};
pub use manager::CallbackManager;
pub use progress::ProgressCallback;
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};
