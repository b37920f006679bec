//! Reward model training loop
//!
//! This module provides:
//! - The Bradley-Terry preference loss
//! - The `Trainer` and its `Fit` loop with per-epoch validation
//! - Callbacks (checkpointing, early stopping, progress)
//! - Training configuration, metrics tracking and device detection

pub mod callback;
mod config;
mod device;
mod loss;
mod trainer;

pub use callback::{
    CallbackAction, CallbackContext, CallbackManager, EarlyStopping, ModelCheckpoint, ProgressCallback,
    TrainerCallback,
};
pub use config::{MetricsTracker, TrainConfig};
pub use device::{ComputeDevice, DeviceInfo};
pub use loss::{BradleyTerryLoss, LossFn, LossOutput};
pub use trainer::{Fit, TrainResult, Trainer};
