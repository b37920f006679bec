//! Checkpoint I/O
//!
//! Model parameters are written as a [`ModelState`]: metadata, parameter
//! shapes and one flat `f32` buffer. `.ckpt` and `.json` files hold JSON,
//! `.yaml` and `.yml` hold YAML.

mod format;
mod load;
mod model;
mod save;

pub use format::{ModelFormat, SaveConfig};
pub use load::load_model;
pub use model::{Checkpointable, ModelMetadata, ModelState, ParameterInfo, TrainingInfo};
pub use save::save_model;
