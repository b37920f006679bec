//! Experiment configuration and naming conventions
//!
//! - `ExperimentConfig` - immutable snapshot of the experiment constants
//! - naming helpers on `ExperimentConfig` - model ids, reward model names,
//!   checkpoint paths
//! - `ModelName` - name tag of a reward model variant

mod config;
mod naming;

pub use config::{default_num_workers, Algorithm, ExperimentConfig, FeedbackType};
pub use naming::{ModelName, CHECKPOINT_EXTENSION};
