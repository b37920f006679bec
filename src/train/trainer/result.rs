//! Training result types

use std::path::PathBuf;

/// Result of a training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainResult {
    /// Last epoch that ran (0-indexed)
    pub final_epoch: usize,
    /// Mean training loss of the last completed epoch
    pub final_loss: f32,
    /// Best validation loss achieved
    pub best_val_loss: Option<f32>,
    /// Whether a callback stopped training before `max_epochs`
    pub stopped_early: bool,
    /// Optimizer steps taken
    pub global_steps: usize,
    /// Total training time in seconds
    pub elapsed_secs: f64,
    /// Checkpoint holding the best weights, if one was written
    pub best_checkpoint: Option<PathBuf>,
}
