//! Training configuration and metrics tracking

use serde::{Deserialize, Serialize};

/// Configuration for the fit loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Upper bound on epochs
    pub max_epochs: usize,
    /// Log the step loss every N optimizer steps
    pub log_every_n_steps: usize,
    /// Draw an indicatif progress bar instead of per-epoch log lines
    pub enable_progress_bar: bool,
    /// Gradient clipping threshold (global norm)
    pub max_grad_norm: Option<f32>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self { max_epochs: 10, log_every_n_steps: 50, enable_progress_bar: true, max_grad_norm: None }
    }
}

impl TrainConfig {
    /// Create a configuration for `max_epochs` epochs
    pub fn new(max_epochs: usize) -> Self {
        Self { max_epochs, ..Self::default() }
    }

    /// Set the step logging interval
    pub fn with_log_every_n_steps(mut self, steps: usize) -> Self {
        self.log_every_n_steps = steps.max(1);
        self
    }

    /// Enable or disable the progress bar
    pub fn with_progress_bar(mut self, enabled: bool) -> Self {
        self.enable_progress_bar = enabled;
        self
    }

    /// Enable gradient clipping
    pub fn with_grad_clip(mut self, max_norm: f32) -> Self {
        self.max_grad_norm = Some(max_norm);
        self
    }
}

/// Per-epoch loss history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsTracker {
    /// Mean training loss per epoch
    pub train_losses: Vec<f32>,
    /// Validation loss per epoch
    pub val_losses: Vec<f32>,
    /// Optimizer steps taken
    pub steps: usize,
}

impl MetricsTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one optimizer step
    pub fn increment_step(&mut self) {
        self.steps += 1;
    }

    /// Record the losses of a finished epoch
    pub fn record_epoch(&mut self, train_loss: f32, val_loss: f32) {
        self.train_losses.push(train_loss);
        self.val_losses.push(val_loss);
    }

    /// Number of completed epochs
    pub fn epochs(&self) -> usize {
        self.train_losses.len()
    }

    /// Lowest finite validation loss recorded
    pub fn best_val_loss(&self) -> Option<f32> {
        self.val_losses.iter().copied().filter(|v| v.is_finite()).reduce(f32::min)
    }

    /// Training loss of the last completed epoch
    pub fn last_train_loss(&self) -> Option<f32> {
        self.train_losses.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_config_builders() {
        let config = TrainConfig::new(100).with_log_every_n_steps(5).with_progress_bar(false).with_grad_clip(1.0);
        assert_eq!(config.max_epochs, 100);
        assert_eq!(config.log_every_n_steps, 5);
        assert!(!config.enable_progress_bar);
        assert_eq!(config.max_grad_norm, Some(1.0));
    }

    #[test]
    fn test_log_interval_at_least_one() {
        assert_eq!(TrainConfig::default().with_log_every_n_steps(0).log_every_n_steps, 1);
    }

    #[test]
    fn test_metrics_tracker() {
        let mut metrics = MetricsTracker::new();
        assert!(metrics.best_val_loss().is_none());
        metrics.increment_step();
        metrics.record_epoch(1.0, 0.9);
        metrics.record_epoch(0.8, f32::NAN);
        metrics.record_epoch(0.7, 0.95);
        assert_eq!(metrics.steps, 1);
        assert_eq!(metrics.epochs(), 3);
        assert_eq!(metrics.best_val_loss(), Some(0.9));
        assert_eq!(metrics.last_train_loss(), Some(0.7));
    }
}
