//! Core Trainer struct and basic methods

use crate::train::callback::{CallbackContext, CallbackManager, ProgressCallback, TrainerCallback};
use crate::train::{MetricsTracker, TrainConfig};
use std::time::Instant;

/// Runs the fit loop for a [`RewardModel`](crate::model::RewardModel).
///
/// A [`ProgressCallback`] is always registered first; further callbacks are
/// dispatched in the order they are added.
///
/// # Example
///
/// ```no_run
/// use recompensa::train::{EarlyStopping, Fit, TrainConfig, Trainer};
///
/// let mut trainer = Trainer::new(TrainConfig::new(100).with_log_every_n_steps(5));
/// trainer.add_callback(EarlyStopping::new(3, 0.0).monitor_validation());
/// // let result = trainer.fit(&mut model, &mut train_loader, &mut val_loader)?;
/// ```
pub struct Trainer {
    /// Training configuration
    pub(crate) config: TrainConfig,

    /// Metrics tracker
    pub metrics: MetricsTracker,

    /// Callback manager
    pub(crate) callbacks: CallbackManager,

    /// Best validation loss achieved during training
    pub(crate) best_val_loss: Option<f32>,

    /// Training start time
    pub(crate) start_time: Option<Instant>,
}

impl Trainer {
    /// Create a new trainer
    pub fn new(config: TrainConfig) -> Self {
        let mut callbacks = CallbackManager::new();
        callbacks.add(ProgressCallback::new().with_progress_bar(config.enable_progress_bar));
        Self { config, metrics: MetricsTracker::new(), callbacks, best_val_loss: None, start_time: None }
    }

    /// Add a callback to the trainer
    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    /// Training configuration
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Get reference to callback manager
    pub fn callbacks(&self) -> &CallbackManager {
        &self.callbacks
    }

    /// Build callback context from current state
    pub(crate) fn build_context(
        &self,
        epoch: usize,
        step: usize,
        steps_per_epoch: usize,
        loss: f32,
        lr: f32,
        val_loss: Option<f32>,
    ) -> CallbackContext {
        CallbackContext {
            epoch,
            max_epochs: self.config.max_epochs,
            step,
            steps_per_epoch,
            global_step: self.metrics.steps,
            loss,
            lr,
            best_loss: self.best_val_loss,
            val_loss,
            elapsed_secs: self.start_time.map(|t| t.elapsed().as_secs_f64()).unwrap_or(0.0),
        }
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(TrainConfig::default())
    }
}
