//! Early stopping callback to halt training when loss plateaus

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

/// Patience used when none is configured
pub const DEFAULT_PATIENCE: usize = 3;

/// Early stopping callback to halt training when loss plateaus
///
/// Monitors a loss (mode min) and stops training once `patience` epochs pass
/// without the loss dropping more than `min_delta` below the best value.
/// A non-finite monitored value stops immediately.
///
/// # Example
///
/// ```rust
/// use recompensa::train::callback::EarlyStopping;
///
/// // Watch val_loss, stop after 3 epochs without improvement
/// let early_stop = EarlyStopping::new(3, 0.0).monitor_validation();
/// ```
#[derive(Clone, Debug)]
pub struct EarlyStopping {
    /// Number of epochs to wait for improvement
    patience: usize,
    /// Minimum improvement to reset patience
    min_delta: f32,
    /// Best loss seen so far
    best_loss: f32,
    /// Epochs without improvement
    pub(crate) epochs_without_improvement: usize,
    /// Epoch at which a stop was requested
    stopped_epoch: Option<usize>,
    /// Monitor validation loss instead of training loss
    monitor_val: bool,
}

impl Default for EarlyStopping {
    fn default() -> Self {
        Self::new(DEFAULT_PATIENCE, 0.0)
    }
}

impl EarlyStopping {
    /// Create new early stopping callback
    pub fn new(patience: usize, min_delta: f32) -> Self {
        Self {
            patience,
            min_delta: min_delta.abs(),
            best_loss: f32::INFINITY,
            epochs_without_improvement: 0,
            stopped_epoch: None,
            monitor_val: false,
        }
    }

    /// Configure to monitor validation loss
    ///
    /// If validation loss is not available, training loss is used as fallback.
    pub fn monitor_validation(mut self) -> Self {
        self.monitor_val = true;
        self
    }

    /// Reset internal state
    pub fn reset(&mut self) {
        self.best_loss = f32::INFINITY;
        self.epochs_without_improvement = 0;
        self.stopped_epoch = None;
    }

    /// Best monitored value so far
    pub fn best_loss(&self) -> f32 {
        self.best_loss
    }

    /// Epoch at which training was stopped, if it was
    pub fn stopped_epoch(&self) -> Option<usize> {
        self.stopped_epoch
    }

    /// Check if loss improved
    fn check_improvement(&mut self, loss: f32) -> bool {
        if loss < self.best_loss - self.min_delta {
            self.best_loss = loss;
            self.epochs_without_improvement = 0;
            true
        } else {
            self.epochs_without_improvement += 1;
            false
        }
    }
}

impl TrainerCallback for EarlyStopping {
    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        let loss = if self.monitor_val { ctx.val_loss.unwrap_or(ctx.loss) } else { ctx.loss };

        if !loss.is_finite() {
            tracing::warn!(epoch = ctx.epoch, loss, "Early stopping: monitored loss is not finite");
            self.stopped_epoch = Some(ctx.epoch);
            return CallbackAction::Stop;
        }

        if !self.check_improvement(loss) && self.epochs_without_improvement >= self.patience {
            tracing::info!(
                epoch = ctx.epoch,
                best_loss = self.best_loss,
                "Early stopping: no improvement for {} epochs",
                self.patience
            );
            self.stopped_epoch = Some(ctx.epoch);
            CallbackAction::Stop
        } else {
            CallbackAction::Continue
        }
    }

    fn name(&self) -> &'static str {
        "EarlyStopping"
    }
}
