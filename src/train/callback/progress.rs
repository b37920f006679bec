//! Progress callback for reporting training progress

use indicatif::{ProgressBar, ProgressStyle};

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// Progress callback: an indicatif bar per epoch, or a `tracing` epoch summary
/// when the bar is disabled. Step losses are logged by the trainer.
pub struct ProgressCallback {
    /// Draw a progress bar
    show_bar: bool,
    bar: Option<ProgressBar>,
}

impl ProgressCallback {
    /// Create progress callback
    pub fn new() -> Self {
        Self { show_bar: true, bar: None }
    }

    /// Enable or disable the progress bar
    pub fn with_progress_bar(mut self, show: bool) -> Self {
        self.show_bar = show;
        self
    }

    pub fn shows_bar(&self) -> bool {
        self.show_bar
    }

    fn new_bar(ctx: &CallbackContext) -> ProgressBar {
        let bar = ProgressBar::new(ctx.steps_per_epoch as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(format!("epoch {}/{}", ctx.epoch + 1, ctx.max_epochs));
        bar
    }
}

impl Default for ProgressCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainerCallback for ProgressCallback {
    fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        if self.show_bar {
            self.bar = Some(Self::new_bar(ctx));
        }
        CallbackAction::Continue
    }

    fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        if let Some(bar) = &self.bar {
            bar.inc(1);
            bar.set_message(format!("epoch {}/{} loss {:.4}", ctx.epoch + 1, ctx.max_epochs, ctx.loss));
        }
        CallbackAction::Continue
    }

    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        let val_str = ctx.val_loss.map(|v| format!(", val_loss: {v:.4}")).unwrap_or_default();
        let summary = format!(
            "Epoch {}/{}: loss: {:.4}{} ({:.1}s)",
            ctx.epoch + 1,
            ctx.max_epochs,
            ctx.loss,
            val_str,
            ctx.elapsed_secs
        );
        match self.bar.take() {
            Some(bar) => bar.finish_with_message(summary),
            None => tracing::info!("{summary}"),
        }
        CallbackAction::Continue
    }

    fn on_train_end(&mut self, _ctx: &CallbackContext) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }

    fn name(&self) -> &'static str {
        "ProgressCallback"
    }
}
