//! Fit loop with per-epoch validation

use super::core::Trainer;
use super::result::TrainResult;
use crate::data::{DataLoader, PreferenceData};
use crate::error::{Error, Result};
use crate::io::Checkpointable;
use crate::model::RewardModel;
use crate::train::callback::{CallbackAction, TrainerCallback};
use crate::train::{ComputeDevice, DeviceInfo, MetricsTracker};
use std::path::Path;
use std::time::Instant;

/// Something that can train a reward model on a pair of loaders.
pub trait Fit {
    /// Register a callback for the next fit
    fn add_callback_boxed(&mut self, callback: Box<dyn TrainerCallback>);

    /// Train `model` in place, validating after every epoch.
    fn fit<M, D>(&mut self, model: &mut M, train: &mut DataLoader<D>, val: &mut DataLoader<D>) -> Result<TrainResult>
    where
        M: RewardModel,
        D: PreferenceData;
}

impl Trainer {
    /// Validation loss averaged over samples, so a short last batch counts
    /// only for the samples it holds
    pub(super) fn validate<M: RewardModel, D: PreferenceData>(model: &M, val: &mut DataLoader<D>) -> Result<f32> {
        let batches = val.epoch_batches()?;
        let mut total = 0.0;
        let mut samples = 0;
        for batch in &batches {
            total += model.validation_step(batch)? * batch.size() as f32;
            samples += batch.size();
        }
        Ok(total / samples.max(1) as f32)
    }

    fn finish(&self, final_epoch: usize, final_loss: f32, stopped_early: bool) -> TrainResult {
        TrainResult {
            final_epoch,
            final_loss,
            best_val_loss: self.best_val_loss,
            stopped_early,
            global_steps: self.metrics.steps,
            elapsed_secs: self.start_time.map(|t| t.elapsed().as_secs_f64()).unwrap_or(0.0),
            best_checkpoint: self.callbacks.best_checkpoint().map(Path::to_path_buf),
        }
    }
}

impl Fit for Trainer {
    fn add_callback_boxed(&mut self, callback: Box<dyn TrainerCallback>) {
        self.callbacks.add_boxed(callback);
    }

    fn fit<M, D>(&mut self, model: &mut M, train: &mut DataLoader<D>, val: &mut DataLoader<D>) -> Result<TrainResult>
    where
        M: RewardModel,
        D: PreferenceData,
    {
        if train.is_empty() {
            return Err(Error::EmptyDataLoader { split: "train" });
        }
        if val.is_empty() {
            return Err(Error::EmptyDataLoader { split: "val" });
        }

        let device = ComputeDevice::auto_detect();
        tracing::info!(
            detected = %device,
            running_on = %device.execution_device(),
            host = %DeviceInfo::cpu_info().name,
            "compute device"
        );
        tracing::info!(
            architecture = %model.architecture(),
            train_batches = train.len(),
            val_batches = val.len(),
            max_epochs = self.config.max_epochs,
            "fit started"
        );

        self.start_time = Some(Instant::now());
        self.best_val_loss = None;
        self.metrics = MetricsTracker::new();
        let log_every = self.config.log_every_n_steps.max(1);
        let mut stopped_early = false;
        let mut final_loss = 0.0;
        let mut final_epoch = 0;

        let ctx = self.build_context(0, 0, 0, 0.0, model.learning_rate(), None);
        if self.callbacks.on_train_begin(&ctx) == CallbackAction::Stop {
            self.callbacks.on_train_end(&ctx);
            return Ok(self.finish(0, 0.0, true));
        }

        for epoch in 0..self.config.max_epochs {
            final_epoch = epoch;
            let ctx = self.build_context(epoch, 0, train.len(), final_loss, model.learning_rate(), None);
            match self.callbacks.on_epoch_begin(&ctx) {
                CallbackAction::Stop => {
                    stopped_early = true;
                    break;
                }
                CallbackAction::SkipEpoch => continue,
                CallbackAction::Continue => {}
            }

            // Training phase
            let batches = train.epoch_batches()?;
            let steps_per_epoch = batches.len();
            let mut total_loss = 0.0;
            let mut num_batches = 0;

            for (step, batch) in batches.iter().enumerate() {
                let loss = model.training_step(batch, self.config.max_grad_norm)?;
                if !loss.is_finite() {
                    return Err(Error::Diverged { epoch, step: self.metrics.steps, loss });
                }
                total_loss += loss;
                num_batches += 1;
                self.metrics.increment_step();

                if self.metrics.steps % log_every == 0 {
                    tracing::debug!(epoch, global_step = self.metrics.steps, loss, "train_loss");
                }

                let ctx = self.build_context(epoch, step + 1, steps_per_epoch, loss, model.learning_rate(), None);
                match self.callbacks.on_step_end(&ctx) {
                    CallbackAction::Stop => {
                        stopped_early = true;
                        break;
                    }
                    CallbackAction::SkipEpoch => break,
                    CallbackAction::Continue => {}
                }
            }

            if num_batches > 0 {
                final_loss = total_loss / num_batches as f32;
            }
            if stopped_early {
                break;
            }

            // Validation phase
            let val_loss = Self::validate(model, val)?;
            self.metrics.record_epoch(final_loss, val_loss);
            self.best_val_loss = self.metrics.best_val_loss();

            let ctx = self.build_context(
                epoch,
                steps_per_epoch,
                steps_per_epoch,
                final_loss,
                model.learning_rate(),
                Some(val_loss),
            );
            let checkpointable: &dyn Checkpointable = &*model;
            let after_validation = self.callbacks.on_validation_end(&ctx, checkpointable)?;
            let after_epoch = self.callbacks.on_epoch_end(&ctx);
            if after_validation == CallbackAction::Stop || after_epoch == CallbackAction::Stop {
                stopped_early = true;
                break;
            }
        }

        let ctx = self.build_context(final_epoch, 0, 0, final_loss, model.learning_rate(), self.best_val_loss);
        self.callbacks.on_train_end(&ctx);

        let result = self.finish(final_epoch, final_loss, stopped_early);
        tracing::info!(
            final_epoch = result.final_epoch,
            final_loss = result.final_loss,
            best_val_loss = ?result.best_val_loss,
            stopped_early = result.stopped_early,
            elapsed_secs = result.elapsed_secs,
            "fit finished"
        );
        Ok(result)
    }
}
