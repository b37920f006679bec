//! Checkpoint callback keeping the best model on disk

use std::path::{Path, PathBuf};

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::error::Result;
use crate::io::{save_model, Checkpointable, SaveConfig, TrainingInfo};

/// Saves the model whenever validation loss improves (mode min).
///
/// Only one file is kept: each improvement overwrites `path`.
#[derive(Clone, Debug)]
pub struct ModelCheckpoint {
    /// Checkpoint file
    path: PathBuf,
    /// Best validation loss seen
    best_loss: f32,
    /// Last saved epoch
    pub(crate) last_saved_epoch: Option<usize>,
    /// Number of writes so far
    saves: usize,
}

impl ModelCheckpoint {
    /// Name of the monitored metric
    pub const MONITOR: &'static str = "val_loss";

    /// Create checkpoint callback saving to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), best_loss: f32::INFINITY, last_saved_epoch: None, saves: 0 }
    }

    /// Destination file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best validation loss saved so far
    pub fn best_loss(&self) -> Option<f32> {
        self.last_saved_epoch.map(|_| self.best_loss)
    }

    /// Number of times the checkpoint was written
    pub fn saves(&self) -> usize {
        self.saves
    }

    fn save_checkpoint(&mut self, ctx: &CallbackContext, model: &dyn Checkpointable, val_loss: f32) -> Result<()> {
        let mut state = model.to_state();
        state.metadata.training = Some(TrainingInfo {
            epoch: ctx.epoch,
            global_step: ctx.global_step,
            monitor: Some(Self::MONITOR.to_string()),
            monitor_value: Some(val_loss),
        });
        save_model(&state, &self.path, &SaveConfig::for_path(&self.path)?)?;

        self.last_saved_epoch = Some(ctx.epoch);
        self.saves += 1;
        tracing::info!(
            epoch = ctx.epoch,
            val_loss,
            path = %self.path.display(),
            "val_loss improved, checkpoint saved"
        );
        Ok(())
    }
}

impl TrainerCallback for ModelCheckpoint {
    fn on_validation_end(&mut self, ctx: &CallbackContext, model: &dyn Checkpointable) -> Result<CallbackAction> {
        if let Some(val_loss) = ctx.val_loss {
            if val_loss < self.best_loss {
                self.best_loss = val_loss;
                self.save_checkpoint(ctx, model, val_loss)?;
            }
        }
        Ok(CallbackAction::Continue)
    }

    fn best_checkpoint(&self) -> Option<&Path> {
        self.last_saved_epoch.map(|_| self.path.as_path())
    }

    fn name(&self) -> &'static str {
        "ModelCheckpoint"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::io::{load_model, ModelMetadata, ModelState};
    use tempfile::TempDir;

    struct Fixed(f32);

    impl Checkpointable for Fixed {
        fn to_state(&self) -> ModelState {
            ModelState { metadata: ModelMetadata::new("fixed", "test"), parameters: vec![], data: vec![self.0] }
        }

        fn load_state(&mut self, _state: &ModelState) -> crate::error::Result<()> {
            Ok(())
        }
    }

    fn ctx(epoch: usize, val_loss: f32) -> CallbackContext {
        CallbackContext { epoch, global_step: epoch * 10, val_loss: Some(val_loss), ..Default::default() }
    }

    #[test]
    fn test_saves_only_on_improvement() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models/best.ckpt");
        let mut cb = ModelCheckpoint::new(&path);

        cb.on_validation_end(&ctx(0, 1.0), &Fixed(1.0)).unwrap();
        cb.on_validation_end(&ctx(1, 0.5), &Fixed(2.0)).unwrap();
        cb.on_validation_end(&ctx(2, 0.7), &Fixed(3.0)).unwrap();

        assert_eq!(cb.saves(), 2);
        assert_eq!(cb.last_saved_epoch, Some(1));
        assert_eq!(cb.best_loss(), Some(0.5));
        assert_eq!(cb.best_checkpoint(), Some(path.as_path()));

        let state = load_model(&path).unwrap();
        assert_eq!(state.data, vec![2.0]);
        let training = state.metadata.training.unwrap();
        assert_eq!(training.epoch, 1);
        assert_eq!(training.global_step, 10);
        assert_eq!(training.monitor.as_deref(), Some("val_loss"));
        assert_eq!(training.monitor_value, Some(0.5));

        // Exactly one file in the model directory
        assert_eq!(std::fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_no_validation_loss_no_save() {
        let dir = TempDir::new().unwrap();
        let mut cb = ModelCheckpoint::new(dir.path().join("m.ckpt"));
        let ctx = CallbackContext::default();
        assert_eq!(cb.on_validation_end(&ctx, &Fixed(0.0)).unwrap(), CallbackAction::Continue);
        assert!(cb.best_checkpoint().is_none());
        assert!(cb.best_loss().is_none());
    }

    #[test]
    fn test_unsupported_extension_fails() {
        let dir = TempDir::new().unwrap();
        let mut cb = ModelCheckpoint::new(dir.path().join("m.bin"));
        let err = cb.on_validation_end(&ctx(0, 1.0), &Fixed(0.0)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }
}
