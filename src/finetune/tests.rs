//! Fine-tuning pipeline tests

use super::*;
use crate::data::{DataLoader, PreferenceData, PreferenceDataset, PreferenceRecord};
use crate::error::Error;
use crate::experiment::ExperimentConfig;
use crate::io::Checkpointable;
use crate::model::{Architecture, MlpRewardModel, RewardModel};
use crate::train::callback::{CallbackAction, CallbackContext, TrainerCallback};
use crate::train::{Fit, TrainResult};
use std::sync::Arc;
use tempfile::TempDir;

fn config(dir: &TempDir) -> ExperimentConfig {
    ExperimentConfig { base_dir: dir.path().to_path_buf(), num_workers: 2, seed: Some(7), ..Default::default() }
}

fn dataset(n: usize) -> Arc<PreferenceDataset> {
    let records: Vec<_> = (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            PreferenceRecord { first: vec![vec![1.0 + x, x]], second: vec![vec![-1.0 - x, x]], preference: 1.0 }
        })
        .collect();
    Arc::new(PreferenceDataset::from_records(&records).unwrap())
}

fn model() -> MlpRewardModel {
    MlpRewardModel::new(Architecture::new(2, 4, 2, 1), 1)
}

/// Records how it was called instead of training
#[derive(Default)]
struct RecordingFit {
    callbacks: Vec<&'static str>,
    train_samples: usize,
    val_samples: usize,
    train_shuffles: bool,
    val_shuffles: bool,
    workers: usize,
}

impl Fit for RecordingFit {
    fn add_callback_boxed(&mut self, callback: Box<dyn TrainerCallback>) {
        self.callbacks.push(callback.name());
    }

    fn fit<M: RewardModel, D: PreferenceData>(
        &mut self,
        _model: &mut M,
        train: &mut DataLoader<D>,
        val: &mut DataLoader<D>,
    ) -> crate::Result<TrainResult> {
        self.train_samples = train.num_samples();
        self.val_samples = val.num_samples();
        self.train_shuffles = train.shuffles();
        self.val_shuffles = val.shuffles();
        self.workers = train.num_workers();
        Ok(TrainResult {
            final_epoch: 0,
            final_loss: 0.0,
            best_val_loss: None,
            stopped_early: false,
            global_steps: 0,
            elapsed_secs: 0.0,
            best_checkpoint: None,
        })
    }
}

struct Extra;

impl TrainerCallback for Extra {
    fn on_epoch_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    fn name(&self) -> &'static str {
        "Extra"
    }
}

#[test]
fn test_wiring_of_split_loaders_and_callbacks() {
    let dir = TempDir::new().unwrap();
    let mut fitter = RecordingFit::default();
    let options = TrainOptions::default().with_callback(Extra);
    fit_reward_model(&config(&dir), model(), "mlp", dataset(100), 4, options, &mut fitter).unwrap();

    assert_eq!(fitter.train_samples, 80);
    assert_eq!(fitter.val_samples, 20);
    assert!(fitter.train_shuffles);
    assert!(!fitter.val_shuffles);
    assert_eq!(fitter.workers, 2);
    assert_eq!(fitter.callbacks, vec!["EarlyStopping", "ModelCheckpoint", "Extra"]);
    assert!(dir.path().join("models_final").is_dir());
}

#[test]
fn test_invalid_split_ratio() {
    let dir = TempDir::new().unwrap();
    let mut fitter = RecordingFit::default();
    let options = TrainOptions::default().with_split_ratio(1.5);
    let err = fit_reward_model(&config(&dir), model(), "mlp", dataset(10), 4, options, &mut fitter).unwrap_err();
    assert!(matches!(err, Error::InvalidSplitRatio { .. }));
}

#[test]
fn test_single_sample_dataset_has_empty_train_loader() {
    let dir = TempDir::new().unwrap();
    let options = TrainOptions::default().with_progress_bar(false);
    let err = train_reward_model(&config(&dir), model(), "mlp", dataset(1), 1, 4, options).unwrap_err();
    assert!(matches!(err, Error::EmptyDataLoader { split: "train" }));
}

#[test]
fn test_train_reward_model_writes_named_checkpoint() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let initial = model();
    let options = TrainOptions::default().with_progress_bar(false);
    let trained = train_reward_model(&config, initial.clone(), "mlp", dataset(40), 2, 4, options).unwrap();

    let path = dir.path().join("models_final/sac_HalfCheetah-v3_mlp.ckpt");
    assert_eq!(config.reward_checkpoint_path("mlp"), path);
    assert!(path.exists());
    assert_ne!(trained.to_state().data, initial.to_state().data);
}

#[test]
fn test_same_seed_same_result() {
    let run = |dir: &TempDir| {
        let options = TrainOptions::default().with_progress_bar(false).with_seed(3);
        train_reward_model(&config(dir), model(), "mlp", dataset(30), 2, 4, options).unwrap()
    };
    let (a, b) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    assert_eq!(run(&a).layers(), run(&b).layers());
}

#[test]
fn test_run_finetuning_requires_dataset() {
    let dir = TempDir::new().unwrap();
    let err = run_finetuning(&config(&dir)).unwrap_err();
    assert!(matches!(err, Error::DatasetNotFound { .. }));
}

#[test]
fn test_missing_pretrained_model() {
    let dir = TempDir::new().unwrap();
    let err = load_pretrained_reward_model(&config(&dir), FINETUNE_ARCHITECTURE).unwrap_err();
    assert!(matches!(err, Error::ModelNotFound { .. }));
}

#[test]
fn test_options_defaults() {
    let options = TrainOptions::default();
    assert_eq!(options.split_ratio, 0.8);
    assert_eq!(options.patience, 3);
    assert_eq!(options.min_delta, 0.0);
    assert!(options.enable_progress_bar);
    assert!(options.callback.is_none());
    assert!(format!("{options:?}").contains("split_ratio"));
}
