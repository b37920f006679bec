//! Split, load, fit and checkpoint a reward model

use super::options::TrainOptions;
use crate::data::{train_val_split, DataLoader, MultiStepPreferenceDataset, PreferenceData};
use crate::error::{Error, Result};
use crate::experiment::{ExperimentConfig, ModelName};
use crate::model::{Architecture, MlpRewardModel, RewardModel};
use crate::train::callback::{EarlyStopping, ModelCheckpoint};
use crate::train::{Fit, TrainConfig, TrainResult, Trainer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Display;
use std::fs;
use std::sync::Arc;

/// Step logging interval of every fine-tuning run
pub const LOG_EVERY_N_STEPS: usize = 5;

/// Trajectory window of the multi-step dataset
pub const SEQUENCE_LENGTH: usize = 70;

/// Network fine-tuned by [`run_finetuning`]
pub const FINETUNE_ARCHITECTURE: Architecture =
    Architecture { input_dim: 17, hidden_dim: 256, layer_num: 12, output_dim: 1 };

/// Epoch budget of [`run_finetuning`]
pub const FINETUNE_EPOCHS: usize = 100;

/// Batch size of [`run_finetuning`]
pub const FINETUNE_BATCH_SIZE: usize = 4;

/// Train `reward_model` on `dataset` and return it with updated parameters.
///
/// The dataset is split `floor(split_ratio * len)` / rest at random. The best
/// model by `val_loss` is written to
/// `models_path/{finetune_model_id}_{name}.ckpt`, and training stops early
/// once `val_loss` stops improving.
pub fn train_reward_model<M, D>(
    config: &ExperimentConfig,
    reward_model: M,
    name: impl Display,
    dataset: Arc<D>,
    epochs: usize,
    batch_size: usize,
    options: TrainOptions,
) -> Result<M>
where
    M: RewardModel,
    D: PreferenceData,
{
    let mut trainer = Trainer::new(
        TrainConfig::new(epochs)
            .with_log_every_n_steps(LOG_EVERY_N_STEPS)
            .with_progress_bar(options.enable_progress_bar),
    );
    let (model, _) = fit_reward_model(config, reward_model, name, dataset, batch_size, options, &mut trainer)?;
    Ok(model)
}

/// [`train_reward_model`] with a caller-supplied fit loop.
pub fn fit_reward_model<M, D, F>(
    config: &ExperimentConfig,
    mut reward_model: M,
    name: impl Display,
    dataset: Arc<D>,
    batch_size: usize,
    options: TrainOptions,
    fitter: &mut F,
) -> Result<(M, TrainResult)>
where
    M: RewardModel,
    D: PreferenceData,
    F: Fit,
{
    let seed = options.seed.or(config.seed).unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);

    let total = dataset.len();
    let (train_set, val_set) = train_val_split(dataset, options.split_ratio, &mut rng)?;
    tracing::info!(total, train = train_set.len(), val = val_set.len(), seed, "dataset split");

    let mut train_loader = DataLoader::new(train_set, batch_size)
        .with_shuffle(rng.random())
        .with_num_workers(config.num_workers)?;
    let mut val_loader = DataLoader::new(val_set, batch_size).with_num_workers(config.num_workers)?;

    let models_path = config.models_path();
    fs::create_dir_all(&models_path).map_err(|e| Error::io(format!("creating {}", models_path.display()), e))?;
    let checkpoint_path = config.reward_checkpoint_path(&name);
    tracing::info!(model = %name, checkpoint = %checkpoint_path.display(), "training reward model");

    fitter.add_callback_boxed(Box::new(
        EarlyStopping::new(options.patience, options.min_delta).monitor_validation(),
    ));
    fitter.add_callback_boxed(Box::new(ModelCheckpoint::new(checkpoint_path)));
    if let Some(callback) = options.callback {
        fitter.add_callback_boxed(callback);
    }

    let result = fitter.fit(&mut reward_model, &mut train_loader, &mut val_loader)?;
    Ok((reward_model, result))
}

/// Load the pretrained trajectory network from `models_path`.
pub fn load_pretrained_reward_model(config: &ExperimentConfig, architecture: Architecture) -> Result<MlpRewardModel> {
    MlpRewardModel::load_from_checkpoint(config.pretrained_model_path(), architecture)
}

/// Fine-tune the pretrained trajectory network on the multi-step preference
/// dataset and save it as `mlp_finetuned`.
pub fn run_finetuning(config: &ExperimentConfig) -> Result<MlpRewardModel> {
    let dataset = Arc::new(MultiStepPreferenceDataset::load(config.dataset_path(), SEQUENCE_LENGTH)?);
    let reward_model = load_pretrained_reward_model(config, FINETUNE_ARCHITECTURE)?;

    train_reward_model(
        config,
        reward_model,
        ModelName::MlpFinetuned,
        dataset,
        FINETUNE_EPOCHS,
        FINETUNE_BATCH_SIZE,
        TrainOptions::default(),
    )
}
