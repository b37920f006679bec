//! Options for a reward model fine-tuning run

use crate::train::callback::{TrainerCallback, DEFAULT_PATIENCE};
use std::fmt;

/// Fraction of the dataset used for training
pub const DEFAULT_SPLIT_RATIO: f64 = 0.8;

/// Per-call knobs of [`train_reward_model`](super::train_reward_model).
pub struct TrainOptions {
    /// `floor(split_ratio * len)` samples go to training, the rest to validation
    pub split_ratio: f64,
    /// Extra callback dispatched after the built-in ones
    pub callback: Option<Box<dyn TrainerCallback>>,
    /// Draw a progress bar
    pub enable_progress_bar: bool,
    /// Seed for the split and shuffling; falls back to the experiment seed,
    /// then to entropy
    pub seed: Option<u64>,
    /// Early stopping patience in epochs
    pub patience: usize,
    /// Minimum val_loss improvement that resets patience
    pub min_delta: f32,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            split_ratio: DEFAULT_SPLIT_RATIO,
            callback: None,
            enable_progress_bar: true,
            seed: None,
            patience: DEFAULT_PATIENCE,
            min_delta: 0.0,
        }
    }
}

impl TrainOptions {
    pub fn with_split_ratio(mut self, ratio: f64) -> Self {
        self.split_ratio = ratio;
        self
    }

    pub fn with_callback<C: TrainerCallback + 'static>(mut self, callback: C) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn with_progress_bar(mut self, enabled: bool) -> Self {
        self.enable_progress_bar = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_early_stopping(mut self, patience: usize, min_delta: f32) -> Self {
        self.patience = patience;
        self.min_delta = min_delta;
        self
    }
}

impl fmt::Debug for TrainOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainOptions")
            .field("split_ratio", &self.split_ratio)
            .field("callback", &self.callback.as_ref().map(|cb| cb.name()))
            .field("enable_progress_bar", &self.enable_progress_bar)
            .field("seed", &self.seed)
            .field("patience", &self.patience)
            .field("min_delta", &self.min_delta)
            .finish()
    }
}
