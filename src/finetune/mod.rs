//! Reward model fine-tuning
//!
//! Wires a preference dataset, a [`RewardModel`](crate::model::RewardModel)
//! and the [`Trainer`](crate::train::Trainer) together: random train/val
//! split, shuffled loaders with worker threads, best-`val_loss`
//! checkpointing and early stopping.

mod options;
mod pipeline;

#[cfg(test)]
mod tests;

pub use options::{TrainOptions, DEFAULT_SPLIT_RATIO};
pub use pipeline::{
    fit_reward_model, load_pretrained_reward_model, run_finetuning, train_reward_model, FINETUNE_ARCHITECTURE,
    FINETUNE_BATCH_SIZE, FINETUNE_EPOCHS, LOG_EVERY_N_STEPS, SEQUENCE_LENGTH,
};
