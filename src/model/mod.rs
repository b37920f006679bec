//! Reward networks
//!
//! A reward model maps each observation of a trajectory to a scalar reward;
//! the predicted return of a trajectory is the sum of those rewards.

mod linear;
mod mlp;

pub use linear::Linear;
pub use mlp::{MlpRewardModel, DEFAULT_LEARNING_RATE, MLP_ARCHITECTURE};

use crate::data::PreferenceBatch;
use crate::error::Result;
use crate::io::Checkpointable;
use ndarray::{Array1, Array3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Network dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Architecture {
    /// Observation size
    pub input_dim: usize,
    /// Width of every hidden layer
    pub hidden_dim: usize,
    /// Number of linear layers (at least 1)
    pub layer_num: usize,
    /// Outputs per step; summed into the step reward
    pub output_dim: usize,
}

impl Architecture {
    pub fn new(input_dim: usize, hidden_dim: usize, layer_num: usize, output_dim: usize) -> Self {
        Self { input_dim, hidden_dim, layer_num, output_dim }
    }

    /// `(in, out)` for every linear layer.
    pub fn layer_dims(&self) -> Vec<(usize, usize)> {
        let n = self.layer_num.max(1);
        (0..n)
            .map(|i| {
                let fan_in = if i == 0 { self.input_dim } else { self.hidden_dim };
                let fan_out = if i + 1 == n { self.output_dim } else { self.hidden_dim };
                (fan_in, fan_out)
            })
            .collect()
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input_dim={} hidden_dim={} layer_num={} output_dim={}",
            self.input_dim, self.hidden_dim, self.layer_num, self.output_dim
        )
    }
}

/// A trainable trajectory reward model.
pub trait RewardModel: Checkpointable + Send {
    /// Dimensions of the network.
    fn architecture(&self) -> Architecture;

    /// Predicted return for each trajectory of `observations: [B, T, D]`.
    fn predict_returns(&self, observations: &Array3<f32>) -> Result<Array1<f32>>;

    /// One optimization step on `batch`; returns the batch loss before the update.
    ///
    /// `max_grad_norm` clips the global gradient norm when set.
    fn training_step(&mut self, batch: &PreferenceBatch, max_grad_norm: Option<f32>) -> Result<f32>;

    /// Batch loss without updating parameters.
    fn validation_step(&self, batch: &PreferenceBatch) -> Result<f32>;

    /// Current optimizer learning rate.
    fn learning_rate(&self) -> f32;
}
