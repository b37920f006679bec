//! Multi-layer perceptron reward model

use super::{Architecture, Linear, RewardModel};
use crate::data::PreferenceBatch;
use crate::error::{Error, Result};
use crate::io::{load_model, Checkpointable, ModelMetadata, ModelState};
use crate::optim::{clip_grad_norm, Adam, Optimizer, Param};
use crate::train::{BradleyTerryLoss, LossFn};
use ndarray::{Array1, Array2, Array3, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

/// Architecture tag written into checkpoint metadata.
pub const MLP_ARCHITECTURE: &str = "mlp_reward";

/// Adam learning rate used unless overridden.
pub const DEFAULT_LEARNING_RATE: f32 = 1e-3;

/// Per-layer inputs and pre-activations kept for the backward pass.
struct ForwardCache {
    inputs: Vec<Array2<f32>>,
    pre_activations: Vec<Array2<f32>>,
}

/// `layer_num` linear layers with ReLU between them, applied to every step
/// of a trajectory independently.
#[derive(Debug, Clone)]
pub struct MlpRewardModel {
    name: String,
    architecture: Architecture,
    layers: Vec<Linear>,
    optimizer: Adam,
    loss: BradleyTerryLoss,
}

impl MlpRewardModel {
    /// Freshly initialized network; the same seed gives the same weights.
    pub fn new(architecture: Architecture, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let layers = architecture
            .layer_dims()
            .into_iter()
            .map(|(fan_in, fan_out)| Linear::new(fan_in, fan_out, &mut rng))
            .collect();
        Self {
            name: "reward_model".to_string(),
            architecture,
            layers,
            optimizer: Adam::default_params(DEFAULT_LEARNING_RATE),
            loss: BradleyTerryLoss,
        }
    }

    /// Restore a network saved with [`Checkpointable::to_state`].
    ///
    /// Fails with [`Error::ArchitectureMismatch`] if the checkpoint was written
    /// for different dimensions.
    pub fn load_from_checkpoint(path: impl AsRef<Path>, architecture: Architecture) -> Result<Self> {
        let state = load_model(path.as_ref())?;
        let mut model = Self::new(architecture, 0);
        model.load_state(&state)?;
        model.name = state.metadata.name;
        tracing::info!(path = %path.as_ref().display(), %architecture, "loaded reward model checkpoint");
        Ok(model)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_learning_rate(mut self, lr: f32) -> Self {
        self.optimizer = Adam::default_params(lr);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layers(&self) -> &[Linear] {
        &self.layers
    }

    /// Total number of trainable scalars.
    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(|l| l.weight.len() + l.bias.len()).sum()
    }

    fn named_params(&self) -> impl Iterator<Item = (String, &Param)> + '_ {
        self.layers.iter().enumerate().flat_map(|(i, l)| {
            [(format!("layers.{i}.weight"), &l.weight), (format!("layers.{i}.bias"), &l.bias)]
        })
    }

    /// `[B, T, D]` → per-step outputs `[B*T, O]`.
    fn step_outputs(&self, observations: &Array3<f32>) -> Result<(Array2<f32>, ForwardCache)> {
        let (b, t, d) = observations.dim();
        if d != self.architecture.input_dim {
            return Err(Error::ShapeMismatch {
                expected: vec![b, t, self.architecture.input_dim],
                actual: vec![b, t, d],
            });
        }
        let mut x = observations
            .to_shape((b * t, d))
            .map_err(|_| Error::ShapeMismatch { expected: vec![b * t, d], actual: vec![b, t, d] })?
            .into_owned();

        let last = self.layers.len() - 1;
        let mut cache = ForwardCache {
            inputs: Vec::with_capacity(self.layers.len()),
            pre_activations: Vec::with_capacity(self.layers.len()),
        };
        for (i, layer) in self.layers.iter().enumerate() {
            let z = layer.forward(&x);
            let out = if i < last { z.mapv(|v| v.max(0.0)) } else { z.clone() };
            cache.inputs.push(x);
            cache.pre_activations.push(z);
            x = out;
        }
        Ok((x, cache))
    }

    /// Sum outputs per step, then steps per trajectory.
    fn returns(outputs: &Array2<f32>, batch: usize, steps: usize) -> Result<Array1<f32>> {
        outputs
            .sum_axis(Axis(1))
            .into_shape_with_order((batch, steps))
            .map(|per_step| per_step.sum_axis(Axis(1)))
            .map_err(|_| Error::ShapeMismatch { expected: vec![batch, steps], actual: vec![outputs.nrows()] })
    }

    fn backward(&mut self, cache: &ForwardCache, d_returns: &Array1<f32>, steps: usize) {
        let mut grad = Array2::from_shape_fn((d_returns.len() * steps, self.architecture.output_dim), |(r, _)| {
            d_returns[r / steps]
        });
        let last = self.layers.len() - 1;
        for i in (0..self.layers.len()).rev() {
            if i < last {
                ndarray::Zip::from(&mut grad).and(&cache.pre_activations[i]).for_each(|g, &z| {
                    if z <= 0.0 {
                        *g = 0.0;
                    }
                });
            }
            grad = self.layers[i].backward(&cache.inputs[i], &grad);
        }
    }

    fn check_batch(batch: &PreferenceBatch) -> Result<()> {
        let n = batch.preferences.len();
        for trajectories in [&batch.first, &batch.second] {
            if trajectories.dim().0 != n {
                return Err(Error::ShapeMismatch {
                    expected: vec![n],
                    actual: vec![trajectories.dim().0],
                });
            }
        }
        Ok(())
    }

    fn batch_logits(&self, batch: &PreferenceBatch) -> Result<(Array1<f32>, ForwardCache, ForwardCache)> {
        Self::check_batch(batch)?;
        let (out_first, cache_first) = self.step_outputs(&batch.first)?;
        let (out_second, cache_second) = self.step_outputs(&batch.second)?;
        let first = Self::returns(&out_first, batch.size(), batch.first.dim().1)?;
        let second = Self::returns(&out_second, batch.size(), batch.second.dim().1)?;
        Ok((BradleyTerryLoss::logits(&first, &second), cache_first, cache_second))
    }
}

impl RewardModel for MlpRewardModel {
    fn architecture(&self) -> Architecture {
        self.architecture
    }

    fn predict_returns(&self, observations: &Array3<f32>) -> Result<Array1<f32>> {
        let (outputs, _) = self.step_outputs(observations)?;
        let (b, t, _) = observations.dim();
        Self::returns(&outputs, b, t)
    }

    fn training_step(&mut self, batch: &PreferenceBatch, max_grad_norm: Option<f32>) -> Result<f32> {
        let (logits, cache_first, cache_second) = self.batch_logits(batch)?;
        let loss = self.loss.forward(&logits, &batch.preferences);

        for layer in &mut self.layers {
            layer.weight.zero_grad();
            layer.bias.zero_grad();
        }
        self.backward(&cache_first, &loss.grad, batch.first.dim().1);
        self.backward(&cache_second, &loss.grad.mapv(|g| -g), batch.second.dim().1);

        let mut params: Vec<&mut Param> = self
            .layers
            .iter_mut()
            .flat_map(|l| {
                let Linear { weight, bias } = l;
                [weight, bias]
            })
            .collect();
        if let Some(max_norm) = max_grad_norm {
            clip_grad_norm(&mut params, max_norm);
        }
        self.optimizer.step(&mut params);
        self.optimizer.zero_grad(&mut params);

        Ok(loss.value)
    }

    fn validation_step(&self, batch: &PreferenceBatch) -> Result<f32> {
        let (logits, _, _) = self.batch_logits(batch)?;
        Ok(self.loss.forward(&logits, &batch.preferences).value)
    }

    fn learning_rate(&self) -> f32 {
        self.optimizer.lr()
    }
}

fn stored_architecture(metadata: &ModelMetadata) -> Option<Architecture> {
    let dim = |key: &str| metadata.hyperparameters.get(key).and_then(serde_json::Value::as_u64).map(|v| v as usize);
    Some(Architecture {
        input_dim: dim("input_dim")?,
        hidden_dim: dim("hidden_dim")?,
        layer_num: dim("layer_num")?,
        output_dim: dim("output_dim")?,
    })
}

impl Checkpointable for MlpRewardModel {
    fn to_state(&self) -> ModelState {
        let arch = self.architecture;
        let metadata = ModelMetadata::new(&self.name, MLP_ARCHITECTURE)
            .with_hyperparameter("input_dim", arch.input_dim)
            .with_hyperparameter("hidden_dim", arch.hidden_dim)
            .with_hyperparameter("layer_num", arch.layer_num)
            .with_hyperparameter("output_dim", arch.output_dim)
            .with_hyperparameter("learning_rate", self.optimizer.lr());
        ModelState::from_params(metadata, self.named_params())
    }

    fn load_state(&mut self, state: &ModelState) -> Result<()> {
        let expected = self.architecture;
        let mismatch = |actual: String| Error::ArchitectureMismatch { expected: expected.to_string(), actual };

        if state.metadata.architecture != MLP_ARCHITECTURE {
            return Err(mismatch(state.metadata.architecture.clone()));
        }
        match stored_architecture(&state.metadata) {
            Some(stored) if stored == expected => {}
            Some(stored) => return Err(mismatch(stored.to_string())),
            None => return Err(mismatch("<missing dimensions>".to_string())),
        }

        let matrices = state.to_matrices()?;
        if matrices.len() != self.layers.len() * 2 {
            return Err(mismatch(format!("{} parameter tensors", matrices.len())));
        }
        let targets = self.layers.iter_mut().flat_map(|l| {
            let Linear { weight, bias } = l;
            [weight, bias]
        });
        for (param, (name, value)) in targets.zip(matrices) {
            if param.value.dim() != value.dim() {
                return Err(Error::ShapeMismatch {
                    expected: param.shape(),
                    actual: value.shape().to_vec(),
                });
            }
            tracing::trace!(%name, "restored parameter");
            *param = Param::new(value);
        }
        self.optimizer = Adam::default_params(self.optimizer.lr());
        Ok(())
    }
}
