//! Serializable model state

use crate::error::{Error, Result};
use crate::optim::Param;
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where in training a checkpoint was taken.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingInfo {
    /// Epoch the state belongs to (0-indexed)
    pub epoch: usize,
    /// Optimizer steps taken so far
    pub global_step: usize,
    /// Monitored metric name, e.g. `val_loss`
    pub monitor: Option<String>,
    /// Monitored metric value at save time
    pub monitor_value: Option<f32>,
}

/// Model metadata containing architecture and training information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name/identifier
    pub name: String,

    /// Model architecture type (e.g. "mlp_reward")
    pub architecture: String,

    /// Format version
    pub version: String,

    /// Constructor arguments the parameters were created with
    pub hyperparameters: BTreeMap<String, serde_json::Value>,

    /// Training progress, absent for freshly initialized models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training: Option<TrainingInfo>,

    /// Save time
    pub saved_at: DateTime<Utc>,
}

impl ModelMetadata {
    /// Create new metadata with minimal fields
    pub fn new(name: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: architecture.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            hyperparameters: BTreeMap::new(),
            training: None,
            saved_at: Utc::now(),
        }
    }

    /// Record a constructor argument
    pub fn with_hyperparameter(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.hyperparameters.insert(key.into(), value.into());
        self
    }

    /// Attach training progress
    pub fn with_training(mut self, training: TrainingInfo) -> Self {
        self.training = Some(training);
        self
    }
}

/// Information about a model parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Parameter name (e.g., "layers.0.weight")
    pub name: String,

    /// Parameter shape
    pub shape: Vec<usize>,
}

/// Serializable model state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    /// Model metadata
    pub metadata: ModelMetadata,

    /// Parameter information
    pub parameters: Vec<ParameterInfo>,

    /// Flattened parameter data, in `parameters` order
    pub data: Vec<f32>,
}

impl ModelState {
    /// Flatten named parameters into a state.
    pub fn from_params<'a>(
        metadata: ModelMetadata,
        params: impl IntoIterator<Item = (String, &'a Param)>,
    ) -> Self {
        let mut parameters = Vec::new();
        let mut data = Vec::new();
        for (name, param) in params {
            parameters.push(ParameterInfo { name, shape: param.shape() });
            data.extend(param.value.iter().copied());
        }
        Self { metadata, parameters, data }
    }

    /// Rebuild the parameter matrices in stored order.
    pub fn to_matrices(&self) -> Result<Vec<(String, Array2<f32>)>> {
        let expected: usize = self.parameters.iter().map(|p| p.shape.iter().product::<usize>()).sum();
        if expected != self.data.len() {
            return Err(Error::ShapeMismatch { expected: vec![expected], actual: vec![self.data.len()] });
        }

        let mut offset = 0;
        let mut matrices = Vec::with_capacity(self.parameters.len());
        for info in &self.parameters {
            let &[rows, cols] = info.shape.as_slice() else {
                return Err(Error::ShapeMismatch { expected: vec![0, 0], actual: info.shape.clone() });
            };
            let n = rows * cols;
            let matrix = Array2::from_shape_vec((rows, cols), self.data[offset..offset + n].to_vec())
                .map_err(|_| Error::ShapeMismatch { expected: vec![rows, cols], actual: vec![n] })?;
            matrices.push((info.name.clone(), matrix));
            offset += n;
        }
        Ok(matrices)
    }

    /// Total number of scalar parameters.
    pub fn num_parameters(&self) -> usize {
        self.data.len()
    }
}

/// Components whose parameters can be written to and restored from a checkpoint.
pub trait Checkpointable {
    /// Snapshot the current parameters.
    fn to_state(&self) -> ModelState;

    /// Replace the current parameters with a saved state.
    fn load_state(&mut self, state: &ModelState) -> Result<()>;
}
