//! Loss functions for reward model training
//!
//! # Bradley-Terry preference loss
//!
//! The probability that the first trajectory is preferred is
//! `σ(R_first - R_second)`. Against a soft label `t ∈ [0, 1]` this is binary
//! cross-entropy on the logit `x = R_first - R_second`, computed stably:
//! ```text
//! L_i = max(x_i, 0) - x_i * t_i + log(1 + exp(-|x_i|))
//! L = mean(L_i)
//! ```
//!
//! Gradient: `∂L/∂x_i = (σ(x_i) - t_i) / N`

use ndarray::Array1;

/// Loss value together with its gradient with respect to the inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct LossOutput {
    /// Mean loss over the batch
    pub value: f32,
    /// `∂L/∂x`, same length as the input
    pub grad: Array1<f32>,
}

/// Trait for loss functions
pub trait LossFn {
    /// Compute the loss and its gradient
    fn forward(&self, predictions: &Array1<f32>, targets: &Array1<f32>) -> LossOutput;

    /// Name of the loss function
    fn name(&self) -> &str;
}

/// Numerically stable sigmoid
pub(crate) fn sigmoid(v: f32) -> f32 {
    if v >= 0.0 {
        1.0 / (1.0 + (-v).exp())
    } else {
        let exp_v = v.exp();
        exp_v / (1.0 + exp_v)
    }
}

/// Binary cross-entropy on preference logits.
#[derive(Debug, Clone, Copy, Default)]
pub struct BradleyTerryLoss;

impl BradleyTerryLoss {
    /// Preference logits `R_first - R_second`.
    pub fn logits(first_returns: &Array1<f32>, second_returns: &Array1<f32>) -> Array1<f32> {
        first_returns - second_returns
    }

    /// max(x, 0) - x*t + log(1 + exp(-|x|))
    fn stable_bce(logit: f32, target: f32) -> f32 {
        logit.max(0.0) - logit * target + (-logit.abs()).exp().ln_1p()
    }
}

impl LossFn for BradleyTerryLoss {
    fn forward(&self, predictions: &Array1<f32>, targets: &Array1<f32>) -> LossOutput {
        debug_assert_eq!(predictions.len(), targets.len(), "Predictions and targets must have same length");

        let n = predictions.len().max(1) as f32;
        let value = predictions
            .iter()
            .zip(targets.iter())
            .map(|(&logit, &target)| Self::stable_bce(logit, target))
            .sum::<f32>()
            / n;

        let mut grad = predictions.mapv(sigmoid);
        grad -= targets;
        grad /= n;

        LossOutput { value, grad }
    }

    fn name(&self) -> &'static str {
        "BradleyTerry"
    }
}
