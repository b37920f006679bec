//! Trainable parameters and the optimizer trait

use ndarray::Array2;

/// A trainable matrix together with its accumulated gradient.
///
/// Bias vectors are stored as `[1, N]` rows so they broadcast over a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Current value
    pub value: Array2<f32>,
    /// Gradient of the loss with respect to `value`
    pub grad: Array2<f32>,
}

impl Param {
    /// Wrap a value with a zeroed gradient.
    pub fn new(value: Array2<f32>) -> Self {
        let grad = Array2::zeros(value.raw_dim());
        Self { value, grad }
    }

    /// Reset the gradient to zero.
    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }

    /// Number of scalar entries.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the parameter holds no entries.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// `[rows, cols]`
    pub fn shape(&self) -> Vec<usize> {
        self.value.shape().to_vec()
    }
}

/// Trait for optimization algorithms
pub trait Optimizer: Send {
    /// Apply one update using the gradients stored in `params`.
    ///
    /// Parameters must be passed in the same order on every call.
    fn step(&mut self, params: &mut [&mut Param]);

    /// Zero out all gradients
    fn zero_grad(&mut self, params: &mut [&mut Param]) {
        for param in params.iter_mut() {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);
}
