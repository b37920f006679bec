//! Fully connected layer

use crate::optim::Param;
use ndarray::{Array2, Axis};
use rand::Rng;

/// `y = x · W + b` with `W: [in, out]` and `b: [1, out]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    pub(crate) weight: Param,
    pub(crate) bias: Param,
}

impl Linear {
    /// Uniform init in `[-1/√in, 1/√in]` for both weight and bias.
    pub fn new<R: Rng>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        let bound = 1.0 / (in_features.max(1) as f32).sqrt();
        let weight = Array2::from_shape_simple_fn((in_features, out_features), || rng.random_range(-bound..=bound));
        let bias = Array2::from_shape_simple_fn((1, out_features), || rng.random_range(-bound..=bound));
        Self { weight: Param::new(weight), bias: Param::new(bias) }
    }

    pub fn in_features(&self) -> usize {
        self.weight.value.nrows()
    }

    pub fn out_features(&self) -> usize {
        self.weight.value.ncols()
    }

    /// `x: [N, in]` → `[N, out]`
    pub fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
        x.dot(&self.weight.value) + &self.bias.value
    }

    /// Accumulate parameter gradients for `grad_out: [N, out]` and return
    /// the gradient with respect to the input.
    pub fn backward(&mut self, x: &Array2<f32>, grad_out: &Array2<f32>) -> Array2<f32> {
        self.weight.grad += &x.t().dot(grad_out);
        self.bias.grad += &grad_out.sum_axis(Axis(0)).insert_axis(Axis(0));
        grad_out.dot(&self.weight.value.t())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_init_within_bound() {
        let mut rng = StdRng::seed_from_u64(0);
        let layer = Linear::new(16, 8, &mut rng);
        assert!(layer.weight.value.iter().all(|w| w.abs() <= 0.25));
        assert_eq!(layer.bias.shape(), vec![1, 8]);
        assert_eq!((layer.in_features(), layer.out_features()), (16, 8));
    }

    #[test]
    fn test_forward_adds_bias() {
        let layer = Linear {
            weight: Param::new(array![[1.0, 0.0], [0.0, 2.0]]),
            bias: Param::new(array![[0.5, -1.0]]),
        };
        let y = layer.forward(&array![[1.0, 1.0], [2.0, 3.0]]);
        assert_eq!(y, array![[1.5, 1.0], [2.5, 5.0]]);
    }

    #[test]
    fn test_backward_matches_manual_gradients() {
        let mut layer = Linear {
            weight: Param::new(array![[1.0], [2.0]]),
            bias: Param::new(array![[0.0]]),
        };
        let x = array![[3.0, 4.0]];
        let grad_in = layer.backward(&x, &array![[1.0]]);
        assert_eq!(layer.weight.grad, array![[3.0], [4.0]]);
        assert_relative_eq!(layer.bias.grad[[0, 0]], 1.0);
        assert_eq!(grad_in, array![[1.0, 2.0]]);
    }
}
