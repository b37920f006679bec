//! Adam optimizer

use super::{Optimizer, Param};
use ndarray::Array2;

/// Adam optimizer with bias-corrected moment estimates.
///
/// θ_t = θ_{t-1} - lr_t * m_t / (√v_t + ε), lr_t = lr * √(1 - β2^t) / (1 - β1^t)
#[derive(Debug, Clone)]
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: u64,
    m: Vec<Array2<f32>>, // First moment
    v: Vec<Array2<f32>>, // Second moment
}

impl Adam {
    /// Create a new Adam optimizer
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self { lr, beta1, beta2, epsilon, t: 0, m: Vec::new(), v: Vec::new() }
    }

    /// Adam with the usual betas (0.9, 0.999) and ε = 1e-8
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8)
    }

    /// Number of steps taken.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.t
    }

    fn ensure_moments(&mut self, params: &[&mut Param]) {
        if self.m.len() != params.len() {
            self.m = params.iter().map(|p| Array2::zeros(p.value.raw_dim())).collect();
            self.v = params.iter().map(|p| Array2::zeros(p.value.raw_dim())).collect();
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [&mut Param]) {
        self.ensure_moments(params);
        self.t += 1;

        // Bias correction factors
        let lr_t = self.lr
            * ((1.0 - self.beta2.powi(self.t as i32)).sqrt()
                / (1.0 - self.beta1.powi(self.t as i32)));
        let (beta1, beta2, eps) = (self.beta1, self.beta2, self.epsilon);

        for (i, param) in params.iter_mut().enumerate() {
            let m = &mut self.m[i];
            let v = &mut self.v[i];
            ndarray::Zip::from(m).and(v).and(&mut param.value).and(&param.grad).for_each(
                |m, v, value, &g| {
                    *m = beta1 * *m + (1.0 - beta1) * g;
                    *v = beta2 * *v + (1.0 - beta2) * g * g;
                    *value -= lr_t * *m / (v.sqrt() + eps);
                },
            );
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_first_step_moves_by_lr() {
        // With bias correction the first update has magnitude ~lr per entry
        let mut opt = Adam::default_params(0.1);
        let mut p = Param::new(array![[1.0, -1.0]]);
        p.grad = array![[2.0, -0.5]];
        opt.step(&mut [&mut p]);
        assert_relative_eq!(p.value[[0, 0]], 0.9, epsilon = 1e-4);
        assert_relative_eq!(p.value[[0, 1]], -0.9, epsilon = 1e-4);
        assert_eq!(opt.step_count(), 1);
    }

    #[test]
    fn test_zero_grad_leaves_value() {
        let mut opt = Adam::default_params(0.1);
        let mut p = Param::new(array![[3.0]]);
        opt.step(&mut [&mut p]);
        assert_eq!(p.value[[0, 0]], 3.0);
    }

    #[test]
    fn test_converges_on_quadratic() {
        // minimize (x - 2)^2
        let mut opt = Adam::default_params(0.05);
        let mut p = Param::new(array![[0.0]]);
        for _ in 0..500 {
            let x = p.value[[0, 0]];
            p.grad = array![[2.0 * (x - 2.0)]];
            opt.step(&mut [&mut p]);
        }
        assert_relative_eq!(p.value[[0, 0]], 2.0, epsilon = 1e-2);
    }

    #[test]
    fn test_set_lr() {
        let mut opt = Adam::default_params(0.001);
        opt.set_lr(0.01);
        assert_eq!(opt.lr(), 0.01);
    }
}
