//! Adam (Adaptive Moment Estimation).

use ndarray::{Array, ArrayD, Dimension, Zip};

#[derive(Debug, Clone)]
struct Moments {
    m: ArrayD<f64>,
    v: ArrayD<f64>,
}

/// Adam with bias correction folded into the step size:
/// `lr_t = lr * sqrt(1 - beta2^t) / (1 - beta1^t)`,
/// `p -= lr_t * m / (sqrt(v) + epsilon)`.
///
/// Moment buffers are addressed by slot, so every parameter must be passed
/// with the same slot on every step.
#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: u32,
    moments: Vec<Option<Moments>>,
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.001)
    }
}

impl Adam {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            t: 0,
            moments: Vec::new(),
        }
    }

    pub fn with_betas(mut self, beta1: f64, beta2: f64) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Starts a new update step. Call once per batch, before [`Adam::update`].
    pub fn begin_step(&mut self) {
        self.t += 1;
    }

    pub fn steps(&self) -> u32 {
        self.t
    }

    pub fn update<D: Dimension>(&mut self, slot: usize, param: &mut Array<f64, D>, grad: &Array<f64, D>) {
        let t = self.t.max(1) as i32;
        let (b1, b2) = (self.beta1, self.beta2);
        let lr_t = self.learning_rate * (1.0 - b2.powi(t)).sqrt() / (1.0 - b1.powi(t));
        let eps = self.epsilon;

        if self.moments.len() <= slot {
            self.moments.resize(slot + 1, None);
        }
        let grad = grad.view().into_dyn();
        let mom = self.moments[slot].get_or_insert_with(|| Moments {
            m: ArrayD::zeros(grad.raw_dim()),
            v: ArrayD::zeros(grad.raw_dim()),
        });

        mom.m.zip_mut_with(&grad, |m, &g| *m = b1 * *m + (1.0 - b1) * g);
        mom.v.zip_mut_with(&grad, |v, &g| *v = b2 * *v + (1.0 - b2) * g * g);

        Zip::from(param.view_mut().into_dyn())
            .and(&mom.m)
            .and(&mom.v)
            .for_each(|p, &m, &v| *p -= lr_t * m / (v.sqrt() + eps));
    }
}
