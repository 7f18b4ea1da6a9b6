use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::glorot_uniform;

/// Fully connected layer with a linear activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dense {
    pub(crate) w: Array2<f64>,
    pub(crate) b: Array1<f64>,
}

#[derive(Debug, Clone)]
pub struct DenseGrads {
    pub w: Array2<f64>,
    pub b: Array1<f64>,
}

impl Dense {
    pub fn new(input_size: usize, output_size: usize, rng: &mut StdRng) -> Self {
        Self {
            w: glorot_uniform((input_size, output_size), input_size, output_size, rng),
            b: Array1::zeros(output_size),
        }
    }

    /// `[batch, input] -> [batch, output]`
    pub fn forward(&self, x: &Array2<f64>) -> Array2<f64> {
        x.dot(&self.w) + &self.b
    }

    /// Gradients for `dy = dL/dy`, plus `dL/dx`.
    pub fn backward(&self, x: &Array2<f64>, dy: &Array2<f64>) -> (DenseGrads, Array2<f64>) {
        let grads = DenseGrads {
            w: x.t().dot(dy),
            b: dy.sum_axis(Axis(0)),
        };
        (grads, dy.dot(&self.w.t()))
    }
}
