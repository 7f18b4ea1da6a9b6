//! One LSTM layer with full backpropagation through time.
//!
//! Weights are packed gate-wise in the order input, forget, candidate,
//! output: `w` is `[input, 4*hidden]`, `u` is `[hidden, 4*hidden]` and `b`
//! is `[4*hidden]`. Activations are batch-major (`[batch, features]`).

use ndarray::{Array1, Array2, Axis, s};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{glorot_uniform, sigmoid};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LstmLayer {
    pub input_size: usize,
    pub hidden_size: usize,
    pub(crate) w: Array2<f64>,
    pub(crate) u: Array2<f64>,
    pub(crate) b: Array1<f64>,
}

/// Activations of one time step, kept for the backward pass.
#[derive(Debug, Clone)]
struct Step {
    x: Array2<f64>,
    h_prev: Array2<f64>,
    c_prev: Array2<f64>,
    i: Array2<f64>,
    f: Array2<f64>,
    g: Array2<f64>,
    o: Array2<f64>,
    tanh_c: Array2<f64>,
}

/// Forward trace of a whole sequence.
#[derive(Debug, Clone)]
pub struct LstmTrace {
    steps: Vec<Step>,
    /// Hidden state after every step.
    pub outputs: Vec<Array2<f64>>,
}

#[derive(Debug, Clone)]
pub struct LstmGrads {
    pub w: Array2<f64>,
    pub u: Array2<f64>,
    pub b: Array1<f64>,
}

impl LstmLayer {
    /// Glorot-uniform kernels, zero biases except the forget gate at 1.
    pub fn new(input_size: usize, hidden_size: usize, rng: &mut StdRng) -> Self {
        let h4 = 4 * hidden_size;
        let mut b = Array1::zeros(h4);
        b.slice_mut(s![hidden_size..2 * hidden_size]).fill(1.0);

        Self {
            input_size,
            hidden_size,
            w: glorot_uniform((input_size, h4), input_size, h4, rng),
            u: glorot_uniform((hidden_size, h4), hidden_size, h4, rng),
            b,
        }
    }

    /// Runs the layer over `xs` (one `[batch, input]` matrix per step) from a
    /// zero state.
    pub fn forward(&self, xs: &[Array2<f64>]) -> LstmTrace {
        let hs = self.hidden_size;
        let batch = xs.first().map_or(0, |x| x.nrows());

        let mut h = Array2::<f64>::zeros((batch, hs));
        let mut c = Array2::<f64>::zeros((batch, hs));
        let mut steps = Vec::with_capacity(xs.len());
        let mut outputs = Vec::with_capacity(xs.len());

        for x in xs {
            let z = x.dot(&self.w) + h.dot(&self.u) + &self.b;

            let i = z.slice(s![.., 0..hs]).mapv(sigmoid);
            let f = z.slice(s![.., hs..2 * hs]).mapv(sigmoid);
            let g = z.slice(s![.., 2 * hs..3 * hs]).mapv(f64::tanh);
            let o = z.slice(s![.., 3 * hs..]).mapv(sigmoid);

            let c_next = &f * &c + &i * &g;
            let tanh_c = c_next.mapv(f64::tanh);
            let h_next = &o * &tanh_c;

            steps.push(Step {
                x: x.clone(),
                h_prev: h,
                c_prev: c,
                i,
                f,
                g,
                o,
                tanh_c,
            });
            outputs.push(h_next.clone());
            h = h_next;
            c = c_next;
        }

        LstmTrace { steps, outputs }
    }

    /// Backpropagates `dh_out` (loss gradient w.r.t. each step's hidden
    /// output; zeros where a step's output is unused) through the sequence.
    /// Returns the parameter gradients and the gradient w.r.t. each input.
    pub fn backward(&self, trace: &LstmTrace, dh_out: &[Array2<f64>]) -> (LstmGrads, Vec<Array2<f64>>) {
        let hs = self.hidden_size;
        let mut grads = LstmGrads {
            w: Array2::zeros(self.w.raw_dim()),
            u: Array2::zeros(self.u.raw_dim()),
            b: Array1::zeros(self.b.raw_dim()),
        };
        let mut dxs = vec![Array2::zeros((0, 0)); trace.steps.len()];

        let Some(first) = trace.steps.first() else {
            return (grads, dxs);
        };
        let batch = first.x.nrows();
        let mut dh_next = Array2::<f64>::zeros((batch, hs));
        let mut dc_next = Array2::<f64>::zeros((batch, hs));
        let mut dz = Array2::<f64>::zeros((batch, 4 * hs));

        for (t, step) in trace.steps.iter().enumerate().rev() {
            let dh = &dh_out[t] + &dh_next;

            let d_o = &dh * &step.tanh_c;
            let dc = &dc_next + &(&dh * &step.o * &step.tanh_c.mapv(|v| 1.0 - v * v));
            let d_i = &dc * &step.g;
            let d_g = &dc * &step.i;
            let d_f = &dc * &step.c_prev;
            dc_next = &dc * &step.f;

            dz.slice_mut(s![.., 0..hs])
                .assign(&(&d_i * &step.i.mapv(|v| v * (1.0 - v))));
            dz.slice_mut(s![.., hs..2 * hs])
                .assign(&(&d_f * &step.f.mapv(|v| v * (1.0 - v))));
            dz.slice_mut(s![.., 2 * hs..3 * hs])
                .assign(&(&d_g * &step.g.mapv(|v| 1.0 - v * v)));
            dz.slice_mut(s![.., 3 * hs..])
                .assign(&(&d_o * &step.o.mapv(|v| v * (1.0 - v))));

            grads.w += &step.x.t().dot(&dz);
            grads.u += &step.h_prev.t().dot(&dz);
            grads.b += &dz.sum_axis(Axis(0));

            dxs[t] = dz.dot(&self.w.t());
            dh_next = dz.dot(&self.u.t());
        }

        (grads, dxs)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn shapes_and_forget_bias() {
        let mut rng = StdRng::seed_from_u64(7);
        let layer = LstmLayer::new(3, 5, &mut rng);
        assert_eq!(layer.w.dim(), (3, 20));
        assert_eq!(layer.u.dim(), (5, 20));
        assert!(layer.b.slice(s![5..10]).iter().all(|&v| v == 1.0));
        assert!(layer.b.slice(s![..5]).iter().all(|&v| v == 0.0));

        let limit = (6.0f64 / 23.0).sqrt();
        assert!(layer.w.iter().all(|v| v.abs() <= limit));

        let xs = vec![Array2::from_elem((4, 3), 0.5); 6];
        let trace = layer.forward(&xs);
        assert_eq!(trace.outputs.len(), 6);
        assert_eq!(trace.outputs[5].dim(), (4, 5));
        // |h| = |o * tanh(c)| < 1
        assert!(trace.outputs.iter().flatten().all(|v| v.abs() < 1.0));
    }

    #[test]
    fn empty_sequence_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = LstmLayer::new(1, 2, &mut rng);
        let trace = layer.forward(&[]);
        let (grads, dxs) = layer.backward(&trace, &[]);
        assert!(dxs.is_empty());
        assert!(grads.w.iter().all(|&v| v == 0.0));
    }
}
