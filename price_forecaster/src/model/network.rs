//! Stacked LSTM regressor.
//!
//! Every LSTM layer but the last feeds its full hidden sequence to the next
//! one; the last layer's final hidden state goes through a single linear
//! unit. Inputs are `[batch, look_back]` matrices of scaled closes, read one
//! column per time step.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{
    dense::{Dense, DenseGrads},
    lstm::{LstmGrads, LstmLayer, LstmTrace},
    optimizer::Adam,
};
use crate::errors::ForecastError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LstmNetwork {
    pub look_back: usize,
    layers: Vec<LstmLayer>,
    head: Dense,
}

/// Loss gradients for every parameter of an [`LstmNetwork`].
#[derive(Debug, Clone)]
pub struct Gradients {
    pub layers: Vec<LstmGrads>,
    pub head: DenseGrads,
}

impl LstmNetwork {
    pub fn new(look_back: usize, hidden_sizes: &[usize], rng: &mut StdRng) -> Result<Self, ForecastError> {
        if look_back == 0 {
            return Err(ForecastError::InvalidLookBack);
        }
        if hidden_sizes.is_empty() || hidden_sizes.contains(&0) {
            return Err(ForecastError::InvalidConfig(format!(
                "hidden_sizes must be non-empty and positive, got {hidden_sizes:?}"
            )));
        }

        let mut layers = Vec::with_capacity(hidden_sizes.len());
        let mut input = 1;
        for &hidden in hidden_sizes {
            layers.push(LstmLayer::new(input, hidden, rng));
            input = hidden;
        }

        Ok(Self {
            look_back,
            layers,
            head: Dense::new(input, 1, rng),
        })
    }

    pub fn hidden_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.hidden_size).collect()
    }

    /// Total trainable scalars.
    pub fn parameter_count(&self) -> usize {
        let lstm: usize = self
            .layers
            .iter()
            .map(|l| l.w.len() + l.u.len() + l.b.len())
            .sum();
        lstm + self.head.w.len() + self.head.b.len()
    }

    fn run(&self, inputs: &Array2<f64>) -> (Vec<LstmTrace>, Array2<f64>) {
        debug_assert_eq!(inputs.ncols(), self.look_back);

        let mut xs: Vec<Array2<f64>> = inputs
            .columns()
            .into_iter()
            .map(|col| col.insert_axis(Axis(1)).to_owned())
            .collect();

        let mut traces = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let trace = layer.forward(&xs);
            xs = trace.outputs.clone();
            traces.push(trace);
        }

        let last = xs.pop().unwrap_or_else(|| Array2::zeros((inputs.nrows(), 0)));
        (traces, last)
    }

    /// One prediction per row of `inputs`.
    pub fn forward(&self, inputs: &Array2<f64>) -> Array1<f64> {
        let (_, last) = self.run(inputs);
        self.head.forward(&last).column(0).to_owned()
    }

    /// Mean squared error over the batch.
    pub fn loss(&self, inputs: &Array2<f64>, targets: &Array1<f64>) -> f64 {
        let diff = self.forward(inputs) - targets;
        diff.mapv(|d| d * d).mean().unwrap_or(0.0)
    }

    /// MSE and its gradient w.r.t. every parameter, by backpropagation
    /// through time.
    pub fn loss_and_gradients(&self, inputs: &Array2<f64>, targets: &Array1<f64>) -> (f64, Gradients) {
        let batch = inputs.nrows().max(1) as f64;
        let (traces, last) = self.run(inputs);
        let y = self.head.forward(&last).column(0).to_owned();

        let diff = &y - targets;
        let loss = diff.mapv(|d| d * d).sum() / batch;
        let dy = (diff * (2.0 / batch)).insert_axis(Axis(1));

        let (head, dh_last) = self.head.backward(&last, &dy);

        let steps = self.look_back;
        let mut dh_out: Vec<Array2<f64>> = (0..steps)
            .map(|_| Array2::zeros(dh_last.raw_dim()))
            .collect();
        if let Some(slot) = dh_out.last_mut() {
            *slot = dh_last;
        }

        let mut layers = Vec::with_capacity(self.layers.len());
        for (layer, trace) in self.layers.iter().zip(&traces).rev() {
            let (grads, dxs) = layer.backward(trace, &dh_out);
            layers.push(grads);
            dh_out = dxs;
        }
        layers.reverse();

        (loss, Gradients { layers, head })
    }

    /// One Adam step over all parameters.
    pub fn apply_gradients(&mut self, grads: &Gradients, opt: &mut Adam) {
        opt.begin_step();
        for (k, (layer, g)) in self.layers.iter_mut().zip(&grads.layers).enumerate() {
            opt.update(3 * k, &mut layer.w, &g.w);
            opt.update(3 * k + 1, &mut layer.u, &g.u);
            opt.update(3 * k + 2, &mut layer.b, &g.b);
        }
        let base = 3 * self.layers.len();
        opt.update(base, &mut self.head.w, &grads.head.w);
        opt.update(base + 1, &mut self.head.b, &grads.head.b);
    }

    /// Predicts the value following one scaled window.
    pub fn predict(&self, window: &[f64]) -> Result<f64, ForecastError> {
        if window.len() != self.look_back {
            return Err(ForecastError::ShapeMismatch {
                expected: self.look_back,
                found: window.len(),
            });
        }
        let inputs = Array2::from_shape_vec((1, self.look_back), window.to_vec()).map_err(|_| {
            ForecastError::ShapeMismatch {
                expected: self.look_back,
                found: window.len(),
            }
        })?;
        Ok(self.forward(&inputs)[0])
    }
}
