//! A small recurrent regressor: stacked LSTM layers feeding a linear head.

pub mod config;
pub mod dense;
pub mod lstm;
pub mod network;
pub mod optimizer;

pub use config::TrainConfig;
pub use network::LstmNetwork;
pub use optimizer::Adam;

use ndarray::{Array, ShapeBuilder};
use rand::{Rng, rngs::StdRng};

/// Samples `U(-l, l)` with `l = sqrt(6 / (fan_in + fan_out))`.
pub(crate) fn glorot_uniform<Sh: ShapeBuilder>(
    shape: Sh,
    fan_in: usize,
    fan_out: usize,
    rng: &mut StdRng,
) -> Array<f64, Sh::Dim> {
    let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
    Array::from_shape_simple_fn(shape, || rng.random_range(-limit..limit))
}

pub(crate) fn sigmoid(v: f64) -> f64 {
    1.0 / (1.0 + (-v).exp())
}
