//! Close-price forecasting: min-max scaling, look-back windows, a stacked
//! LSTM regressor trained with Adam, and a JSON model artifact.

pub mod artifact;
pub mod cli;
pub mod errors;
pub mod model;
pub mod pipeline;
pub mod scaler;
pub mod trainer;
pub mod window;
