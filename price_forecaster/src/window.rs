//! Sliding look-back windows over a scaled series.

use crate::errors::ForecastError;

/// `look_back` consecutive observations and the value that follows them.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingWindow {
    pub inputs: Vec<f64>,
    pub target: f64,
}

/// Emits one window per offset: the i-th window is `series[i..i+look_back]`
/// with target `series[i+look_back]`. A series no longer than `look_back`
/// yields no windows.
pub fn build_windows(series: &[f64], look_back: usize) -> Result<Vec<TrainingWindow>, ForecastError> {
    if look_back == 0 {
        return Err(ForecastError::InvalidLookBack);
    }

    if series.len() <= look_back {
        return Ok(Vec::new());
    }

    Ok(series
        .windows(look_back + 1)
        .map(|w| TrainingWindow {
            inputs: w[..look_back].to_vec(),
            target: w[look_back],
        })
        .collect())
}
