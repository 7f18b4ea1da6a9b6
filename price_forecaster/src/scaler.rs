//! Min-max scaling of a univariate series.

use serde::{Deserialize, Serialize};

use crate::errors::ForecastError;

/// Linear map from the fitted data range onto `feature_range`.
///
/// A zero data range is treated as 1, so a constant series maps to
/// `feature_range.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub feature_range: (f64, f64),
    pub data_min: f64,
    pub data_max: f64,
    scale: f64,
    offset: f64,
}

impl MinMaxScaler {
    /// Fits onto `[0, 1]`.
    pub fn fit(series: &[f64]) -> Result<Self, ForecastError> {
        Self::fit_with_range(series, (0.0, 1.0))
    }

    pub fn fit_with_range(series: &[f64], feature_range: (f64, f64)) -> Result<Self, ForecastError> {
        if series.is_empty() {
            return Err(ForecastError::EmptySeries);
        }
        if let Some(index) = series.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::NonFiniteValue { index });
        }

        let data_min = series.iter().copied().fold(f64::INFINITY, f64::min);
        let data_max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let data_range = match data_max - data_min {
            r if r == 0.0 => 1.0,
            r => r,
        };

        let scale = (feature_range.1 - feature_range.0) / data_range;
        Ok(Self {
            feature_range,
            data_min,
            data_max,
            scale,
            offset: feature_range.0 - data_min * scale,
        })
    }

    pub fn transform_one(&self, value: f64) -> f64 {
        value * self.scale + self.offset
    }

    pub fn inverse_one(&self, scaled: f64) -> f64 {
        (scaled - self.offset) / self.scale
    }

    pub fn transform(&self, series: &[f64]) -> Vec<f64> {
        series.iter().map(|&v| self.transform_one(v)).collect()
    }

    pub fn inverse_transform(&self, scaled: &[f64]) -> Vec<f64> {
        scaled.iter().map(|&v| self.inverse_one(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_extremes_to_unit_interval() {
        let s = MinMaxScaler::fit(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(s.transform(&[1.0, 3.0, 5.0]), vec![0.0, 0.5, 1.0]);
        assert_eq!(s.data_min, 1.0);
        assert_eq!(s.data_max, 5.0);
        assert_eq!(s.inverse_one(0.25), 2.0);
    }

    #[test]
    fn constant_series_maps_to_lower_bound() {
        let s = MinMaxScaler::fit(&[7.0, 7.0, 7.0]).unwrap();
        assert_eq!(s.transform(&[7.0, 7.0]), vec![0.0, 0.0]);
        assert_eq!(s.inverse_one(0.0), 7.0);
    }

    #[test]
    fn custom_range() {
        let s = MinMaxScaler::fit_with_range(&[0.0, 4.0], (-1.0, 1.0)).unwrap();
        assert_eq!(s.transform(&[0.0, 2.0, 4.0]), vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_empty_and_nan() {
        assert!(matches!(MinMaxScaler::fit(&[]), Err(ForecastError::EmptySeries)));
        assert!(matches!(
            MinMaxScaler::fit(&[1.0, f64::NAN]),
            Err(ForecastError::NonFiniteValue { index: 1 })
        ));
    }
}
