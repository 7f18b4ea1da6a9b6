use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// How much history to request from the OHLC endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Days {
    /// The last `n` days (`n >= 1`).
    Count(u32),
    /// The entire history the provider has.
    Max,
}

impl Default for Days {
    fn default() -> Self {
        Days::Count(365)
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Days::Count(n) => write!(f, "{n}"),
            Days::Max => f.write_str("max"),
        }
    }
}

impl FromStr for Days {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("max") {
            return Ok(Days::Max);
        }
        match s.parse::<u32>() {
            Ok(0) => Err("days must be at least 1".to_string()),
            Ok(n) => Ok(Days::Count(n)),
            Err(_) => Err(format!("invalid days value {s:?}: expected a positive integer or \"max\"")),
        }
    }
}

impl Serialize for Days {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Days {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accept both `days = 30` and `days = "30"` / `days = "max"`.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u32),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(0) => Err(de::Error::custom("days must be at least 1")),
            Raw::Int(n) => Ok(Days::Count(n)),
            Raw::Str(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

/// Parameters for one OHLC request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OhlcRequestParams {
    /// Provider-side asset id (e.g., "bitcoin").
    pub coin_id: String,

    /// Quote currency (e.g., "usd").
    pub vs_currency: String,

    /// Lookback window.
    pub days: Days,
}

impl OhlcRequestParams {
    pub fn new(coin_id: impl Into<String>, vs_currency: impl Into<String>, days: Days) -> Self {
        Self {
            coin_id: coin_id.into(),
            vs_currency: vs_currency.into(),
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_parse_and_display() {
        assert_eq!("365".parse::<Days>().unwrap(), Days::Count(365));
        assert_eq!(" MAX ".parse::<Days>().unwrap(), Days::Max);
        assert!("0".parse::<Days>().is_err());
        assert!("-3".parse::<Days>().is_err());
        assert!("week".parse::<Days>().is_err());

        assert_eq!(Days::Count(30).to_string(), "30");
        assert_eq!(Days::Max.to_string(), "max");
        assert_eq!(Days::default(), Days::Count(365));
    }

    #[test]
    fn days_deserialize_from_int_or_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            days: Days,
        }

        let w: Wrapper = toml::from_str("days = 90").unwrap();
        assert_eq!(w.days, Days::Count(90));
        let w: Wrapper = toml::from_str("days = \"max\"").unwrap();
        assert_eq!(w.days, Days::Max);
        assert!(toml::from_str::<Wrapper>("days = 0").is_err());
    }
}
