use snafu::ensure;

use crate::{
    models::request_params::OhlcRequestParams,
    providers::{ProviderError, ValidationSnafu},
};

/// Builds the query string for the OHLC endpoint.
pub fn construct_params(params: &OhlcRequestParams) -> Vec<(&'static str, String)> {
    vec![
        ("vs_currency", params.vs_currency.to_lowercase()),
        ("days", params.days.to_string()),
    ]
}

/// Rejects requests CoinGecko would refuse or that would produce a malformed
/// URL path.
pub fn validate_params(params: &OhlcRequestParams) -> Result<(), ProviderError> {
    let valid_id = |s: &str| {
        !s.is_empty()
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    };

    ensure!(
        valid_id(&params.coin_id),
        ValidationSnafu {
            message: format!("invalid coin id {:?}", params.coin_id),
        }
    );
    ensure!(
        valid_id(&params.vs_currency),
        ValidationSnafu {
            message: format!("invalid vs_currency {:?}", params.vs_currency),
        }
    );
    Ok(())
}
