//! CoinGecko provider for crypto prices quoted in BRL.
//!
//! Uses the public `simple/price` endpoint for `bitcoin` and `ethereum`.
//! An API key is optional: when configured it is attached as the
//! `x-cg-demo-api-key` header, raising the rate limit. Absence of the key
//! never blocks fetching.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::RateSourceError;
use crate::models::{is_valid_rate, CryptoPrices};
use crate::provider::CryptoPriceProvider;

const BASE_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin,ethereum&vs_currencies=brl";
const PROVIDER_ID: &str = "COINGECKO";
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response shape: asset id → fiat code → price.
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// Crypto price provider backed by the CoinGecko simple-price endpoint.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(BASE_URL.to_string(), api_key)
    }

    /// Override the endpoint URL. Used by tests pointing at a local server.
    pub fn with_base_url(base_url: String, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            api_key,
        }
    }
}

/// Pulls one asset's BRL price out of a parsed response and validates it.
fn extract_brl_price(
    response: &SimplePriceResponse,
    asset_id: &'static str,
    entry: &'static str,
) -> Result<f64, RateSourceError> {
    let price = response
        .get(asset_id)
        .and_then(|quotes| quotes.get("brl"))
        .copied()
        .ok_or(RateSourceError::MissingRate {
            provider: PROVIDER_ID,
            entry,
        })?;

    if !is_valid_rate(price) {
        return Err(RateSourceError::InvalidRate {
            provider: PROVIDER_ID,
            entry,
            value: price,
        });
    }

    Ok(price)
}

fn extract_prices(response: &SimplePriceResponse) -> Result<CryptoPrices, RateSourceError> {
    Ok(CryptoPrices {
        btc_brl: extract_brl_price(response, "bitcoin", "bitcoin.brl")?,
        eth_brl: extract_brl_price(response, "ethereum", "ethereum.brl")?,
    })
}

#[async_trait]
impl CryptoPriceProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_brl_prices(&self) -> Result<CryptoPrices, RateSourceError> {
        let mut request = self.client.get(&self.base_url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateSourceError::BadStatus {
                provider: PROVIDER_ID,
                status: status.as_u16(),
            });
        }

        let parsed: SimplePriceResponse =
            response
                .json()
                .await
                .map_err(|e| RateSourceError::MalformedResponse {
                    provider: PROVIDER_ID,
                    message: e.to_string(),
                })?;

        extract_prices(&parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> SimplePriceResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_extracts_both_prices() {
        let response = parse(r#"{"bitcoin":{"brl":350000.5},"ethereum":{"brl":18000.25}}"#);
        let prices = extract_prices(&response).unwrap();
        assert_eq!(prices.btc_brl, 350000.5);
        assert_eq!(prices.eth_brl, 18000.25);
    }

    #[test]
    fn test_missing_asset_fails() {
        let response = parse(r#"{"bitcoin":{"brl":350000.5}}"#);
        assert!(matches!(
            extract_prices(&response),
            Err(RateSourceError::MissingRate {
                entry: "ethereum.brl",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_fiat_code_fails() {
        let response = parse(r#"{"bitcoin":{"usd":67000.0},"ethereum":{"brl":18000.0}}"#);
        assert!(matches!(
            extract_prices(&response),
            Err(RateSourceError::MissingRate {
                entry: "bitcoin.brl",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let response = parse(r#"{"bitcoin":{"brl":-5.0},"ethereum":{"brl":18000.0}}"#);
        assert!(matches!(
            extract_prices(&response),
            Err(RateSourceError::InvalidRate {
                entry: "bitcoin.brl",
                ..
            })
        ));
    }

    #[test]
    fn test_provider_id() {
        assert_eq!(CoinGeckoProvider::new(None).id(), "COINGECKO");
    }
}
