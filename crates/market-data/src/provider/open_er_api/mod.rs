//! Open ER API provider for fiat exchange rates.
//!
//! Queries the free `open.er-api.com` endpoint, which returns all rates
//! relative to USD in a single response. No authentication is required.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::RateSourceError;
use crate::models::is_valid_rate;
use crate::provider::FiatRateProvider;

const BASE_URL: &str = "https://open.er-api.com/v6/latest/USD";
const PROVIDER_ID: &str = "OPEN_ER_API";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response shape of the latest-rates endpoint.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    /// "success" or "error"
    result: String,
    /// Currency code → rate relative to USD
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Fiat exchange-rate provider backed by open.er-api.com.
pub struct OpenErApiProvider {
    client: Client,
    base_url: String,
}

impl Default for OpenErApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenErApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL.to_string())
    }

    /// Override the endpoint URL. Used by tests pointing at a local server.
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, base_url }
    }
}

/// Extracts and validates the BRL entry from a parsed response.
fn extract_usd_to_brl(response: &LatestRatesResponse) -> Result<f64, RateSourceError> {
    if response.result != "success" {
        return Err(RateSourceError::MalformedResponse {
            provider: PROVIDER_ID,
            message: format!("result field was '{}'", response.result),
        });
    }

    let rate = response
        .rates
        .get("BRL")
        .copied()
        .ok_or(RateSourceError::MissingRate {
            provider: PROVIDER_ID,
            entry: "BRL",
        })?;

    if !is_valid_rate(rate) {
        return Err(RateSourceError::InvalidRate {
            provider: PROVIDER_ID,
            entry: "BRL",
            value: rate,
        });
    }

    Ok(rate)
}

#[async_trait]
impl FiatRateProvider for OpenErApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_usd_to_brl(&self) -> Result<f64, RateSourceError> {
        let response = self.client.get(&self.base_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateSourceError::BadStatus {
                provider: PROVIDER_ID,
                status: status.as_u16(),
            });
        }

        let parsed: LatestRatesResponse =
            response
                .json()
                .await
                .map_err(|e| RateSourceError::MalformedResponse {
                    provider: PROVIDER_ID,
                    message: e.to_string(),
                })?;

        extract_usd_to_brl(&parsed)
    }
}
