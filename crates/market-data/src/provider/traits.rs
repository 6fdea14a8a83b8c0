//! Provider trait definitions.

use async_trait::async_trait;

use crate::errors::RateSourceError;
use crate::models::CryptoPrices;

/// A fiat exchange-rate feed.
///
/// Implementations query an upstream returning rates relative to USD and
/// extract the BRL entry.
#[async_trait]
pub trait FiatRateProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the current USD→BRL rate.
    ///
    /// The returned value is guaranteed strictly positive and finite;
    /// anything else is reported as an error.
    async fn fetch_usd_to_brl(&self) -> Result<f64, RateSourceError>;
}

/// A crypto price feed quoting assets in BRL.
#[async_trait]
pub trait CryptoPriceProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the current BTC and ETH prices in BRL.
    ///
    /// Both returned values are guaranteed strictly positive and finite;
    /// anything else is reported as an error.
    async fn fetch_brl_prices(&self) -> Result<CryptoPrices, RateSourceError>;
}
