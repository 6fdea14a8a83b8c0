//! Snapshot assembly with per-field fallback.
//!
//! [`RateSource`] queries the fiat and crypto providers concurrently and
//! merges whatever came back into a single [`RateSnapshot`]. Fetching never
//! fails: a field whose upstream is unavailable degrades to its hard-coded
//! fallback constant, with provenance recorded so the degradation stays
//! visible to operators. Availability of the dashboard beats correctness of
//! any individual rate.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use std::env;
use std::sync::Arc;

use crate::models::{
    RateProvenance, RateSnapshot, SnapshotProvenance, FALLBACK_BTC_PRICE_BRL,
    FALLBACK_ETH_PRICE_BRL, FALLBACK_USD_TO_BRL,
};
use crate::provider::{CoinGeckoProvider, CryptoPriceProvider, FiatRateProvider, OpenErApiProvider};

/// Environment variable carrying the optional crypto provider API key.
pub const CRYPTO_API_KEY_ENV: &str = "REALDASH_CRYPTO_API_KEY";

/// Anything that can produce a fresh rate snapshot on demand.
///
/// The refresh scheduler depends on this trait rather than on [`RateSource`]
/// directly so tests can inject fakes with controlled timing and content.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Produce a snapshot. Infallible: implementations degrade to fallback
    /// data rather than surfacing errors to the scheduler.
    async fn fetch_snapshot(&self) -> RateSnapshot;
}

/// Merges one fiat and one crypto provider into snapshots.
pub struct RateSource {
    fiat: Arc<dyn FiatRateProvider>,
    crypto: Arc<dyn CryptoPriceProvider>,
}

impl RateSource {
    pub fn new(fiat: Arc<dyn FiatRateProvider>, crypto: Arc<dyn CryptoPriceProvider>) -> Self {
        Self { fiat, crypto }
    }

    /// Builds a source with the production providers, reading the optional
    /// crypto API key from `REALDASH_CRYPTO_API_KEY`.
    pub fn from_env() -> Self {
        let api_key = env::var(CRYPTO_API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty());

        Self::new(
            Arc::new(OpenErApiProvider::new()),
            Arc::new(CoinGeckoProvider::new(api_key)),
        )
    }
}

#[async_trait]
impl SnapshotSource for RateSource {
    async fn fetch_snapshot(&self) -> RateSnapshot {
        let (fiat_result, crypto_result) =
            tokio::join!(self.fiat.fetch_usd_to_brl(), self.crypto.fetch_brl_prices());

        let (usd_to_brl, fiat_provenance) = match fiat_result {
            Ok(rate) => (rate, RateProvenance::Live),
            Err(e) => {
                warn!(
                    "Fiat rate fetch from {} failed, using fallback USD→BRL {}: {}",
                    self.fiat.id(),
                    FALLBACK_USD_TO_BRL,
                    e
                );
                (FALLBACK_USD_TO_BRL, RateProvenance::Fallback)
            }
        };

        let (btc_price_brl, eth_price_brl, crypto_provenance) = match crypto_result {
            Ok(prices) => (prices.btc_brl, prices.eth_brl, RateProvenance::Live),
            Err(e) => {
                warn!(
                    "Crypto price fetch from {} failed, using fallback BTC/ETH prices: {}",
                    self.crypto.id(),
                    e
                );
                (
                    FALLBACK_BTC_PRICE_BRL,
                    FALLBACK_ETH_PRICE_BRL,
                    RateProvenance::Fallback,
                )
            }
        };

        let provenance = SnapshotProvenance {
            usd_to_brl: fiat_provenance,
            btc_price_brl: crypto_provenance,
            eth_price_brl: crypto_provenance,
        };

        if provenance == SnapshotProvenance::ALL_FALLBACK {
            warn!("Both upstreams failed; snapshot is entirely fallback data");
        } else {
            debug!(
                "Captured snapshot: USD→BRL {} BTC {} ETH {}",
                usd_to_brl, btc_price_brl, eth_price_brl
            );
        }

        RateSnapshot {
            usd_to_brl,
            // Reciprocal always derives from whichever value resolved,
            // live or fallback.
            brl_to_usd: 1.0 / usd_to_brl,
            btc_price_brl,
            eth_price_brl,
            captured_at: Utc::now(),
            provenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RateSourceError;
    use crate::models::CryptoPrices;

    struct FakeFiat(Result<f64, ()>);

    #[async_trait]
    impl FiatRateProvider for FakeFiat {
        fn id(&self) -> &'static str {
            "FAKE_FIAT"
        }

        async fn fetch_usd_to_brl(&self) -> Result<f64, RateSourceError> {
            self.0.map_err(|_| RateSourceError::MissingRate {
                provider: "FAKE_FIAT",
                entry: "BRL",
            })
        }
    }

    struct FakeCrypto(Result<CryptoPrices, ()>);

    #[async_trait]
    impl CryptoPriceProvider for FakeCrypto {
        fn id(&self) -> &'static str {
            "FAKE_CRYPTO"
        }

        async fn fetch_brl_prices(&self) -> Result<CryptoPrices, RateSourceError> {
            self.0.map_err(|_| RateSourceError::MissingRate {
                provider: "FAKE_CRYPTO",
                entry: "bitcoin.brl",
            })
        }
    }

    fn source(fiat: Result<f64, ()>, crypto: Result<CryptoPrices, ()>) -> RateSource {
        RateSource::new(Arc::new(FakeFiat(fiat)), Arc::new(FakeCrypto(crypto)))
    }

    const LIVE_PRICES: CryptoPrices = CryptoPrices {
        btc_brl: 350_000.0,
        eth_brl: 18_000.0,
    };

    #[tokio::test]
    async fn both_live_yields_fully_live_snapshot() {
        let snapshot = source(Ok(5.0), Ok(LIVE_PRICES)).fetch_snapshot().await;
        assert_eq!(snapshot.usd_to_brl, 5.0);
        assert_eq!(snapshot.brl_to_usd, 0.2);
        assert_eq!(snapshot.btc_price_brl, 350_000.0);
        assert_eq!(snapshot.eth_price_brl, 18_000.0);
        assert!(snapshot.is_fully_live());
    }

    #[tokio::test]
    async fn total_failure_yields_exact_fallback_constants() {
        let snapshot = source(Err(()), Err(())).fetch_snapshot().await;
        assert_eq!(snapshot.usd_to_brl, FALLBACK_USD_TO_BRL);
        assert_eq!(snapshot.brl_to_usd, 1.0 / FALLBACK_USD_TO_BRL);
        assert_eq!(snapshot.btc_price_brl, FALLBACK_BTC_PRICE_BRL);
        assert_eq!(snapshot.eth_price_brl, FALLBACK_ETH_PRICE_BRL);
        assert!(snapshot.is_fully_fallback());
    }

    #[tokio::test]
    async fn fiat_failure_only_degrades_fiat_fields() {
        let snapshot = source(Err(()), Ok(LIVE_PRICES)).fetch_snapshot().await;
        assert_eq!(snapshot.usd_to_brl, FALLBACK_USD_TO_BRL);
        assert_eq!(snapshot.provenance.usd_to_brl, RateProvenance::Fallback);
        assert_eq!(snapshot.btc_price_brl, 350_000.0);
        assert_eq!(snapshot.provenance.btc_price_brl, RateProvenance::Live);
        assert_eq!(snapshot.provenance.eth_price_brl, RateProvenance::Live);
    }

    #[tokio::test]
    async fn crypto_failure_keeps_live_fiat_and_its_reciprocal() {
        let snapshot = source(Ok(4.0), Err(())).fetch_snapshot().await;
        assert_eq!(snapshot.usd_to_brl, 4.0);
        assert_eq!(snapshot.brl_to_usd, 0.25);
        assert_eq!(snapshot.provenance.usd_to_brl, RateProvenance::Live);
        assert_eq!(snapshot.btc_price_brl, FALLBACK_BTC_PRICE_BRL);
        assert_eq!(snapshot.eth_price_brl, FALLBACK_ETH_PRICE_BRL);
        assert_eq!(snapshot.provenance.btc_price_brl, RateProvenance::Fallback);
    }
}
