//! The rate snapshot value object and its fallback constants.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Fallback USD→BRL rate used when the fiat upstream is unavailable.
pub const FALLBACK_USD_TO_BRL: f64 = 5.2;
/// Fallback BTC price in BRL used when the crypto upstream is unavailable.
pub const FALLBACK_BTC_PRICE_BRL: f64 = 300_000.0;
/// Fallback ETH price in BRL used when the crypto upstream is unavailable.
pub const FALLBACK_ETH_PRICE_BRL: f64 = 15_000.0;

/// Where a snapshot field came from.
///
/// Fallback values are indistinguishable from live ones at display time,
/// so the origin is recorded per field for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateProvenance {
    /// The value was parsed from a live upstream response.
    Live,
    /// The value is one of the hard-coded fallback constants.
    Fallback,
}

/// Per-field provenance of a snapshot.
///
/// `brl_to_usd` carries no entry of its own: it is always derived from
/// whatever value resolved for `usd_to_brl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotProvenance {
    pub usd_to_brl: RateProvenance,
    pub btc_price_brl: RateProvenance,
    pub eth_price_brl: RateProvenance,
}

impl SnapshotProvenance {
    pub const ALL_LIVE: Self = Self {
        usd_to_brl: RateProvenance::Live,
        btc_price_brl: RateProvenance::Live,
        eth_price_brl: RateProvenance::Live,
    };

    pub const ALL_FALLBACK: Self = Self {
        usd_to_brl: RateProvenance::Fallback,
        btc_price_brl: RateProvenance::Fallback,
        eth_price_brl: RateProvenance::Fallback,
    };
}

/// Crypto prices quoted in BRL, as returned by a [`CryptoPriceProvider`].
///
/// [`CryptoPriceProvider`]: crate::provider::CryptoPriceProvider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CryptoPrices {
    pub btc_brl: f64,
    pub eth_brl: f64,
}

/// One immutable, timestamped set of exchange and crypto prices.
///
/// Created only by [`RateSource`](crate::source::RateSource) or by
/// [`RateSnapshot::fallback`]; never mutated after construction. Each refresh
/// produces a brand-new snapshot that replaces the previous one wholesale.
///
/// Invariant: all four numeric fields are strictly positive and finite.
/// `brl_to_usd` is consistent with `usd_to_brl` only at capture time; readers
/// must not assume exact reciprocity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub usd_to_brl: f64,
    /// Reciprocal of `usd_to_brl`, stored explicitly so consumers never
    /// divide on the hot display path.
    pub brl_to_usd: f64,
    pub btc_price_brl: f64,
    pub eth_price_brl: f64,
    pub captured_at: DateTime<Utc>,
    #[serde(skip)]
    pub provenance: SnapshotProvenance,
}

impl RateSnapshot {
    /// Builds the all-fallback snapshot, timestamped now.
    ///
    /// Used when both upstreams fail, and by consumers that need a usable
    /// snapshot before the first fetch completes.
    pub fn fallback() -> Self {
        Self::fallback_at(Utc::now())
    }

    /// Builds the all-fallback snapshot with an explicit timestamp.
    pub fn fallback_at(captured_at: DateTime<Utc>) -> Self {
        Self {
            usd_to_brl: FALLBACK_USD_TO_BRL,
            brl_to_usd: 1.0 / FALLBACK_USD_TO_BRL,
            btc_price_brl: FALLBACK_BTC_PRICE_BRL,
            eth_price_brl: FALLBACK_ETH_PRICE_BRL,
            captured_at,
            provenance: SnapshotProvenance::ALL_FALLBACK,
        }
    }

    /// True when every priced field came from a live upstream response.
    pub fn is_fully_live(&self) -> bool {
        self.provenance == SnapshotProvenance::ALL_LIVE
    }

    /// True when every priced field is a fallback constant.
    pub fn is_fully_fallback(&self) -> bool {
        self.provenance == SnapshotProvenance::ALL_FALLBACK
    }
}

/// Whether a value is usable as an exchange rate or price.
///
/// Upstreams occasionally return zeros, negatives, or garbage that parses to
/// NaN; any of those sends the field to its fallback constant.
pub fn is_valid_rate(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
