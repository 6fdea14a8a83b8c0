//! Realdash Market Data Crate
//!
//! Upstream rate fetching for the realdash dashboard: one fiat exchange-rate
//! provider, one crypto price provider, and a [`RateSource`] that merges both
//! into immutable [`RateSnapshot`]s with per-field fallback.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +------------------+
//! | FiatRateProvider |     | CryptoProvider   |   (reqwest, independent)
//! +------------------+     +------------------+
//!          \                       /
//!           v                     v
//!            +------------------+
//!            |    RateSource    |   (merge + per-field fallback)
//!            +------------------+
//!                     |
//!                     v
//!            +------------------+
//!            |   RateSnapshot   |   (immutable, provenance-tagged)
//!            +------------------+
//! ```
//!
//! Fetching is best-effort by contract: `RateSource::fetch_snapshot` always
//! returns a usable snapshot, substituting hard-coded constants for fields
//! whose upstream failed and tagging them with
//! [`RateProvenance::Fallback`].

pub mod errors;
pub mod models;
pub mod provider;
pub mod source;

pub use errors::RateSourceError;
pub use models::{
    is_valid_rate, CryptoPrices, RateProvenance, RateSnapshot, SnapshotProvenance,
    FALLBACK_BTC_PRICE_BRL, FALLBACK_ETH_PRICE_BRL, FALLBACK_USD_TO_BRL,
};
pub use provider::{CoinGeckoProvider, CryptoPriceProvider, FiatRateProvider, OpenErApiProvider};
pub use source::{RateSource, SnapshotSource, CRYPTO_API_KEY_ENV};
