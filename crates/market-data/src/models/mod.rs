//! Data models for the rate engine.

mod snapshot;

pub use snapshot::{
    is_valid_rate, CryptoPrices, RateProvenance, RateSnapshot, SnapshotProvenance,
    FALLBACK_BTC_PRICE_BRL, FALLBACK_ETH_PRICE_BRL, FALLBACK_USD_TO_BRL,
};
