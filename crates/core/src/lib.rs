//! Realdash Core - live market data cache and multi-currency valuation.
//!
//! The dashboard's only subsystem with real systems properties: a demand-
//! activated refresh loop over external rate providers, a single shared
//! snapshot cache, synchronous fan-out to subscribers, and a deterministic
//! conversion function valuing amounts across fiat and crypto units.
//!
//! Presentation, persistence and authentication live elsewhere; they consume
//! [`RateService`] through its narrow interface.

pub mod rates;
pub mod valuation;

pub use rates::{RateService, RateServiceConfig, SubscriberCallback};
pub use valuation::{convert, convert_with_route, ConversionRoute, CurrencyUnit, MonetaryAmount};

// Re-export the snapshot types consumers receive.
pub use realdash_market_data::{RateProvenance, RateSnapshot, SnapshotProvenance};
