//! Upstream price providers.
//!
//! One provider per upstream concern: a fiat exchange-rate feed and a crypto
//! price feed. The [`RateSource`](crate::source::RateSource) queries both and
//! merges the results into a single snapshot.

pub mod coingecko;
pub mod open_er_api;
mod traits;

pub use coingecko::CoinGeckoProvider;
pub use open_er_api::OpenErApiProvider;
pub use traits::{CryptoPriceProvider, FiatRateProvider};
