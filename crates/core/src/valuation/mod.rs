//! Multi-currency valuation over a rate snapshot.
//!
//! A small fixed conversion graph: BRL is the hub, USD and the two priced
//! cryptos are spokes. There is no general multi-hop resolver; adding a new
//! unit means adding an explicit edge, which keeps behavior auditable.

use serde::{Deserialize, Serialize};

use realdash_market_data::RateSnapshot;

/// A currency or crypto-asset unit known to the dashboard.
///
/// Only USD, BRL, BTC and ETH participate in conversion; other units exist
/// for display and pass through valuation unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyUnit {
    Usd,
    Brl,
    Eur,
    Btc,
    Eth,
}

impl CurrencyUnit {
    /// The display code for this unit.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Brl => "BRL",
            Self::Eur => "EUR",
            Self::Btc => "BTC",
            Self::Eth => "ETH",
        }
    }
}

/// A value tagged with its unit, the valuation input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonetaryAmount {
    pub value: f64,
    pub unit: CurrencyUnit,
}

impl MonetaryAmount {
    pub fn new(value: f64, unit: CurrencyUnit) -> Self {
        Self { value, unit }
    }
}

/// Which edge of the conversion graph produced a result.
///
/// `Unsupported` marks the pass-through case: the amount was returned
/// unchanged because no conversion rule covers the pair. Callers that care
/// (audits, debugging) can branch on it; display code ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConversionRoute {
    /// Source and target unit are identical.
    Identity,
    /// USD↔BRL via the snapshot's stored rate or reciprocal.
    FiatDirect,
    /// BTC/ETH to BRL via the snapshot's BRL price.
    CryptoToBrl,
    /// BTC/ETH to USD, two hops through BRL.
    CryptoToUsd,
    /// No rule for this pair; value returned unchanged.
    Unsupported,
}

/// Converts an amount to `target`, reporting the route taken.
///
/// Pure over its inputs: the same amount, target and snapshot always yield
/// the same result. Unsupported pairs (EUR involved, crypto→crypto, fiat→
/// crypto) pass the value through unchanged rather than erroring; the route
/// makes that case distinguishable from a real conversion.
pub fn convert_with_route(
    amount: MonetaryAmount,
    target: CurrencyUnit,
    snapshot: &RateSnapshot,
) -> (f64, ConversionRoute) {
    use CurrencyUnit::*;

    if amount.unit == target {
        return (amount.value, ConversionRoute::Identity);
    }

    match (amount.unit, target) {
        (Usd, Brl) => (amount.value * snapshot.usd_to_brl, ConversionRoute::FiatDirect),
        (Brl, Usd) => (amount.value * snapshot.brl_to_usd, ConversionRoute::FiatDirect),
        (Btc | Eth, Brl | Usd) => {
            let price_brl = match amount.unit {
                Btc => snapshot.btc_price_brl,
                _ => snapshot.eth_price_brl,
            };
            match target {
                Brl => (amount.value * price_brl, ConversionRoute::CryptoToBrl),
                // No direct crypto→USD rate is tracked; hop through BRL.
                _ => (
                    amount.value * price_brl * snapshot.brl_to_usd,
                    ConversionRoute::CryptoToUsd,
                ),
            }
        }
        _ => (amount.value, ConversionRoute::Unsupported),
    }
}

/// Converts an amount to `target`, discarding route information.
pub fn convert(amount: MonetaryAmount, target: CurrencyUnit, snapshot: &RateSnapshot) -> f64 {
    convert_with_route(amount, target, snapshot).0
}
