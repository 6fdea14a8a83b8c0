//! Error types for upstream rate providers.
//!
//! These errors never cross the [`RateSource`](crate::source::RateSource)
//! boundary: the source logs them and substitutes the fallback constant for
//! the affected field.

use thiserror::Error;

/// Errors a single upstream provider call can produce.
#[derive(Error, Debug)]
pub enum RateSourceError {
    /// A network error occurred while communicating with the provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("Provider {provider} returned status {status}")]
    BadStatus {
        /// The provider that returned the status
        provider: &'static str,
        /// The HTTP status code
        status: u16,
    },

    /// The response body could not be parsed into the expected shape.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// The provider whose response failed to parse
        provider: &'static str,
        /// Description of the parse failure
        message: String,
    },

    /// The response parsed but the expected rate entry was absent.
    #[error("Missing rate entry '{entry}' in {provider} response")]
    MissingRate {
        /// The provider whose response lacked the entry
        provider: &'static str,
        /// The absent key, e.g. "BRL" or "bitcoin.brl"
        entry: &'static str,
    },

    /// The rate was present but not a strictly positive finite number.
    #[error("Invalid rate for '{entry}' from {provider}: {value}")]
    InvalidRate {
        /// The provider that returned the value
        provider: &'static str,
        /// The offending entry
        entry: &'static str,
        /// The rejected value
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = RateSourceError::MissingRate {
            provider: "OPEN_ER_API",
            entry: "BRL",
        };
        assert_eq!(
            format!("{}", error),
            "Missing rate entry 'BRL' in OPEN_ER_API response"
        );

        let error = RateSourceError::InvalidRate {
            provider: "COINGECKO",
            entry: "bitcoin.brl",
            value: -1.0,
        };
        assert_eq!(
            format!("{}", error),
            "Invalid rate for 'bitcoin.brl' from COINGECKO: -1"
        );
    }
}
