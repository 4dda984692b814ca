//! Error types for the market data crate.
//!
//! [`MarketDataError`] is used internally by the adapter fetch paths. The
//! public adapter operations never surface these errors directly: a failed
//! fetch degrades to an empty map entry or a minimal profile at the trait
//! boundary, so callers can rely on absence-of-key instead of error
//! handling. See the provider module for the conversion points.

use thiserror::Error;
use yahoo_finance_api::YahooError;

/// Errors that can occur while talking to a market data provider.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429 or an in-band
    /// throttling notice).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A provider response could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The adapter is misconfigured (malformed base URL, missing token).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<YahooError> for MarketDataError {
    fn from(error: YahooError) -> Self {
        match error {
            YahooError::FetchFailed(e) => MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: e,
            },
            YahooError::NoQuotes => {
                MarketDataError::SymbolNotFound("No quotes found".to_string())
            }
            YahooError::NoResult => MarketDataError::SymbolNotFound("No data found".to_string()),
            other => MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: other.to_string(),
            },
        }
    }
}
