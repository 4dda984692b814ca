//! Symbol normalization between the canonical vocabulary and provider
//! vocabularies.
//!
//! Every symbol stored or returned by this crate is a canonical symbol
//! (`BTCUSD`, `EURUSD`, `BRK-B`). Providers that format tickers differently
//! own a [`SymbolMapper`] that converts in both directions; the adapter
//! translates on the way out and back so that response keys are always
//! canonical.

mod crypto;
mod currencies;

pub use crypto::CryptocurrencyClassifier;
pub use currencies::is_currency_code;

/// Length of the fixed quote-currency suffix in canonical pair symbols
/// (`BTCUSD`, `EURUSD`).
pub const QUOTE_CURRENCY_LEN: usize = 3;

/// Bidirectional symbol translation for one provider.
///
/// `to_provider(to_canonical(s)) == s` must hold for every provider symbol
/// the mapper recognizes; mappers with best-effort rules for unknown input
/// document that the guarantee covers recognized symbols only.
pub trait SymbolMapper: Send + Sync {
    /// Convert a provider-formatted symbol to the canonical form.
    fn to_canonical(&self, provider_symbol: &str) -> String;

    /// Convert a canonical symbol to the provider's format.
    fn to_provider(&self, canonical_symbol: &str) -> String;
}
