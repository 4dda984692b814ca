//! Symbol translation between canonical notation and Yahoo notation.
//!
//! Yahoo spells cryptocurrency pairs with a dash (`BTC-USD`) and foreign
//! exchange pairs with an `=X` suffix (`EURUSD=X`). Canonical notation
//! drops both decorations (`BTCUSD`, `EURUSD`). Everything else, including
//! share classes like `BRK-B`, passes through untouched in both directions.

use std::sync::Arc;

use crate::models::DEFAULT_CURRENCY;
use crate::symbols::{
    is_currency_code, CryptocurrencyClassifier, SymbolMapper, QUOTE_CURRENCY_LEN,
};

/// Maps between canonical symbols and Yahoo Finance symbols.
pub struct YahooSymbolMapper {
    classifier: Arc<CryptocurrencyClassifier>,
}

impl YahooSymbolMapper {
    pub fn new(classifier: Arc<CryptocurrencyClassifier>) -> Self {
        Self { classifier }
    }
}

impl SymbolMapper for YahooSymbolMapper {
    fn to_canonical(&self, provider_symbol: &str) -> String {
        // Crypto pair: joining the halves must yield a recognized pair,
        // otherwise the dash is part of the ticker (BRK-B).
        if let Some(base) = provider_symbol.strip_suffix(&format!("-{}", DEFAULT_CURRENCY)) {
            let candidate = format!("{}{}", base, DEFAULT_CURRENCY);
            if self.classifier.is_cryptocurrency(&candidate) {
                return candidate;
            }
        }

        if let Some(pair) = provider_symbol.strip_suffix("=X") {
            return pair.to_string();
        }

        provider_symbol.to_string()
    }

    fn to_provider(&self, canonical_symbol: &str) -> String {
        // The classifier only answers true when the base/quote boundary is
        // a valid char boundary, so split_at cannot panic here.
        if self.classifier.is_cryptocurrency(canonical_symbol) {
            let (base, quote) = canonical_symbol.split_at(canonical_symbol.len() - QUOTE_CURRENCY_LEN);
            return format!("{}-{}", base, quote);
        }

        if canonical_symbol.len() == 2 * QUOTE_CURRENCY_LEN && canonical_symbol.is_ascii() {
            let (from, to) = canonical_symbol.split_at(QUOTE_CURRENCY_LEN);
            if is_currency_code(from) && is_currency_code(to) {
                return format!("{}=X", canonical_symbol);
            }
        }

        canonical_symbol.to_string()
    }
}
