use std::collections::HashSet;
use std::sync::OnceLock;

use lazy_static::lazy_static;

use super::QUOTE_CURRENCY_LEN;

lazy_static! {
    /// Base tickers of well-known cryptocurrencies, uppercase.
    static ref BUILT_IN_SYMBOLS: HashSet<&'static str> = [
        "1INCH", "AAVE", "ADA", "ALGO", "APE", "APT", "ARB", "ATOM", "AVAX",
        "AXS", "BAT", "BCH", "BNB", "BTC", "CAKE", "CHZ", "COMP", "CRO",
        "CRV", "DAI", "DASH", "DOGE", "DOT", "EGLD", "ENJ", "EOS", "ETC",
        "ETH", "FIL", "FLOW", "FTM", "GALA", "GRT", "HBAR", "ICP", "IMX",
        "INJ", "IOTA", "KAVA", "KSM", "LDO", "LINK", "LTC", "LUNA", "MANA",
        "MATIC", "MKR", "NEAR", "NEO", "OP", "PEPE", "QNT", "RUNE", "SAND",
        "SHIB", "SNX", "SOL", "STX", "SUI", "THETA", "TON", "TRX", "UNI",
        "USDC", "USDT", "VET", "XLM", "XMR", "XRP", "XTZ", "ZEC", "ZIL",
    ]
    .into_iter()
    .collect();
}

/// Decides whether a canonical symbol denotes a cryptocurrency pair.
///
/// A pair symbol is the base ticker followed by a fixed 3-character quote
/// currency (`BTCUSD`, `ETHEUR`). The check strips the quote suffix and
/// tests the base against the union of the built-in set and the custom
/// overrides supplied at construction. Matching is case-insensitive; the
/// sets are kept uppercase and probes are uppercased.
///
/// The union is computed on first use and cached for the lifetime of the
/// classifier. Changing the custom list means constructing a new instance.
pub struct CryptocurrencyClassifier {
    custom_symbols: Vec<String>,
    combined: OnceLock<HashSet<String>>,
}

impl CryptocurrencyClassifier {
    /// Classifier over the built-in symbol set only.
    pub fn new() -> Self {
        Self::with_custom_symbols(Vec::new())
    }

    /// Classifier over the built-in set plus user-supplied base tickers.
    pub fn with_custom_symbols(custom_symbols: Vec<String>) -> Self {
        Self {
            custom_symbols: custom_symbols
                .into_iter()
                .map(|s| s.to_uppercase())
                .collect(),
            combined: OnceLock::new(),
        }
    }

    fn symbols(&self) -> &HashSet<String> {
        self.combined.get_or_init(|| {
            BUILT_IN_SYMBOLS
                .iter()
                .map(|s| s.to_string())
                .chain(self.custom_symbols.iter().cloned())
                .collect()
        })
    }

    /// True when the symbol's base (quote suffix stripped) is a known
    /// cryptocurrency ticker.
    pub fn is_cryptocurrency(&self, symbol: &str) -> bool {
        if symbol.len() <= QUOTE_CURRENCY_LEN {
            return false;
        }
        match symbol.get(..symbol.len() - QUOTE_CURRENCY_LEN) {
            Some(base) => self.symbols().contains(&base.to_uppercase()),
            None => false,
        }
    }
}

impl Default for CryptocurrencyClassifier {
    fn default() -> Self {
        Self::new()
    }
}
