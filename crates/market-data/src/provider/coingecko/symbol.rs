//! Symbol translation between canonical notation and CoinGecko coin ids.
//!
//! CoinGecko addresses coins by id (`bitcoin`), not ticker. The mapper
//! carries a fixed table of the majors: canonical `BTCUSD` maps to the id
//! `bitcoin` and back. The table keys USD pairs only, so a pair quoted in
//! another currency (`BTCEUR`) counts as unknown. Symbols outside the
//! table pass through unchanged, which is why the provider refuses them
//! in `can_handle`.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::models::DEFAULT_CURRENCY;
use crate::symbols::SymbolMapper;

/// Supported coins as (canonical base, CoinGecko id, display name).
static COINS: &[(&str, &str, &str)] = &[
    ("AAVE", "aave", "Aave"),
    ("ADA", "cardano", "Cardano"),
    ("ALGO", "algorand", "Algorand"),
    ("ATOM", "cosmos", "Cosmos Hub"),
    ("AVAX", "avalanche-2", "Avalanche"),
    ("BCH", "bitcoin-cash", "Bitcoin Cash"),
    ("BNB", "binancecoin", "BNB"),
    ("BTC", "bitcoin", "Bitcoin"),
    ("DASH", "dash", "Dash"),
    ("DOGE", "dogecoin", "Dogecoin"),
    ("DOT", "polkadot", "Polkadot"),
    ("EOS", "eos", "EOS"),
    ("ETC", "ethereum-classic", "Ethereum Classic"),
    ("ETH", "ethereum", "Ethereum"),
    ("FIL", "filecoin", "Filecoin"),
    ("LINK", "chainlink", "Chainlink"),
    ("LTC", "litecoin", "Litecoin"),
    ("MATIC", "matic-network", "Polygon"),
    ("NEAR", "near", "NEAR Protocol"),
    ("SHIB", "shiba-inu", "Shiba Inu"),
    ("SOL", "solana", "Solana"),
    ("TRX", "tron", "TRON"),
    ("UNI", "uniswap", "Uniswap"),
    ("USDC", "usd-coin", "USDC"),
    ("USDT", "tether", "Tether"),
    ("VET", "vechain", "VeChain"),
    ("XLM", "stellar", "Stellar"),
    ("XMR", "monero", "Monero"),
    ("XRP", "ripple", "XRP"),
    ("XTZ", "tezos", "Tezos"),
    ("ZEC", "zcash", "Zcash"),
];

lazy_static! {
    static ref BASE_TO_COIN: HashMap<&'static str, (&'static str, &'static str)> = COINS
        .iter()
        .map(|(base, id, name)| (*base, (*id, *name)))
        .collect();
    static ref ID_TO_BASE: HashMap<&'static str, &'static str> =
        COINS.iter().map(|(base, id, _)| (*id, *base)).collect();
}

/// Maps between canonical symbols and CoinGecko coin ids.
#[derive(Debug, Default)]
pub struct CoinGeckoSymbolMapper;

impl CoinGeckoSymbolMapper {
    pub fn new() -> Self {
        Self
    }

    /// Base ticker of a canonical USD pair (`BTCUSD` -> `BTC`). CoinGecko
    /// quotes are served in USD, so a pair quoted in any other currency
    /// yields `None` and stays with whichever provider can price it.
    fn base_of(canonical_symbol: &str) -> Option<&str> {
        canonical_symbol.strip_suffix(DEFAULT_CURRENCY)
    }

    /// CoinGecko id for a canonical symbol, if the coin is in the table.
    pub fn coin_id(&self, canonical_symbol: &str) -> Option<&'static str> {
        let base = Self::base_of(canonical_symbol)?;
        BASE_TO_COIN.get(base).map(|(id, _)| *id)
    }

    /// Human-readable coin name for a canonical symbol.
    pub fn display_name(&self, canonical_symbol: &str) -> Option<&'static str> {
        let base = Self::base_of(canonical_symbol)?;
        BASE_TO_COIN.get(base).map(|(_, name)| *name)
    }
}

impl SymbolMapper for CoinGeckoSymbolMapper {
    fn to_canonical(&self, provider_symbol: &str) -> String {
        match ID_TO_BASE.get(provider_symbol) {
            Some(base) => format!("{}USD", base),
            None => provider_symbol.to_string(),
        }
    }

    fn to_provider(&self, canonical_symbol: &str) -> String {
        match self.coin_id(canonical_symbol) {
            Some(id) => id.to_string(),
            None => canonical_symbol.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_provider_maps_known_coins() {
        let mapper = CoinGeckoSymbolMapper::new();
        assert_eq!(mapper.to_provider("BTCUSD"), "bitcoin");
        assert_eq!(mapper.to_provider("ETHUSD"), "ethereum");
        assert_eq!(mapper.to_provider("AVAXUSD"), "avalanche-2");
    }

    #[test]
    fn test_to_canonical_maps_known_ids() {
        let mapper = CoinGeckoSymbolMapper::new();
        assert_eq!(mapper.to_canonical("bitcoin"), "BTCUSD");
        assert_eq!(mapper.to_canonical("matic-network"), "MATICUSD");
    }

    #[test]
    fn test_unknown_symbols_pass_through() {
        let mapper = CoinGeckoSymbolMapper::new();
        assert_eq!(mapper.to_provider("WENUSD"), "WENUSD");
        assert_eq!(mapper.to_canonical("some-unknown-coin"), "some-unknown-coin");
    }

    #[test]
    fn test_non_usd_pairs_are_not_mapped() {
        let mapper = CoinGeckoSymbolMapper::new();
        assert_eq!(mapper.coin_id("BTCEUR"), None);
        assert_eq!(mapper.display_name("BTCEUR"), None);
        assert_eq!(mapper.to_provider("BTCEUR"), "BTCEUR");
    }

    #[test]
    fn test_round_trip_over_table() {
        let mapper = CoinGeckoSymbolMapper::new();
        for (base, id, _) in COINS {
            let canonical = format!("{}USD", base);
            assert_eq!(mapper.to_provider(&canonical), *id);
            assert_eq!(mapper.to_canonical(id), canonical);
        }
    }

    #[test]
    fn test_coin_id_and_display_name() {
        let mapper = CoinGeckoSymbolMapper::new();
        assert_eq!(mapper.coin_id("DOGEUSD"), Some("dogecoin"));
        assert_eq!(mapper.display_name("DOGEUSD"), Some("Dogecoin"));
        assert_eq!(mapper.coin_id("AAPLUSD"), None);
        assert_eq!(mapper.coin_id("X"), None);
    }
}
