use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::data_source::DataSource;

/// Market state reported alongside a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketState {
    Closed,
    Delayed,
    Open,
}

/// Latest price for one symbol.
///
/// Quote maps returned by adapters are keyed by canonical symbol; a symbol
/// the adapter could not resolve simply has no entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// Quote currency (ISO 4217).
    pub currency: String,

    /// Adapter that produced the quote.
    pub data_source: DataSource,

    /// Latest price.
    pub market_price: Decimal,

    /// Market state at the time of the quote.
    pub market_state: MarketState,
}

impl QuoteResponse {
    pub fn new(
        currency: impl Into<String>,
        data_source: DataSource,
        market_price: Decimal,
        market_state: MarketState,
    ) -> Self {
        Self {
            currency: currency.into(),
            data_source,
            market_price,
            market_state,
        }
    }
}
