//! CoinGecko market data provider implementation.
//!
//! This module provides cryptocurrency market data from the CoinGecko API:
//! - Latest quotes via the simple/price endpoint (batched)
//! - Historical prices via the coins/{id}/market_chart/range endpoint
//! - Instrument search via the search endpoint
//!
//! The provider only claims USD pairs whose base the classifier recognizes
//! AND that appear in the coin-id table; everything else, pairs quoted in
//! other currencies included, falls through to the next provider in the
//! registry.

mod symbol;

pub use symbol::CoinGeckoSymbolMapper;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{
    AssetClass, AssetProfile, AssetSubClass, DataSource, Granularity, HistoricalResponse,
    HistoricalSeries, LookupItem, LookupResponse, MarketState, QuoteResponse, DEFAULT_CURRENCY,
};
use crate::provider::DataProvider;
use crate::symbols::CryptocurrencyClassifier;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PROVIDER_ID: &str = "COINGECKO";

/// The simple/price endpoint accepts up to 250 ids per call.
const MAX_SYMBOLS_PER_REQUEST: usize = 250;

// ============================================================================
// Response structures for the CoinGecko API
// ============================================================================

/// simple/price response: coin id to currency to price.
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// coins/{id}/market_chart/range response.
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// Price points as [timestamp in milliseconds, price].
    prices: Vec<(f64, f64)>,
}

/// search response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
struct SearchCoin {
    name: String,
    symbol: String,
}

// ============================================================================
// CoinGeckoProvider implementation
// ============================================================================

/// CoinGecko market data provider.
///
/// Serves cryptocurrency pairs quoted in USD. Coins are addressed upstream
/// by CoinGecko id, translated through [`CoinGeckoSymbolMapper`].
pub struct CoinGeckoProvider {
    client: Client,
    classifier: Arc<CryptocurrencyClassifier>,
    mapper: CoinGeckoSymbolMapper,
}

impl CoinGeckoProvider {
    pub fn new(classifier: Arc<CryptocurrencyClassifier>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            classifier,
            mapper: CoinGeckoSymbolMapper::new(),
        }
    }

    /// Make a request to the CoinGecko API.
    async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let url = reqwest::Url::parse_with_params(&format!("{}/{}", BASE_URL, path), params)
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            })?;

        debug!("CoinGecko request: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })
    }

    async fn fetch_quotes(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, QuoteResponse>, MarketDataError> {
        // Map canonical symbols to ids up front; unknown symbols are
        // dropped here and logged, not sent upstream.
        let mut id_by_symbol: Vec<(&String, &'static str)> = Vec::new();
        for symbol in symbols {
            match self.mapper.coin_id(symbol) {
                Some(id) => id_by_symbol.push((symbol, id)),
                None => warn!("CoinGecko has no coin id for {}", symbol),
            }
        }

        if id_by_symbol.is_empty() {
            return Ok(HashMap::new());
        }

        let ids = id_by_symbol
            .iter()
            .map(|(_, id)| *id)
            .collect::<Vec<_>>()
            .join(",");
        let vs_currency = DEFAULT_CURRENCY.to_lowercase();

        let params = [("ids", ids.as_str()), ("vs_currencies", vs_currency.as_str())];
        let text = self.fetch("simple/price", &params).await?;

        let response: SimplePriceResponse =
            serde_json::from_str(&text).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse response: {}", e),
            })?;

        let mut quotes = HashMap::new();
        for (symbol, id) in id_by_symbol {
            let Some(price) = response
                .get(id)
                .and_then(|prices| prices.get(&vs_currency))
                .copied()
                .and_then(Decimal::from_f64_retain)
            else {
                warn!("CoinGecko returned no {} price for {}", vs_currency, id);
                continue;
            };

            quotes.insert(
                symbol.clone(),
                QuoteResponse {
                    currency: DEFAULT_CURRENCY.to_string(),
                    data_source: DataSource::Coingecko,
                    market_price: price,
                    // Crypto trades around the clock.
                    market_state: MarketState::Open,
                },
            );
        }

        Ok(quotes)
    }

    async fn fetch_historical(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HistoricalSeries, MarketDataError> {
        let id = self
            .mapper
            .coin_id(symbol)
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        // Both stamps are midnight UTC; CoinGecko includes daily points
        // falling exactly on the bounds.
        let from_ts = from.and_time(NaiveTime::MIN).and_utc().timestamp().to_string();
        let to_ts = to.and_time(NaiveTime::MIN).and_utc().timestamp().to_string();
        let vs_currency = DEFAULT_CURRENCY.to_lowercase();

        let params = [
            ("vs_currency", vs_currency.as_str()),
            ("from", from_ts.as_str()),
            ("to", to_ts.as_str()),
        ];

        let path = format!("coins/{}/market_chart/range", id);
        let text = self.fetch(&path, &params).await?;

        let response: MarketChartResponse =
            serde_json::from_str(&text).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse response: {}", e),
            })?;

        debug!(
            "CoinGecko: fetched {} price points for {}",
            response.prices.len(),
            id
        );

        Ok(chart_to_series(&response.prices))
    }
}

/// Collapse millisecond price points into one record per day.
///
/// Points arrive in ascending time order, so when several fall on the same
/// date the latest one wins.
fn chart_to_series(prices: &[(f64, f64)]) -> HistoricalSeries {
    let mut series = HistoricalSeries::new();

    for (timestamp_ms, price) in prices {
        let Some(date) = Utc
            .timestamp_millis_opt(*timestamp_ms as i64)
            .single()
            .map(|dt| dt.date_naive())
        else {
            warn!("Skipping price point with invalid timestamp {}", timestamp_ms);
            continue;
        };

        let Some(market_price) = Decimal::from_f64_retain(*price) else {
            warn!("Skipping price point with invalid price {}", price);
            continue;
        };

        series.insert(date, HistoricalResponse { market_price });
    }

    series
}

// ============================================================================
// DataProvider trait implementation
// ============================================================================

#[async_trait]
impl DataProvider for CoinGeckoProvider {
    fn name(&self) -> DataSource {
        DataSource::Coingecko
    }

    /// Claims only USD pairs whose base both the classifier and the
    /// coin-id table know; non-USD quotes and unknown coins fall through.
    fn can_handle(&self, symbol: &str) -> bool {
        self.classifier.is_cryptocurrency(symbol) && self.mapper.coin_id(symbol).is_some()
    }

    fn max_symbols_per_request(&self) -> usize {
        MAX_SYMBOLS_PER_REQUEST
    }

    async fn get_asset_profile(&self, symbol: &str) -> AssetProfile {
        AssetProfile {
            currency: Some(DEFAULT_CURRENCY.to_string()),
            name: self.mapper.display_name(symbol).map(str::to_string),
            asset_class: Some(AssetClass::Liquidity),
            asset_sub_class: Some(AssetSubClass::Cryptocurrency),
            ..AssetProfile::minimal(DataSource::Coingecko, symbol)
        }
    }

    async fn get_quotes(&self, symbols: &[String]) -> HashMap<String, QuoteResponse> {
        match self.fetch_quotes(symbols).await {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("CoinGecko quote batch failed: {}", e);
                HashMap::new()
            }
        }
    }

    async fn get_historical(
        &self,
        symbol: &str,
        _granularity: Granularity,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HashMap<String, HistoricalSeries> {
        debug!(
            "Fetching historical prices for {} from {} to {} from CoinGecko",
            symbol, from, to
        );

        match self.fetch_historical(symbol, from, to).await {
            Ok(series) => HashMap::from([(symbol.to_string(), series)]),
            Err(e) => {
                warn!("Historical lookup failed for {}: {}", symbol, e);
                HashMap::new()
            }
        }
    }

    async fn search(&self, query: &str) -> LookupResponse {
        debug!("Searching CoinGecko for '{}'", query);

        let text = match self.fetch("search", &[("query", query)]).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Search failed for '{}': {}", query, e);
                return LookupResponse::default();
            }
        };

        let response: SearchResponse = match serde_json::from_str(&text) {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to parse search response for '{}': {}", query, e);
                return LookupResponse::default();
            }
        };

        let items = response
            .coins
            .into_iter()
            .map(|coin| LookupItem {
                symbol: format!("{}{}", coin.symbol.to_uppercase(), DEFAULT_CURRENCY),
                name: coin.name,
                currency: Some(DEFAULT_CURRENCY.to_string()),
                data_source: DataSource::Coingecko,
            })
            .collect();

        LookupResponse::new(items)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn provider() -> CoinGeckoProvider {
        CoinGeckoProvider::new(Arc::new(CryptocurrencyClassifier::new()))
    }

    #[test]
    fn test_can_handle_table_coins_only() {
        let provider = provider();
        assert!(provider.can_handle("BTCUSD"));
        assert!(provider.can_handle("DOGEUSD"));
        assert!(!provider.can_handle("AAPL"));
        assert!(!provider.can_handle("EURUSD"));
    }

    #[test]
    fn test_can_handle_requires_both_gates() {
        // The classifier recognizes a custom coin, but without a CoinGecko
        // id the provider still refuses it.
        let classifier = Arc::new(CryptocurrencyClassifier::with_custom_symbols(vec![
            "WEN".to_string(),
        ]));
        let provider = CoinGeckoProvider::new(classifier);

        assert!(!provider.can_handle("WENUSD"));
        assert!(provider.can_handle("BTCUSD"));
    }

    #[test]
    fn test_can_handle_requires_usd_quote() {
        // BTC is in the coin table, but only the USD pair is served; the
        // EUR pair must fall through to a provider that prices it.
        let provider = provider();
        assert!(provider.can_handle("BTCUSD"));
        assert!(!provider.can_handle("BTCEUR"));
    }

    #[test]
    fn test_max_symbols_per_request() {
        assert_eq!(provider().max_symbols_per_request(), 250);
    }

    #[test]
    fn test_parse_simple_price_response() {
        let json = r#"{
            "bitcoin": {"usd": 45000.5},
            "ethereum": {"usd": 2500.25}
        }"#;
        let response: SimplePriceResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response["bitcoin"]["usd"], 45000.5);
        assert_eq!(response["ethereum"]["usd"], 2500.25);
    }

    #[test]
    fn test_parse_market_chart_response() {
        let json = r#"{
            "prices": [
                [1711929600000, 69702.31],
                [1712016000000, 65446.97]
            ],
            "market_caps": [[1711929600000, 1370247487960.1]],
            "total_volumes": [[1711929600000, 16408802301.8]]
        }"#;
        let response: MarketChartResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.prices.len(), 2);
        assert_eq!(response.prices[0].1, 69702.31);
    }

    #[test]
    fn test_chart_to_series_keys_by_date() {
        // 2024-04-01 00:00 and 2024-04-02 00:00 UTC. Prices are chosen to
        // be exactly representable so the Decimal comparison is exact.
        let prices = [(1711929600000.0, 69702.5), (1712016000000.0, 65446.25)];
        let series = chart_to_series(&prices);

        assert_eq!(series.len(), 2);
        let first = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(series[&first].market_price, dec!(69702.5));
    }

    #[test]
    fn test_chart_to_series_last_point_per_day_wins() {
        // Two intraday points on 2024-04-01; the later one is kept.
        let prices = [(1711929600000.0, 69702.5), (1711965600000.0, 69950.0)];
        let series = chart_to_series(&prices);

        assert_eq!(series.len(), 1);
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(series[&date].market_price, dec!(69950.0));
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "coins": [
                {"id": "bitcoin", "name": "Bitcoin", "symbol": "BTC", "market_cap_rank": 1},
                {"id": "bitcoin-cash", "name": "Bitcoin Cash", "symbol": "BCH", "market_cap_rank": 20}
            ],
            "exchanges": [],
            "categories": []
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.coins.len(), 2);
        assert_eq!(response.coins[0].symbol, "BTC");
        assert_eq!(response.coins[1].name, "Bitcoin Cash");
    }

    #[tokio::test]
    async fn test_asset_profile_is_static() {
        let profile = provider().get_asset_profile("BTCUSD").await;

        assert_eq!(profile.symbol, "BTCUSD");
        assert_eq!(profile.data_source, DataSource::Coingecko);
        assert_eq!(profile.name.as_deref(), Some("Bitcoin"));
        assert_eq!(profile.currency.as_deref(), Some("USD"));
        assert_eq!(profile.asset_class, Some(AssetClass::Liquidity));
        assert_eq!(profile.asset_sub_class, Some(AssetSubClass::Cryptocurrency));
    }

    #[tokio::test]
    async fn test_quotes_for_unknown_symbols_are_empty() {
        // No coin ids resolve, so no request is made and the map is empty.
        let quotes = provider()
            .get_quotes(&["AAPLUSD".to_string(), "XYZUSD".to_string()])
            .await;
        assert!(quotes.is_empty());
    }
}
