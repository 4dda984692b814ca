//! Alpha Vantage market data provider implementation.
//!
//! This module provides market data from the Alpha Vantage API:
//! - Historical daily prices via the TIME_SERIES_DAILY endpoint
//! - Instrument search via the SYMBOL_SEARCH endpoint
//!
//! The provider is gated on an API key: without one configured it refuses
//! every symbol. Latest quotes and rich profiles are not offered upstream,
//! so those operations return empty data.
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{
    DataSource, Granularity, HistoricalResponse, HistoricalSeries, LookupItem, LookupResponse,
    QuoteResponse,
};
use crate::provider::DataProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// Alpha Vantage market data provider.
///
/// Serves daily historical prices and symbol search for equities.
/// Free tier is limited to 5 API calls per minute.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// TIME_SERIES_DAILY response for equities
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyQuote>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyQuote {
    #[serde(rename = "4. close")]
    close: String,
    // Note: "1. open" through "5. volume" exist but only the close is kept
}

/// SYMBOL_SEARCH response
#[derive(Debug, Deserialize)]
struct SymbolSearchResponse {
    #[serde(rename = "bestMatches", default)]
    best_matches: Vec<SymbolMatch>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SymbolMatch {
    #[serde(rename = "1. symbol")]
    symbol: String,
    #[serde(rename = "2. name")]
    name: String,
    #[serde(rename = "8. currency")]
    currency: Option<String>,
}

// ============================================================================
// AlphaVantageProvider implementation
// ============================================================================

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    ///
    /// An empty key is allowed; the provider then refuses every symbol
    /// until a key is configured.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Make a request to the Alpha Vantage API.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));

        let url = reqwest::Url::parse_with_params(BASE_URL, &all_params).map_err(|e| {
            MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            }
        })?;

        debug!(
            "Alpha Vantage request: {}",
            url.as_str().replace(&self.api_key, "***")
        );

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

    /// Check for API-level errors in the response.
    fn check_api_error(
        error_message: &Option<String>,
        note: &Option<String>,
        information: &Option<String>,
    ) -> Result<(), MarketDataError> {
        if let Some(msg) = error_message {
            // Check if it's a "not found" type error
            if msg.contains("Invalid API call") || msg.contains("not found") {
                return Err(MarketDataError::SymbolNotFound(msg.clone()));
            }
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: msg.clone(),
            });
        }

        // "Note" usually indicates rate limiting
        if let Some(msg) = note {
            if msg.contains("API call frequency") || msg.contains("rate limit") {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            warn!("Alpha Vantage note: {}", msg);
        }

        // "Information" can indicate various issues
        if let Some(msg) = information {
            if msg.contains("API call frequency") || msg.contains("rate limit") {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            warn!("Alpha Vantage info: {}", msg);
        }

        Ok(())
    }

    /// Parse a date string in YYYY-MM-DD format.
    fn parse_date(date_str: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
    }

    /// Parse a decimal value from a string.
    fn parse_decimal(s: &str) -> Option<Decimal> {
        Decimal::from_str(s).ok()
    }

    /// Convert a raw daily time series into a date-keyed series limited to
    /// `[from, to]`, both ends inclusive.
    fn series_from_time_series(
        time_series: HashMap<String, DailyQuote>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HistoricalSeries {
        time_series
            .into_iter()
            .filter_map(|(date_str, daily)| {
                let date = Self::parse_date(&date_str)?;
                let market_price = Self::parse_decimal(&daily.close)?;
                Some((date, HistoricalResponse { market_price }))
            })
            .filter(|(date, _)| *date >= from && *date <= to)
            .collect()
    }

    async fn fetch_historical(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HistoricalSeries, MarketDataError> {
        let params = [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("outputsize", "full"),
        ];

        let text = self.fetch(&params).await?;
        let response: TimeSeriesResponse =
            serde_json::from_str(&text).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse response: {}", e),
            })?;

        Self::check_api_error(
            &response.error_message,
            &response.note,
            &response.information,
        )?;

        let time_series = response.time_series.ok_or_else(|| {
            MarketDataError::SymbolNotFound(format!("No data for symbol: {}", symbol))
        })?;

        let series = Self::series_from_time_series(time_series, from, to);

        debug!(
            "Alpha Vantage: fetched {} daily closes for {}",
            series.len(),
            symbol
        );

        Ok(series)
    }

    async fn fetch_search(&self, query: &str) -> Result<LookupResponse, MarketDataError> {
        let params = [("function", "SYMBOL_SEARCH"), ("keywords", query)];

        let text = self.fetch(&params).await?;
        let response: SymbolSearchResponse =
            serde_json::from_str(&text).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse search response: {}", e),
            })?;

        Self::check_api_error(
            &response.error_message,
            &response.note,
            &response.information,
        )?;

        let items = response
            .best_matches
            .into_iter()
            .map(|m| LookupItem {
                symbol: m.symbol,
                name: m.name,
                currency: m.currency,
                data_source: DataSource::AlphaVantage,
            })
            .collect();

        Ok(LookupResponse::new(items))
    }
}

// ============================================================================
// DataProvider trait implementation
// ============================================================================

#[async_trait]
impl DataProvider for AlphaVantageProvider {
    fn name(&self) -> DataSource {
        DataSource::AlphaVantage
    }

    /// Only claims symbols when an API key is configured.
    fn can_handle(&self, _symbol: &str) -> bool {
        !self.api_key.is_empty()
    }

    /// Alpha Vantage has no batch quote endpoint, so latest quotes are
    /// never served from here.
    async fn get_quotes(&self, _symbols: &[String]) -> HashMap<String, QuoteResponse> {
        HashMap::new()
    }

    async fn get_historical(
        &self,
        symbol: &str,
        _granularity: Granularity,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HashMap<String, HistoricalSeries> {
        debug!(
            "Fetching historical quotes for {} from {} to {} from Alpha Vantage",
            symbol, from, to
        );

        // The endpoint serves daily bars regardless of granularity.
        match self.fetch_historical(symbol, from, to).await {
            Ok(series) => HashMap::from([(symbol.to_string(), series)]),
            Err(e) => {
                warn!("Historical lookup failed for {}: {}", symbol, e);
                HashMap::new()
            }
        }
    }

    async fn search(&self, query: &str) -> LookupResponse {
        debug!("Searching Alpha Vantage for '{}'", query);

        match self.fetch_search(query).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Search failed for '{}': {}", query, e);
                LookupResponse::default()
            }
        }
    }
}
