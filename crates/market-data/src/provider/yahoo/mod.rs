//! Yahoo Finance market data provider.
//!
//! This provider uses the Yahoo Finance API to fetch market data for:
//! - Equities/ETFs (e.g., AAPL, SHOP.TO)
//! - Cryptocurrencies (canonical BTCUSD, upstream BTC-USD)
//! - Foreign exchange rates (canonical EURUSD, upstream EURUSD=X)
//!
//! It is the catch-all provider: `can_handle` accepts every symbol, so it
//! must be registered last.

mod models;
mod symbol;

pub use symbol::YahooSymbolMapper;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use futures::future::join_all;
use lazy_static::lazy_static;
use log::{debug, warn};
use reqwest::header;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{
    AssetClass, AssetProfile, AssetSubClass, CountryWeight, DataSource, Granularity,
    HistoricalResponse, HistoricalSeries, LookupItem, LookupResponse, MarketState, QuoteResponse,
    SectorWeight, DEFAULT_CURRENCY,
};
use crate::provider::DataProvider;
use crate::symbols::{is_currency_code, CryptocurrencyClassifier, SymbolMapper, QUOTE_CURRENCY_LEN};

use crate::enhancer::reference::country_code_by_name;
use models::{YahooQuoteSummaryResponse, YahooQuoteSummaryResult};

const PROVIDER_ID: &str = "YAHOO";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
///
/// Provides access to market data for equities, ETFs, cryptocurrencies,
/// and foreign exchange rates through the Yahoo Finance API.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
    classifier: Arc<CryptocurrencyClassifier>,
    mapper: YahooSymbolMapper,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new(classifier: Arc<CryptocurrencyClassifier>) -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let mapper = YahooSymbolMapper::new(Arc::clone(&classifier));

        Ok(Self {
            connector,
            client,
            classifier,
            mapper,
        })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Check if we have a cached crumb
        {
            let guard = YAHOO_CRUMB.read().map_err(|_| Self::crumb_lock_error())?;
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        // Fetch new crumb
        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to get cookie: {}", e),
            })?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Failed to parse Yahoo cookie".to_string(),
            })?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to get crumb: {}", e),
            })?
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read crumb: {}", e),
            })?;

        let crumb_data = CrumbData { cookie, crumb };

        // Cache it
        let mut guard = YAHOO_CRUMB.write().map_err(|_| Self::crumb_lock_error())?;
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        if let Ok(mut guard) = YAHOO_CRUMB.write() {
            *guard = None;
        }
    }

    fn crumb_lock_error() -> MarketDataError {
        MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: "Yahoo crumb cache lock poisoned".to_string(),
        }
    }

    // ========================================================================
    // quoteSummary Fetching
    // ========================================================================

    /// Fetch the quoteSummary document for one provider symbol.
    async fn fetch_quote_summary(
        &self,
        provider_symbol: &str,
    ) -> Result<YahooQuoteSummaryResult, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price,summaryProfile,topHoldings&crumb={}",
            encode(provider_symbol),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("quoteSummary request failed: {}", e),
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Yahoo authentication expired".to_string(),
            });
        }

        let data: YahooQuoteSummaryResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse quoteSummary response: {}", e),
                })?;

        data.quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::SymbolNotFound(provider_symbol.to_string()))
    }

    // ========================================================================
    // Quote Fetching
    // ========================================================================

    /// Currency a quote is denominated in when the upstream response does
    /// not say: pairs carry their quote currency in the last three
    /// characters, everything else is assumed USD.
    fn infer_currency(&self, canonical_symbol: &str) -> String {
        if self.is_pair(canonical_symbol) {
            return canonical_symbol[canonical_symbol.len() - QUOTE_CURRENCY_LEN..].to_uppercase();
        }
        DEFAULT_CURRENCY.to_string()
    }

    fn is_pair(&self, canonical_symbol: &str) -> bool {
        if self.classifier.is_cryptocurrency(canonical_symbol) {
            return true;
        }
        if canonical_symbol.len() == 2 * QUOTE_CURRENCY_LEN && canonical_symbol.is_ascii() {
            let (from, to) = canonical_symbol.split_at(QUOTE_CURRENCY_LEN);
            return is_currency_code(from) && is_currency_code(to);
        }
        false
    }

    /// Fetch one quote, keyed by canonical symbol.
    async fn fetch_quote(
        &self,
        canonical_symbol: &str,
    ) -> Result<QuoteResponse, MarketDataError> {
        let provider_symbol = self.mapper.to_provider(canonical_symbol);

        // Try the quoteSummary price module first: it carries currency and
        // market state alongside the price.
        match self.fetch_quote_primary(canonical_symbol, &provider_symbol).await {
            Ok(quote) => return Ok(quote),
            Err(e) => {
                debug!(
                    "quoteSummary quote failed for {}: {}, trying chart API",
                    provider_symbol, e
                );
            }
        }

        self.fetch_quote_fallback(canonical_symbol, &provider_symbol)
            .await
    }

    async fn fetch_quote_primary(
        &self,
        canonical_symbol: &str,
        provider_symbol: &str,
    ) -> Result<QuoteResponse, MarketDataError> {
        let result = self.fetch_quote_summary(provider_symbol).await?;

        let price = result
            .price
            .as_ref()
            .ok_or_else(|| MarketDataError::SymbolNotFound(provider_symbol.to_string()))?;

        let market_price = price
            .regular_market_price
            .as_ref()
            .and_then(|p| p.raw)
            .and_then(Decimal::from_f64_retain)
            .ok_or_else(|| {
                MarketDataError::Parse(format!("No valid price for {}", provider_symbol))
            })?;

        let currency = price
            .currency
            .clone()
            .unwrap_or_else(|| self.infer_currency(canonical_symbol));

        let is_crypto = self.classifier.is_cryptocurrency(canonical_symbol);
        let market_state = market_state_for(price.market_state.as_deref(), is_crypto);

        Ok(QuoteResponse {
            currency,
            data_source: DataSource::Yahoo,
            market_price,
            market_state,
        })
    }

    /// Chart-API fallback; carries no currency or session data, so both
    /// are inferred from the symbol.
    async fn fetch_quote_fallback(
        &self,
        canonical_symbol: &str,
        provider_symbol: &str,
    ) -> Result<QuoteResponse, MarketDataError> {
        let response = self.connector.get_latest_quotes(provider_symbol, "1d").await?;

        let last = response.last_quote().map_err(|e| {
            warn!("No quotes returned for {}: {}", provider_symbol, e);
            MarketDataError::SymbolNotFound(provider_symbol.to_string())
        })?;

        let market_price = Decimal::from_f64_retain(last.close).ok_or_else(|| {
            MarketDataError::Parse(format!(
                "Failed to convert close price {} to Decimal",
                last.close
            ))
        })?;

        let is_crypto = self.classifier.is_cryptocurrency(canonical_symbol);

        Ok(QuoteResponse {
            currency: self.infer_currency(canonical_symbol),
            data_source: DataSource::Yahoo,
            market_price,
            market_state: market_state_for(None, is_crypto),
        })
    }

    // ========================================================================
    // Historical Fetching
    // ========================================================================

    /// Convert a chrono date to time::OffsetDateTime at the given second
    /// of the day, for the Yahoo API.
    fn date_to_offset_datetime(date: NaiveDate, seconds_into_day: i64) -> OffsetDateTime {
        let midnight = date.and_time(NaiveTime::MIN).and_utc().timestamp();
        OffsetDateTime::from_unix_timestamp(midnight + seconds_into_day)
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    async fn fetch_historical(
        &self,
        canonical_symbol: &str,
        granularity: Granularity,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HistoricalSeries, MarketDataError> {
        let provider_symbol = self.mapper.to_provider(canonical_symbol);

        let interval = match granularity {
            Granularity::Day => "1d",
            Granularity::Month => "1mo",
        };

        // Both ends inclusive: the range runs from midnight on `from` to
        // the last second of `to`.
        let start = Self::date_to_offset_datetime(from, 0);
        let end = Self::date_to_offset_datetime(to, 86_399);

        let response = self
            .connector
            .get_quote_history_interval(&provider_symbol, start, end, interval)
            .await?;

        let mut series = HistoricalSeries::new();
        for quote in response.quotes()? {
            let Some(date) = Utc
                .timestamp_opt(quote.timestamp as i64, 0)
                .single()
                .map(|dt| dt.date_naive())
            else {
                warn!(
                    "Skipping bar with invalid timestamp {} for {}",
                    quote.timestamp, provider_symbol
                );
                continue;
            };

            let Some(market_price) = Decimal::from_f64_retain(quote.close) else {
                warn!("Skipping bar with invalid close {} for {}", quote.close, provider_symbol);
                continue;
            };

            series.insert(date, HistoricalResponse { market_price });
        }

        Ok(series)
    }

    // ========================================================================
    // Profile Fetching
    // ========================================================================

    async fn fetch_profile(&self, canonical_symbol: &str) -> Result<AssetProfile, MarketDataError> {
        let provider_symbol = self.mapper.to_provider(canonical_symbol);
        let result = self.fetch_quote_summary(&provider_symbol).await?;
        Ok(self.build_profile(canonical_symbol, &result))
    }

    /// Map a quoteSummary document to an asset profile.
    fn build_profile(
        &self,
        canonical_symbol: &str,
        result: &YahooQuoteSummaryResult,
    ) -> AssetProfile {
        let price = result.price.as_ref();
        let summary = result.summary_profile.as_ref();

        let quote_type = price
            .and_then(|p| p.quote_type.as_deref())
            .unwrap_or_default();
        let short_name = price.and_then(|p| p.short_name.as_deref());
        let long_name = price.and_then(|p| p.long_name.as_deref());

        let (asset_class, asset_sub_class) = parse_asset_class(quote_type, short_name);

        let mut profile = AssetProfile {
            currency: price.and_then(|p| p.currency.clone()),
            name: Some(format_name(long_name, quote_type, short_name, canonical_symbol)),
            asset_class,
            asset_sub_class,
            url: summary.and_then(|s| s.website.clone()),
            ..AssetProfile::minimal(DataSource::Yahoo, canonical_symbol)
        };

        match asset_sub_class {
            // Stocks: one country and one sector from the company profile.
            Some(AssetSubClass::Stock) => {
                if let Some(code) = summary
                    .and_then(|s| s.country.as_deref())
                    .and_then(country_code_by_name)
                {
                    profile.countries = vec![CountryWeight {
                        code: code.to_string(),
                        weight: 1.0,
                    }];
                }
                if let Some(sector) = summary.and_then(|s| s.sector.clone()) {
                    profile.sectors = vec![SectorWeight {
                        name: sector,
                        weight: 1.0,
                    }];
                }
            }
            // Funds: sector weightings from the holdings module.
            Some(AssetSubClass::Etf) | Some(AssetSubClass::Mutualfund) => {
                if let Some(holdings) = result.top_holdings.as_ref() {
                    profile.sectors = holdings
                        .sector_weightings
                        .iter()
                        .flat_map(|entry| entry.iter())
                        .filter_map(|(sector, detail)| {
                            detail.raw.map(|weight| SectorWeight {
                                name: format_sector(sector),
                                weight,
                            })
                        })
                        .collect();
                }
            }
            _ => {}
        }

        profile
    }
}

// ============================================================================
// DataProvider Implementation
// ============================================================================

#[async_trait]
impl DataProvider for YahooProvider {
    fn name(&self) -> DataSource {
        DataSource::Yahoo
    }

    /// Catch-all: Yahoo covers equities, funds, crypto and FX, so it
    /// accepts everything and backs the end of the registry order.
    fn can_handle(&self, _symbol: &str) -> bool {
        true
    }

    async fn get_asset_profile(&self, symbol: &str) -> AssetProfile {
        debug!("Fetching profile for {} from Yahoo", symbol);

        match self.fetch_profile(symbol).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Profile lookup failed for {}: {}", symbol, e);
                AssetProfile::minimal(DataSource::Yahoo, symbol)
            }
        }
    }

    async fn get_quotes(&self, symbols: &[String]) -> HashMap<String, QuoteResponse> {
        let lookups = symbols
            .iter()
            .map(|symbol| async move { (symbol, self.fetch_quote(symbol).await) });

        let mut quotes = HashMap::new();
        for (symbol, outcome) in join_all(lookups).await {
            match outcome {
                Ok(quote) => {
                    quotes.insert(symbol.clone(), quote);
                }
                Err(e) => {
                    warn!("Skipping quote for {}: {}", symbol, e);
                }
            }
        }

        quotes
    }

    async fn get_historical(
        &self,
        symbol: &str,
        granularity: Granularity,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HashMap<String, HistoricalSeries> {
        debug!(
            "Fetching historical quotes for {} from {} to {} from Yahoo",
            symbol, from, to
        );

        match self.fetch_historical(symbol, granularity, from, to).await {
            Ok(series) => HashMap::from([(symbol.to_string(), series)]),
            Err(e) => {
                warn!("Historical lookup failed for {}: {}", symbol, e);
                HashMap::new()
            }
        }
    }

    async fn search(&self, query: &str) -> LookupResponse {
        debug!("Searching Yahoo for '{}'", query);

        let encoded_query = encode(query);
        let result = match self.connector.search_ticker(&encoded_query).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Search failed for '{}': {}", query, e);
                return LookupResponse::default();
            }
        };

        let items = result
            .quotes
            .iter()
            .map(|item| LookupItem {
                symbol: self.mapper.to_canonical(&item.symbol),
                name: format_name(
                    Some(&item.long_name),
                    &item.quote_type,
                    Some(&item.short_name),
                    &item.symbol,
                ),
                currency: None,
                data_source: DataSource::Yahoo,
            })
            .collect();

        LookupResponse::new(items)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Map Yahoo's quoteType (plus the short name, for futures) to our asset
/// classification.
fn parse_asset_class(
    quote_type: &str,
    short_name: Option<&str>,
) -> (Option<AssetClass>, Option<AssetSubClass>) {
    match quote_type.to_lowercase().as_str() {
        "cryptocurrency" => (
            Some(AssetClass::Liquidity),
            Some(AssetSubClass::Cryptocurrency),
        ),
        "equity" => (Some(AssetClass::Equity), Some(AssetSubClass::Stock)),
        "etf" => (Some(AssetClass::Equity), Some(AssetSubClass::Etf)),
        "future" => {
            let name = short_name.unwrap_or_default().to_lowercase();
            let sub_class = if ["gold", "palladium", "platinum", "silver"]
                .iter()
                .any(|metal| name.starts_with(metal))
            {
                AssetSubClass::PreciousMetal
            } else {
                AssetSubClass::Commodity
            };
            (Some(AssetClass::Commodity), Some(sub_class))
        }
        "mutualfund" => (Some(AssetClass::Equity), Some(AssetSubClass::Mutualfund)),
        _ => (None, None),
    }
}

/// Clean up fund names by removing common prefixes.
fn format_name(
    long_name: Option<&str>,
    quote_type: &str,
    short_name: Option<&str>,
    symbol: &str,
) -> String {
    let mut name = long_name.unwrap_or_default().to_string();

    if !name.is_empty() {
        let replacements = [
            ("&amp;", "&"),
            ("Amundi Index Solutions - ", ""),
            ("iShares ETF (CH) - ", ""),
            ("iShares III Public Limited Company - ", ""),
            ("iShares V PLC - ", ""),
            ("iShares VI Public Limited Company - ", ""),
            ("iShares VII PLC - ", ""),
            ("Multi Units Luxembourg - ", ""),
            ("VanEck ETFs N.V. - ", ""),
            ("Vaneck Vectors Ucits Etfs Plc - ", ""),
            ("Vanguard Funds Public Limited Company - ", ""),
            ("Vanguard Index Funds - ", ""),
            ("Xtrackers (IE) Plc - ", ""),
        ];

        for (from, to) in &replacements {
            name = name.replace(from, to);
        }
    }

    // Special handling for futures - strip the contract date from the
    // short name ("Gold Jun 22" -> "Gold").
    if quote_type.eq_ignore_ascii_case("future") {
        if let Some(trimmed) = short_name.and_then(|sn| sn.get(..sn.len().saturating_sub(7))) {
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }

    if name.is_empty() {
        short_name.unwrap_or(symbol).to_string()
    } else {
        name
    }
}

/// Convert snake_case sector to Title Case.
fn format_sector(sector: &str) -> String {
    sector
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Session state reported to callers: crypto trades around the clock,
/// everything else is open only during a regular session.
fn market_state_for(state: Option<&str>, is_crypto: bool) -> MarketState {
    if is_crypto || matches!(state, Some("REGULAR")) {
        MarketState::Open
    } else {
        MarketState::Delayed
    }
}

// ============================================================================
// Tests
// ============================================================================
