//! Market data provider trait definitions.
//!
//! This module defines the core `DataProvider` trait that all
//! market data providers must implement.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{
    AssetProfile, DataSource, Granularity, HistoricalSeries, LookupResponse, QuoteResponse,
};

/// Default cap on the number of symbols a provider accepts per upstream
/// request. Providers with larger batch endpoints override it.
pub const DEFAULT_MAX_SYMBOLS_PER_REQUEST: usize = 50;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// The registry asks each provider, in registration order, whether it
/// can handle a symbol and routes requests to the first that claims it.
///
/// Every operation degrades softly: a provider that cannot deliver
/// returns an empty map, an empty result list, or a minimal profile
/// instead of an error. Failures are logged inside the provider, so
/// callers never need to distinguish "no data" from "upstream down".
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use moneta_market_data::models::DataSource;
/// use moneta_market_data::provider::DataProvider;
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl DataProvider for MyProvider {
///     fn name(&self) -> DataSource {
///         DataSource::Manual
///     }
///
///     fn can_handle(&self, symbol: &str) -> bool {
///         symbol.ends_with(".MY")
///     }
///
///     // ... implement quote methods
/// }
/// ```
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Identity of this provider.
    ///
    /// Quotes and lookup results are stamped with this source so callers
    /// can tell where a figure came from.
    fn name(&self) -> DataSource;

    /// Whether this provider is willing to serve the given canonical symbol.
    ///
    /// The registry routes each symbol to the first provider, in
    /// registration order, that returns `true`. A catch-all provider
    /// returns `true` unconditionally and must be registered last.
    fn can_handle(&self, symbol: &str) -> bool;

    /// Upper bound on symbols per upstream request.
    ///
    /// The registry splits larger quote batches into chunks of this size.
    fn max_symbols_per_request(&self) -> usize {
        DEFAULT_MAX_SYMBOLS_PER_REQUEST
    }

    /// Fetch descriptive profile data for a symbol.
    ///
    /// Always returns a profile. When the upstream lookup fails, the
    /// result carries only the symbol and provider identity; the default
    /// implementation returns exactly that.
    async fn get_asset_profile(&self, symbol: &str) -> AssetProfile {
        AssetProfile::minimal(self.name(), symbol)
    }

    /// Fetch the latest quotes for a batch of canonical symbols.
    ///
    /// Returns a map from canonical symbol to quote. Symbols the provider
    /// could not resolve are absent from the map; one bad symbol never
    /// poisons the rest of the batch.
    async fn get_quotes(&self, symbols: &[String]) -> HashMap<String, QuoteResponse>;

    /// Fetch historical prices for one symbol over a date range.
    ///
    /// Returns a map from canonical symbol to a date-ordered price series.
    /// On failure the map is empty.
    async fn get_historical(
        &self,
        symbol: &str,
        granularity: Granularity,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HashMap<String, HistoricalSeries>;

    /// Search for instruments matching a free-text query.
    ///
    /// Providers without a search endpoint keep the default, which
    /// returns no items.
    async fn search(&self, query: &str) -> LookupResponse {
        let _ = query;
        LookupResponse::default()
    }
}
