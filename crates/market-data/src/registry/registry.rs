//! Registry for orchestrating market data providers.
//!
//! The registry owns every registered provider and enhancer, and routes each
//! request to the right one:
//! - Symbols are matched against providers in registration order; the first
//!   provider whose `can_handle` accepts a symbol serves it.
//! - Quote batches are deduplicated, grouped per provider, and split into
//!   chunks no larger than each provider's request limit before fanning out
//!   concurrently.
//! - Asset profiles pass through every registered enhancer in order.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use log::{debug, warn};

use crate::enhancer::DataEnhancer;
use crate::models::{
    AssetProfile, DataSource, Granularity, HistoricalSeries, LookupResponse, QuoteResponse,
};
use crate::provider::DataProvider;

// ============================================================================
// Registry
// ============================================================================

/// Orchestrates all registered market data providers.
///
/// Registration order is significant: `get_quotes`, `get_historical`, and
/// `get_asset_profile` dispatch each symbol to the *first* provider that
/// claims it, so catch-all providers belong at the end of the list.
pub struct DataProviderRegistry {
    providers: Vec<Arc<dyn DataProvider>>,
    enhancers: Vec<Arc<dyn DataEnhancer>>,
}

impl DataProviderRegistry {
    /// Creates a registry over the given providers, with no enhancers.
    pub fn new(providers: Vec<Arc<dyn DataProvider>>) -> Self {
        Self {
            providers,
            enhancers: Vec::new(),
        }
    }

    /// Attaches profile enhancers, applied in the given order after the
    /// owning provider has produced a profile.
    pub fn with_enhancers(mut self, enhancers: Vec<Arc<dyn DataEnhancer>>) -> Self {
        self.enhancers = enhancers;
        self
    }

    /// All registered providers, in registration order.
    pub fn providers(&self) -> &[Arc<dyn DataProvider>] {
        &self.providers
    }

    /// Looks up a provider by its data source identifier.
    pub fn provider(&self, source: DataSource) -> Option<&Arc<dyn DataProvider>> {
        self.providers.iter().find(|p| p.name() == source)
    }

    /// The first registered provider that claims `symbol`, if any.
    pub fn provider_for(&self, symbol: &str) -> Option<&Arc<dyn DataProvider>> {
        self.providers.iter().find(|p| p.can_handle(symbol))
    }

    /// The first registered provider. Used when a caller needs some provider
    /// and has no symbol to route by.
    pub fn default_provider(&self) -> Option<&Arc<dyn DataProvider>> {
        self.providers.first()
    }

    // ------------------------------------------------------------------------
    // Quotes
    // ------------------------------------------------------------------------

    /// Fetches current quotes for a batch of symbols.
    ///
    /// Symbols are deduplicated, grouped by the provider that claims them,
    /// and fetched concurrently in chunks of at most
    /// `max_symbols_per_request` per call. Symbols no provider claims and
    /// symbols whose lookup fails upstream are omitted from the result.
    pub async fn get_quotes(&self, symbols: &[String]) -> HashMap<String, QuoteResponse> {
        let mut seen = HashSet::new();
        let mut by_provider: BTreeMap<usize, Vec<String>> = BTreeMap::new();

        for symbol in symbols {
            if !seen.insert(symbol.as_str()) {
                continue;
            }
            match self.providers.iter().position(|p| p.can_handle(symbol)) {
                Some(index) => by_provider.entry(index).or_default().push(symbol.clone()),
                None => warn!("No provider claims symbol {}, skipping quote lookup", symbol),
            }
        }

        let mut lookups = Vec::new();
        for (index, group) in &by_provider {
            let provider = &self.providers[*index];
            debug!(
                "Routing {} symbol(s) to {} for quotes",
                group.len(),
                provider.name().as_str()
            );
            for chunk in group.chunks(provider.max_symbols_per_request().max(1)) {
                lookups.push(async move { provider.get_quotes(chunk).await });
            }
        }

        let mut quotes = HashMap::new();
        for batch in join_all(lookups).await {
            quotes.extend(batch);
        }
        quotes
    }

    // ------------------------------------------------------------------------
    // Historical data
    // ------------------------------------------------------------------------

    /// Fetches historical market data for a single symbol from the provider
    /// that claims it. Returns an empty map when no provider does.
    pub async fn get_historical(
        &self,
        symbol: &str,
        granularity: Granularity,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HashMap<String, HistoricalSeries> {
        match self.provider_for(symbol) {
            Some(provider) => {
                debug!(
                    "Routing historical lookup for {} to {}",
                    symbol,
                    provider.name().as_str()
                );
                provider.get_historical(symbol, granularity, from, to).await
            }
            None => {
                warn!("No provider claims symbol {}, skipping historical lookup", symbol);
                HashMap::new()
            }
        }
    }

    // ------------------------------------------------------------------------
    // Asset profiles
    // ------------------------------------------------------------------------

    /// Builds the asset profile for a symbol.
    ///
    /// The claiming provider produces the base profile, which then passes
    /// through every registered enhancer in registration order. Returns
    /// `None` when no provider claims the symbol.
    pub async fn get_asset_profile(&self, symbol: &str) -> Option<AssetProfile> {
        let provider = self.provider_for(symbol)?;
        debug!(
            "Routing profile lookup for {} to {}",
            symbol,
            provider.name().as_str()
        );

        let mut profile = provider.get_asset_profile(symbol).await;
        for enhancer in &self.enhancers {
            profile = enhancer.enhance(symbol, profile).await;
        }
        Some(profile)
    }

    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    /// Searches every registered provider concurrently and concatenates the
    /// results in registration order.
    pub async fn search(&self, query: &str) -> LookupResponse {
        let lookups = self.providers.iter().map(|p| p.search(query));

        let mut items = Vec::new();
        for response in join_all(lookups).await {
            items.extend(response.items);
        }
        LookupResponse { items }
    }
}

impl std::fmt::Debug for DataProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataProviderRegistry")
            .field(
                "providers",
                &self
                    .providers
                    .iter()
                    .map(|p| p.name().as_str())
                    .collect::<Vec<_>>(),
            )
            .field(
                "enhancers",
                &self.enhancers.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HistoricalResponse, LookupItem, MarketState, SectorWeight};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Test double claiming symbols by prefix. An empty prefix claims
    /// everything, which makes it a catch-all like the Yahoo provider.
    struct MockProvider {
        source: DataSource,
        prefix: &'static str,
        max_batch: usize,
        failing: Vec<&'static str>,
        call_count: AtomicUsize,
        batch_sizes: Mutex<Vec<usize>>,
    }

    impl MockProvider {
        fn new(source: DataSource, prefix: &'static str) -> Self {
            Self {
                source,
                prefix,
                max_batch: crate::provider::DEFAULT_MAX_SYMBOLS_PER_REQUEST,
                failing: Vec::new(),
                call_count: AtomicUsize::new(0),
                batch_sizes: Mutex::new(Vec::new()),
            }
        }

        fn with_max_batch(mut self, max_batch: usize) -> Self {
            self.max_batch = max_batch;
            self
        }

        fn with_failing(mut self, failing: Vec<&'static str>) -> Self {
            self.failing = failing;
            self
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl DataProvider for MockProvider {
        fn name(&self) -> DataSource {
            self.source
        }

        fn can_handle(&self, symbol: &str) -> bool {
            symbol.starts_with(self.prefix)
        }

        fn max_symbols_per_request(&self) -> usize {
            self.max_batch
        }

        async fn get_asset_profile(&self, symbol: &str) -> AssetProfile {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            AssetProfile {
                name: Some(format!("{} profile", self.source.as_str())),
                ..AssetProfile::minimal(self.source, symbol)
            }
        }

        async fn get_quotes(&self, symbols: &[String]) -> HashMap<String, QuoteResponse> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut sizes) = self.batch_sizes.lock() {
                sizes.push(symbols.len());
            }
            symbols
                .iter()
                .filter(|symbol| !self.failing.contains(&symbol.as_str()))
                .map(|symbol| {
                    (
                        symbol.clone(),
                        QuoteResponse {
                            currency: "USD".to_string(),
                            data_source: self.source,
                            market_price: dec!(100),
                            market_state: MarketState::Open,
                        },
                    )
                })
                .collect()
        }

        async fn get_historical(
            &self,
            symbol: &str,
            _granularity: Granularity,
            from: NaiveDate,
            _to: NaiveDate,
        ) -> HashMap<String, HistoricalSeries> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            let mut series = HistoricalSeries::new();
            series.insert(
                from,
                HistoricalResponse {
                    market_price: dec!(100),
                },
            );
            HashMap::from([(symbol.to_string(), series)])
        }

        async fn search(&self, _query: &str) -> LookupResponse {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            LookupResponse {
                items: vec![LookupItem {
                    symbol: format!("{}-HIT", self.source.as_str()),
                    name: format!("{} result", self.source.as_str()),
                    currency: None,
                    data_source: self.source,
                }],
            }
        }
    }

    /// Test double that stamps its marker into the profile's sector list, so
    /// tests can observe the order enhancers ran in.
    struct MockEnhancer {
        marker: &'static str,
    }

    #[async_trait::async_trait]
    impl DataEnhancer for MockEnhancer {
        fn name(&self) -> &'static str {
            self.marker
        }

        fn test_symbol(&self) -> &'static str {
            "QQQ"
        }

        async fn enhance(&self, _symbol: &str, mut profile: AssetProfile) -> AssetProfile {
            profile.sectors.push(SectorWeight {
                name: self.marker.to_string(),
                weight: 1.0,
            });
            profile
        }
    }

    fn registry_of(providers: Vec<Arc<dyn DataProvider>>) -> DataProviderRegistry {
        DataProviderRegistry::new(providers)
    }

    #[tokio::test]
    async fn test_quotes_route_to_first_claiming_provider() {
        let crypto = Arc::new(MockProvider::new(DataSource::Coingecko, "BTC"));
        let catch_all = Arc::new(MockProvider::new(DataSource::Yahoo, ""));
        let registry = registry_of(vec![crypto.clone(), catch_all.clone()]);

        let symbols = vec!["BTCUSD".to_string(), "AAPL".to_string()];
        let quotes = registry.get_quotes(&symbols).await;

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes["BTCUSD"].data_source, DataSource::Coingecko);
        assert_eq!(quotes["AAPL"].data_source, DataSource::Yahoo);
        assert_eq!(crypto.calls(), 1);
        assert_eq!(catch_all.calls(), 1);
    }

    #[tokio::test]
    async fn test_quotes_registration_order_wins() {
        let first = Arc::new(MockProvider::new(DataSource::Yahoo, ""));
        let second = Arc::new(MockProvider::new(DataSource::AlphaVantage, ""));
        let registry = registry_of(vec![first.clone(), second.clone()]);

        let quotes = registry.get_quotes(&["AAPL".to_string()]).await;

        assert_eq!(quotes["AAPL"].data_source, DataSource::Yahoo);
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn test_quotes_omit_failed_symbols() {
        let provider =
            Arc::new(MockProvider::new(DataSource::Yahoo, "").with_failing(vec!["BAD"]));
        let registry = registry_of(vec![provider]);

        let symbols = vec!["AAPL".to_string(), "BAD".to_string(), "MSFT".to_string()];
        let quotes = registry.get_quotes(&symbols).await;

        assert_eq!(quotes.len(), 2);
        assert!(quotes.contains_key("AAPL"));
        assert!(quotes.contains_key("MSFT"));
        assert!(!quotes.contains_key("BAD"));
    }

    #[tokio::test]
    async fn test_quotes_deduplicate_symbols() {
        let provider = Arc::new(MockProvider::new(DataSource::Yahoo, ""));
        let registry = registry_of(vec![provider.clone()]);

        let symbols = vec![
            "AAPL".to_string(),
            "AAPL".to_string(),
            "AAPL".to_string(),
        ];
        let quotes = registry.get_quotes(&symbols).await;

        assert_eq!(quotes.len(), 1);
        assert_eq!(provider.calls(), 1);
        let sizes = provider.batch_sizes.lock().unwrap();
        assert_eq!(*sizes, vec![1]);
    }

    #[tokio::test]
    async fn test_quotes_chunk_by_provider_limit() {
        let provider = Arc::new(MockProvider::new(DataSource::Yahoo, "").with_max_batch(2));
        let registry = registry_of(vec![provider.clone()]);

        let symbols: Vec<String> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let quotes = registry.get_quotes(&symbols).await;

        assert_eq!(quotes.len(), 5);
        assert_eq!(provider.calls(), 3);
        let sizes = provider.batch_sizes.lock().unwrap();
        assert_eq!(*sizes, vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn test_quotes_drop_unclaimed_symbols() {
        let provider = Arc::new(MockProvider::new(DataSource::Coingecko, "BTC"));
        let registry = registry_of(vec![provider.clone()]);

        let quotes = registry.get_quotes(&["AAPL".to_string()]).await;

        assert!(quotes.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_quotes_empty_batch() {
        let provider = Arc::new(MockProvider::new(DataSource::Yahoo, ""));
        let registry = registry_of(vec![provider.clone()]);

        let quotes = registry.get_quotes(&[]).await;

        assert!(quotes.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_lookup_by_source() {
        let registry = registry_of(vec![
            Arc::new(MockProvider::new(DataSource::Coingecko, "BTC")),
            Arc::new(MockProvider::new(DataSource::Yahoo, "")),
        ]);

        assert!(registry.provider(DataSource::Coingecko).is_some());
        assert!(registry.provider(DataSource::Yahoo).is_some());
        assert!(registry.provider(DataSource::AlphaVantage).is_none());
    }

    #[tokio::test]
    async fn test_provider_for_respects_registration_order() {
        let registry = registry_of(vec![
            Arc::new(MockProvider::new(DataSource::Coingecko, "BTC")),
            Arc::new(MockProvider::new(DataSource::Yahoo, "")),
        ]);

        let provider = registry.provider_for("BTCUSD").unwrap();
        assert_eq!(provider.name(), DataSource::Coingecko);

        let provider = registry.provider_for("AAPL").unwrap();
        assert_eq!(provider.name(), DataSource::Yahoo);

        let default = registry.default_provider().unwrap();
        assert_eq!(default.name(), DataSource::Coingecko);
    }

    #[tokio::test]
    async fn test_historical_routes_by_symbol() {
        let crypto = Arc::new(MockProvider::new(DataSource::Coingecko, "BTC"));
        let catch_all = Arc::new(MockProvider::new(DataSource::Yahoo, ""));
        let registry = registry_of(vec![crypto.clone(), catch_all.clone()]);

        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let result = registry
            .get_historical("BTCUSD", Granularity::Day, from, to)
            .await;

        assert!(result.contains_key("BTCUSD"));
        assert_eq!(crypto.calls(), 1);
        assert_eq!(catch_all.calls(), 0);
    }

    #[tokio::test]
    async fn test_historical_without_provider_is_empty() {
        let provider = Arc::new(MockProvider::new(DataSource::Coingecko, "BTC"));
        let registry = registry_of(vec![provider.clone()]);

        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let result = registry
            .get_historical("AAPL", Granularity::Day, from, to)
            .await;

        assert!(result.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_profile_runs_enhancers_in_order() {
        let provider = Arc::new(MockProvider::new(DataSource::Yahoo, ""));
        let registry = registry_of(vec![provider]).with_enhancers(vec![
            Arc::new(MockEnhancer { marker: "first" }),
            Arc::new(MockEnhancer { marker: "second" }),
        ]);

        let profile = registry.get_asset_profile("VTI").await.unwrap();

        assert_eq!(profile.name.as_deref(), Some("YAHOO profile"));
        let markers: Vec<&str> = profile.sectors.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(markers, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_profile_without_provider_is_none() {
        let registry = registry_of(vec![Arc::new(MockProvider::new(
            DataSource::Coingecko,
            "BTC",
        ))]);

        assert!(registry.get_asset_profile("AAPL").await.is_none());
    }

    #[tokio::test]
    async fn test_search_concatenates_in_registration_order() {
        let first = Arc::new(MockProvider::new(DataSource::Yahoo, ""));
        let second = Arc::new(MockProvider::new(DataSource::Coingecko, "BTC"));
        let registry = registry_of(vec![first, second]);

        let response = registry.search("bitcoin").await;

        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].data_source, DataSource::Yahoo);
        assert_eq!(response.items[1].data_source, DataSource::Coingecko);
    }
}
