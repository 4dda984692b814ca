//! Manual data provider.
//!
//! Stub provider for user-maintained instruments. Prices for these are
//! entered by hand rather than fetched, so every operation returns empty
//! data and `can_handle` never claims a symbol.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::DataProvider;
use crate::models::{DataSource, Granularity, HistoricalSeries, QuoteResponse};

/// Provider for manually maintained instruments.
#[derive(Debug, Default)]
pub struct ManualProvider;

impl ManualProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataProvider for ManualProvider {
    fn name(&self) -> DataSource {
        DataSource::Manual
    }

    /// Manual instruments are addressed by source, never routed by symbol.
    fn can_handle(&self, _symbol: &str) -> bool {
        false
    }

    async fn get_quotes(&self, _symbols: &[String]) -> HashMap<String, QuoteResponse> {
        HashMap::new()
    }

    async fn get_historical(
        &self,
        _symbol: &str,
        _granularity: Granularity,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> HashMap<String, HistoricalSeries> {
        HashMap::new()
    }
}
