//! Market data models
//!
//! This module contains the core data types for market data operations:
//! - `data_source` - Provider identity enum (DataSource)
//! - `asset_class` - Asset classification enums (AssetClass, AssetSubClass)
//! - `profile` - Asset profile data (AssetProfile) and weight entries
//! - `quote` - Quote data structures (QuoteResponse, MarketState)
//! - `historical` - Historical price data (HistoricalResponse, Granularity)
//! - `search` - Symbol lookup data (LookupItem, LookupResponse)

mod asset_class;
mod data_source;
mod historical;
mod profile;
mod quote;
mod search;

pub use asset_class::{AssetClass, AssetSubClass};
pub use data_source::DataSource;
pub use historical::{Granularity, HistoricalResponse, HistoricalSeries};
pub use profile::{AssetProfile, CountryWeight, SectorWeight};
pub use quote::{MarketState, QuoteResponse};
pub use search::{LookupItem, LookupResponse};

/// Currency assumed when a provider response does not state one.
pub const DEFAULT_CURRENCY: &str = "USD";
