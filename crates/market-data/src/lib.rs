//! Moneta Market Data Crate
//!
//! This crate provides provider-agnostic market data fetching capabilities
//! for the Moneta application.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Multiple asset types: equities, ETFs, mutual funds, crypto, FX
//! - Multiple providers: Yahoo Finance, CoinGecko, Alpha Vantage, manual
//! - Canonical symbol normalization across providers
//! - Asset profile enhancement from supplementary sources
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |     Caller       |  (canonical symbols, e.g. "BTCUSD", "AAPL")
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |     Registry     |  (first-match routing, batch fan-out)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |     Adapter      | --> |   SymbolMapper   |  (canonical <-> provider)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |   Upstream API   |     |  Enhancer chain  |  (profile post-processing)
//! +------------------+     +------------------+
//! ```
//!
//! Adapters translate between canonical symbols and whatever notation their
//! upstream API speaks, so callers never see provider-specific tickers.
//! Lookup misses degrade softly: a symbol a provider cannot resolve is
//! simply absent from the response instead of failing the whole request.
//!
//! # Core Types
//!
//! - [`DataProviderRegistry`] - Routes requests to registered adapters
//! - [`DataProvider`] - Trait every market data adapter implements
//! - [`DataEnhancer`] - Trait for profile post-processing steps
//! - [`AssetProfile`] - Descriptive metadata about a tradable asset
//! - [`QuoteResponse`] - Latest price for one symbol
//! - [`HistoricalSeries`] - Date-ordered historical prices
//! - [`DataSource`] - Stable identity of each data origin

pub mod enhancer;
pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;
pub mod symbols;

// Re-export all public types from models
pub use models::{
    AssetClass, AssetProfile, AssetSubClass, CountryWeight, DataSource, Granularity,
    HistoricalResponse, HistoricalSeries, LookupItem, LookupResponse, MarketState, QuoteResponse,
    SectorWeight, DEFAULT_CURRENCY,
};

// Re-export error types
pub use errors::MarketDataError;

// Re-export symbol normalization types
pub use symbols::{CryptocurrencyClassifier, SymbolMapper};

// Re-export provider types
pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::coingecko::CoinGeckoProvider;
pub use provider::manual::ManualProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{DataProvider, DEFAULT_MAX_SYMBOLS_PER_REQUEST};

// Re-export enhancer types
pub use enhancer::{DataEnhancer, TrackinsightEnhancer};

// Re-export registry types
pub use registry::DataProviderRegistry;
