//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `DataProvider` trait that all providers implement
//! - Concrete provider implementations (Yahoo, CoinGecko, etc.)
//!
//! # Architecture
//!
//! The provider system is designed to be:
//! - **Provider-agnostic**: The core system doesn't know about specific providers
//! - **Extensible**: New providers can be added by implementing `DataProvider`
//! - **Fail-soft**: A provider that cannot deliver returns empty data, never an error
//!
//! # Symbol handling
//!
//! Providers receive canonical symbols and translate them to their own
//! notation through a `SymbolMapper` before talking to the upstream API.
//! Results are keyed by canonical symbol again on the way out, so callers
//! never see provider notation.

mod traits;

// Provider implementations
pub mod alpha_vantage;
pub mod coingecko;
pub mod manual;
pub mod yahoo;

// Re-exports
pub use traits::{DataProvider, DEFAULT_MAX_SYMBOLS_PER_REQUEST};
