//! Provider orchestration.
//!
//! This module routes every market data request to the adapter that should
//! serve it:
//! - Providers register in a fixed order; the first one claiming a symbol
//!   wins.
//! - Quote batches are split per provider and per request-size limit before
//!   fanning out concurrently.
//! - Profile lookups run the enhancer chain after the owning provider
//!   responds.

mod registry;

pub use registry::DataProviderRegistry;
