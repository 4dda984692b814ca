//! Asset profile enhancement.
//!
//! Enhancers are an optional post-processing step behind the profile fetch:
//! the registry pipes every fetched profile through the registered enhancer
//! chain, and each enhancer decides for itself whether the profile
//! qualifies. Enhancers fill gaps (country and sector breakdowns) but never
//! overwrite data that is already present, and they degrade to returning
//! the input untouched when their upstream source has nothing useful.

pub(crate) mod reference;
mod trackinsight;

pub use trackinsight::TrackinsightEnhancer;

use async_trait::async_trait;

use crate::models::AssetProfile;

/// Post-processing step that enriches a partial asset profile from a
/// supplementary source.
#[async_trait]
pub trait DataEnhancer: Send + Sync {
    /// Stable name for logging and configuration.
    fn name(&self) -> &'static str;

    /// Symbol used to probe the upstream source for availability.
    fn test_symbol(&self) -> &'static str;

    /// Enrich `profile` for `symbol`.
    ///
    /// Returns the input unchanged when the profile does not qualify, the
    /// upstream source has no data, or the data fails the quality gate.
    /// Never fails: any transport error degrades to the unchanged input.
    async fn enhance(&self, symbol: &str, profile: AssetProfile) -> AssetProfile;
}
