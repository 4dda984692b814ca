//! Trackinsight data enhancer.
//!
//! Enriches ETF profiles with country and sector weight breakdowns from the
//! Trackinsight holdings feed. Only profiles classified as equity ETFs
//! qualify; everything else passes through untouched without an external
//! call.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use super::reference::{country_code_by_name, normalize_sector};
use super::DataEnhancer;
use crate::errors::MarketDataError;
use crate::models::{AssetClass, AssetProfile, AssetSubClass, CountryWeight, SectorWeight};

const BASE_URL: &str = "https://data.trackinsight.com";
const ENHANCER_NAME: &str = "TRACKINSIGHT";

/// Aggregate weight below which the holdings data is considered too partial
/// to merge.
const MIN_COVERAGE_WEIGHT: f64 = 0.95;

// ============================================================================
// Response structures for the holdings feed
// ============================================================================

/// Holdings document for one fund.
#[derive(Debug, Deserialize)]
pub(crate) struct HoldingsResponse {
    /// Fraction of the fund's exposure the breakdowns below describe.
    weight: Option<f64>,

    /// Country name to exposure weight.
    #[serde(default)]
    countries: BTreeMap<String, WeightEntry>,

    /// Sector name to exposure weight.
    #[serde(default)]
    sectors: BTreeMap<String, WeightEntry>,
}

/// Weight value; the feed reports either a bare number or `{"weight": n}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WeightEntry {
    Detailed { weight: f64 },
    Bare(f64),
}

impl WeightEntry {
    fn weight(&self) -> f64 {
        match self {
            WeightEntry::Detailed { weight } => *weight,
            WeightEntry::Bare(weight) => *weight,
        }
    }
}

// ============================================================================
// TrackinsightEnhancer implementation
// ============================================================================

/// Enhancer backed by the Trackinsight holdings feed.
pub struct TrackinsightEnhancer {
    client: Client,
    base_url: String,
}

impl TrackinsightEnhancer {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Only equity ETFs carry holdings breakdowns worth fetching.
    fn qualifies(profile: &AssetProfile) -> bool {
        profile.asset_class == Some(AssetClass::Equity)
            && profile.asset_sub_class == Some(AssetSubClass::Etf)
    }

    /// Symbol with everything from the first `.` stripped, used as the one
    /// fallback lookup (`VWRL.SW` retries as `VWRL`).
    fn fallback_symbol(symbol: &str) -> Option<&str> {
        match symbol.split_once('.') {
            Some((prefix, _)) if !prefix.is_empty() => Some(prefix),
            _ => None,
        }
    }

    async fn fetch_holdings(&self, symbol: &str) -> Result<HoldingsResponse, MarketDataError> {
        let url = format!("{}/holdings/{}.json", self.base_url, symbol);

        debug!("Trackinsight request: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: ENHANCER_NAME.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: ENHANCER_NAME.to_string(),
            });
        }
        if !status.is_success() {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }

        response
            .json::<HoldingsResponse>()
            .await
            .map_err(|e| MarketDataError::Parse(format!("holdings for {}: {}", symbol, e)))
    }
}

impl Default for TrackinsightEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge a holdings document into a profile.
///
/// The reported coverage weight gates the whole merge: below
/// [`MIN_COVERAGE_WEIGHT`] the input is returned untouched. Countries and
/// sectors are populated only when the existing field is empty; names the
/// reference tables cannot translate are skipped. Iteration over the
/// document is name-ordered, so duplicate target codes resolve
/// last-write-wins deterministically.
fn apply_holdings(mut profile: AssetProfile, holdings: &HoldingsResponse) -> AssetProfile {
    if holdings.weight.is_some_and(|w| w < MIN_COVERAGE_WEIGHT) {
        return profile;
    }

    if profile.countries.is_empty() {
        let mut by_code: BTreeMap<&'static str, f64> = BTreeMap::new();
        for (name, entry) in &holdings.countries {
            match country_code_by_name(name) {
                Some(code) => {
                    by_code.insert(code, entry.weight());
                }
                None => {
                    debug!("Skipping unknown country name: {}", name);
                }
            }
        }
        profile.countries = by_code
            .into_iter()
            .map(|(code, weight)| CountryWeight {
                code: code.to_string(),
                weight,
            })
            .collect();
    }

    if profile.sectors.is_empty() {
        let mut by_name: BTreeMap<&str, f64> = BTreeMap::new();
        for (name, entry) in &holdings.sectors {
            by_name.insert(normalize_sector(name), entry.weight());
        }
        profile.sectors = by_name
            .into_iter()
            .map(|(name, weight)| SectorWeight {
                name: name.to_string(),
                weight,
            })
            .collect();
    }

    profile
}

#[async_trait]
impl DataEnhancer for TrackinsightEnhancer {
    fn name(&self) -> &'static str {
        ENHANCER_NAME
    }

    fn test_symbol(&self) -> &'static str {
        "QQQ"
    }

    async fn enhance(&self, symbol: &str, profile: AssetProfile) -> AssetProfile {
        if !Self::qualifies(&profile) {
            return profile;
        }

        let holdings = match self.fetch_holdings(symbol).await {
            Ok(holdings) => holdings,
            Err(first_error) => {
                let Some(fallback) = Self::fallback_symbol(symbol) else {
                    warn!(
                        "Trackinsight has no holdings for {}: {}",
                        symbol, first_error
                    );
                    return profile;
                };

                debug!(
                    "Trackinsight holdings miss for {} ({}), retrying as {}",
                    symbol, first_error, fallback
                );

                match self.fetch_holdings(fallback).await {
                    Ok(holdings) => holdings,
                    Err(e) => {
                        warn!("Trackinsight has no holdings for {}: {}", fallback, e);
                        return profile;
                    }
                }
            }
        };

        apply_holdings(profile, &holdings)
    }
}

// ============================================================================
// Tests
// ============================================================================
