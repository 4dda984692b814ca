use serde::{Deserialize, Serialize};

use super::asset_class::{AssetClass, AssetSubClass};
use super::data_source::DataSource;

/// Country exposure entry.
///
/// `code` is an ISO 3166-1 alpha-2 country code; `weight` is the fraction of
/// the asset's exposure attributed to that country, in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryWeight {
    pub code: String,
    pub weight: f64,
}

/// Sector exposure entry, weighted like [`CountryWeight`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorWeight {
    pub name: String,
    pub weight: f64,
}

/// Descriptive metadata about a tradable asset.
///
/// Profiles are partial records: an adapter fills in what its upstream source
/// knows and leaves the rest absent. A data enhancer may later populate the
/// `countries` and `sectors` breakdowns, but only when they are still empty.
/// Profiles that could not be resolved at all degrade to
/// [`AssetProfile::minimal`], which carries nothing beyond the adapter's
/// identity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetProfile {
    /// Canonical symbol this profile describes.
    pub symbol: String,

    /// Adapter that produced the profile.
    pub data_source: DataSource,

    /// Trading currency (ISO 4217).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Top-level classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_class: Option<AssetClass>,

    /// Second-level classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_sub_class: Option<AssetSubClass>,

    /// Country exposure breakdown; empty when unknown.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub countries: Vec<CountryWeight>,

    /// Sector exposure breakdown; empty when unknown.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sectors: Vec<SectorWeight>,

    /// Issuer or product web page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AssetProfile {
    /// Create the minimal profile an adapter returns when it has no data:
    /// just the symbol and the adapter's own identity.
    pub fn minimal(data_source: DataSource, symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            data_source,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_profile_carries_identity_only() {
        let profile = AssetProfile::minimal(DataSource::Yahoo, "AAPL");
        assert_eq!(profile.symbol, "AAPL");
        assert_eq!(profile.data_source, DataSource::Yahoo);
        assert!(profile.currency.is_none());
        assert!(profile.name.is_none());
        assert!(profile.asset_class.is_none());
        assert!(profile.countries.is_empty());
        assert!(profile.sectors.is_empty());
    }

    #[test]
    fn test_profile_serialization_skips_absent_fields() {
        let profile = AssetProfile {
            name: Some("Apple Inc.".to_string()),
            ..AssetProfile::minimal(DataSource::Yahoo, "AAPL")
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("Apple Inc."));
        assert!(json.contains("YAHOO"));
        assert!(!json.contains("currency"));
        assert!(!json.contains("countries"));
        assert!(!json.contains("sectors"));
    }

    #[test]
    fn test_profile_deserialization_defaults_breakdowns() {
        let json = r#"{"symbol": "VTI", "data_source": "YAHOO"}"#;
        let profile: AssetProfile = serde_json::from_str(json).unwrap();
        assert!(profile.countries.is_empty());
        assert!(profile.sectors.is_empty());
    }
}
