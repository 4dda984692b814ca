use std::fmt;

use serde::{Deserialize, Serialize};

pub const DATA_SOURCE_ALPHA_VANTAGE: &str = "ALPHA_VANTAGE";
pub const DATA_SOURCE_COINGECKO: &str = "COINGECKO";
pub const DATA_SOURCE_MANUAL: &str = "MANUAL";
pub const DATA_SOURCE_YAHOO: &str = "YAHOO";

/// Identity of one external (or manual) origin of market data.
///
/// Every adapter reports exactly one `DataSource`, and every response the
/// subsystem hands back is tagged with it. The string form is the stable
/// dictionary discriminator used throughout the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    AlphaVantage,
    Coingecko,
    #[default]
    Manual,
    Yahoo,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::AlphaVantage => DATA_SOURCE_ALPHA_VANTAGE,
            DataSource::Coingecko => DATA_SOURCE_COINGECKO,
            DataSource::Manual => DATA_SOURCE_MANUAL,
            DataSource::Yahoo => DATA_SOURCE_YAHOO,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        source.as_str().to_string()
    }
}

impl From<&str> for DataSource {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            DATA_SOURCE_ALPHA_VANTAGE => DataSource::AlphaVantage,
            DATA_SOURCE_COINGECKO => DataSource::Coingecko,
            DATA_SOURCE_YAHOO => DataSource::Yahoo,
            _ => DataSource::Manual,
        }
    }
}
