use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level asset classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    Commodity,
    Equity,
    FixedIncome,
    Liquidity,
    RealEstate,
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_string = match self {
            AssetClass::Commodity => "Commodity",
            AssetClass::Equity => "Equity",
            AssetClass::FixedIncome => "Fixed Income",
            AssetClass::Liquidity => "Liquidity",
            AssetClass::RealEstate => "Real Estate",
        };
        write!(f, "{}", display_string)
    }
}

/// Second-level asset classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetSubClass {
    Bond,
    Commodity,
    Cryptocurrency,
    Etf,
    Mutualfund,
    PreciousMetal,
    Stock,
}

impl fmt::Display for AssetSubClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_string = match self {
            AssetSubClass::Bond => "Bond",
            AssetSubClass::Commodity => "Commodity",
            AssetSubClass::Cryptocurrency => "Cryptocurrency",
            AssetSubClass::Etf => "ETF",
            AssetSubClass::Mutualfund => "Mutual Fund",
            AssetSubClass::PreciousMetal => "Precious Metal",
            AssetSubClass::Stock => "Stock",
        };
        write!(f, "{}", display_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_class_serde() {
        assert_eq!(
            serde_json::to_string(&AssetClass::FixedIncome).unwrap(),
            "\"FIXED_INCOME\""
        );
        assert_eq!(
            serde_json::to_string(&AssetClass::Liquidity).unwrap(),
            "\"LIQUIDITY\""
        );
        let parsed: AssetClass = serde_json::from_str("\"REAL_ESTATE\"").unwrap();
        assert_eq!(parsed, AssetClass::RealEstate);
    }

    #[test]
    fn test_asset_sub_class_serde() {
        assert_eq!(
            serde_json::to_string(&AssetSubClass::Mutualfund).unwrap(),
            "\"MUTUALFUND\""
        );
        assert_eq!(
            serde_json::to_string(&AssetSubClass::PreciousMetal).unwrap(),
            "\"PRECIOUS_METAL\""
        );
        let parsed: AssetSubClass = serde_json::from_str("\"CRYPTOCURRENCY\"").unwrap();
        assert_eq!(parsed, AssetSubClass::Cryptocurrency);
    }

    #[test]
    fn test_display() {
        assert_eq!(AssetClass::FixedIncome.to_string(), "Fixed Income");
        assert_eq!(AssetSubClass::Etf.to_string(), "ETF");
        assert_eq!(AssetSubClass::Mutualfund.to_string(), "Mutual Fund");
    }
}
