use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Time resolution for historical price requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Month,
}

/// Historical price for one symbol on one date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalResponse {
    pub market_price: Decimal,
}

/// Date-ordered series of historical prices for a single symbol.
///
/// Keys are the quote dates; ordered iteration keeps downstream processing
/// deterministic.
pub type HistoricalSeries = BTreeMap<NaiveDate, HistoricalResponse>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_granularity_serde() {
        assert_eq!(serde_json::to_string(&Granularity::Day).unwrap(), "\"day\"");
        assert_eq!(
            serde_json::to_string(&Granularity::Month).unwrap(),
            "\"month\""
        );
        let parsed: Granularity = serde_json::from_str("\"month\"").unwrap();
        assert_eq!(parsed, Granularity::Month);
    }

    #[test]
    fn test_granularity_default_is_day() {
        assert_eq!(Granularity::default(), Granularity::Day);
    }

    #[test]
    fn test_series_iterates_in_date_order() {
        let mut series = HistoricalSeries::new();
        series.insert(
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            HistoricalResponse {
                market_price: dec!(101),
            },
        );
        series.insert(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            HistoricalResponse {
                market_price: dec!(100),
            },
        );

        let dates: Vec<_> = series.keys().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-02"]);
    }
}
