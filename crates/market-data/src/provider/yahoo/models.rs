//! Yahoo Finance API response models.
//!
//! These models are used for parsing the quoteSummary API responses
//! which provide richer data than the standard quote endpoints.

use serde::Deserialize;

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    /// `null` on error responses, so plain `Vec` would fail to parse.
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
    // Note: error field exists in API but we handle errors via HTTP status/empty results
}

/// Individual result from quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
    pub summary_profile: Option<YahooSummaryProfile>,
    pub top_holdings: Option<YahooTopHoldings>,
}

/// Price data from quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub currency: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub quote_type: Option<String>,
    /// Trading session state, e.g. "REGULAR", "PRE", "POST", "CLOSED".
    pub market_state: Option<String>,
    pub regular_market_price: Option<YahooPriceDetail>,
}

/// Price detail with raw and formatted values
#[derive(Debug, Deserialize, Clone)]
pub struct YahooPriceDetail {
    pub raw: Option<f64>,
    // Note: fmt field exists but we only use raw values
}

/// Summary profile data (company info)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryProfile {
    pub sector: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    // Note: industry, city, longBusinessSummary exist but are not mapped
}

/// Top holdings data for ETFs and Mutual Funds
/// Contains sector weightings and other fund-specific data
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooTopHoldings {
    /// Sector weightings - each element is a map with sector name as key
    /// e.g., [{"technology": {"raw": 0.30}}, {"healthcare": {"raw": 0.15}}]
    #[serde(default)]
    pub sector_weightings: Vec<std::collections::HashMap<String, YahooPriceDetail>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_price_detail() {
        let json = r#"{"raw": 150.25, "fmt": "150.25"}"#;
        let detail: YahooPriceDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.raw, Some(150.25));
    }

    #[test]
    fn test_deserialize_price_detail_empty_object() {
        let json = r#"{}"#;
        let detail: YahooPriceDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.raw, None);
    }

    #[test]
    fn test_deserialize_price_data() {
        let json = r#"{
            "currency": "USD",
            "shortName": "Apple Inc.",
            "longName": "Apple Inc.",
            "quoteType": "EQUITY",
            "marketState": "REGULAR",
            "regularMarketPrice": {"raw": 187.3, "fmt": "187.30"}
        }"#;
        let price: YahooPriceData = serde_json::from_str(json).unwrap();
        assert_eq!(price.currency, Some("USD".to_string()));
        assert_eq!(price.quote_type, Some("EQUITY".to_string()));
        assert_eq!(price.market_state, Some("REGULAR".to_string()));
        assert_eq!(
            price.regular_market_price.as_ref().and_then(|p| p.raw),
            Some(187.3)
        );
    }

    #[test]
    fn test_deserialize_summary_profile() {
        let json = r#"{
            "sector": "Technology",
            "industry": "Consumer Electronics",
            "website": "https://www.apple.com",
            "country": "United States",
            "fullTimeEmployees": 164000
        }"#;
        let profile: YahooSummaryProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.sector, Some("Technology".to_string()));
        assert_eq!(profile.country, Some("United States".to_string()));
        assert_eq!(profile.website, Some("https://www.apple.com".to_string()));
    }

    #[test]
    fn test_deserialize_top_holdings() {
        // Yahoo returns sector weightings as array of single-key objects
        let json = r#"{
            "sectorWeightings": [
                {"realestate": {"raw": 0.0261, "fmt": "2.61%"}},
                {"consumer_cyclical": {"raw": 0.1023, "fmt": "10.23%"}},
                {"technology": {"raw": 0.2915, "fmt": "29.15%"}}
            ]
        }"#;
        let holdings: YahooTopHoldings = serde_json::from_str(json).unwrap();
        assert_eq!(holdings.sector_weightings.len(), 3);

        let first = &holdings.sector_weightings[0];
        assert_eq!(first.get("realestate").and_then(|d| d.raw), Some(0.0261));

        let tech = &holdings.sector_weightings[2];
        assert_eq!(tech.get("technology").and_then(|d| d.raw), Some(0.2915));
    }

    #[test]
    fn test_deserialize_quote_summary_envelope() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {
                        "currency": "USD",
                        "quoteType": "ETF",
                        "shortName": "Invesco QQQ Trust, Series 1",
                        "longName": "Invesco QQQ Trust",
                        "marketState": "CLOSED",
                        "regularMarketPrice": {"raw": 430.12}
                    },
                    "summaryProfile": {},
                    "topHoldings": {
                        "sectorWeightings": [{"technology": {"raw": 0.5}}]
                    }
                }],
                "error": null
            }
        }"#;
        let response: YahooQuoteSummaryResponse = serde_json::from_str(json).unwrap();
        let results = response.quote_summary.result.unwrap();
        assert_eq!(results.len(), 1);

        let price = results[0].price.as_ref().unwrap();
        assert_eq!(price.quote_type, Some("ETF".to_string()));

        let holdings = results[0].top_holdings.as_ref().unwrap();
        assert_eq!(holdings.sector_weightings.len(), 1);
    }

    #[test]
    fn test_deserialize_error_envelope_with_null_result() {
        let json = r#"{
            "quoteSummary": {
                "result": null,
                "error": {"code": "Not Found", "description": "Quote not found"}
            }
        }"#;
        let response: YahooQuoteSummaryResponse = serde_json::from_str(json).unwrap();
        assert!(response.quote_summary.result.is_none());
    }
}
