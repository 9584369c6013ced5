//! Yahoo Finance API response models.
//!
//! These models parse the `v7/finance/quote` endpoint used as the backup
//! path when the chart API gives nothing for a symbol.

use serde::Deserialize;

/// Main response wrapper for the v7 quote API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteResponse {
    pub quote_response: YahooQuoteResult,
}

/// Quote result container
#[derive(Debug, Deserialize)]
pub struct YahooQuoteResult {
    #[serde(default)]
    pub result: Vec<YahooQuoteRow>,
    // Note: error field exists in API but we handle errors via HTTP status/empty results
}

/// One quoted symbol from the v7 quote API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteRow {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub regular_market_price: Option<f64>,
    pub post_market_price: Option<f64>,
    /// Epoch seconds of the regular market observation
    pub regular_market_time: Option<i64>,
}

impl YahooQuoteRow {
    /// Best available price: regular market first, post market after hours.
    pub fn best_price(&self) -> Option<f64> {
        self.regular_market_price.or(self.post_market_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_quote_payload() {
        let json = r#"{
            "quoteResponse": {
                "result": [
                    {
                        "symbol": "0P0001P9Q1.CO",
                        "currency": "DKK",
                        "regularMarketPrice": 146.20,
                        "regularMarketTime": 1767024000
                    }
                ],
                "error": null
            }
        }"#;
        let parsed: YahooQuoteResponse = serde_json::from_str(json).unwrap();
        let row = &parsed.quote_response.result[0];
        assert_eq!(row.currency.as_deref(), Some("DKK"));
        assert_eq!(row.best_price(), Some(146.20));
    }

    #[test]
    fn post_market_price_fills_in() {
        let row = YahooQuoteRow {
            symbol: None,
            currency: None,
            regular_market_price: None,
            post_market_price: Some(12.5),
            regular_market_time: None,
        };
        assert_eq!(row.best_price(), Some(12.5));
    }

    #[test]
    fn empty_result_is_valid() {
        let json = r#"{"quoteResponse": {"result": [], "error": null}}"#;
        let parsed: YahooQuoteResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.quote_response.result.is_empty());
    }
}
