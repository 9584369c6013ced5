//! Candidate listings returned by a provider symbol search.

use serde::{Deserialize, Serialize};

/// One candidate from a provider's symbol search.
///
/// The resolver ranks candidates to pick the provider symbol for an
/// instrument. Searching by ISIN or fund name typically surfaces the
/// fund's Morningstar-style ticker next to the fund company's own
/// stock, so classification and name matter more than raw score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
    /// Provider symbol the candidate trades under (e.g. "0P0001P9Q1.CO")
    pub symbol: String,

    /// Display name, compared token-wise against the instrument name
    pub name: String,

    /// Listing exchange as the provider names it (e.g. "CPH")
    pub exchange: String,

    /// Provider classification (e.g. "MUTUALFUND", "EQUITY")
    pub asset_type: String,

    /// Provider relevance score; ranking consults it only after fund
    /// preference and name overlap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SearchResult {
    /// Candidate from the fields every search endpoint reports.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        exchange: impl Into<String>,
        asset_type: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            exchange: exchange.into(),
            asset_type: asset_type.into(),
            score: None,
        }
    }

    /// Attach the provider's relevance score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Whether the provider classified the candidate as a fund rather
    /// than a stock.
    pub fn is_fund_like(&self) -> bool {
        matches!(
            self.asset_type.to_ascii_uppercase().as_str(),
            "MUTUALFUND" | "ETF" | "FUND"
        )
    }
}
