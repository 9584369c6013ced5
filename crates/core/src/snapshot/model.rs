//! Snapshot wire format.
//!
//! This is exactly the document the site consumes; field names are
//! part of the contract. Older files written by earlier pipeline
//! versions carry extra fields (per-item timestamps, debug blocks, a
//! top-level source marker); serde ignores those on read.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fondkurs_market_data::Provenance;

use crate::history::HistoryPoint;

/// One instrument in the snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotItem {
    /// Stable logical name
    pub name: String,

    /// ISIN when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,

    /// Currency of `price`
    pub currency: String,

    /// Latest price, live or carried forward
    pub price: Decimal,

    /// Bounded day-keyed history, ascending
    #[serde(default)]
    pub history: Vec<HistoryPoint>,

    /// Where the value came from; `"previous"` when carried forward
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Provenance>,
}

impl SnapshotItem {
    /// Whether this item's value was carried from the previous run.
    pub fn is_carried(&self) -> bool {
        matches!(self.source, Some(Provenance::Previous))
    }
}

/// The whole snapshot document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Newest source-reported quote time across all items; never
    /// decreases between runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Items in configuration order
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn round_trips_the_wire_shape() {
        let json = r#"{
            "updatedAt": "2026-01-05T17:03:21Z",
            "items": [
                {
                    "name": "Nordea Invest Global Enhanced",
                    "isin": "DK0060949964",
                    "currency": "DKK",
                    "price": 146.20,
                    "history": [
                        { "date": "2025-12-30", "price": 145.80 },
                        { "date": "2025-12-31", "price": 146.20 }
                    ],
                    "source": "YAHOO:0P0001P9Q1.CO"
                }
            ]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(
            snapshot.updated_at,
            Some(Utc.with_ymd_and_hms(2026, 1, 5, 17, 3, 21).unwrap())
        );
        let item = &snapshot.items[0];
        assert_eq!(item.price, dec!(146.20));
        assert_eq!(item.history.len(), 2);
        assert!(!item.is_carried());

        let back = serde_json::to_string(&snapshot).unwrap();
        assert!(back.contains("\"updatedAt\""));
        assert!(back.contains("\"YAHOO:0P0001P9Q1.CO\""));
    }

    #[test]
    fn tolerates_legacy_extra_fields() {
        // Shape written by the old scripted pipeline.
        let json = r#"{
            "updatedAt": "2025-12-31T16:00:00Z",
            "source": "github-action",
            "items": [
                {
                    "name": "Nordea Invest Global Enhanced",
                    "isin": "DK0060949964",
                    "currency": "DKK",
                    "price": 145.80,
                    "updatedAt": "2025-12-31T16:00:00Z",
                    "history": [],
                    "source": "previous",
                    "debug": { "attempts": ["yahoo:X"] }
                }
            ]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.items[0].is_carried());
    }

    #[test]
    fn missing_updated_at_is_tolerated() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(snapshot.updated_at.is_none());
        assert!(snapshot.items.is_empty());
    }
}
