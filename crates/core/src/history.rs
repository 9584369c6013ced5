//! Bounded per-instrument price history.
//!
//! History is a short day-keyed series: one price per calendar date,
//! ascending, capped so the snapshot stays a small flat file. Merging
//! overlays new observations onto what is stored, so a same-day refetch
//! corrects the stored price instead of appending a duplicate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use fondkurs_market_data::QuotePoint;

/// Maximum history entries kept per instrument.
pub const MAX_HISTORY: usize = 10;

/// One stored history entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Calendar date key ("YYYY-MM-DD" on the wire)
    pub date: NaiveDate,

    /// Price observed for that date
    pub price: Decimal,
}

/// Merge new observations into an existing history.
///
/// New points overlay existing entries with the same date; among the
/// new points themselves the later timestamp wins. The result is
/// ascending by date, unique per date, truncated to the newest `cap`
/// entries. Merging an empty set returns the existing history
/// unchanged.
pub fn merge_history(
    existing: &[HistoryPoint],
    new_points: &[QuotePoint],
    cap: usize,
) -> Vec<HistoryPoint> {
    let mut by_date: BTreeMap<NaiveDate, Decimal> = existing
        .iter()
        .map(|point| (point.date, point.price))
        .collect();

    // Insert in timestamp order so the freshest observation of a date
    // is the one that sticks.
    let mut incoming: Vec<&QuotePoint> = new_points.iter().collect();
    incoming.sort_by_key(|point| point.timestamp);
    for point in incoming {
        by_date.insert(point.day(), point.price);
    }

    let mut merged: Vec<HistoryPoint> = by_date
        .into_iter()
        .map(|(date, price)| HistoryPoint { date, price })
        .collect();

    if merged.len() > cap {
        merged.drain(..merged.len() - cap);
    }

    merged
}

// ============================================================================
// Tests
// ============================================================================
