use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal stored when a value was carried over from the previous snapshot.
const PREVIOUS: &str = "previous";

/// Where a snapshot item's current value came from.
///
/// Serializes as a plain string: `"YAHOO:0P0001P9Q1.CO"` for live values,
/// the literal `"previous"` for carried-forward ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provenance {
    /// Fetched live; holds `"<ADAPTER_ID>:<symbol>"`
    Source(String),

    /// Copied from the prior snapshot after every source failed
    Previous,
}

impl Provenance {
    /// Provenance for a live fetch through `source_id` with `symbol`.
    pub fn live(source_id: &str, symbol: &str) -> Self {
        Provenance::Source(format!("{}:{}", source_id, symbol))
    }

    pub fn is_previous(&self) -> bool {
        matches!(self, Provenance::Previous)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Source(s) => f.write_str(s),
            Provenance::Previous => f.write_str(PREVIOUS),
        }
    }
}

impl From<String> for Provenance {
    fn from(value: String) -> Self {
        if value == PREVIOUS {
            Provenance::Previous
        } else {
            Provenance::Source(value)
        }
    }
}

impl From<Provenance> for String {
    fn from(value: Provenance) -> Self {
        value.to_string()
    }
}
