//! Core error types for the snapshot pipeline.
//!
//! Source-level failures (network, parse, resolution) live in the
//! market-data crate and are absorbed by the fallback chain; what
//! remains here is the small set of conditions the pipeline itself can
//! hit.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the snapshot pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Every source failed and no previous value exists to carry
    /// forward. The only condition that aborts a run; the previous
    /// snapshot file is left untouched when it fires.
    #[error("No value available for '{instrument}': {detail}")]
    NoValueAvailable {
        /// Logical name of the instrument without a value
        instrument: String,
        /// Attempt trail from the fallback chain
        detail: String,
    },

    #[error("Snapshot I/O failed: {0}")]
    SnapshotIo(#[from] std::io::Error),

    #[error("Snapshot serialization failed: {0}")]
    SnapshotSerde(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_value_display_names_instrument_and_trail() {
        let err = Error::NoValueAvailable {
            instrument: "Nordea Invest Global Enhanced".to_string(),
            detail: "YAHOO[A1]: No data".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No value available for 'Nordea Invest Global Enhanced': YAHOO[A1]: No data"
        );
    }
}
