//! Fondkurs Core - Snapshot pipeline on top of the market-data crate.
//!
//! This crate owns everything that happens after a price has been
//! fetched: merging histories, deciding between live and carried
//! values, and persisting the snapshot document the site consumes.

pub mod errors;
pub mod history;
pub mod ingest;
pub mod snapshot;

// Re-export the pipeline types callers wire together
pub use ingest::{IngestReport, IngestService, InstrumentOutcome, DEFAULT_MAX_PARALLEL};
pub use snapshot::{Snapshot, SnapshotItem, SnapshotStore};

// Re-export history types
pub use history::{merge_history, HistoryPoint, MAX_HISTORY};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
