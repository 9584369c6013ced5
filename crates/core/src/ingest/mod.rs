//! Ingestion run orchestration.

mod service;

pub use service::{IngestReport, IngestService, InstrumentOutcome, DEFAULT_MAX_PARALLEL};
