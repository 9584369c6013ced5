//! Market data models
//!
//! This module contains the core data types for price ingestion:
//! - `types` - Type aliases for common identifiers (SourceId, ProviderSymbol)
//! - `instrument` - Configured instrument identity and fallback order (Instrument, SourceSpec)
//! - `quote` - Normalized price observation (QuotePoint)
//! - `provenance` - Origin of a stored value (Provenance)
//! - `search` - Search result data (SearchResult)

mod instrument;
mod provenance;
mod quote;
mod search;
mod types;

pub use instrument::{Instrument, SourceSpec};
pub use provenance::Provenance;
pub use quote::QuotePoint;
pub use search::SearchResult;
pub use types::{ProviderSymbol, SourceId};
