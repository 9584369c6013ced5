//! Fondkurs Market Data Crate
//!
//! This crate provides source-agnostic price fetching for the fondkurs
//! snapshot pipeline.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Multiple source adapters: Yahoo Finance, Morningstar DK
//! - Ordered fallback with a per-call deadline
//! - Symbol resolution from configuration or ranked search
//! - Locale-aware normalization of scraped values
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Configuration   | --> |   Instrument     |  (name, currency, sources)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  SymbolResolver  |  (explicit or ranked search)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   SourceChain    |  (ordered fallback, deadline)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   PriceSource    |  (Yahoo, Morningstar)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   QuotePoint     |  (normalized observation)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Instrument`] - Configured instrument with its fallback order
//! - [`QuotePoint`] - Normalized price observation
//! - [`ChainQuote`] - First successful result of a fallback run
//! - [`Provenance`] - Where a stored value came from
//!
//! # Type Aliases
//!
//! - [`SourceId`] - Source adapter identifier (e.g., "YAHOO")
//! - [`ProviderSymbol`] - Provider-specific symbol string

pub mod chain;
pub mod errors;
pub mod models;
pub mod numeric;
pub mod provider;
pub mod resolver;

// Re-export all public types from models
pub use models::{Instrument, Provenance, ProviderSymbol, QuotePoint, SearchResult, SourceId, SourceSpec};

// Re-export chain types
pub use chain::{ChainQuote, SourceChain, DEFAULT_CALL_TIMEOUT};

// Re-export resolver types
pub use resolver::{ResolutionSource, ResolvedSymbol, SymbolResolver};

// Re-export provider types
pub use provider::morningstar::MorningstarSource;
pub use provider::yahoo::YahooSource;
pub use provider::PriceSource;

// Re-export error types
pub use errors::{FetchError, ParseError, ResolutionError, SourceAttempt, SourcesExhausted};
