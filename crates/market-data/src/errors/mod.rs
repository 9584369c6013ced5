//! Error types for the market data crate.
//!
//! This module provides:
//! - [`ParseError`]: Normalization failures (numbers, dates, markup)
//! - [`FetchError`]: Everything that can go wrong talking to one source
//! - [`ResolutionError`]: Symbol search/resolution failures
//! - [`SourcesExhausted`]: The chain-level error after every source failed

use thiserror::Error;

/// Errors raised while normalizing raw source payloads.
///
/// A parse failure is always a failure of the source that produced the
/// payload; it never aborts a run on its own.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The raw text is not a number in any supported locale notation.
    /// A price that cannot be parsed is an error, never `0`.
    #[error("Not a numeric value: '{0}'")]
    InvalidNumber(String),

    /// The day/month pair does not form a valid calendar date.
    #[error("Invalid calendar date: {day:02}/{month:02}")]
    InvalidDate {
        /// Day of month as scraped
        day: u32,
        /// Month as scraped
        month: u32,
    },

    /// A scraped page did not contain the expected markup.
    /// Scraped layouts change without notice; the chain moves on.
    #[error("Expected markup not found: {context}")]
    MarkupMismatch {
        /// Which pattern failed to match
        context: &'static str,
    },

    /// The value parsed but is not a usable price (zero or negative).
    #[error("Price out of range: {0}")]
    InvalidPrice(String),
}

/// Errors that can occur while fetching from a single source.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The source answered with a non-success HTTP status.
    #[error("{source_id} returned HTTP {status}")]
    Status {
        /// The source that answered
        source_id: String,
        /// HTTP status code
        status: u16,
    },

    /// The call exceeded the per-source deadline and was cancelled.
    #[error("Timeout after {secs}s: {source_id}")]
    Timeout {
        /// The source that timed out
        source_id: String,
        /// Deadline that was exceeded
        secs: u64,
    },

    /// The source knows nothing about the symbol (or it is a placeholder).
    #[error("No data for symbol '{symbol}' on {source_id}")]
    NoData {
        /// The source that was asked
        source_id: String,
        /// The symbol that was asked for
        symbol: String,
    },

    /// The payload arrived but carried no usable price field.
    #[error("Missing price for '{symbol}'")]
    MissingPrice {
        /// The symbol whose payload lacked a price
        symbol: String,
    },

    /// The payload arrived but could not be normalized.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A source-specific error not covered by the other variants.
    #[error("Provider error: {source_id} - {message}")]
    Provider {
        /// The source that returned the error
        source_id: String,
        /// The error message from the source
        message: String,
    },

    /// The source does not implement symbol search.
    #[error("Search not supported by {source_id}")]
    SearchUnsupported {
        /// The source that was asked to search
        source_id: String,
    },

    /// Symbol resolution failed before any quote request was made.
    #[error("Resolution failed: {0}")]
    Resolution(#[from] ResolutionError),
}

/// Errors raised while resolving an instrument to a provider symbol.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The search ran but produced no candidates at all.
    #[error("No symbol candidates for '{query}'")]
    NoCandidates {
        /// The query that was searched
        query: String,
    },

    /// The search itself failed (network, unsupported, bad payload).
    #[error("Search failed: {message}")]
    SearchFailed {
        /// Stringified cause
        message: String,
    },
}

/// One failed attempt inside the fallback chain, kept for the causal trail.
#[derive(Clone, Debug)]
pub struct SourceAttempt {
    /// Adapter id of the attempted source
    pub source_id: String,

    /// The symbol that was tried, when resolution got that far
    pub symbol: Option<String>,

    /// Stringified error for the attempt
    pub error: String,
}

impl std::fmt::Display for SourceAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{}[{}]: {}", self.source_id, symbol, self.error),
            None => write!(f, "{}: {}", self.source_id, self.error),
        }
    }
}

/// Every source in an instrument's chain failed.
///
/// Carries the full attempt trail so callers can log why each source was
/// rejected before deciding whether a previous value can stand in.
#[derive(Error, Debug)]
#[error("All sources failed for '{instrument}' after {} attempt(s)", attempts.len())]
pub struct SourcesExhausted {
    /// Logical name of the instrument
    pub instrument: String,

    /// Every attempt, in configuration order
    pub attempts: Vec<SourceAttempt>,
}

impl SourcesExhausted {
    /// Render the attempt trail as a single log-friendly line.
    pub fn trail(&self) -> String {
        self.attempts
            .iter()
            .map(|attempt| attempt.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ============================================================================
// Tests
// ============================================================================
