//! Price source trait definitions.
//!
//! This module defines the core `PriceSource` trait that all
//! source adapters must implement.

use async_trait::async_trait;

use crate::errors::FetchError;
use crate::models::{Instrument, QuotePoint, SearchResult};

/// Trait for price source adapters.
///
/// Implement this trait to add support for a new price source. The
/// fallback chain tries adapters in the order the instrument's
/// configuration lists them; the adapter itself only knows how to turn
/// one `(instrument, symbol)` pair into normalized observations.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use fondkurs_market_data::provider::PriceSource;
///
/// struct MySource {
///     client: reqwest::Client,
/// }
///
/// #[async_trait]
/// impl PriceSource for MySource {
///     fn id(&self) -> &'static str {
///         "MY_SOURCE"
///     }
///
///     // ... implement fetch
/// }
/// ```
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Unique identifier for this source.
    ///
    /// Should be a constant string like "YAHOO", "MORNINGSTAR_DK".
    /// Used for logging, provenance strings, and configuration lookup.
    fn id(&self) -> &'static str;

    /// Fetch the latest observation plus whatever recent history the
    /// source offers for `symbol`, normalized to [`QuotePoint`]s.
    ///
    /// Returns at least one point on success; ordering is not
    /// guaranteed. When the source does not report a currency the
    /// instrument's assumed currency fills in.
    async fn fetch(
        &self,
        instrument: &Instrument,
        symbol: &str,
    ) -> Result<Vec<QuotePoint>, FetchError>;

    /// Search for symbol candidates matching `query`.
    ///
    /// Sources without a search API keep the default, which reports
    /// search as unsupported; the resolver treats that as "no
    /// candidates from this source".
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        let _ = query;
        Err(FetchError::SearchUnsupported {
            source_id: self.id().to_string(),
        })
    }
}
