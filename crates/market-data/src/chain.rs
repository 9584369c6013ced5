//! Ordered fallback across price sources.
//!
//! An instrument's configuration lists source entries in preference
//! order. The chain tries them one by one: resolve a symbol, fetch
//! under a deadline, and stop at the first source that produces
//! observations. Every failed attempt is kept so callers can log the
//! whole causal trail before deciding what to do without live data.
//!
//! The chain never consults previously stored values; carrying a price
//! forward is a persistence decision, not a fetching one.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::time::timeout;

use crate::errors::{FetchError, SourceAttempt, SourcesExhausted};
use crate::models::{Instrument, Provenance, QuotePoint, SourceId};
use crate::provider::PriceSource;
use crate::resolver::SymbolResolver;

/// Per-source call deadline. Slow sources are cancelled, not awaited.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(18);

/// Successful chain result: the first source that produced observations.
#[derive(Clone, Debug)]
pub struct ChainQuote {
    /// Normalized observations from the winning source
    pub points: Vec<QuotePoint>,

    /// Adapter id of the winning source
    pub source_id: SourceId,

    /// Provider symbol that was fetched
    pub symbol: String,
}

impl ChainQuote {
    /// Provenance string for the snapshot (`"<ID>:<symbol>"`).
    pub fn provenance(&self) -> Provenance {
        Provenance::live(&self.source_id, &self.symbol)
    }

    /// The newest observation of the batch.
    pub fn latest(&self) -> Option<&QuotePoint> {
        self.points.iter().max_by_key(|p| p.timestamp)
    }
}

/// Ordered fallback chain over registered source adapters.
pub struct SourceChain {
    sources: HashMap<&'static str, Arc<dyn PriceSource>>,
    resolver: SymbolResolver,
    call_timeout: Duration,
}

impl SourceChain {
    /// Create a chain with the default per-call deadline.
    pub fn new(sources: Vec<Arc<dyn PriceSource>>) -> Self {
        Self::with_timeout(sources, DEFAULT_CALL_TIMEOUT)
    }

    /// Create a chain with a custom per-call deadline.
    pub fn with_timeout(sources: Vec<Arc<dyn PriceSource>>, call_timeout: Duration) -> Self {
        let sources = sources.into_iter().map(|s| (s.id(), s)).collect();
        Self {
            sources,
            resolver: SymbolResolver::new(),
            call_timeout,
        }
    }

    /// Try the instrument's sources in configuration order and return
    /// the first success.
    ///
    /// Parse failures, timeouts, resolution misses, and unknown adapter
    /// ids all advance to the next entry. Only when every entry has
    /// failed does the chain give up, returning the full attempt trail.
    pub async fn fetch_first(
        &self,
        instrument: &Instrument,
    ) -> Result<ChainQuote, SourcesExhausted> {
        let mut attempts: Vec<SourceAttempt> = Vec::new();

        for spec in &instrument.sources {
            let provider_key = spec.provider.to_ascii_uppercase();
            let Some(source) = self.sources.get(provider_key.as_str()) else {
                // A typo in configuration fails this entry, not the run.
                warn!(
                    "Unknown source '{}' configured for '{}'",
                    spec.provider, instrument.name
                );
                attempts.push(SourceAttempt {
                    source_id: spec.provider.clone(),
                    symbol: spec.symbol.clone(),
                    error: "not a registered source".to_string(),
                });
                continue;
            };

            let resolved = match self.resolver.resolve(source.as_ref(), instrument, spec).await {
                Ok(resolved) => resolved,
                Err(e) => {
                    debug!(
                        "Resolution failed on {} for '{}': {}",
                        source.id(),
                        instrument.name,
                        e
                    );
                    attempts.push(SourceAttempt {
                        source_id: source.id().to_string(),
                        symbol: None,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            debug!(
                "Fetching '{}' from {} as {}",
                instrument.name,
                source.id(),
                resolved.symbol
            );

            let result = match timeout(
                self.call_timeout,
                source.fetch(instrument, &resolved.symbol),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout {
                    source_id: source.id().to_string(),
                    secs: self.call_timeout.as_secs(),
                }),
            };

            match result {
                Ok(points) if !points.is_empty() => {
                    debug!(
                        "{} returned {} point(s) for '{}'",
                        source.id(),
                        points.len(),
                        instrument.name
                    );
                    return Ok(ChainQuote {
                        points,
                        source_id: Cow::Borrowed(source.id()),
                        symbol: resolved.symbol.to_string(),
                    });
                }
                Ok(_) => {
                    warn!(
                        "{} returned no observations for '{}'",
                        source.id(),
                        instrument.name
                    );
                    attempts.push(SourceAttempt {
                        source_id: source.id().to_string(),
                        symbol: Some(resolved.symbol.to_string()),
                        error: "no observations returned".to_string(),
                    });
                }
                Err(e) => {
                    warn!("{} failed for '{}': {}", source.id(), instrument.name, e);
                    attempts.push(SourceAttempt {
                        source_id: source.id().to_string(),
                        symbol: Some(resolved.symbol.to_string()),
                        error: e.to_string(),
                    });
                }
            }
        }

        Err(SourcesExhausted {
            instrument: instrument.name.clone(),
            attempts,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
