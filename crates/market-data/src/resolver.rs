//! Instrument-to-symbol resolution.
//!
//! Each fallback chain entry needs a provider-native symbol before it
//! can fetch anything. An explicit symbol in configuration is taken
//! verbatim; otherwise the source's own search API is queried and the
//! candidates are ranked deterministically.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;
use tokio::sync::Mutex;

use crate::errors::{FetchError, ResolutionError};
use crate::models::{Instrument, ProviderSymbol, SearchResult, SourceSpec};
use crate::provider::PriceSource;

/// How a symbol was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Explicit symbol in configuration
    Configured,

    /// Picked from the source's search results
    Search,
}

/// A resolved provider symbol plus how it was obtained.
#[derive(Clone, Debug)]
pub struct ResolvedSymbol {
    pub symbol: ProviderSymbol,
    pub source: ResolutionSource,
}

/// Resolves configured instruments to provider symbols, caching search
/// hits per `(source, instrument)` for the lifetime of the resolver.
pub struct SymbolResolver {
    cache: Mutex<HashMap<(String, String), ProviderSymbol>>,
}

impl SymbolResolver {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve one chain entry to a provider symbol.
    ///
    /// An explicit configured symbol always wins; search never
    /// second-guesses it.
    pub async fn resolve(
        &self,
        source: &dyn PriceSource,
        instrument: &Instrument,
        spec: &SourceSpec,
    ) -> Result<ResolvedSymbol, ResolutionError> {
        if let Some(symbol) = &spec.symbol {
            return Ok(ResolvedSymbol {
                symbol: Arc::from(symbol.as_str()),
                source: ResolutionSource::Configured,
            });
        }

        let cache_key = (source.id().to_string(), instrument.name.clone());
        {
            let cache = self.cache.lock().await;
            if let Some(symbol) = cache.get(&cache_key) {
                debug!(
                    "Using cached symbol {} for '{}' on {}",
                    symbol,
                    instrument.name,
                    source.id()
                );
                return Ok(ResolvedSymbol {
                    symbol: symbol.clone(),
                    source: ResolutionSource::Search,
                });
            }
        }

        let query = instrument.search_query();
        let candidates = match source.search(query).await {
            Ok(results) => results,
            // A source without search simply contributes no candidates.
            Err(FetchError::SearchUnsupported { .. }) => Vec::new(),
            Err(e) => {
                return Err(ResolutionError::SearchFailed {
                    message: e.to_string(),
                })
            }
        };

        let best = pick_best(&candidates, &instrument.name).ok_or_else(|| {
            ResolutionError::NoCandidates {
                query: query.to_string(),
            }
        })?;

        debug!(
            "Resolved '{}' to {} via {} search",
            instrument.name,
            best.symbol,
            source.id()
        );

        let symbol: ProviderSymbol = Arc::from(best.symbol.as_str());
        self.cache.lock().await.insert(cache_key, symbol.clone());
        Ok(ResolvedSymbol {
            symbol,
            source: ResolutionSource::Search,
        })
    }
}

impl Default for SymbolResolver {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Candidate Ranking
// ============================================================================

/// Pick the best candidate: fund-like types first, then name-token
/// overlap with the logical name, then the source's own score. Ties
/// break on the lexicographically smallest symbol so equal inputs
/// always produce the same choice.
fn pick_best<'a>(candidates: &'a [SearchResult], logical_name: &str) -> Option<&'a SearchResult> {
    candidates
        .iter()
        .max_by(|a, b| compare_candidates(a, b, logical_name))
}

fn compare_candidates(a: &SearchResult, b: &SearchResult, logical_name: &str) -> Ordering {
    (a.is_fund_like() as u8)
        .cmp(&(b.is_fund_like() as u8))
        .then_with(|| {
            name_overlap(&a.name, logical_name).cmp(&name_overlap(&b.name, logical_name))
        })
        .then_with(|| {
            a.score
                .unwrap_or(0.0)
                .partial_cmp(&b.score.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal)
        })
        // Reversed: the smaller symbol should win the tie.
        .then_with(|| b.symbol.cmp(&a.symbol))
}

/// Count candidate name tokens that also occur in the logical name,
/// case-insensitively.
fn name_overlap(candidate: &str, logical_name: &str) -> usize {
    let logical = logical_name.to_lowercase();
    let logical_tokens: HashSet<&str> = logical.split_whitespace().collect();
    let candidate = candidate.to_lowercase();
    candidate
        .split_whitespace()
        .filter(|token| logical_tokens.contains(token))
        .count()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    use async_trait::async_trait;

    use crate::errors::FetchError;
    use crate::models::QuotePoint;

    struct MockSearchSource {
        id: &'static str,
        results: Vec<SearchResult>,
        search_calls: AtomicUsize,
        supported: bool,
    }

    impl MockSearchSource {
        fn new(results: Vec<SearchResult>) -> Self {
            Self {
                id: "MOCK",
                results,
                search_calls: AtomicUsize::new(0),
                supported: true,
            }
        }

        fn unsupported() -> Self {
            Self {
                id: "MOCK",
                results: Vec::new(),
                search_calls: AtomicUsize::new(0),
                supported: false,
            }
        }
    }

    #[async_trait]
    impl PriceSource for MockSearchSource {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn fetch(
            &self,
            _instrument: &Instrument,
            _symbol: &str,
        ) -> Result<Vec<QuotePoint>, FetchError> {
            unimplemented!("resolution tests never fetch")
        }

        async fn search(&self, _query: &str) -> Result<Vec<SearchResult>, FetchError> {
            self.search_calls.fetch_add(1, AtomicOrdering::SeqCst);
            if !self.supported {
                return Err(FetchError::SearchUnsupported {
                    source_id: self.id.to_string(),
                });
            }
            Ok(self.results.clone())
        }
    }

    fn fund(symbol: Option<&str>) -> (Instrument, SourceSpec) {
        let spec = match symbol {
            Some(s) => SourceSpec::new("MOCK").with_symbol(s),
            None => SourceSpec::new("MOCK"),
        };
        let instrument = Instrument {
            name: "Nordea Invest Global Enhanced".to_string(),
            isin: Some("DK0060949964".to_string()),
            currency: "DKK".to_string(),
            sources: vec![spec.clone()],
        };
        (instrument, spec)
    }

    #[tokio::test]
    async fn explicit_symbol_skips_search() {
        let source = MockSearchSource::new(vec![SearchResult::new(
            "WRONG", "Wrong", "CPH", "EQUITY",
        )]);
        let resolver = SymbolResolver::new();
        let (instrument, spec) = fund(Some("0P0001P9Q1.CO"));

        let resolved = resolver.resolve(&source, &instrument, &spec).await.unwrap();
        assert_eq!(resolved.symbol.as_ref(), "0P0001P9Q1.CO");
        assert_eq!(resolved.source, ResolutionSource::Configured);
        assert_eq!(source.search_calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fund_like_candidate_beats_higher_scored_equity() {
        let source = MockSearchSource::new(vec![
            SearchResult::new("NDA-DK.CO", "Nordea Bank Abp", "CPH", "EQUITY").with_score(5000.0),
            SearchResult::new("0P0001P9Q1.CO", "Nordea Invest Global Enhanced", "CPH", "MUTUALFUND")
                .with_score(120.0),
        ]);
        let resolver = SymbolResolver::new();
        let (instrument, spec) = fund(None);

        let resolved = resolver.resolve(&source, &instrument, &spec).await.unwrap();
        assert_eq!(resolved.symbol.as_ref(), "0P0001P9Q1.CO");
        assert_eq!(resolved.source, ResolutionSource::Search);
    }

    #[tokio::test]
    async fn name_overlap_decides_between_funds() {
        let source = MockSearchSource::new(vec![
            SearchResult::new("AAA.CO", "Nordea Invest Bolig", "CPH", "MUTUALFUND").with_score(90.0),
            SearchResult::new("BBB.CO", "Nordea Invest Global Enhanced KL", "CPH", "MUTUALFUND")
                .with_score(10.0),
        ]);
        let resolver = SymbolResolver::new();
        let (instrument, spec) = fund(None);

        let resolved = resolver.resolve(&source, &instrument, &spec).await.unwrap();
        assert_eq!(resolved.symbol.as_ref(), "BBB.CO");
    }

    #[tokio::test]
    async fn full_tie_breaks_on_smallest_symbol() {
        let source = MockSearchSource::new(vec![
            SearchResult::new("ZZZ.CO", "Nordea Invest Global Enhanced", "CPH", "MUTUALFUND"),
            SearchResult::new("AAA.CO", "Nordea Invest Global Enhanced", "CPH", "MUTUALFUND"),
        ]);
        let resolver = SymbolResolver::new();
        let (instrument, spec) = fund(None);

        let resolved = resolver.resolve(&source, &instrument, &spec).await.unwrap();
        assert_eq!(resolved.symbol.as_ref(), "AAA.CO");
    }

    #[tokio::test]
    async fn no_candidates_is_an_error() {
        let source = MockSearchSource::new(Vec::new());
        let resolver = SymbolResolver::new();
        let (instrument, spec) = fund(None);

        let err = resolver.resolve(&source, &instrument, &spec).await.unwrap_err();
        assert!(matches!(err, ResolutionError::NoCandidates { query } if query == "DK0060949964"));
    }

    #[tokio::test]
    async fn unsupported_search_means_no_candidates() {
        let source = MockSearchSource::unsupported();
        let resolver = SymbolResolver::new();
        let (instrument, spec) = fund(None);

        let err = resolver.resolve(&source, &instrument, &spec).await.unwrap_err();
        assert!(matches!(err, ResolutionError::NoCandidates { .. }));
    }

    #[tokio::test]
    async fn resolution_is_cached_per_source_and_instrument() {
        let source = MockSearchSource::new(vec![SearchResult::new(
            "0P0001P9Q1.CO",
            "Nordea Invest Global Enhanced",
            "CPH",
            "MUTUALFUND",
        )]);
        let resolver = SymbolResolver::new();
        let (instrument, spec) = fund(None);

        let first = resolver.resolve(&source, &instrument, &spec).await.unwrap();
        let second = resolver.resolve(&source, &instrument, &spec).await.unwrap();
        assert_eq!(first.symbol, second.symbol);
        assert_eq!(source.search_calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn overlap_counts_case_insensitive_tokens() {
        assert_eq!(
            name_overlap("Nordea Invest GLOBAL Enhanced KL", "Nordea Invest Global Enhanced"),
            4
        );
        assert_eq!(name_overlap("Something Else", "Nordea Invest"), 0);
    }
}
