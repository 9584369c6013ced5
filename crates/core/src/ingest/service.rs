//! Orchestration of one ingestion run.
//!
//! The service fans the configured instruments out over the fallback
//! chain with bounded concurrency, settles each result against the
//! previous snapshot (live value or carried-forward value), and writes
//! the new snapshot in one atomic step at the end.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use log::{error, info, warn};

use fondkurs_market_data::{Instrument, Provenance, SourceChain};

use crate::errors::{Error, Result};
use crate::history::{merge_history, MAX_HISTORY};
use crate::snapshot::{Snapshot, SnapshotItem, SnapshotStore};

/// Instruments fetched concurrently. The sources in play tolerate a
/// handful of parallel callers; more invites throttling.
pub const DEFAULT_MAX_PARALLEL: usize = 3;

/// How one instrument settled in a run.
#[derive(Clone, Debug)]
pub struct InstrumentOutcome {
    /// Logical instrument name
    pub name: String,

    /// Live source, or `Previous` when the value was carried forward
    pub provenance: Provenance,
}

/// Summary of a completed run.
#[derive(Clone, Debug)]
pub struct IngestReport {
    /// Instruments processed
    pub total: usize,

    /// Instruments with a live value this run
    pub live: usize,

    /// Instruments carried forward from the previous snapshot
    pub carried: usize,

    /// `updatedAt` of the produced snapshot
    pub updated_at: DateTime<Utc>,

    /// Per-instrument outcomes, in configuration order
    pub outcomes: Vec<InstrumentOutcome>,
}

/// Runs the fetch-merge-write cycle over the configured instruments.
pub struct IngestService {
    chain: Arc<SourceChain>,
    store: SnapshotStore,
    max_parallel: usize,
}

impl IngestService {
    pub fn new(chain: Arc<SourceChain>, store: SnapshotStore) -> Self {
        Self {
            chain,
            store,
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }

    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Run the full cycle and write the snapshot.
    pub async fn run(&self, instruments: &[Instrument]) -> Result<IngestReport> {
        self.execute(instruments, true).await
    }

    /// Run the full cycle but skip the write.
    pub async fn dry_run(&self, instruments: &[Instrument]) -> Result<IngestReport> {
        self.execute(instruments, false).await
    }

    async fn execute(&self, instruments: &[Instrument], write: bool) -> Result<IngestReport> {
        let previous = self.store.load().unwrap_or_default();

        info!(
            "Ingesting {} instrument(s), {} in parallel",
            instruments.len(),
            self.max_parallel
        );

        // Bounded fan-out. `buffered` keeps configuration order in the
        // output regardless of which fetch finishes first.
        let results: Vec<_> = futures::stream::iter(instruments.iter().cloned())
            .map(|instrument| {
                let chain = Arc::clone(&self.chain);
                async move {
                    let outcome = chain.fetch_first(&instrument).await;
                    (instrument, outcome)
                }
            })
            .buffered(self.max_parallel)
            .collect()
            .await;

        let mut items: Vec<SnapshotItem> = Vec::with_capacity(results.len());
        let mut outcomes: Vec<InstrumentOutcome> = Vec::with_capacity(results.len());
        let mut live_times: Vec<DateTime<Utc>> = Vec::new();
        let mut carried = 0usize;

        for (instrument, outcome) in results {
            match outcome {
                Ok(quote) => {
                    let Some(latest) = quote.latest().cloned() else {
                        // The chain only returns non-empty batches, but a
                        // carried value beats a crash if that ever changes.
                        let item = Self::carry_previous(
                            &instrument,
                            Self::previous_item(&previous, &instrument),
                            "source returned no observations",
                        )?;
                        outcomes.push(InstrumentOutcome {
                            name: instrument.name.clone(),
                            provenance: Provenance::Previous,
                        });
                        carried += 1;
                        items.push(item);
                        continue;
                    };

                    let prior_history = Self::previous_item(&previous, &instrument)
                        .map(|item| item.history.as_slice())
                        .unwrap_or(&[]);
                    let history = merge_history(prior_history, &quote.points, MAX_HISTORY);
                    let provenance = quote.provenance();

                    info!(
                        "{}: {} {} from {}",
                        instrument.name, latest.price, latest.currency, provenance
                    );

                    live_times.push(latest.timestamp);
                    outcomes.push(InstrumentOutcome {
                        name: instrument.name.clone(),
                        provenance: provenance.clone(),
                    });
                    items.push(SnapshotItem {
                        name: instrument.name.clone(),
                        isin: instrument.isin.clone(),
                        currency: latest.currency.clone(),
                        price: latest.price,
                        history,
                        source: Some(provenance),
                    });
                }
                Err(exhausted) => {
                    warn!(
                        "All sources failed for '{}': {}",
                        instrument.name,
                        exhausted.trail()
                    );
                    let item = Self::carry_previous(
                        &instrument,
                        Self::previous_item(&previous, &instrument),
                        &exhausted.trail(),
                    )?;
                    outcomes.push(InstrumentOutcome {
                        name: instrument.name.clone(),
                        provenance: Provenance::Previous,
                    });
                    carried += 1;
                    items.push(item);
                }
            }
        }

        // Live quote times and the prior snapshot's timestamp together
        // keep updatedAt monotonic: an all-carried run reproduces the
        // prior value exactly instead of pretending data is fresh.
        let updated_at = live_times
            .iter()
            .copied()
            .chain(previous.updated_at)
            .max()
            .unwrap_or_else(Utc::now);

        let total = items.len();
        let snapshot = Snapshot {
            updated_at: Some(updated_at),
            items,
        };

        if write {
            self.store.save(&snapshot)?;
            info!("Snapshot written to {}", self.store.path().display());
        } else {
            info!("Dry run, snapshot not written");
        }

        Ok(IngestReport {
            total,
            live: total - carried,
            carried,
            updated_at,
            outcomes,
        })
    }

    /// Find the previous snapshot item for an instrument: by ISIN when
    /// both sides have one, else by name.
    fn previous_item<'a>(
        previous: &'a Snapshot,
        instrument: &Instrument,
    ) -> Option<&'a SnapshotItem> {
        if let Some(isin) = instrument.isin.as_deref() {
            if let Some(item) = previous
                .items
                .iter()
                .find(|item| item.isin.as_deref() == Some(isin))
            {
                return Some(item);
            }
        }
        previous.items.iter().find(|item| item.name == instrument.name)
    }

    /// Build a carried-forward item from the previous snapshot, or fail
    /// the run when there is nothing to carry.
    fn carry_previous(
        instrument: &Instrument,
        previous: Option<&SnapshotItem>,
        detail: &str,
    ) -> Result<SnapshotItem> {
        match previous {
            Some(prior) => {
                info!(
                    "Carrying previous value for '{}' ({} {})",
                    instrument.name, prior.price, prior.currency
                );
                Ok(SnapshotItem {
                    name: instrument.name.clone(),
                    isin: instrument.isin.clone().or_else(|| prior.isin.clone()),
                    currency: prior.currency.clone(),
                    price: prior.price,
                    history: prior.history.clone(),
                    source: Some(Provenance::Previous),
                })
            }
            None => {
                error!(
                    "No live value and no previous value for '{}'",
                    instrument.name
                );
                Err(Error::NoValueAvailable {
                    instrument: instrument.name.clone(),
                    detail: detail.to_string(),
                })
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::history::HistoryPoint;
    use fondkurs_market_data::SourceSpec;

    fn instrument(name: &str, isin: Option<&str>) -> Instrument {
        Instrument {
            name: name.to_string(),
            isin: isin.map(str::to_string),
            currency: "DKK".to_string(),
            sources: vec![SourceSpec::new("YAHOO")],
        }
    }

    fn item(name: &str, isin: Option<&str>, price: rust_decimal::Decimal) -> SnapshotItem {
        SnapshotItem {
            name: name.to_string(),
            isin: isin.map(str::to_string),
            currency: "DKK".to_string(),
            price,
            history: vec![HistoryPoint {
                date: NaiveDate::from_ymd_opt(2025, 12, 30).unwrap(),
                price,
            }],
            source: None,
        }
    }

    #[test]
    fn previous_item_matches_isin_before_name() {
        let previous = Snapshot {
            updated_at: None,
            items: vec![
                item("Renamed Fund", Some("DK0060949964"), dec!(80.00)),
                item("Nordea Invest Global Enhanced", None, dec!(99.99)),
            ],
        };
        let inst = instrument("Nordea Invest Global Enhanced", Some("DK0060949964"));

        let found = IngestService::previous_item(&previous, &inst).unwrap();
        assert_eq!(found.price, dec!(80.00));
    }

    #[test]
    fn previous_item_falls_back_to_name() {
        let previous = Snapshot {
            updated_at: None,
            items: vec![item("Sparindex INDEX OMX C25", None, dec!(209.69))],
        };
        let inst = instrument("Sparindex INDEX OMX C25", Some("DK0060747517"));

        let found = IngestService::previous_item(&previous, &inst).unwrap();
        assert_eq!(found.price, dec!(209.69));
    }

    #[test]
    fn previous_item_returns_none_for_new_instrument() {
        let previous = Snapshot::default();
        let inst = instrument("Brand New Fund", None);
        assert!(IngestService::previous_item(&previous, &inst).is_none());
    }

    #[test]
    fn carry_previous_reproduces_price_and_currency() {
        let prior = item("Fund", Some("DK0060949964"), dec!(80.00));
        let inst = instrument("Fund", None);

        let carried = IngestService::carry_previous(&inst, Some(&prior), "trail").unwrap();
        assert_eq!(carried.price, dec!(80.00));
        assert_eq!(carried.currency, "DKK");
        assert_eq!(carried.source, Some(Provenance::Previous));
        assert_eq!(carried.isin.as_deref(), Some("DK0060949964"));
        assert_eq!(carried.history, prior.history);
    }

    #[test]
    fn carry_previous_without_prior_is_fatal() {
        let inst = instrument("Fund", None);
        let err = IngestService::carry_previous(&inst, None, "YAHOO[A1]: No data").unwrap_err();
        assert!(matches!(err, Error::NoValueAvailable { .. }));
        assert!(err.to_string().contains("YAHOO[A1]: No data"));
    }
}
