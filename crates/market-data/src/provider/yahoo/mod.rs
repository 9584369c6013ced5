//! Yahoo Finance price source.
//!
//! Primary path is the chart API via the `yahoo_finance_api` connector,
//! which returns a daily series we can merge into history. When that
//! fails the raw `v7/finance/quote` endpoint serves as a backup for a
//! single latest observation.

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{header, Client};
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::FetchError;
use crate::models::{Instrument, QuotePoint, SearchResult};
use crate::provider::PriceSource;

use models::YahooQuoteResponse;

const PROVIDER_ID: &str = "YAHOO";
const QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; Fondkurs/0.4)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Daily interval over three months keeps the merged history saturated
/// without pulling years of quotes nobody stores.
const HISTORY_INTERVAL: &str = "1d";
const HISTORY_RANGE: &str = "3mo";

// ============================================================================
// Yahoo Source
// ============================================================================

/// Yahoo Finance source adapter.
///
/// Covers exchange-listed funds and ETFs; Danish mutual funds usually
/// appear under `0P...` Morningstar-style tickers with a `.CO` suffix.
pub struct YahooSource {
    connector: yahoo::YahooConnector,
    client: Client,
}

impl YahooSource {
    /// Create a new Yahoo Finance source.
    pub fn new() -> Result<Self, FetchError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| FetchError::Provider {
            source_id: PROVIDER_ID.to_string(),
            message: format!("Failed to initialize Yahoo connector: {}", e),
        })?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Ok(Self { connector, client })
    }

    // ========================================================================
    // Quote Fetching
    // ========================================================================

    /// Convert one chart quote to a [`QuotePoint`].
    ///
    /// The chart API reports no currency, so the instrument's assumed
    /// currency applies to every point.
    fn point_from_chart(
        yahoo_quote: &yahoo::Quote,
        currency: &str,
    ) -> Result<QuotePoint, FetchError> {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| FetchError::Provider {
                source_id: PROVIDER_ID.to_string(),
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;
        Ok(QuotePoint::from_f64(timestamp, yahoo_quote.close, currency)?)
    }

    /// Fetch a daily series using the primary method (chart API).
    async fn fetch_series_primary(
        &self,
        instrument: &Instrument,
        symbol: &str,
    ) -> Result<Vec<QuotePoint>, FetchError> {
        let response = self
            .connector
            .get_quote_range(symbol, HISTORY_INTERVAL, HISTORY_RANGE)
            .await
            .map_err(|e| map_yahoo_error(symbol, e))?;

        let yahoo_quotes = response
            .quotes()
            .map_err(|e| map_yahoo_error(symbol, e))?;

        let points: Vec<QuotePoint> = yahoo_quotes
            .iter()
            .filter_map(
                |q| match Self::point_from_chart(q, &instrument.currency) {
                    Ok(point) => Some(point),
                    Err(e) => {
                        // Suspended trading days come through as zero closes.
                        warn!("Skipping unusable chart point for {}: {}", symbol, e);
                        None
                    }
                },
            )
            .collect();

        if points.is_empty() {
            return Err(FetchError::NoData {
                source_id: PROVIDER_ID.to_string(),
                symbol: symbol.to_string(),
            });
        }

        Ok(points)
    }

    /// Fetch a single latest observation using the backup method
    /// (v7 quote API).
    async fn fetch_latest_backup(
        &self,
        instrument: &Instrument,
        symbol: &str,
    ) -> Result<Vec<QuotePoint>, FetchError> {
        let url = format!("{}?symbols={}", QUOTE_URL, encode(symbol));

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                source_id: PROVIDER_ID.to_string(),
                status: status.as_u16(),
            });
        }

        let data: YahooQuoteResponse = response.json().await?;

        let row = data
            .quote_response
            .result
            .first()
            .ok_or_else(|| FetchError::NoData {
                source_id: PROVIDER_ID.to_string(),
                symbol: symbol.to_string(),
            })?;

        let price = row.best_price().ok_or_else(|| FetchError::MissingPrice {
            symbol: symbol.to_string(),
        })?;

        // Currency from the payload beats the configured assumption.
        let currency = row
            .currency
            .clone()
            .unwrap_or_else(|| instrument.currency.clone());

        let timestamp = row
            .regular_market_time
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);

        Ok(vec![QuotePoint::from_f64(timestamp, price, currency)?])
    }
}

// ============================================================================
// PriceSource Implementation
// ============================================================================

#[async_trait]
impl PriceSource for YahooSource {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch(
        &self,
        instrument: &Instrument,
        symbol: &str,
    ) -> Result<Vec<QuotePoint>, FetchError> {
        // Placeholder symbols kept in configuration while the real ticker
        // is unknown must never hit the network.
        if symbol.contains("XXXX") {
            debug!("Skipping placeholder symbol {}", symbol);
            return Err(FetchError::NoData {
                source_id: PROVIDER_ID.to_string(),
                symbol: symbol.to_string(),
            });
        }

        debug!("Fetching {} for '{}' from Yahoo", symbol, instrument.name);

        // Try primary method first
        match self.fetch_series_primary(instrument, symbol).await {
            Ok(points) => return Ok(points),
            Err(e) => {
                debug!(
                    "Primary chart fetch failed for {}: {}, trying backup",
                    symbol, e
                );
            }
        }

        // Fallback to the raw quote endpoint
        self.fetch_latest_backup(instrument, symbol).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        let encoded_query = encode(query);

        debug!("Searching Yahoo for '{}'", query);

        let result = self
            .connector
            .search_ticker(&encoded_query)
            .await
            .map_err(|e| FetchError::Provider {
                source_id: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })?;

        let search_results = result
            .quotes
            .iter()
            .map(|item| {
                SearchResult::new(
                    &item.symbol,
                    display_name(&item.long_name, &item.short_name, &item.symbol),
                    &item.exchange,
                    &item.quote_type,
                )
                .with_score(item.score)
            })
            .collect();

        Ok(search_results)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Map connector errors onto the crate's fetch errors.
fn map_yahoo_error(symbol: &str, e: yahoo::YahooError) -> FetchError {
    if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
        FetchError::NoData {
            source_id: PROVIDER_ID.to_string(),
            symbol: symbol.to_string(),
        }
    } else {
        FetchError::Provider {
            source_id: PROVIDER_ID.to_string(),
            message: e.to_string(),
        }
    }
}

/// Pick the best display name a search item offers.
fn display_name(long_name: &str, short_name: &str, symbol: &str) -> String {
    let name = if !long_name.is_empty() {
        long_name
    } else if !short_name.is_empty() {
        short_name
    } else {
        symbol
    };
    name.replace("&amp;", "&")
}

// ============================================================================
// Tests
// ============================================================================
