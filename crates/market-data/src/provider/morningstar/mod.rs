//! Morningstar Denmark price source.
//!
//! Danish mutual funds without a listed ticker still publish a daily NAV
//! on their Morningstar snapshot page. This adapter scrapes that page:
//! one request, one observation. The layout carries the NAV in a key
//! statistics row like
//!
//! ```text
//! <td class="line heading">NAV<span class="heading"><br/>31/12/2025</span></td>
//! <td class="line text">DKK&nbsp;146,20</td>
//! ```
//!
//! Scraped layouts change without notice; every pattern miss surfaces as
//! a [`ParseError::MarkupMismatch`] so the fallback chain can move on.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use reqwest::{header, Client};
use urlencoding::encode;

use crate::errors::{FetchError, ParseError};
use crate::models::{Instrument, QuotePoint};
use crate::numeric::{parse_decimal, resolve_day_month};
use crate::provider::PriceSource;

const PROVIDER_ID: &str = "MORNINGSTAR_DK";
const SNAPSHOT_URL: &str = "https://www.morningstar.dk/dk/funds/snapshot/snapshot.aspx";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; Fondkurs/0.4)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

lazy_static! {
    /// The NAV key-statistics row, heading through closing tag
    static ref NAV_ROW_REGEX: Regex =
        Regex::new(r"(?s)NAV\s*<.{0,400}?</tr>")
            .expect("Invalid regex pattern");

    /// Currency and value inside the NAV row, e.g. "DKK&nbsp;146,20"
    static ref NAV_VALUE_REGEX: Regex =
        Regex::new(r"([A-Z]{3})(?:&nbsp;|\s)*([0-9][0-9.,]*)")
            .expect("Invalid regex pattern");

    /// Bare value cell without a currency code, e.g. ">146,20<"
    static ref NAV_BARE_VALUE_REGEX: Regex =
        Regex::new(r">\s*([0-9][0-9.,]*)\s*<")
            .expect("Invalid regex pattern");

    /// As-of label: "31/12" or "31/12/2025"
    static ref AS_OF_REGEX: Regex =
        Regex::new(r"([0-3]?\d)/([01]?\d)(?:/((?:19|20)\d{2}))?")
            .expect("Invalid regex pattern");
}

// ============================================================================
// Morningstar Source
// ============================================================================

/// Morningstar Denmark snapshot-page source adapter.
///
/// The symbol is Morningstar's internal fund id (e.g. "F00001CNPB"),
/// taken verbatim from configuration; the page offers no search API.
pub struct MorningstarSource {
    client: Client,
}

impl MorningstarSource {
    /// Create a new Morningstar Denmark source.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// Extract the NAV observation from a snapshot page.
    ///
    /// `today` anchors year resolution for day/month-only as-of labels.
    fn parse_snapshot(
        html: &str,
        instrument: &Instrument,
        today: NaiveDate,
    ) -> Result<QuotePoint, FetchError> {
        let row = NAV_ROW_REGEX
            .find(html)
            .ok_or(ParseError::MarkupMismatch { context: "NAV row" })?
            .as_str();

        // Currency from the page when present, assumed currency otherwise.
        let (currency, raw_price) = match NAV_VALUE_REGEX.captures(row) {
            Some(value) => (value[1].to_string(), value[2].to_string()),
            None => {
                let bare = NAV_BARE_VALUE_REGEX.captures(row).ok_or(
                    ParseError::MarkupMismatch {
                        context: "NAV value",
                    },
                )?;
                (instrument.currency.clone(), bare[1].to_string())
            }
        };
        let price = parse_decimal(&raw_price)?;

        let as_of = match AS_OF_REGEX.captures(row) {
            Some(date) => {
                let day = parse_component(&date[1])?;
                let month = parse_component(&date[2])?;
                match date.get(3) {
                    Some(year) => {
                        let year = parse_component(year.as_str())? as i32;
                        NaiveDate::from_ymd_opt(year, month, day)
                            .ok_or(ParseError::InvalidDate { day, month })?
                    }
                    None => resolve_day_month(day, month, today)?,
                }
            }
            // No as-of label on the page: take it as current.
            None => today,
        };

        let timestamp = as_of.and_time(NaiveTime::MIN).and_utc();
        Ok(QuotePoint::new(timestamp, price, currency)?)
    }
}

impl Default for MorningstarSource {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PriceSource Implementation
// ============================================================================

#[async_trait]
impl PriceSource for MorningstarSource {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch(
        &self,
        instrument: &Instrument,
        symbol: &str,
    ) -> Result<Vec<QuotePoint>, FetchError> {
        let url = format!("{}?id={}", SNAPSHOT_URL, encode(symbol));

        debug!(
            "Fetching snapshot page {} for '{}' from Morningstar",
            symbol, instrument.name
        );

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

        let html = response.text().await?;
        let point = Self::parse_snapshot(&html, instrument, Utc::now().date_naive())?;
        Ok(vec![point])
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse one numeric date component captured by [`AS_OF_REGEX`].
fn parse_component(raw: &str) -> Result<u32, ParseError> {
    raw.parse::<u32>()
        .map_err(|_| ParseError::InvalidNumber(raw.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
