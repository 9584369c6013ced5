//! Locale-aware numeric and date normalization for scraped payloads.
//!
//! Danish sources write `146,20` and `1.234,56`; Yahoo payloads write
//! `209.69`. Everything funnels through [`parse_decimal`] so a malformed
//! value is always an error and never a silent zero.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::ParseError;

/// Parse a decimal in either European or US notation.
///
/// A separator kind that occurs more than once is thousands grouping; when
/// both `,` and `.` occur, the right-most one is the decimal separator; a
/// lone separator is the decimal separator.
pub fn parse_decimal(raw: &str) -> Result<Decimal, ParseError> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let (sign, body) = match cleaned.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    if body.is_empty()
        || !body
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c == '.')
    {
        return Err(ParseError::InvalidNumber(raw.to_string()));
    }

    let commas = body.matches(',').count();
    let dots = body.matches('.').count();
    let decimal_sep = match (commas, dots) {
        (0, 0) => None,
        (1, 0) => Some(','),
        (0, 1) => Some('.'),
        // Repeated single-kind separators can only be grouping.
        (_, 0) | (0, _) => None,
        // Mixed: the right-most kind is the decimal separator.
        _ => match (body.rfind(','), body.rfind('.')) {
            (Some(comma), Some(dot)) if comma > dot => Some(','),
            _ => Some('.'),
        },
    };

    let mut normalized = String::with_capacity(body.len() + 1);
    normalized.push_str(sign);
    for c in body.chars() {
        match c {
            ',' | '.' => {
                if Some(c) == decimal_sep {
                    normalized.push('.');
                }
            }
            digit => normalized.push(digit),
        }
    }

    Decimal::from_str(&normalized).map_err(|_| ParseError::InvalidNumber(raw.to_string()))
}

/// Resolve a scraped day/month pair with no year to a full date.
///
/// Uses `today`'s year; an as-of label more than 2 days in the future can
/// only mean the turn of the year, so it rolls back one year. With today
/// 2026-01-05 a label of `31/12` resolves to 2025-12-31.
pub fn resolve_day_month(day: u32, month: u32, today: NaiveDate) -> Result<NaiveDate, ParseError> {
    let horizon = today + Duration::days(2);
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if date <= horizon => Ok(date),
        _ => NaiveDate::from_ymd_opt(today.year() - 1, month, day)
            .ok_or(ParseError::InvalidDate { day, month }),
    }
}

// ============================================================================
// Tests
// ============================================================================
