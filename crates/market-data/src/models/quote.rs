use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// One normalized price observation from a source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuotePoint {
    /// When the source reports the observation was made
    pub timestamp: DateTime<Utc>,

    /// Observed price, always finite and strictly positive
    pub price: Decimal,

    /// Quote currency
    pub currency: String,
}

impl QuotePoint {
    /// Create a point, rejecting non-positive prices.
    ///
    /// Sources report `0.0` for suspended or delisted symbols; that is
    /// never a usable price.
    pub fn new(
        timestamp: DateTime<Utc>,
        price: Decimal,
        currency: impl Into<String>,
    ) -> Result<Self, ParseError> {
        if price <= Decimal::ZERO {
            return Err(ParseError::InvalidPrice(price.to_string()));
        }
        Ok(Self {
            timestamp,
            price,
            currency: currency.into(),
        })
    }

    /// Create a point from a raw `f64` price as reported by JSON APIs.
    pub fn from_f64(
        timestamp: DateTime<Utc>,
        price: f64,
        currency: impl Into<String>,
    ) -> Result<Self, ParseError> {
        let price = Decimal::from_f64_retain(price)
            .ok_or_else(|| ParseError::InvalidNumber(price.to_string()))?;
        Self::new(timestamp, price, currency)
    }

    /// Calendar date key of this observation (UTC).
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 16, 30, 0).unwrap()
    }

    #[test]
    fn accepts_positive_price() {
        let point = QuotePoint::new(ts(2026, 1, 5), dec!(146.20), "DKK").unwrap();
        assert_eq!(point.price, dec!(146.20));
        assert_eq!(point.day(), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[test]
    fn rejects_zero_price() {
        let err = QuotePoint::new(ts(2026, 1, 5), Decimal::ZERO, "DKK").unwrap_err();
        assert!(matches!(err, ParseError::InvalidPrice(_)));
    }

    #[test]
    fn rejects_negative_price() {
        assert!(QuotePoint::new(ts(2026, 1, 5), dec!(-1), "DKK").is_err());
    }

    #[test]
    fn rejects_nan_from_f64() {
        let err = QuotePoint::from_f64(ts(2026, 1, 5), f64::NAN, "DKK").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber(_)));
    }
}
