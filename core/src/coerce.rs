//! Typed column accessors and timestamp formatting.
//!
//! Converts raw [`SqlValue`]s read from a row cursor into native scalar
//! types. Every accessor is a pure function of its input; nothing here holds
//! state.
//!
//! # Null policy
//!
//! Numeric targets come in two variants: `as_*` returns `Ok(None)` for NULL,
//! `require_*` fails with [`StageError::NullValue`] instead. Four targets
//! deliberately break that symmetry and must stay that way:
//!
//! - **text**: NULL reads as the empty string, never as absent;
//! - **bool**: there is no nullable variant — NULL always fails;
//! - **timestamp**: the nullable accessor is total and maps *unparseable*
//!   input to `None` rather than failing;
//! - **identifier**: [`SqlValue::as_uuid`] is total and maps null or
//!   unparseable input to the all-zero identifier.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use uuid::Uuid;

use crate::error::{Result, StageError};
use crate::value::SqlValue;

/// Canonical text form for timestamps, `yyyy-MM-dd HH:mm:ss`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text layouts accepted when parsing a stored timestamp.
const TIMESTAMP_PARSE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl SqlValue {
    /// Reads the value as `i32`, or `None` for NULL.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::Conversion`] when the stored value is not
    /// exactly representable: non-integer text, a real with a fractional
    /// part, an out-of-range integer, or a blob.
    pub fn as_i32(&self) -> Result<Option<i32>> {
        match self.integer_value("i32")? {
            None => Ok(None),
            Some(i) => i32::try_from(i)
                .map(Some)
                .map_err(|_| self.conversion("i32")),
        }
    }

    /// Reads the value as `i32`, failing on NULL.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::NullValue`] for NULL, or
    /// [`StageError::Conversion`] as for [`as_i32`](Self::as_i32).
    pub fn require_i32(&self) -> Result<i32> {
        self.as_i32()?
            .ok_or(StageError::NullValue { target: "i32" })
    }

    /// Reads the value as `i64`, or `None` for NULL.
    pub fn as_i64(&self) -> Result<Option<i64>> {
        self.integer_value("i64")
    }

    /// Reads the value as `i64`, failing on NULL.
    pub fn require_i64(&self) -> Result<i64> {
        self.as_i64()?
            .ok_or(StageError::NullValue { target: "i64" })
    }

    /// Reads the value as `f32`, or `None` for NULL.
    pub fn as_f32(&self) -> Result<Option<f32>> {
        Ok(self.real_value("f32")?.map(|r| r as f32))
    }

    /// Reads the value as `f32`, failing on NULL.
    pub fn require_f32(&self) -> Result<f32> {
        self.as_f32()?
            .ok_or(StageError::NullValue { target: "f32" })
    }

    /// Reads the value as `f64`, or `None` for NULL.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlstage_core::SqlValue;
    ///
    /// let stored = SqlValue::Text("3.14".to_string());
    /// assert_eq!(stored.as_f64().unwrap(), Some(3.14));
    /// assert_eq!(SqlValue::Null.as_f64().unwrap(), None);
    /// ```
    pub fn as_f64(&self) -> Result<Option<f64>> {
        self.real_value("f64")
    }

    /// Reads the value as `f64`, failing on NULL.
    pub fn require_f64(&self) -> Result<f64> {
        self.as_f64()?
            .ok_or(StageError::NullValue { target: "f64" })
    }

    /// Reads the value as an exact [`Decimal`], or `None` for NULL.
    ///
    /// Text is parsed at full precision; reals convert through their
    /// closest decimal representation.
    pub fn as_decimal(&self) -> Result<Option<Decimal>> {
        match self {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(i) => Ok(Some(Decimal::from(*i))),
            SqlValue::Real(r) => Ok(Some(
                Decimal::from_f64(*r).ok_or_else(|| self.conversion("decimal"))?,
            )),
            SqlValue::Text(t) => t
                .trim()
                .parse::<Decimal>()
                .map(Some)
                .map_err(|_| self.conversion("decimal")),
            SqlValue::Blob(_) => Err(self.conversion("decimal")),
        }
    }

    /// Reads the value as an exact [`Decimal`], failing on NULL.
    pub fn require_decimal(&self) -> Result<Decimal> {
        self.as_decimal()?
            .ok_or(StageError::NullValue { target: "decimal" })
    }

    /// Reads the value as text. NULL reads as `""`, never as absent.
    ///
    /// Integers and reals stringify; blobs must be valid UTF-8.
    pub fn as_text(&self) -> Result<String> {
        match self {
            SqlValue::Null => Ok(String::new()),
            SqlValue::Integer(i) => Ok(i.to_string()),
            SqlValue::Real(r) => Ok(r.to_string()),
            SqlValue::Text(t) => Ok(t.clone()),
            SqlValue::Blob(b) => {
                String::from_utf8(b.clone()).map_err(|_| self.conversion("text"))
            }
        }
    }

    /// Reads the value as `bool`. There is no nullable variant: NULL always
    /// fails with [`StageError::NullValue`].
    ///
    /// Nonzero integers and reals read as `true`; text accepts
    /// `true`/`false`/`1`/`0` case-insensitively.
    pub fn require_bool(&self) -> Result<bool> {
        match self {
            SqlValue::Null => Err(StageError::NullValue { target: "bool" }),
            SqlValue::Integer(i) => Ok(*i != 0),
            SqlValue::Real(r) => Ok(*r != 0.0),
            SqlValue::Text(t) => match t.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(self.conversion("bool")),
            },
            SqlValue::Blob(_) => Err(self.conversion("bool")),
        }
    }

    /// Reads the value as a timestamp, or `None` when it is NULL *or cannot
    /// be parsed*. This accessor never fails.
    ///
    /// Accepted representations: text in `%Y-%m-%d %H:%M:%S` form (optional
    /// fractional seconds, optional `T` separator, or date-only), integers
    /// as Unix seconds, and reals as Unix seconds with a fraction.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::Null | SqlValue::Blob(_) => None,
            SqlValue::Integer(i) => DateTime::from_timestamp(*i, 0).map(|dt| dt.naive_utc()),
            SqlValue::Real(r) => {
                let secs = r.floor();
                let nanos = ((r - secs) * 1e9).round().min(999_999_999.0) as u32;
                DateTime::from_timestamp(secs as i64, nanos).map(|dt| dt.naive_utc())
            }
            SqlValue::Text(t) => parse_timestamp_text(t),
        }
    }

    /// Reads the value as a timestamp, failing when the nullable path yields
    /// absent — i.e. for NULL and for unparseable input alike.
    pub fn require_timestamp(&self) -> Result<NaiveDateTime> {
        self.as_timestamp()
            .ok_or(StageError::NullValue { target: "timestamp" })
    }

    /// Reads the value as a 128-bit identifier. Total: NULL or unparseable
    /// input yields the all-zero identifier, never a failure.
    ///
    /// Accepts hyphenated or simple text and 16-byte blobs.
    pub fn as_uuid(&self) -> Uuid {
        match self {
            SqlValue::Text(t) => Uuid::parse_str(t.trim()).unwrap_or(Uuid::nil()),
            SqlValue::Blob(b) => Uuid::from_slice(b).unwrap_or(Uuid::nil()),
            _ => Uuid::nil(),
        }
    }

    /// Reads an identifier column as `i32`.
    ///
    /// Identifier columns are a non-nullable invariant of the schemas this
    /// crate queries; any failure of the underlying numeric accessor is
    /// re-signaled as [`StageError::MissingIdentifier`].
    pub fn id_i32(&self) -> Result<i32> {
        self.require_i32()
            .map_err(|e| StageError::MissingIdentifier(Box::new(e)))
    }

    /// Reads an identifier column as `i64`. See [`id_i32`](Self::id_i32).
    pub fn id_i64(&self) -> Result<i64> {
        self.require_i64()
            .map_err(|e| StageError::MissingIdentifier(Box::new(e)))
    }

    fn integer_value(&self, target: &'static str) -> Result<Option<i64>> {
        match self {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(i) => Ok(Some(*i)),
            SqlValue::Real(r)
                if r.fract() == 0.0 && *r >= i64::MIN as f64 && *r <= i64::MAX as f64 =>
            {
                Ok(Some(*r as i64))
            }
            SqlValue::Text(t) => t
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| self.conversion(target)),
            _ => Err(self.conversion(target)),
        }
    }

    fn real_value(&self, target: &'static str) -> Result<Option<f64>> {
        match self {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(i) => Ok(Some(*i as f64)),
            SqlValue::Real(r) => Ok(Some(*r)),
            SqlValue::Text(t) => t
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.conversion(target)),
            SqlValue::Blob(_) => Err(self.conversion(target)),
        }
    }

    fn conversion(&self, target: &'static str) -> StageError {
        StageError::Conversion {
            value: self.describe(),
            target,
        }
    }
}

fn parse_timestamp_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for format in TIMESTAMP_PARSE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Formats a timestamp in the canonical [`TIMESTAMP_FORMAT`] text form.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sqlstage_core::format_timestamp;
///
/// let ts = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(14, 30, 5).unwrap();
/// assert_eq!(format_timestamp(&ts), "2024-03-09 14:30:05");
/// ```
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    format_timestamp_as(ts, TIMESTAMP_FORMAT)
}

/// Formats a timestamp with a caller-supplied `strftime` format string.
pub fn format_timestamp_as(ts: &NaiveDateTime, format: &str) -> String {
    ts.format(format).to_string()
}
