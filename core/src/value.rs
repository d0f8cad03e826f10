//! Dynamic value model matching SQLite's storage classes.
//!
//! SQLite tags every stored value with one of five storage classes (NULL,
//! INTEGER, REAL, TEXT, BLOB) independent of the declared column type.
//! [`SqlValue`] models that tagging as a closed sum so the coercion
//! accessors can match exhaustively, and carries the `From` conversions used
//! when binding parameters.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coerce::TIMESTAMP_FORMAT;

/// A single database value, tagged with its storage class.
///
/// Values flow in two directions: parameter bindings are converted *into*
/// `SqlValue` via the `From` impls below, and column values read from a row
/// cursor are converted *out* via the typed accessors in
/// [`coerce`](crate::coerce).
///
/// # Examples
///
/// ```
/// use sqlstage_core::SqlValue;
///
/// let v = SqlValue::from(42);
/// assert_eq!(v, SqlValue::Integer(42));
/// assert_eq!(v.storage_class(), "INTEGER");
///
/// // `None` binds SQL NULL
/// assert!(SqlValue::from(None::<i64>).is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit IEEE 754 float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the SQLite storage class name for this value.
    pub fn storage_class(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Integer(_) => "INTEGER",
            SqlValue::Real(_) => "REAL",
            SqlValue::Text(_) => "TEXT",
            SqlValue::Blob(_) => "BLOB",
        }
    }

    /// Returns `true` for [`SqlValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Short rendering used in conversion error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Integer(i) => format!("INTEGER {i}"),
            SqlValue::Real(r) => format!("REAL {r}"),
            SqlValue::Text(t) => format!("TEXT '{t}'"),
            SqlValue::Blob(b) => format!("BLOB ({} bytes)", b.len()),
        }
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Integer(i64::from(v))
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Real(f64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Integer(i64::from(v))
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Blob(v)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(v: &[u8]) -> Self {
        SqlValue::Blob(v.to_vec())
    }
}

/// Timestamps bind as text in the canonical `%Y-%m-%d %H:%M:%S` form, for
/// storage engines without a native temporal type.
impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Text(v.format(TIMESTAMP_FORMAT).to_string())
    }
}

/// Identifiers bind as hyphenated text.
impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Text(v.to_string())
    }
}

/// Decimals bind as text to preserve their full precision.
impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Text(v.to_string())
    }
}

/// `None` binds SQL NULL.
impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => SqlValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_class_names() {
        assert_eq!(SqlValue::Null.storage_class(), "NULL");
        assert_eq!(SqlValue::Integer(1).storage_class(), "INTEGER");
        assert_eq!(SqlValue::Real(1.5).storage_class(), "REAL");
        assert_eq!(SqlValue::Text("x".into()).storage_class(), "TEXT");
        assert_eq!(SqlValue::Blob(vec![0]).storage_class(), "BLOB");
    }

    #[test]
    fn test_from_scalars() {
        assert_eq!(SqlValue::from(5i32), SqlValue::Integer(5));
        assert_eq!(SqlValue::from(5i64), SqlValue::Integer(5));
        assert_eq!(SqlValue::from(2.5f64), SqlValue::Real(2.5));
        assert_eq!(SqlValue::from(true), SqlValue::Integer(1));
        assert_eq!(SqlValue::from(false), SqlValue::Integer(0));
        assert_eq!(SqlValue::from("hi"), SqlValue::Text("hi".to_string()));
        assert_eq!(SqlValue::from(vec![1u8, 2]), SqlValue::Blob(vec![1, 2]));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(SqlValue::from(Some(7)), SqlValue::Integer(7));
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::from(None::<&str>), SqlValue::Null);
    }

    #[test]
    fn test_from_timestamp_uses_canonical_form() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap();
        assert_eq!(
            SqlValue::from(ts),
            SqlValue::Text("2024-03-09 14:30:05".to_string())
        );
    }

    #[test]
    fn test_from_uuid_and_decimal_bind_as_text() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(
            SqlValue::from(id),
            SqlValue::Text("67e55044-10b1-426f-9247-bb680e5fe0c8".to_string())
        );

        let d: Decimal = "123.450".parse().unwrap();
        assert_eq!(SqlValue::from(d), SqlValue::Text("123.450".to_string()));
    }

    #[test]
    fn test_serde_round_trip() {
        let values = vec![
            SqlValue::Null,
            SqlValue::Integer(-3),
            SqlValue::Real(2.75),
            SqlValue::Text("hello".to_string()),
            SqlValue::Blob(vec![0xde, 0xad]),
        ];

        for v in values {
            let json = serde_json::to_string(&v).unwrap();
            let restored: SqlValue = serde_json::from_str(&json).unwrap();
            assert_eq!(v, restored);
        }
    }
}
