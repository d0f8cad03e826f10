//! Error types for statement staging and column coercion.
//!
//! Provides a unified error type covering driver failures, value coercion,
//! null handling, and identifier access.

use thiserror::Error;

/// Errors that can occur while staging statements or coercing column values.
#[derive(Debug, Error)]
pub enum StageError {
    /// Failure raised by the underlying SQL driver, propagated unchanged.
    #[error("driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A stored value could not be interpreted as the requested type.
    #[error("conversion error: cannot read {value} as {target}")]
    Conversion {
        /// Storage class and rendering of the offending value.
        value: String,
        /// Name of the requested target type.
        target: &'static str,
    },

    /// A non-null accessor received a NULL database value.
    #[error("null value: {target} was required but the column is NULL")]
    NullValue {
        /// Name of the requested target type.
        target: &'static str,
    },

    /// An identifier column expected to be non-null was null or not numeric.
    #[error("missing identifier: {0}")]
    MissingIdentifier(#[source] Box<StageError>),

    /// An execution verb was invoked before any SQL text was set.
    #[error("empty statement: no SQL text has been set")]
    EmptyStatement,
}

impl StageError {
    /// Wraps a failure from the underlying driver.
    ///
    /// Accepts any error type, or a plain message for driver-level misuse
    /// that has no concrete error value (e.g. reading a column while the
    /// cursor is not positioned on a row).
    pub fn driver(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StageError::Driver(err.into())
    }
}

/// Convenience alias for results with [`StageError`].
pub type Result<T> = std::result::Result<T, StageError>;
