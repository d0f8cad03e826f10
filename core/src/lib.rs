//! Statement staging and typed column coercion over an abstract SQL driver.
//!
//! This crate is the engine-independent half of `sqlstage`: a mutable
//! statement builder that accumulates SQL text and named parameter
//! bindings, typed accessors that coerce raw column values into native
//! scalars, and the capability traits a driver must implement. The
//! `sqlstage-sqlite` crate supplies the rusqlite-backed driver.
//!
//! # Architecture
//!
//! The crate is organized into four modules:
//!
//! - **`builder`** — [`StatementBuilder`], the SQL-text and parameter
//!   staging object with its `query`/`insert`/`execute` delegation verbs
//! - **`value`** — [`SqlValue`], a closed sum over SQLite's five storage
//!   classes, plus the `From` conversions used when binding
//! - **`coerce`** — typed column accessors (`as_*`/`require_*`) and the
//!   timestamp formatting helpers
//! - **`driver`** — the [`Connection`]/[`Command`]/[`Rows`] capability seam
//!
//! # Quick start — staging and coercion
//!
//! ```
//! use sqlstage_core::{SqlValue, StatementBuilder};
//!
//! let mut stmt = StatementBuilder::new();
//! stmt.reset("INSERT INTO people(name, age) VALUES(@name, @age)");
//! stmt.bind("@name", "Ada");
//! stmt.bind("@age", Some(36));
//!
//! assert_eq!(stmt.parameters().len(), 2);
//!
//! // Column values read back through the typed accessors:
//! let stored = SqlValue::Text("3.14".to_string());
//! assert_eq!(stored.as_f64().unwrap(), Some(3.14));
//! assert_eq!(SqlValue::Null.as_text().unwrap(), "");
//! ```
//!
//! # Error model
//!
//! Every fallible operation returns [`StageError`] synchronously; nothing
//! is caught or retried internally. Driver failures are propagated
//! unchanged inside [`StageError::Driver`]. Transactional semantics, when
//! needed, belong to the caller and the driver.

mod builder;
mod coerce;
mod driver;
mod error;
mod value;

pub use builder::StatementBuilder;
pub use coerce::{TIMESTAMP_FORMAT, format_timestamp, format_timestamp_as};
pub use driver::{Command, Connection, Rows};
pub use error::{Result, StageError};
pub use value::SqlValue;
