//! SQLite driver for the `sqlstage` statement builder.
//!
//! Implements the `sqlstage-core` capability traits over [`rusqlite`]:
//! [`SqliteConnection`] is the lazily-opened connection handle,
//! [`SqliteCommand`] a prepared statement with bound named parameters, and
//! [`SqliteRows`] the forward-only result cursor.
//!
//! # Quick start
//!
//! ```no_run
//! use sqlstage_core::{Command, Rows, StatementBuilder};
//! use sqlstage_sqlite::SqliteConnection;
//!
//! let mut conn = SqliteConnection::new("people.db");
//! let mut stmt = StatementBuilder::new();
//!
//! stmt.reset("SELECT id, name FROM people WHERE age >= @min");
//! stmt.bind("@min", 21);
//!
//! let mut cmd = stmt.query(&mut conn).unwrap();
//! let mut rows = cmd.rows().unwrap();
//! while rows.advance().unwrap() {
//!     let id = rows.column(0).unwrap().id_i64().unwrap();
//!     let name = rows.column_by_name("name").unwrap().as_text().unwrap();
//!     println!("{id}: {name}");
//! }
//! ```
//!
//! Inserts return the generated row identifier by running
//! `SELECT last_insert_rowid()` on the same connection after the insert;
//! see [`StatementBuilder::insert`](sqlstage_core::StatementBuilder::insert)
//! for the connection-scoping caveat that strategy carries.

mod connection;

pub use connection::{SqliteCommand, SqliteConnection, SqliteRows};
