//! Abstract driver capabilities consumed by the statement builder.
//!
//! The builder never talks to a storage engine directly; it delegates to
//! these three traits. A driver supplies a lazily-opened [`Connection`] that
//! prepares [`Command`]s, and commands execute as row-producing queries
//! (yielding a [`Rows`] cursor), non-queries, or scalar fetches.
//!
//! Keeping the seam abstract lets the builder be exercised against a fake
//! in-memory driver with no storage engine at all; the `sqlstage-sqlite`
//! crate provides the real rusqlite-backed implementation.

use crate::error::Result;
use crate::value::SqlValue;

/// Handle to a database connection.
///
/// Handles are constructed unopened; the builder's execution verbs call
/// [`open`](Self::open) before every delegation. Closing is never the
/// core's job — the caller releases the connection by dropping it, and any
/// command or cursor borrowed from it must be gone by then (the borrow
/// checker enforces this).
pub trait Connection {
    /// Prepared command type, borrowing this connection.
    type Command<'c>: Command
    where
        Self: 'c;

    /// Opens the connection if it is not already open.
    ///
    /// Whether re-opening an open connection is a no-op or an error is the
    /// driver's choice; the bundled SQLite driver treats it as a no-op.
    fn open(&mut self) -> Result<()>;

    /// Prepares a command from SQL text and named parameter bindings.
    ///
    /// # Errors
    ///
    /// Malformed SQL and bindings whose names the SQL does not mention are
    /// rejected here, with the driver's own error propagated unchanged.
    fn create_command<'c>(
        &'c mut self,
        sql: &str,
        params: &[(String, SqlValue)],
    ) -> Result<Self::Command<'c>>;

    /// Parameterless statement yielding the most recently generated row
    /// identifier for this connection.
    fn rowid_sql(&self) -> &str;
}

/// A staged, executable statement.
pub trait Command {
    /// Lazy forward-only cursor type, borrowing this command.
    type Rows<'s>: Rows
    where
        Self: 's;

    /// Executes as a row-producing query and returns the cursor.
    fn rows<'s>(&'s mut self) -> Result<Self::Rows<'s>>;

    /// Executes as a non-query and returns the affected row count.
    fn execute(&mut self) -> Result<usize>;

    /// Executes and returns the first column of the first row, or
    /// [`SqlValue::Null`] when the statement produces no rows.
    fn scalar(&mut self) -> Result<SqlValue>;
}

/// Forward-only, non-restartable sequence of result rows.
///
/// Consuming the cursor advances driver-side state; there is no way back.
pub trait Rows {
    /// Advances to the next row. Returns `false` once the sequence is
    /// exhausted.
    fn advance(&mut self) -> Result<bool>;

    /// Column value of the current row, by zero-based index.
    fn column(&self, index: usize) -> Result<SqlValue>;

    /// Column value of the current row, by result-set column name.
    fn column_by_name(&self, name: &str) -> Result<SqlValue>;

    /// Names of the result-set columns.
    fn column_names(&self) -> &[String];
}
