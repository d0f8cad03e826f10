//! Statement staging: one SQL text buffer plus ordered named bindings.
//!
//! [`StatementBuilder`] is a caller-owned, in-memory staging object. It
//! accumulates SQL text and parameter bindings across calls, then hands the
//! whole statement to a driver [`Connection`] through one of three
//! execution verbs ([`query`](StatementBuilder::query),
//! [`insert`](StatementBuilder::insert),
//! [`execute`](StatementBuilder::execute)).
//!
//! # Example
//!
//! The driver is abstract here, so the example stays generic; see
//! `sqlstage-sqlite` for the concrete SQLite connection.
//!
//! ```
//! use sqlstage_core::{Command, Connection, Result, Rows, StatementBuilder};
//!
//! fn adults<C: Connection>(conn: &mut C) -> Result<Vec<(i64, String)>> {
//!     let mut stmt = StatementBuilder::new();
//!     stmt.reset("SELECT id, name FROM people");
//!     stmt.append("WHERE age >= @min");
//!     stmt.bind("@min", 21);
//!
//!     let mut cmd = stmt.query(conn)?;
//!     let mut rows = cmd.rows()?;
//!     let mut out = Vec::new();
//!     while rows.advance()? {
//!         let id = rows.column(0)?.id_i64()?;
//!         let name = rows.column_by_name("name")?.as_text()?;
//!         out.push((id, name));
//!     }
//!     Ok(out)
//! }
//! ```

use tracing::debug;

use crate::driver::{Command, Connection};
use crate::error::{Result, StageError};
use crate::value::SqlValue;

/// Accumulates SQL text and named parameter bindings, then delegates
/// execution to a driver connection.
///
/// The builder has two logical states: *empty* (no SQL set — every
/// execution verb fails with [`StageError::EmptyStatement`]) and *loaded*.
/// [`reset`](Self::reset) and [`clear`](Self::clear) move between them;
/// there is no terminal state, so one builder can serve any number of
/// statements over its owner's lifetime.
///
/// Reuse precondition: call [`reset`](Self::reset) before each new logical
/// statement. Reusing the builder without it appends to stale SQL.
///
/// Not safe for concurrent mutation from multiple threads — every mutator
/// takes `&mut self` and there is no internal synchronization.
///
/// # Examples
///
/// ```
/// use sqlstage_core::{SqlValue, StatementBuilder};
///
/// let mut stmt = StatementBuilder::new();
/// stmt.reset("UPDATE people SET name = @name WHERE id = @id");
/// stmt.bind("@name", "Ada");
/// stmt.bind("@id", 7);
///
/// assert_eq!(stmt.parameters().len(), 2);
/// assert_eq!(stmt.parameters()[0].1, SqlValue::Text("Ada".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    sql: String,
    params: Vec<(String, SqlValue)>,
}

impl StatementBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the SQL text and clears all parameter bindings.
    pub fn reset(&mut self, sql: impl Into<String>) {
        self.sql = sql.into();
        self.params.clear();
    }

    /// Appends a fragment, padded with one leading and one trailing space
    /// so caller tokens stay separated regardless of the fragment's own
    /// whitespace. Parameters are untouched.
    pub fn append(&mut self, fragment: &str) {
        self.sql.push(' ');
        self.sql.push_str(fragment);
        self.sql.push(' ');
    }

    /// Adds a named parameter binding.
    ///
    /// Bindings keep insertion order and duplicate names are not
    /// deduplicated. The name is not checked against the SQL text; a
    /// mismatch surfaces as a driver error at execution time. Bind
    /// `None::<i64>` (or any `Option::None`) for SQL NULL.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        self.params.push((name.into(), value.into()));
    }

    /// Empties the SQL text and parameter list. Idempotent.
    pub fn clear(&mut self) {
        self.sql.clear();
        self.params.clear();
    }

    /// The current SQL text.
    pub fn sql_text(&self) -> &str {
        &self.sql
    }

    /// The staged bindings, in insertion order.
    pub fn parameters(&self) -> &[(String, SqlValue)] {
        &self.params
    }

    /// Opens the connection and stages the statement as a row-producing
    /// query.
    ///
    /// Returns the prepared command; call [`Command::rows`] on it to obtain
    /// the lazy forward-only cursor. The cursor borrows the command, which
    /// borrows the connection, so the cursor can never outlive either.
    ///
    /// # Errors
    ///
    /// Fails with [`StageError::EmptyStatement`] when no SQL text is set,
    /// or with the driver's own error for malformed SQL or rejected
    /// bindings. A failure leaves the builder untouched.
    pub fn query<'c, C: Connection>(&self, conn: &'c mut C) -> Result<C::Command<'c>> {
        self.ensure_loaded()?;
        debug!(sql = %self.sql, params = self.params.len(), "staging query");
        conn.open()?;
        conn.create_command(&self.sql, &self.params)
    }

    /// Opens the connection, executes the statement as a non-query, then
    /// fetches and returns the row identifier generated by the insert.
    ///
    /// The bound parameters are cleared after the insert executes; the SQL
    /// text is kept, so the same statement can be re-bound and re-run.
    ///
    /// The identifier is fetched by running the driver's parameterless
    /// follow-up statement (for SQLite, `SELECT last_insert_rowid()`) on the
    /// same connection. That mechanism is connection-scoped and
    /// session-global: if anything else inserts on this connection between
    /// the two statements — a trigger, or another user of the same handle —
    /// the returned value belongs to *that* insert. This is a documented
    /// limitation of the retrieval strategy, not a bug in the builder.
    ///
    /// # Errors
    ///
    /// Fails with [`StageError::EmptyStatement`] when no SQL text is set;
    /// driver errors propagate unchanged. On failure before the insert
    /// executes, the bindings are left in place.
    pub fn insert<C: Connection>(&mut self, conn: &mut C) -> Result<i64> {
        self.ensure_loaded()?;
        debug!(sql = %self.sql, params = self.params.len(), "executing insert");
        conn.open()?;
        conn.create_command(&self.sql, &self.params)?.execute()?;
        self.params.clear();

        let rowid_sql = conn.rowid_sql().to_owned();
        conn.create_command(&rowid_sql, &[])?.scalar()?.require_i64()
    }

    /// Opens the connection and executes the statement as a non-query,
    /// returning the affected row count. For UPDATE/DELETE/DDL and any
    /// statement whose result set is not needed.
    ///
    /// # Errors
    ///
    /// Fails with [`StageError::EmptyStatement`] when no SQL text is set,
    /// or with the driver's own error. A failure leaves the builder
    /// untouched.
    pub fn execute<C: Connection>(&self, conn: &mut C) -> Result<usize> {
        self.ensure_loaded()?;
        debug!(sql = %self.sql, params = self.params.len(), "executing statement");
        conn.open()?;
        conn.create_command(&self.sql, &self.params)?.execute()
    }

    fn ensure_loaded(&self) -> Result<()> {
        if self.sql.is_empty() {
            return Err(StageError::EmptyStatement);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_replaces_sql_and_clears_params() {
        let mut stmt = StatementBuilder::new();
        stmt.reset("SELECT 1");
        stmt.bind("@a", 1);

        stmt.reset("SELECT 2");
        assert_eq!(stmt.sql_text(), "SELECT 2");
        assert!(stmt.parameters().is_empty());
    }

    #[test]
    fn test_append_pads_each_fragment() {
        let mut stmt = StatementBuilder::new();
        stmt.reset("SELECT name FROM people");
        stmt.append("WHERE age >= @min");
        stmt.append("ORDER BY name");

        assert_eq!(
            stmt.sql_text(),
            "SELECT name FROM people WHERE age >= @min  ORDER BY name "
        );
    }

    #[test]
    fn test_append_keeps_params() {
        let mut stmt = StatementBuilder::new();
        stmt.reset("SELECT * FROM t WHERE a = @a");
        stmt.bind("@a", 1);
        stmt.append("AND b = @b");
        assert_eq!(stmt.parameters().len(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut stmt = StatementBuilder::new();
        stmt.reset("SELECT 1");
        stmt.bind("@a", 1);

        stmt.clear();
        assert_eq!(stmt.sql_text(), "");
        assert!(stmt.parameters().is_empty());

        stmt.clear();
        assert_eq!(stmt.sql_text(), "");
        assert!(stmt.parameters().is_empty());
    }

    #[test]
    fn test_duplicate_bindings_kept_in_order() {
        let mut stmt = StatementBuilder::new();
        stmt.reset("SELECT * FROM t WHERE x = @x");
        stmt.bind("@x", 1);
        stmt.bind("@x", 2);

        let params = stmt.parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], ("@x".to_string(), SqlValue::Integer(1)));
        assert_eq!(params[1], ("@x".to_string(), SqlValue::Integer(2)));
    }

    #[test]
    fn test_bind_none_stages_null() {
        let mut stmt = StatementBuilder::new();
        stmt.reset("INSERT INTO t(a) VALUES(@a)");
        stmt.bind("@a", None::<&str>);
        assert_eq!(stmt.parameters()[0].1, SqlValue::Null);
    }
}
