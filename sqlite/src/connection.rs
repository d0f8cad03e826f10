//! rusqlite implementation of the driver capability traits.
//!
//! [`SqliteConnection`] opens lazily: construction stores the connection
//! string without touching the filesystem, and the first
//! [`Connection::open`] call opens the database and applies
//! `PRAGMA foreign_keys = ON`. Commands are prepared statements with their
//! named parameters bound up front; cursors stream rows from the engine one
//! at a time.

use rusqlite::types::{Value, ValueRef};
use sqlstage_core::{Command, Connection, Result, Rows, SqlValue, StageError};
use tracing::{debug, trace};

/// Lazily-opened handle to a SQLite database.
///
/// The handle owns the underlying `rusqlite::Connection` once open; the
/// database file is released when the handle is dropped. The execution
/// verbs only ever open — closing is the caller's, via scope.
///
/// # Examples
///
/// ```no_run
/// use sqlstage_core::StatementBuilder;
/// use sqlstage_sqlite::SqliteConnection;
///
/// let mut conn = SqliteConnection::new("people.db");
/// let mut stmt = StatementBuilder::new();
/// stmt.reset("INSERT INTO people(name) VALUES(@name)");
/// stmt.bind("@name", "Ada");
///
/// let id = stmt.insert(&mut conn).unwrap();
/// println!("inserted row {id}");
/// ```
pub struct SqliteConnection {
    path: String,
    conn: Option<rusqlite::Connection>,
}

impl SqliteConnection {
    /// Creates an unopened handle for the given database path.
    ///
    /// Accepts anything `rusqlite::Connection::open` does, including
    /// `:memory:`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    /// Creates an unopened handle for a private in-memory database.
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    /// The connection string this handle was created with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The underlying connection, once opened.
    pub fn connection(&self) -> Option<&rusqlite::Connection> {
        self.conn.as_ref()
    }
}

impl Connection for SqliteConnection {
    type Command<'c>
        = SqliteCommand<'c>
    where
        Self: 'c;

    /// Opens the database if it is not already open; re-opening is a no-op.
    fn open(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        debug!(path = %self.path, "opening sqlite database");
        let conn = rusqlite::Connection::open(&self.path).map_err(StageError::driver)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(StageError::driver)?;
        self.conn = Some(conn);
        Ok(())
    }

    fn create_command<'c>(
        &'c mut self,
        sql: &str,
        params: &[(String, SqlValue)],
    ) -> Result<SqliteCommand<'c>> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| StageError::driver("connection is not open"))?;
        trace!(sql = %sql, params = params.len(), "preparing statement");

        let mut stmt = conn.prepare(sql).map_err(StageError::driver)?;
        for (name, value) in params {
            let index = stmt
                .parameter_index(name)
                .map_err(StageError::driver)?
                .ok_or_else(|| {
                    StageError::driver(rusqlite::Error::InvalidParameterName(name.clone()))
                })?;
            stmt.raw_bind_parameter(index, driver_value(value))
                .map_err(StageError::driver)?;
        }
        Ok(SqliteCommand { stmt })
    }

    fn rowid_sql(&self) -> &str {
        "SELECT last_insert_rowid()"
    }
}

/// A prepared statement with its parameters bound.
pub struct SqliteCommand<'c> {
    stmt: rusqlite::Statement<'c>,
}

impl Command for SqliteCommand<'_> {
    type Rows<'s>
        = SqliteRows<'s>
    where
        Self: 's;

    fn rows(&mut self) -> Result<SqliteRows<'_>> {
        let names: Vec<String> = self
            .stmt
            .column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        Ok(SqliteRows {
            names,
            current: None,
            rows: self.stmt.raw_query(),
        })
    }

    fn execute(&mut self) -> Result<usize> {
        self.stmt.raw_execute().map_err(StageError::driver)
    }

    fn scalar(&mut self) -> Result<SqlValue> {
        let mut rows = self.stmt.raw_query();
        match rows.next().map_err(StageError::driver)? {
            Some(row) => column_value(row, 0),
            None => Ok(SqlValue::Null),
        }
    }
}

/// Forward-only cursor over a query's result rows.
///
/// Rows stream from the engine one at a time; only the current row is
/// buffered. The cursor cannot be restarted, and it borrows the command it
/// came from, so it can never outlive the connection.
pub struct SqliteRows<'s> {
    rows: rusqlite::Rows<'s>,
    names: Vec<String>,
    current: Option<Vec<SqlValue>>,
}

impl Rows for SqliteRows<'_> {
    fn advance(&mut self) -> Result<bool> {
        match self.rows.next().map_err(StageError::driver)? {
            Some(row) => {
                let mut values = Vec::with_capacity(self.names.len());
                for index in 0..self.names.len() {
                    values.push(column_value(row, index)?);
                }
                self.current = Some(values);
                Ok(true)
            }
            None => {
                self.current = None;
                Ok(false)
            }
        }
    }

    fn column(&self, index: usize) -> Result<SqlValue> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| StageError::driver("cursor is not positioned on a row"))?;
        row.get(index)
            .cloned()
            .ok_or_else(|| StageError::driver(rusqlite::Error::InvalidColumnIndex(index)))
    }

    fn column_by_name(&self, name: &str) -> Result<SqlValue> {
        let index = self.names.iter().position(|n| n == name).ok_or_else(|| {
            StageError::driver(rusqlite::Error::InvalidColumnName(name.to_string()))
        })?;
        self.column(index)
    }

    fn column_names(&self) -> &[String] {
        &self.names
    }
}

fn column_value(row: &rusqlite::Row<'_>, index: usize) -> Result<SqlValue> {
    let value = row.get_ref(index).map_err(StageError::driver)?;
    Ok(match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Integer(i),
        ValueRef::Real(r) => SqlValue::Real(r),
        ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
    })
}

fn driver_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::Integer(*i),
        SqlValue::Real(r) => Value::Real(*r),
        SqlValue::Text(t) => Value::Text(t.clone()),
        SqlValue::Blob(b) => Value::Blob(b.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_is_idempotent() {
        let mut conn = SqliteConnection::in_memory();
        assert!(conn.connection().is_none());
        conn.open().unwrap();
        assert!(conn.connection().is_some());
        conn.open().unwrap();
    }

    #[test]
    fn test_create_command_requires_open() {
        let mut conn = SqliteConnection::in_memory();
        let err = conn.create_command("SELECT 1", &[]).map(|_| ()).unwrap_err();
        assert!(matches!(err, StageError::Driver(_)));
    }

    #[test]
    fn test_unknown_parameter_name_is_rejected() {
        let mut conn = SqliteConnection::in_memory();
        conn.open().unwrap();
        let params = vec![("@nope".to_string(), SqlValue::Integer(1))];
        let err = conn
            .create_command("SELECT 1", &params)
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, StageError::Driver(_)));
    }
}
