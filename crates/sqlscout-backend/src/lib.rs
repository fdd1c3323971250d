//! Tool Backend: named SQL operations over a single owned connection.
//!
//! Every public operation returns a `String` and never an error: internal
//! failures are collapsed into a descriptive error string, matching the
//! wire contract where tool results are always one text item. The only
//! fallible entry point is [`SqlToolbox::open`], which verifies the
//! connection eagerly so the server can fail fast on startup.

pub mod history;
pub mod render;

use history::QueryHistory;
use rusqlite::Connection;
use sqlscout_core::config::database_name_from_path;
use sqlscout_core::constants::HISTORY_CAPACITY;
use sqlscout_core::error::BackendError;
use tracing::{debug, info};

#[derive(Debug)]
pub struct SqlToolbox {
    conn: Connection,
    db_path: String,
    history: QueryHistory,
}

impl SqlToolbox {
    /// Open the database and verify it with a trivial round-trip query.
    pub fn open(db_path: &str, busy_timeout_ms: u32) -> Result<Self, BackendError> {
        let conn = if db_path == ":memory:" {
            Connection::open_in_memory().map_err(BackendError::sqlite)?
        } else {
            Connection::open(db_path).map_err(BackendError::sqlite)?
        };
        conn.busy_timeout(std::time::Duration::from_millis(busy_timeout_ms as u64))
            .map_err(BackendError::sqlite)?;

        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| BackendError::ConnectionCheck(e.to_string()))?;
        info!(db_path, "database connection verified");

        Ok(Self {
            conn,
            db_path: db_path.to_string(),
            history: QueryHistory::new(HISTORY_CAPACITY),
        })
    }

    /// Wrap an already-open connection (tests, embedded use).
    pub fn from_connection(conn: Connection, db_path: &str) -> Self {
        Self {
            conn,
            db_path: db_path.to_string(),
            history: QueryHistory::new(HISTORY_CAPACITY),
        }
    }

    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    /// Execute a SQL statement and return its textual result. The attempt
    /// is recorded in history whether it succeeded or not.
    pub fn run_query(&mut self, query: &str) -> String {
        let query = query.trim();
        debug!(query, "executing query");
        let result = match self.execute_sql(query) {
            Ok(text) => text,
            Err(e) => format!("Error executing query: {e}"),
        };
        self.history.record(query, result.as_str());
        result
    }

    /// Describe one table, or every table when `table_name` is `None`.
    pub fn get_table_info(&self, table_name: Option<&str>) -> String {
        let result = match table_name {
            Some(name) => self.describe_table(name),
            None => self.describe_all_tables(),
        };
        match result {
            Ok(text) => text,
            Err(e) => format!("Error getting table info: {e}"),
        }
    }

    /// The most recent `{query, result}` pair, with empty values if no
    /// query has been run yet.
    pub fn get_last_query(&self) -> String {
        let (query, result) = self
            .history
            .last()
            .map(|e| (e.query.as_str(), e.result.as_str()))
            .unwrap_or(("", ""));
        format!("Last Query: {query}\n\nResult: {result}")
    }

    /// Reconstruct the `CREATE TABLE` statement for a table from catalog
    /// introspection, prefixed by a comment naming the table. If the
    /// introspection output carries no CREATE clause it is returned raw.
    pub fn generate_table_ddl(&self, table_name: &str) -> String {
        match self.table_ddl(table_name) {
            Ok(ddl) => ddl,
            Err(e) => format!("Error generating DDL for table {table_name}: {e}"),
        }
    }

    /// Concatenated per-table DDL blocks for the whole database, with a
    /// header naming the database (defaults to the connection descriptor's
    /// file stem).
    pub fn generate_database_schema(&self, database_name: Option<&str>) -> String {
        let name = database_name
            .map(str::to_string)
            .unwrap_or_else(|| database_name_from_path(&self.db_path));
        match self.database_schema(&name) {
            Ok(schema) => schema,
            Err(e) => format!("Error generating database schema: {e}"),
        }
    }

    /// Trivial round-trip to check the connection is alive.
    pub fn test_connection(&self) -> String {
        match self.execute_sql("SELECT 1 as test") {
            Ok(result) => format!("Connection successful: {result}"),
            Err(e) => format!("Connection failed: {e}"),
        }
    }

    // ---- internal, fallible operations ----

    fn execute_sql(&self, query: &str) -> Result<String, BackendError> {
        let mut stmt = self.conn.prepare(query).map_err(BackendError::sqlite)?;

        if stmt.column_count() == 0 {
            // Non-SELECT statement: execute and report the change count.
            let affected = stmt.execute([]).map_err(BackendError::sqlite)?;
            return Ok(format!("OK ({affected} rows affected)"));
        }

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let column_count = columns.len();
        let mut rows = stmt.query([]).map_err(BackendError::sqlite)?;
        let mut rendered = Vec::new();
        while let Some(row) = rows.next().map_err(BackendError::sqlite)? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value = row.get_ref(i).map_err(BackendError::sqlite)?;
                values.push(render::render_value(value));
            }
            rendered.push(values);
        }
        Ok(render::render_rows(&columns, &rendered))
    }

    fn list_tables(&self) -> Result<Vec<String>, BackendError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .map_err(BackendError::sqlite)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(BackendError::sqlite)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(BackendError::sqlite)?;
        Ok(names)
    }

    fn describe_table(&self, table_name: &str) -> Result<String, BackendError> {
        let columns = self.table_columns(table_name)?;
        if columns.is_empty() {
            return Err(BackendError::NoSuchTable {
                table: table_name.to_string(),
            });
        }
        let mut out = format!("Table: {table_name}");
        for col in columns {
            out.push('\n');
            out.push_str(&format!("  {col}"));
        }
        Ok(out)
    }

    fn describe_all_tables(&self) -> Result<String, BackendError> {
        let tables = self.list_tables()?;
        if tables.is_empty() {
            return Ok("No tables in database".to_string());
        }
        let mut out = format!("Tables: {}", tables.join(", "));
        for table in &tables {
            out.push_str("\n\n");
            out.push_str(&self.describe_table(table)?);
        }
        Ok(out)
    }

    fn table_columns(&self, table_name: &str) -> Result<Vec<String>, BackendError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, type, pk, \"notnull\" FROM pragma_table_info(?1)")
            .map_err(BackendError::sqlite)?;
        let columns = stmt
            .query_map([table_name], |row| {
                let name: String = row.get(0)?;
                let col_type: String = row.get(1)?;
                let pk: i64 = row.get(2)?;
                let not_null: i64 = row.get(3)?;
                let mut desc = format!("{name} {col_type}");
                if pk > 0 {
                    desc.push_str(" PRIMARY KEY");
                }
                if not_null > 0 {
                    desc.push_str(" NOT NULL");
                }
                Ok(desc)
            })
            .map_err(BackendError::sqlite)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(BackendError::sqlite)?;
        Ok(columns)
    }

    fn table_ddl(&self, table_name: &str) -> Result<String, BackendError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table_name],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => BackendError::NoSuchTable {
                    table: table_name.to_string(),
                },
                other => BackendError::sqlite(other),
            })?;

        // The catalog stores the original CREATE clause verbatim. If it is
        // missing or has some other shape, hand the raw output back as-is.
        let raw = raw.unwrap_or_default();
        if raw.contains("CREATE TABLE") {
            Ok(format!("-- DDL for table: {table_name}\n{raw};"))
        } else {
            Ok(raw)
        }
    }

    fn database_schema(&self, database_name: &str) -> Result<String, BackendError> {
        let mut schema = format!(
            "-- Complete Database Schema for: {database_name}\n-- Generated DDL Statements\n"
        );
        for table in self.list_tables()? {
            schema.push('\n');
            schema.push_str(&self.generate_table_ddl(&table));
            schema.push('\n');
        }
        Ok(schema)
    }
}
