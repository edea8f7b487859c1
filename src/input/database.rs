//! Current-schema export from SQLite
//!
//! Reads `sqlite_schema` and rebuilds a DDL text the lexer can consume.
//! Every row with non-NULL `sql` contributes a `/* <type>: <name> */`
//! comment followed by the stored DDL and a terminator, concatenated in
//! row order.

use std::fmt::Write as _;
use std::path::Path;

use rusqlite::Connection;

use crate::input::LoadError;

/// A provider of the current schema. The pipeline only needs a name for
/// diagnostics and the concatenated DDL text.
pub trait SchemaSource {
    fn url(&self) -> &str;
    fn export_data_definitions(&self) -> Result<String, LoadError>;
}

pub struct SqliteDatabase {
    url: String,
    conn: Connection,
}

impl SqliteDatabase {
    /// Open a database file. The connection stays open until the value is
    /// dropped; rows are read to exhaustion on export.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let url = path.to_string_lossy().to_string();
        let conn = Connection::open(path).map_err(|e| LoadError::Database {
            url: url.clone(),
            source: e,
        })?;
        Ok(Self { url, conn })
    }

    /// An in-memory database, for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, LoadError> {
        let conn = Connection::open_in_memory().map_err(|e| LoadError::Database {
            url: ":memory:".to_string(),
            source: e,
        })?;
        Ok(Self {
            url: ":memory:".to_string(),
            conn,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn db_error(&self, source: rusqlite::Error) -> LoadError {
        LoadError::Database {
            url: self.url.clone(),
            source,
        }
    }
}

impl SchemaSource for SqliteDatabase {
    fn url(&self) -> &str {
        &self.url
    }

    fn export_data_definitions(&self) -> Result<String, LoadError> {
        let mut stmt = self
            .conn
            .prepare("SELECT type, name, tbl_name, rootpage, sql FROM sqlite_schema")
            .map_err(|e| self.db_error(e))?;

        let mut rows = stmt.query([]).map_err(|e| self.db_error(e))?;
        let mut out = String::new();

        while let Some(row) = rows.next().map_err(|e| self.db_error(e))? {
            let object_type: String = row.get(0).map_err(|e| self.db_error(e))?;
            let name: String = row.get(1).map_err(|e| self.db_error(e))?;
            let sql: Option<String> = row.get(4).map_err(|e| self.db_error(e))?;

            if let Some(sql) = sql {
                let _ = writeln!(out, "/* {object_type}: {name} */");
                out.push_str(&sql);
                out.push_str(";\n\n");
            }
        }

        Ok(out)
    }
}
