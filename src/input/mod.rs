//! Schema inputs
//!
//! The desired schema comes from a SQL file on disk; the current schema is
//! exported from a live SQLite database. Both sides end up as a shared
//! [`SourceText`] buffer the lexer can consume.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::token::SourceText;

pub mod database;
pub mod file;

pub use database::{SchemaSource, SqliteDatabase};
pub use file::load_schema_file;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("database error for {url}: {source}")]
    Database {
        url: String,
        source: rusqlite::Error,
    },
}

/// Wrap exported or loaded schema text as a lexer-ready source buffer.
pub fn source_from(name: &str, text: &str) -> Arc<SourceText> {
    SourceText::new(name, text)
}
