//! Migration pipeline — parse both schemas, diff, render
//!
//! [`MigrationPipeline`] extracts the parse → diff → emit sequence shared
//! by the CLI and the integration tests, so the exit-code mapping in
//! `main` stays a thin shell.

use std::sync::Arc;

use thiserror::Error;

use crate::ast::Program;
use crate::config::Config;
use crate::diff::{Differ, Edit};
use crate::format::IdentifierQuoting;
use crate::output::{self, SqlGenerator};
use crate::parser::{ParseFault, Parser};
use crate::report::Report;
use crate::token::SourceText;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The parser finished with recorded errors; the program cannot be
    /// trusted. Carries every report for rendering.
    #[error("{} parse error(s) in {source_name}", .reports.len())]
    Parse {
        source_name: String,
        reports: Vec<Report>,
    },

    /// An unimplemented parser branch was hit — an internal limitation,
    /// not a user error.
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),
}

/// A successful parse plus any warnings to surface.
#[derive(Debug)]
pub struct Parsed {
    pub program: Program,
    pub warnings: Vec<Report>,
}

pub struct MigrationPipeline {
    default_schema: String,
    max_width: usize,
    quoting: IdentifierQuoting,
}

impl MigrationPipeline {
    pub fn new(default_schema: impl Into<String>, max_width: usize, quote_brackets: &str) -> Self {
        Self {
            default_schema: default_schema.into(),
            max_width,
            quoting: IdentifierQuoting::from_brackets(quote_brackets),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.schema.default_schema.clone(),
            config.output.max_width,
            &config.output.quote_identifiers,
        )
    }

    /// Parse one side of the diff. Recorded parse errors fail the
    /// pipeline; warnings ride along with the program.
    pub fn parse(&self, source: Arc<SourceText>) -> Result<Parsed, PipelineError> {
        let mut parser = Parser::from_source(source);

        let program = match parser.parse_program() {
            Ok(program) => program,
            Err(ParseFault::Unimplemented(what)) => {
                return Err(PipelineError::Unimplemented(what));
            }
            // parse_program absorbs recoverable faults internally.
            Err(ParseFault::Recoverable) => unreachable!("recoverable fault escaped parse_program"),
        };

        if parser.has_errors() {
            return Err(PipelineError::Parse {
                source_name: parser.source().file_name.clone(),
                reports: parser.errors().cloned().collect(),
            });
        }

        Ok(Parsed {
            program,
            warnings: parser.warnings().cloned().collect(),
        })
    }

    pub fn diff<'a>(&self, current: &'a Program, desired: &'a Program) -> Vec<Edit<'a>> {
        Differ::new(self.default_schema.clone()).diff_schema(current, desired)
    }

    pub fn render_sql(&self, edits: &[Edit<'_>]) -> String {
        SqlGenerator::new(self.max_width, self.quoting.clone()).generate(edits)
    }

    pub fn render_json(&self, edits: &[Edit<'_>]) -> serde_json::Result<String> {
        output::render_json(edits, &self.default_schema)
    }

    pub fn render_plan(&self, edits: &[Edit<'_>]) -> String {
        output::render_plan(edits)
    }
}

impl Default for MigrationPipeline {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
