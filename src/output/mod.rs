//! Output formats for a computed edit plan
//!
//! `sql` lowers edits to DDL statements through the layout engine; `json`
//! serialises a machine-readable summary; the `plan` form is the edits'
//! `Display` text.

use thiserror::Error;

use crate::diff::Edit;

pub mod json;
pub mod sql;

pub use json::render_json;
pub use sql::SqlGenerator;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("IO error writing output: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Human-readable edit descriptions, one block per top-level edit.
pub fn render_plan(edits: &[Edit<'_>]) -> String {
    edits.iter().map(|e| e.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Differ;
    use crate::parser::Parser;
    use crate::token::SourceText;

    #[test]
    fn test_render_plan_lists_every_edit() {
        let mut sp = Parser::from_source(SourceText::new(
            "src.sql",
            "CREATE TABLE t (a INT); CREATE TABLE u (x INT);",
        ));
        let mut dp = Parser::from_source(SourceText::new(
            "dst.sql",
            "CREATE TABLE t (a INT, b TEXT);",
        ));
        let src = sp.parse_program().expect("parse src");
        let dst = dp.parse_program().expect("parse dst");

        let differ = Differ::new("main");
        let edits = differ.diff_schema(&src, &dst);
        let plan = render_plan(&edits);
        assert_eq!(
            plan,
            "remove table: \"main.u\"\nmodify table: \"main.t\"\nadd column: \"b\"\n"
        );
    }
}
