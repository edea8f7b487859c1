//! Machine-readable edit plan
//!
//! Serialises the edit tree into a JSON summary, including the edits the
//! SQL emitter cannot lower (type changes, constraint changes), so CI
//! tooling can flag migrations that need a manual table rebuild.

use serde::Serialize;

use crate::diff::Edit;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditSummary {
    AddTable {
        table: String,
    },
    RemoveTable {
        table: String,
    },
    ModifyTable {
        table: String,
        edits: Vec<EditSummary>,
    },
    AddColumn {
        column: String,
        column_type: String,
    },
    RemoveColumn {
        column: String,
    },
    ModifyColumn {
        column: String,
        edits: Vec<EditSummary>,
    },
    ChangeColumnType {
        from: String,
        to: String,
    },
    AddTableConstraint {
        constraint: String,
    },
    RemoveTableConstraint {
        constraint: String,
    },
    ModifyTableConstraint {
        constraint: String,
        edits: Vec<EditSummary>,
    },
    AddColumnConstraint {
        constraint: String,
    },
    RemoveColumnConstraint {
        constraint: String,
    },
    ModifyColumnConstraint {
        constraint: String,
        edits: Vec<EditSummary>,
    },
}

/// Flatten borrowed edits into owned summaries.
pub fn summarize_edits(edits: &[Edit<'_>], default_schema: &str) -> Vec<EditSummary> {
    edits.iter().map(|e| summarize(e, default_schema)).collect()
}

fn summarize(edit: &Edit<'_>, default_schema: &str) -> EditSummary {
    match edit {
        Edit::AddTable(table) => EditSummary::AddTable {
            table: table.name.fully_qualified(default_schema),
        },
        Edit::RemoveTable(table) => EditSummary::RemoveTable {
            table: table.name.fully_qualified(default_schema),
        },
        Edit::ModifyTable { target, edits } => EditSummary::ModifyTable {
            table: target.name.fully_qualified(default_schema),
            edits: summarize_edits(edits, default_schema),
        },
        Edit::AddColumn(column) => EditSummary::AddColumn {
            column: column.name.text().to_string(),
            column_type: column.type_name.text().to_string(),
        },
        Edit::RemoveColumn(column) => EditSummary::RemoveColumn {
            column: column.name.text().to_string(),
        },
        Edit::ModifyColumn { target, edits } => EditSummary::ModifyColumn {
            column: target.name.text().to_string(),
            edits: summarize_edits(edits, default_schema),
        },
        Edit::ChangeColumnType { from, to } => EditSummary::ChangeColumnType {
            from: from.text().to_string(),
            to: to.text().to_string(),
        },
        Edit::AddTableConstraint(constraint) => EditSummary::AddTableConstraint {
            constraint: constraint.body.describe().to_string(),
        },
        Edit::RemoveTableConstraint(constraint) => EditSummary::RemoveTableConstraint {
            constraint: constraint.body.describe().to_string(),
        },
        Edit::ModifyTableConstraint { target, edits } => EditSummary::ModifyTableConstraint {
            constraint: target.body.describe().to_string(),
            edits: summarize_edits(edits, default_schema),
        },
        Edit::AddColumnConstraint(constraint) => EditSummary::AddColumnConstraint {
            constraint: constraint.body.describe().to_string(),
        },
        Edit::RemoveColumnConstraint(constraint) => EditSummary::RemoveColumnConstraint {
            constraint: constraint.body.describe().to_string(),
        },
        Edit::ModifyColumnConstraint { target, edits } => EditSummary::ModifyColumnConstraint {
            constraint: target.body.describe().to_string(),
            edits: summarize_edits(edits, default_schema),
        },
    }
}

/// The edit plan as pretty-printed JSON.
pub fn render_json(edits: &[Edit<'_>], default_schema: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&summarize_edits(edits, default_schema))
}
