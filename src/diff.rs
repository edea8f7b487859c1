//! Structural schema differ
//!
//! Compares two parsed DDL programs table by table, column by column, and
//! constraint by constraint, producing a typed edit sequence. Output order
//! is deterministic and observable: removals in source order, then
//! additions in destination order, then modifications in source order.

use std::fmt;

use crate::ast::{
    ColumnConstraint, ColumnDefinition, CreateTable, Program, TableConstraint, TypeName,
};

/// One schema edit. Borrows the programs it was computed from; the emitter
/// clones whatever sub-trees it needs into synthesised statements.
#[derive(Debug)]
pub enum Edit<'a> {
    AddTable(&'a CreateTable),
    RemoveTable(&'a CreateTable),
    ModifyTable {
        target: &'a CreateTable,
        edits: Vec<Edit<'a>>,
    },
    AddColumn(&'a ColumnDefinition),
    RemoveColumn(&'a ColumnDefinition),
    ModifyColumn {
        target: &'a ColumnDefinition,
        edits: Vec<Edit<'a>>,
    },
    ChangeColumnType {
        from: &'a TypeName,
        to: &'a TypeName,
    },
    AddTableConstraint(&'a TableConstraint),
    RemoveTableConstraint(&'a TableConstraint),
    ModifyTableConstraint {
        target: &'a TableConstraint,
        edits: Vec<Edit<'a>>,
    },
    AddColumnConstraint(&'a ColumnConstraint),
    RemoveColumnConstraint(&'a ColumnConstraint),
    ModifyColumnConstraint {
        target: &'a ColumnConstraint,
        edits: Vec<Edit<'a>>,
    },
}

impl fmt::Display for Edit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::AddTable(table) => {
                writeln!(f, "add table: \"{}\"", table.name.fully_qualified("main"))
            }
            Edit::RemoveTable(table) => {
                writeln!(f, "remove table: \"{}\"", table.name.fully_qualified("main"))
            }
            Edit::ModifyTable { target, edits } => {
                writeln!(
                    f,
                    "modify table: \"{}\"",
                    target.name.fully_qualified("main")
                )?;
                for edit in edits {
                    write!(f, "{edit}")?;
                }
                Ok(())
            }
            Edit::AddColumn(column) => {
                writeln!(f, "add column: \"{}\"", column.name.text())
            }
            Edit::RemoveColumn(column) => {
                writeln!(f, "remove column: \"{}\"", column.name.text())
            }
            Edit::ModifyColumn { target, edits } => {
                writeln!(f, "modify column: \"{}\"", target.name.text())?;
                for edit in edits {
                    write!(f, "{edit}")?;
                }
                Ok(())
            }
            Edit::ChangeColumnType { from, to } => {
                writeln!(
                    f,
                    "change column type: from {} to {}",
                    from.text(),
                    to.text()
                )
            }
            Edit::AddTableConstraint(constraint) => {
                writeln!(f, "add table constraint: \"{}\"", constraint.body.describe())
            }
            Edit::RemoveTableConstraint(constraint) => {
                writeln!(
                    f,
                    "remove table constraint: \"{}\"",
                    constraint.body.describe()
                )
            }
            Edit::ModifyTableConstraint { target, edits } => {
                writeln!(
                    f,
                    "modify table constraint: \"{}\"",
                    target.body.describe()
                )?;
                for edit in edits {
                    write!(f, "{edit}")?;
                }
                Ok(())
            }
            Edit::AddColumnConstraint(constraint) => {
                writeln!(
                    f,
                    "add column constraint: \"{}\"",
                    constraint.body.describe()
                )
            }
            Edit::RemoveColumnConstraint(constraint) => {
                writeln!(
                    f,
                    "remove column constraint: \"{}\"",
                    constraint.body.describe()
                )
            }
            Edit::ModifyColumnConstraint { target, edits } => {
                writeln!(
                    f,
                    "modify column constraint: \"{}\"",
                    target.body.describe()
                )?;
                for edit in edits {
                    write!(f, "{edit}")?;
                }
                Ok(())
            }
        }
    }
}

/// Pair elements of `a` and `b` by an equality predicate, greedily and in
/// order, returning the unmatched leftovers of each side. O(n·m): the
/// predicate is domain-specific, not a hash.
fn symmetric_difference<'a, T: ?Sized>(
    a: &[&'a T],
    b: &[&'a T],
    equal: impl Fn(&T, &T) -> bool,
) -> (Vec<&'a T>, Vec<&'a T>) {
    let mut matched_a = vec![false; a.len()];
    let mut matched_b = vec![false; b.len()];

    for (i, x) in a.iter().enumerate() {
        if matched_a[i] {
            continue;
        }
        for (j, y) in b.iter().enumerate() {
            if matched_b[j] {
                continue;
            }
            if equal(*x, *y) {
                matched_a[i] = true;
                matched_b[j] = true;
                break;
            }
        }
    }

    let left = a
        .iter()
        .zip(&matched_a)
        .filter(|(_, m)| !**m)
        .map(|(x, _)| *x)
        .collect();
    let right = b
        .iter()
        .zip(&matched_b)
        .filter(|(_, m)| !**m)
        .map(|(y, _)| *y)
        .collect();

    (left, right)
}

/// The matched pairs of the same greedy pairing, in `a` order.
fn intersection<'a, T: ?Sized>(
    a: &[&'a T],
    b: &[&'a T],
    equal: impl Fn(&T, &T) -> bool,
) -> Vec<(&'a T, &'a T)> {
    let mut taken = vec![false; b.len()];
    let mut pairs = Vec::with_capacity(a.len().min(b.len()));

    for x in a {
        for (j, y) in b.iter().enumerate() {
            if taken[j] {
                continue;
            }
            if equal(*x, *y) {
                pairs.push((*x, *y));
                taken[j] = true;
                break;
            }
        }
    }

    pairs
}

pub struct Differ {
    default_schema: String,
}

impl Differ {
    pub fn new(default_schema: impl Into<String>) -> Self {
        Self {
            default_schema: default_schema.into(),
        }
    }

    /// Diff two programs. `src` is the current schema, `dst` the desired
    /// one; the edits transform `src` into `dst`.
    pub fn diff_schema<'a>(&self, src: &'a Program, dst: &'a Program) -> Vec<Edit<'a>> {
        let mut edits = Vec::new();

        let src_tables: Vec<&CreateTable> = src.create_tables().collect();
        let dst_tables: Vec<&CreateTable> = dst.create_tables().collect();

        let same_table = |a: &CreateTable, b: &CreateTable| {
            a.name.same(&b.name, &self.default_schema)
        };

        let (removed, added) = symmetric_difference(&src_tables, &dst_tables, same_table);
        let common = intersection(&src_tables, &dst_tables, same_table);

        for table in removed {
            edits.push(Edit::RemoveTable(table));
        }
        for table in added {
            edits.push(Edit::AddTable(table));
        }
        for (a, b) in common {
            if let Some(edit) = self.diff_create_table(a, b) {
                edits.push(edit);
            }
        }

        edits
    }

    /// Diff two definitions of the same table. Returns `None` when every
    /// child matched: an empty `ModifyTable` is never emitted.
    pub fn diff_create_table<'a>(
        &self,
        a: &'a CreateTable,
        b: &'a CreateTable,
    ) -> Option<Edit<'a>> {
        let mut edits = Vec::new();

        // Columns pair by name, case-sensitively.
        {
            let a_cols: Vec<&ColumnDefinition> = a.definition.columns.iter().collect();
            let b_cols: Vec<&ColumnDefinition> = b.definition.columns.iter().collect();
            let same_column =
                |x: &ColumnDefinition, y: &ColumnDefinition| x.name.same(&y.name);

            let (removed, added) = symmetric_difference(&a_cols, &b_cols, same_column);
            let common = intersection(&a_cols, &b_cols, same_column);

            for column in removed {
                edits.push(Edit::RemoveColumn(column));
            }
            for column in added {
                edits.push(Edit::AddColumn(column));
            }
            for (x, y) in common {
                if let Some(edit) = self.diff_column_definition(x, y) {
                    edits.push(edit);
                }
            }
        }

        // Table constraints pair by kind-specific structural equality.
        {
            let a_cons: Vec<&TableConstraint> = a.definition.constraints.iter().collect();
            let b_cons: Vec<&TableConstraint> = b.definition.constraints.iter().collect();
            let same_constraint =
                |x: &TableConstraint, y: &TableConstraint| x.body.matches(&y.body);

            let (removed, added) = symmetric_difference(&a_cons, &b_cons, same_constraint);
            let common = intersection(&a_cons, &b_cons, same_constraint);

            for constraint in removed {
                edits.push(Edit::RemoveTableConstraint(constraint));
            }
            for constraint in added {
                edits.push(Edit::AddTableConstraint(constraint));
            }
            for (x, y) in common {
                if let Some(edit) = self.diff_table_constraint(x, y) {
                    edits.push(edit);
                }
            }
        }

        if edits.is_empty() {
            None
        } else {
            Some(Edit::ModifyTable { target: a, edits })
        }
    }

    /// Diff two columns of the same name: a lexical type change plus the
    /// constraint sets, diffed like table constraints.
    pub fn diff_column_definition<'a>(
        &self,
        a: &'a ColumnDefinition,
        b: &'a ColumnDefinition,
    ) -> Option<Edit<'a>> {
        let mut edits = Vec::new();

        if !a.type_name.same(&b.type_name) {
            edits.push(Edit::ChangeColumnType {
                from: &a.type_name,
                to: &b.type_name,
            });
        }

        {
            let a_cons: Vec<&ColumnConstraint> = a.constraints.iter().collect();
            let b_cons: Vec<&ColumnConstraint> = b.constraints.iter().collect();
            let same_constraint =
                |x: &ColumnConstraint, y: &ColumnConstraint| x.body.matches(&y.body);

            let (removed, added) = symmetric_difference(&a_cons, &b_cons, same_constraint);
            let common = intersection(&a_cons, &b_cons, same_constraint);

            for constraint in removed {
                edits.push(Edit::RemoveColumnConstraint(constraint));
            }
            for constraint in added {
                edits.push(Edit::AddColumnConstraint(constraint));
            }
            for (x, y) in common {
                if let Some(edit) = self.diff_column_constraint(x, y) {
                    edits.push(edit);
                }
            }
        }

        if edits.is_empty() {
            None
        } else {
            Some(Edit::ModifyColumn { target: a, edits })
        }
    }

    /// Matched table constraints produce no deeper edits today; the
    /// recursion exists so the wrapper appears the moment it does.
    pub fn diff_table_constraint<'a>(
        &self,
        a: &'a TableConstraint,
        _b: &'a TableConstraint,
    ) -> Option<Edit<'a>> {
        let edits = Vec::new();

        if edits.is_empty() {
            return None;
        }

        Some(Edit::ModifyTableConstraint { target: a, edits })
    }

    /// See [`Differ::diff_table_constraint`].
    pub fn diff_column_constraint<'a>(
        &self,
        a: &'a ColumnConstraint,
        _b: &'a ColumnConstraint,
    ) -> Option<Edit<'a>> {
        let edits = Vec::new();

        if edits.is_empty() {
            return None;
        }

        Some(Edit::ModifyColumnConstraint { target: a, edits })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::token::SourceText;

    fn parse(input: &str) -> Program {
        let mut p = Parser::from_source(SourceText::new("test.sql", input));
        let program = p.parse_program().expect("parse");
        assert!(!p.has_errors(), "fixture should parse cleanly");
        program
    }

    fn differ() -> Differ {
        Differ::new("main")
    }

    #[test]
    fn test_identical_schemas_produce_no_edits() {
        let a = parse("CREATE TABLE t (a INT, b TEXT, PRIMARY KEY (a));");
        let b = parse("CREATE TABLE t (a INT, b TEXT, PRIMARY KEY (a));");
        assert!(differ().diff_schema(&a, &b).is_empty());
    }

    #[test]
    fn test_diff_against_self_is_empty() {
        let a = parse(
            "CREATE TABLE t (a INT NOT NULL, b TEXT DEFAULT 'x', \
             UNIQUE (a), CHECK (a > 0));\nCREATE TABLE u (id integer PRIMARY KEY);",
        );
        assert!(differ().diff_schema(&a, &a).is_empty());
    }

    #[test]
    fn test_added_column_becomes_modify_table() {
        let src = parse("CREATE TABLE t (a INT);");
        let dst = parse("CREATE TABLE t (a INT, b TEXT);");
        let edits = differ().diff_schema(&src, &dst);
        assert_eq!(edits.len(), 1);
        match &edits[0] {
            Edit::ModifyTable { target, edits } => {
                assert_eq!(target.name.name_text(), "t");
                assert_eq!(edits.len(), 1);
                match &edits[0] {
                    Edit::AddColumn(col) => {
                        assert_eq!(col.name.text(), "b");
                        assert_eq!(col.type_name.text(), "TEXT");
                    }
                    other => panic!("expected add column, got {other}"),
                }
            }
            other => panic!("expected modify table, got {other}"),
        }
    }

    #[test]
    fn test_removed_table() {
        let src = parse("CREATE TABLE t(a INT); CREATE TABLE u(a INT);");
        let dst = parse("CREATE TABLE t(a INT);");
        let edits = differ().diff_schema(&src, &dst);
        assert_eq!(edits.len(), 1);
        match &edits[0] {
            Edit::RemoveTable(table) => assert_eq!(table.name.name_text(), "u"),
            other => panic!("expected remove table, got {other}"),
        }
    }

    #[test]
    fn test_unqualified_matches_default_schema() {
        let src = parse("CREATE TABLE main.t (a INT);");
        let dst = parse("CREATE TABLE t (a INT);");
        assert!(differ().diff_schema(&src, &dst).is_empty());
    }

    #[test]
    fn test_schema_qualifier_distinguishes_tables() {
        let src = parse("CREATE TABLE aux.t (a INT);");
        let dst = parse("CREATE TABLE t (a INT);");
        let edits = differ().diff_schema(&src, &dst);
        assert_eq!(edits.len(), 2);
        assert!(matches!(edits[0], Edit::RemoveTable(_)));
        assert!(matches!(edits[1], Edit::AddTable(_)));
    }

    #[test]
    fn test_output_order_removals_additions_modifications() {
        let src = parse(
            "CREATE TABLE gone (a INT);\
             CREATE TABLE changed (a INT);\
             CREATE TABLE untouched (a INT);",
        );
        let dst = parse(
            "CREATE TABLE changed (a INT, b INT);\
             CREATE TABLE untouched (a INT);\
             CREATE TABLE fresh (a INT);",
        );
        let edits = differ().diff_schema(&src, &dst);
        let descriptions: Vec<String> = edits
            .iter()
            .map(|e| e.to_string().lines().next().unwrap().to_string())
            .collect();
        assert_eq!(
            descriptions,
            vec![
                "remove table: \"main.gone\"",
                "add table: \"main.fresh\"",
                "modify table: \"main.changed\"",
            ]
        );
    }

    #[test]
    fn test_change_column_type() {
        let src = parse("CREATE TABLE t (a INT);");
        let dst = parse("CREATE TABLE t (a TEXT);");
        let edits = differ().diff_schema(&src, &dst);
        assert_eq!(edits.len(), 1);
        match &edits[0] {
            Edit::ModifyTable { edits, .. } => match &edits[0] {
                Edit::ModifyColumn { target, edits } => {
                    assert_eq!(target.name.text(), "a");
                    match &edits[0] {
                        Edit::ChangeColumnType { from, to } => {
                            assert_eq!(from.text(), "INT");
                            assert_eq!(to.text(), "TEXT");
                        }
                        other => panic!("expected change column type, got {other}"),
                    }
                }
                other => panic!("expected modify column, got {other}"),
            },
            other => panic!("expected modify table, got {other}"),
        }
    }

    #[test]
    fn test_type_comparison_is_lexical() {
        let src = parse("CREATE TABLE t (a integer);");
        let dst = parse("CREATE TABLE t (a INTEGER);");
        let edits = differ().diff_schema(&src, &dst);
        assert_eq!(edits.len(), 1, "case difference is a type change");
    }

    #[test]
    fn test_changed_default_diffs_as_remove_and_add() {
        let src = parse("CREATE TABLE t (a INT DEFAULT 0);");
        let dst = parse("CREATE TABLE t (a INT DEFAULT 1);");
        let edits = differ().diff_schema(&src, &dst);
        match &edits[0] {
            Edit::ModifyTable { edits, .. } => match &edits[0] {
                Edit::ModifyColumn { edits, .. } => {
                    assert_eq!(edits.len(), 2);
                    assert!(matches!(edits[0], Edit::RemoveColumnConstraint(_)));
                    assert!(matches!(edits[1], Edit::AddColumnConstraint(_)));
                }
                other => panic!("expected modify column, got {other}"),
            },
            other => panic!("expected modify table, got {other}"),
        }
    }

    #[test]
    fn test_primary_keys_pair_regardless_of_columns() {
        // Two PKs always pair, so moving the PK is no table-constraint
        // edit at this level.
        let src = parse("CREATE TABLE t (a INT, b INT, PRIMARY KEY (a));");
        let dst = parse("CREATE TABLE t (a INT, b INT, PRIMARY KEY (b));");
        assert!(differ().diff_schema(&src, &dst).is_empty());
    }

    #[test]
    fn test_unique_constraints_pair_by_columns() {
        let src = parse("CREATE TABLE t (a INT, b INT, UNIQUE (a));");
        let dst = parse("CREATE TABLE t (a INT, b INT, UNIQUE (b));");
        let edits = differ().diff_schema(&src, &dst);
        match &edits[0] {
            Edit::ModifyTable { edits, .. } => {
                assert_eq!(edits.len(), 2);
                assert!(matches!(edits[0], Edit::RemoveTableConstraint(_)));
                assert!(matches!(edits[1], Edit::AddTableConstraint(_)));
            }
            other => panic!("expected modify table, got {other}"),
        }
    }

    #[test]
    fn test_foreign_keys_pair_structurally() {
        let fk = "CREATE TABLE o (u INT, FOREIGN KEY (u) REFERENCES users (id) \
                  ON DELETE CASCADE);";
        let src = parse(fk);
        let dst = parse(fk);
        assert!(differ().diff_schema(&src, &dst).is_empty());

        let changed = parse(
            "CREATE TABLE o (u INT, FOREIGN KEY (u) REFERENCES users (id) \
             ON DELETE RESTRICT);",
        );
        let edits = differ().diff_schema(&src, &changed);
        assert_eq!(edits.len(), 1, "changed action un-pairs the constraint");
    }

    #[test]
    fn test_column_reorder_is_no_edit() {
        // Membership is by name; order is not compared.
        let src = parse("CREATE TABLE t (a INT, b TEXT);");
        let dst = parse("CREATE TABLE t (b TEXT, a INT);");
        assert!(differ().diff_schema(&src, &dst).is_empty());
    }

    #[test]
    fn test_symmetric_difference_greedy_pairing() {
        let a = ["x", "y", "x"];
        let b = ["x", "z"];
        let a_refs: Vec<&str> = a.to_vec();
        let b_refs: Vec<&str> = b.to_vec();
        let (left, right) = symmetric_difference(&a_refs, &b_refs, |p, q| p == q);
        assert_eq!(left, vec!["y", "x"]);
        assert_eq!(right, vec!["z"]);

        let pairs = intersection(&a_refs, &b_refs, |p, q| p == q);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0], ("x", "x"));
    }

    #[test]
    fn test_edit_display_nests() {
        let src = parse("CREATE TABLE t (a INT);");
        let dst = parse("CREATE TABLE t (a INT, b TEXT);");
        let edits = differ().diff_schema(&src, &dst);
        let rendered = edits[0].to_string();
        assert_eq!(rendered, "modify table: \"main.t\"\nadd column: \"b\"\n");
    }
}
