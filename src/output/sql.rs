//! DDL emitter
//!
//! Lowers an edit list into SQL statements and prints them through the
//! layout engine. An added table prints its captured parse tree; a removed
//! table becomes a synthesised `DROP TABLE IF EXISTS`; column edits under
//! `ModifyTable` become one `ALTER TABLE` statement each. Constraint edits
//! and type changes have no SQLite `ALTER` form and are left to the plan
//! and json outputs.

use crate::ast::{
    ActionKind, AddColumn, AlterAction, AlterTable, CheckConstraint, ColumnConstraint,
    ColumnConstraintBody, ColumnDefinition, ConflictClause, CreateTable, DefaultValue, DropColumn,
    DropTable, ForeignKeyClause, IfExists, IndexedColumn, QualifiedName, StatementKind,
    TableConstraint, TableConstraintBody, TableDefinition,
};
use crate::diff::Edit;
use crate::format::{CoreFormatter, IdentifierQuoting};
use crate::token::{Keyword, Token};

/// Print a node through the layout engine. Keywords are emitted in their
/// canonical uppercase form; identifiers go through the configured
/// quoting; type names and opaque token runs keep their original spelling.
pub trait ToSql {
    fn to_sql(&self, f: &mut CoreFormatter);
}

pub struct SqlGenerator {
    max_width: usize,
    quoting: IdentifierQuoting,
}

impl SqlGenerator {
    pub fn new(max_width: usize, quoting: IdentifierQuoting) -> Self {
        Self { max_width, quoting }
    }

    /// Render the whole edit list as DDL. Each statement is terminated by
    /// `;` and two hard breaks.
    pub fn generate(&self, edits: &[Edit<'_>]) -> String {
        let statements = lower_edits(edits);

        let mut f = CoreFormatter::new(self.max_width, self.quoting.clone());
        for statement in &statements {
            statement.to_sql(&mut f);
            f.rune(';');
            f.hard_break();
            f.hard_break();
        }
        f.into_string()
    }
}

impl Default for SqlGenerator {
    fn default() -> Self {
        Self::new(
            crate::format::DEFAULT_MAX_WIDTH,
            IdentifierQuoting::double_quotes(),
        )
    }
}

/// Translate edits into printable statements. Only table-level edits occur
/// at the top of a well-formed edit list.
fn lower_edits(edits: &[Edit<'_>]) -> Vec<StatementKind> {
    let mut statements = Vec::new();

    for edit in edits {
        match edit {
            Edit::AddTable(table) => {
                statements.push(StatementKind::CreateTable((*table).clone()));
            }
            Edit::RemoveTable(table) => {
                statements.push(StatementKind::DropTable(drop_table(&table.name)));
            }
            Edit::ModifyTable { target, edits } => {
                statements.extend(alter_table(target, edits));
            }
            _ => {}
        }
    }

    statements
}

fn alter_table(table: &CreateTable, edits: &[Edit<'_>]) -> Vec<StatementKind> {
    let mut statements = Vec::new();

    for edit in edits {
        match edit {
            Edit::AddColumn(column) => {
                statements.push(StatementKind::AlterTable(alter_table_add_column(
                    table, column,
                )));
            }
            Edit::RemoveColumn(column) => {
                statements.push(StatementKind::AlterTable(alter_table_drop_column(
                    table, column,
                )));
            }
            // Constraint edits and type changes are not lowered to SQL.
            _ => {}
        }
    }

    statements
}

fn alter_table_add_column(table: &CreateTable, column: &ColumnDefinition) -> AlterTable {
    let mut column = column.clone();
    column.comma = None;
    AlterTable {
        alter: Token::keyword(Keyword::Alter),
        table: Token::keyword(Keyword::Table),
        // The parsed identifier is reused as-is, schema qualifier included.
        name: table.name.clone(),
        action: AlterAction::AddColumn(AddColumn {
            add: Token::keyword(Keyword::Add),
            column,
        }),
    }
}

fn alter_table_drop_column(table: &CreateTable, column: &ColumnDefinition) -> AlterTable {
    AlterTable {
        alter: Token::keyword(Keyword::Alter),
        table: Token::keyword(Keyword::Table),
        name: table.name.clone(),
        action: AlterAction::DropColumn(DropColumn {
            drop: Token::keyword(Keyword::Drop),
            column: column.name.clone(),
        }),
    }
}

fn drop_table(name: &QualifiedName) -> DropTable {
    DropTable {
        drop: Token::keyword(Keyword::Drop),
        table: Token::keyword(Keyword::Table),
        if_exists: Some(IfExists {
            if_kw: Token::keyword(Keyword::If),
            exists_kw: Token::keyword(Keyword::Exists),
        }),
        name: name.clone(),
    }
}

// --- ToSql implementations ---

impl ToSql for StatementKind {
    fn to_sql(&self, f: &mut CoreFormatter) {
        match self {
            StatementKind::CreateTable(n) => n.to_sql(f),
            StatementKind::AlterTable(n) => n.to_sql(f),
            StatementKind::DropTable(n) => n.to_sql(f),
        }
    }
}

impl ToSql for CreateTable {
    fn to_sql(&self, f: &mut CoreFormatter) {
        f.text("CREATE ");
        if self.temporary.is_some() {
            f.text("TEMPORARY ");
        }
        f.text("TABLE ");
        if self.if_not_exists.is_some() {
            f.text("IF NOT EXISTS ");
        }
        self.name.to_sql(f);
        f.space();
        self.definition.to_sql(f);
        for option in &self.options {
            f.space();
            f.text(&option.text);
        }
    }
}

impl ToSql for QualifiedName {
    fn to_sql(&self, f: &mut CoreFormatter) {
        if let Some(schema) = self.schema_text() {
            f.identifier(schema);
            f.rune('.');
        }
        f.identifier(self.name_text());
    }
}

impl ToSql for TableDefinition {
    fn to_sql(&self, f: &mut CoreFormatter) {
        let total = self.columns.len() + self.constraints.len();
        f.group(|f| {
            f.rune('(');
            f.indent(|f| {
                let mut emitted = 0;
                for column in &self.columns {
                    f.line();
                    column.to_sql(f);
                    emitted += 1;
                    if emitted < total {
                        f.rune(',');
                    }
                }
                for constraint in &self.constraints {
                    f.line();
                    constraint.to_sql(f);
                    emitted += 1;
                    if emitted < total {
                        f.rune(',');
                    }
                }
            });
            f.line();
            f.rune(')');
        });
    }
}

impl ToSql for ColumnDefinition {
    fn to_sql(&self, f: &mut CoreFormatter) {
        f.identifier(self.name.text());
        f.space();
        f.text(self.type_name.text());
        for constraint in &self.constraints {
            f.space();
            constraint.to_sql(f);
        }
    }
}

impl ToSql for ColumnConstraint {
    fn to_sql(&self, f: &mut CoreFormatter) {
        if let Some(name) = &self.name {
            f.text("CONSTRAINT ");
            f.identifier(name.name.text());
            f.space();
        }
        self.body.to_sql(f);
    }
}

impl ToSql for ColumnConstraintBody {
    fn to_sql(&self, f: &mut CoreFormatter) {
        match self {
            ColumnConstraintBody::PrimaryKey(pk) => {
                f.text("PRIMARY KEY");
                if let Some(order) = &pk.order {
                    f.space();
                    f.text(&order.text.to_uppercase());
                }
                if let Some(conflict) = &pk.conflict {
                    f.space();
                    conflict.to_sql(f);
                }
                if pk.autoincrement.is_some() {
                    f.text(" AUTOINCREMENT");
                }
            }
            ColumnConstraintBody::NotNull(_) => f.text("NOT NULL"),
            ColumnConstraintBody::Unique(unique) => {
                f.text("UNIQUE");
                if let Some(conflict) = &unique.conflict {
                    f.space();
                    conflict.to_sql(f);
                }
            }
            ColumnConstraintBody::Default(default) => {
                f.text("DEFAULT ");
                default.value.to_sql(f);
            }
            ColumnConstraintBody::Collate(collate) => {
                f.text("COLLATE ");
                f.identifier(collate.name.text());
            }
            ColumnConstraintBody::References(clause) => clause.to_sql(f),
            ColumnConstraintBody::Check(check) => check.to_sql(f),
        }
    }
}

impl ToSql for DefaultValue {
    fn to_sql(&self, f: &mut CoreFormatter) {
        match self {
            // The raw lexeme keeps string quotes and numeric spellings.
            DefaultValue::Literal(token) => f.text(&token.lexeme()),
            DefaultValue::Signed { sign, number } => {
                f.text(&sign.text);
                f.text(&number.text);
            }
            DefaultValue::Parenthesized { tokens, .. } => {
                f.rune('(');
                write_token_run(f, tokens);
                f.rune(')');
            }
        }
    }
}

impl ToSql for ConflictClause {
    fn to_sql(&self, f: &mut CoreFormatter) {
        f.text("ON CONFLICT ");
        f.text(&self.verb.text.to_uppercase());
    }
}

impl ToSql for TableConstraint {
    fn to_sql(&self, f: &mut CoreFormatter) {
        if let Some(name) = &self.name {
            f.text("CONSTRAINT ");
            f.identifier(name.name.text());
            f.space();
        }
        self.body.to_sql(f);
    }
}

impl ToSql for TableConstraintBody {
    fn to_sql(&self, f: &mut CoreFormatter) {
        match self {
            TableConstraintBody::PrimaryKey(pk) => {
                f.text("PRIMARY KEY ");
                write_indexed_columns(f, &pk.columns);
                if let Some(conflict) = &pk.conflict {
                    f.space();
                    conflict.to_sql(f);
                }
            }
            TableConstraintBody::Unique(unique) => {
                f.text("UNIQUE ");
                write_indexed_columns(f, &unique.columns);
                if let Some(conflict) = &unique.conflict {
                    f.space();
                    conflict.to_sql(f);
                }
            }
            TableConstraintBody::ForeignKey(fk) => {
                f.text("FOREIGN KEY ");
                write_indexed_columns(f, &fk.columns);
                f.space();
                fk.clause.to_sql(f);
            }
            TableConstraintBody::Check(check) => check.to_sql(f),
        }
    }
}

impl ToSql for ForeignKeyClause {
    fn to_sql(&self, f: &mut CoreFormatter) {
        f.text("REFERENCES ");
        self.table.to_sql(f);
        if let Some(referenced) = &self.columns {
            f.space();
            write_indexed_columns(f, &referenced.columns);
        }
        for action in &self.actions {
            f.text(" ON ");
            f.text(&action.event.text.to_uppercase());
            f.space();
            f.text(match action.action {
                ActionKind::SetNull => "SET NULL",
                ActionKind::SetDefault => "SET DEFAULT",
                ActionKind::Cascade => "CASCADE",
                ActionKind::Restrict => "RESTRICT",
                ActionKind::NoAction => "NO ACTION",
            });
        }
    }
}

impl ToSql for CheckConstraint {
    fn to_sql(&self, f: &mut CoreFormatter) {
        f.text("CHECK (");
        write_token_run(f, &self.tokens);
        f.rune(')');
    }
}

impl ToSql for AlterTable {
    fn to_sql(&self, f: &mut CoreFormatter) {
        f.text("ALTER TABLE ");
        self.name.to_sql(f);
        f.space();
        match &self.action {
            AlterAction::AddColumn(add) => {
                f.text("ADD ");
                add.column.to_sql(f);
            }
            AlterAction::DropColumn(drop) => {
                f.text("DROP ");
                f.identifier(drop.column.text());
            }
        }
    }
}

impl ToSql for DropTable {
    fn to_sql(&self, f: &mut CoreFormatter) {
        f.text("DROP TABLE ");
        if self.if_exists.is_some() {
            f.text("IF EXISTS ");
        }
        self.name.to_sql(f);
    }
}

fn write_indexed_columns(f: &mut CoreFormatter, columns: &[IndexedColumn]) {
    f.rune('(');
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            f.text(", ");
        }
        f.identifier(column.name.text());
    }
    f.rune(')');
}

/// An opaque token run, space-separated, each token in its original
/// spelling (quotes included).
fn write_token_run(f: &mut CoreFormatter, tokens: &[Token]) {
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            f.space();
        }
        f.text(&token.lexeme());
    }
}
