//! Typed DDL syntax tree
//!
//! Every node owns the tokens it was parsed from, so a program can be
//! reconstructed byte-for-byte (`unparse_into`). Nodes are built by the
//! parser, never mutated afterwards; the differ reads them and the emitter
//! clones sub-trees into synthesised `ALTER`/`DROP` statements that flow
//! through the same printer.
//!
//! Node variants and their structural-equality helpers form closed sets:
//! a new variant forces every `match` in the differ and emitter to be
//! updated.

use std::fmt;

use crate::token::{Keyword, Token, TokenKind};

/// An ordered list of parsed statements plus the end-of-file token, whose
/// leading trivia holds any comments after the last statement.
#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub eof: Token,
}

impl Program {
    /// Reconstruct the exact source text this program was parsed from.
    pub fn unparse(&self) -> String {
        let mut out = String::new();
        for stmt in &self.statements {
            stmt.unparse_into(&mut out);
        }
        self.eof.write_source(&mut out);
        out
    }

    /// All `CREATE TABLE` statements, in document order.
    pub fn create_tables(&self) -> impl Iterator<Item = &CreateTable> {
        self.statements.iter().filter_map(|s| match &s.kind {
            StatementKind::CreateTable(ct) => Some(ct),
            _ => None,
        })
    }
}

/// One statement, optionally prefixed by `EXPLAIN (QUERY PLAN)?`.
#[derive(Debug, Clone)]
pub struct Statement {
    pub explain: Option<Explain>,
    pub kind: StatementKind,
    /// The terminating `;`. Absent on emitter-synthesised statements: the
    /// generator appends its own terminator.
    pub semicolon: Option<Token>,
}

impl Statement {
    pub fn unparse_into(&self, out: &mut String) {
        if let Some(explain) = &self.explain {
            explain.unparse_into(out);
        }
        self.kind.unparse_into(out);
        if let Some(semi) = &self.semicolon {
            semi.write_source(out);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Explain {
    pub explain: Token,
    /// `QUERY PLAN`, both present or neither.
    pub query_plan: Option<(Token, Token)>,
}

impl Explain {
    pub fn unparse_into(&self, out: &mut String) {
        self.explain.write_source(out);
        if let Some((query, plan)) = &self.query_plan {
            query.write_source(out);
            plan.write_source(out);
        }
    }
}

#[derive(Debug, Clone)]
pub enum StatementKind {
    CreateTable(CreateTable),
    AlterTable(AlterTable),
    DropTable(DropTable),
}

impl StatementKind {
    pub fn unparse_into(&self, out: &mut String) {
        match self {
            StatementKind::CreateTable(n) => n.unparse_into(out),
            StatementKind::AlterTable(n) => n.unparse_into(out),
            StatementKind::DropTable(n) => n.unparse_into(out),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateTable {
    pub create: Token,
    pub temporary: Option<Token>,
    pub table: Token,
    pub if_not_exists: Option<IfNotExists>,
    pub name: QualifiedName,
    pub definition: TableDefinition,
    /// Trailing table options (`WITHOUT ROWID`, `STRICT`, ...), kept as an
    /// opaque token run.
    pub options: Vec<Token>,
}

impl CreateTable {
    pub fn unparse_into(&self, out: &mut String) {
        self.create.write_source(out);
        if let Some(tmp) = &self.temporary {
            tmp.write_source(out);
        }
        self.table.write_source(out);
        if let Some(ine) = &self.if_not_exists {
            ine.unparse_into(out);
        }
        self.name.unparse_into(out);
        self.definition.unparse_into(out);
        for tok in &self.options {
            tok.write_source(out);
        }
    }
}

#[derive(Debug, Clone)]
pub struct IfNotExists {
    pub if_kw: Token,
    pub not_kw: Token,
    pub exists_kw: Token,
}

impl IfNotExists {
    pub fn unparse_into(&self, out: &mut String) {
        self.if_kw.write_source(out);
        self.not_kw.write_source(out);
        self.exists_kw.write_source(out);
    }
}

/// Catalog-object identifier: optional schema qualifier plus object name.
/// An unqualified name belongs to the default schema (`main`).
#[derive(Debug, Clone)]
pub struct QualifiedName {
    /// Schema identifier and the `.` separating it from the name.
    pub schema: Option<(Ident, Token)>,
    pub name: Ident,
}

impl QualifiedName {
    pub fn schema_text(&self) -> Option<&str> {
        self.schema.as_ref().map(|(ident, _)| ident.text())
    }

    pub fn name_text(&self) -> &str {
        self.name.text()
    }

    /// `schema.name` with the given default filled in for unqualified
    /// names. Comparison and display both go through this.
    pub fn fully_qualified(&self, default_schema: &str) -> String {
        format!(
            "{}.{}",
            self.schema_text().unwrap_or(default_schema),
            self.name_text()
        )
    }

    /// Case-sensitive equality on unquoted text, with unqualified names
    /// resolving to the default schema.
    pub fn same(&self, other: &QualifiedName, default_schema: &str) -> bool {
        self.schema_text().unwrap_or(default_schema)
            == other.schema_text().unwrap_or(default_schema)
            && self.name_text() == other.name_text()
    }

    pub fn unparse_into(&self, out: &mut String) {
        if let Some((schema, period)) = &self.schema {
            schema.unparse_into(out);
            period.write_source(out);
        }
        self.name.unparse_into(out);
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.schema_text() {
            Some(schema) => write!(f, "{}.{}", schema, self.name_text()),
            None => f.write_str(self.name_text()),
        }
    }
}

/// An identifier token; quoting characters were stripped during lexing.
#[derive(Debug, Clone)]
pub struct Ident {
    pub token: Token,
}

impl Ident {
    pub fn synthetic(text: impl Into<String>) -> Self {
        Self {
            token: Token::synthetic(TokenKind::Identifier, text),
        }
    }

    pub fn text(&self) -> &str {
        &self.token.text
    }

    pub fn same(&self, other: &Ident) -> bool {
        self.text() == other.text()
    }

    pub fn unparse_into(&self, out: &mut String) {
        self.token.write_source(out);
    }
}

#[derive(Debug, Clone)]
pub struct TableDefinition {
    pub lparen: Token,
    pub columns: Vec<ColumnDefinition>,
    pub constraints: Vec<TableConstraint>,
    pub rparen: Token,
}

impl TableDefinition {
    /// Find a column by unquoted name. The differ assumes column names
    /// within one definition are unique.
    pub fn column_named(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name.text() == name)
    }

    pub fn unparse_into(&self, out: &mut String) {
        self.lparen.write_source(out);
        for col in &self.columns {
            col.unparse_into(out);
        }
        for constraint in &self.constraints {
            constraint.unparse_into(out);
        }
        self.rparen.write_source(out);
    }
}

#[derive(Debug, Clone)]
pub struct ColumnDefinition {
    pub name: Ident,
    pub type_name: TypeName,
    pub constraints: Vec<ColumnConstraint>,
    /// Separator following this definition, when one was written.
    pub comma: Option<Token>,
}

impl ColumnDefinition {
    pub fn unparse_into(&self, out: &mut String) {
        self.name.unparse_into(out);
        self.type_name.unparse_into(out);
        for constraint in &self.constraints {
            constraint.unparse_into(out);
        }
        if let Some(comma) = &self.comma {
            comma.write_source(out);
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeName {
    pub token: Token,
}

impl TypeName {
    /// Lexical comparison: `INTEGER` and `integer` are different types for
    /// diffing purposes, matching the emitted-SQL fidelity requirement.
    pub fn same(&self, other: &TypeName) -> bool {
        self.token.text == other.token.text
    }

    pub fn text(&self) -> &str {
        &self.token.text
    }

    pub fn unparse_into(&self, out: &mut String) {
        self.token.write_source(out);
    }
}

/// `ON CONFLICT (ROLLBACK|ABORT|FAIL|IGNORE|REPLACE)`.
#[derive(Debug, Clone)]
pub struct ConflictClause {
    pub on: Token,
    pub conflict: Token,
    pub verb: Token,
}

impl ConflictClause {
    pub fn verb_keyword(&self) -> Option<Keyword> {
        match self.verb.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn unparse_into(&self, out: &mut String) {
        self.on.write_source(out);
        self.conflict.write_source(out);
        self.verb.write_source(out);
    }
}

/// One element of an indexed-column list, e.g. inside
/// `PRIMARY KEY (a, b)`. The identifier is stored by value; resolution
/// against the column list happens at parse time.
#[derive(Debug, Clone)]
pub struct IndexedColumn {
    pub name: Ident,
    pub comma: Option<Token>,
}

impl IndexedColumn {
    pub fn unparse_into(&self, out: &mut String) {
        self.name.unparse_into(out);
        if let Some(comma) = &self.comma {
            comma.write_source(out);
        }
    }
}

fn same_indexed_columns(a: &[IndexedColumn], b: &[IndexedColumn]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.name.same(&y.name))
}

/// Optional `CONSTRAINT <name>` prefix shared by both constraint levels.
#[derive(Debug, Clone)]
pub struct ConstraintName {
    pub constraint_kw: Token,
    pub name: Ident,
}

impl ConstraintName {
    pub fn unparse_into(&self, out: &mut String) {
        self.constraint_kw.write_source(out);
        self.name.unparse_into(out);
    }
}

#[derive(Debug, Clone)]
pub struct TableConstraint {
    pub name: Option<ConstraintName>,
    pub body: TableConstraintBody,
    pub comma: Option<Token>,
}

impl TableConstraint {
    pub fn unparse_into(&self, out: &mut String) {
        if let Some(name) = &self.name {
            name.unparse_into(out);
        }
        self.body.unparse_into(out);
        if let Some(comma) = &self.comma {
            comma.write_source(out);
        }
    }
}

#[derive(Debug, Clone)]
pub enum TableConstraintBody {
    PrimaryKey(TablePrimaryKey),
    Unique(TableUnique),
    ForeignKey(TableForeignKey),
    Check(CheckConstraint),
}

impl TableConstraintBody {
    /// Kind-specific structural equality used for diff pairing. Two primary
    /// keys always pair (a table has at most one); other kinds compare
    /// their structural constituents.
    pub fn matches(&self, other: &TableConstraintBody) -> bool {
        match (self, other) {
            (TableConstraintBody::PrimaryKey(_), TableConstraintBody::PrimaryKey(_)) => true,
            (TableConstraintBody::Unique(a), TableConstraintBody::Unique(b)) => {
                same_indexed_columns(&a.columns, &b.columns)
            }
            (TableConstraintBody::ForeignKey(a), TableConstraintBody::ForeignKey(b)) => {
                same_indexed_columns(&a.columns, &b.columns) && a.clause.same(&b.clause)
            }
            (TableConstraintBody::Check(a), TableConstraintBody::Check(b)) => a.same(b),
            _ => false,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TableConstraintBody::PrimaryKey(_) => "primary key",
            TableConstraintBody::Unique(_) => "unique",
            TableConstraintBody::ForeignKey(_) => "foreign key",
            TableConstraintBody::Check(_) => "check",
        }
    }

    pub fn unparse_into(&self, out: &mut String) {
        match self {
            TableConstraintBody::PrimaryKey(n) => n.unparse_into(out),
            TableConstraintBody::Unique(n) => n.unparse_into(out),
            TableConstraintBody::ForeignKey(n) => n.unparse_into(out),
            TableConstraintBody::Check(n) => n.unparse_into(out),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TablePrimaryKey {
    pub primary: Token,
    pub key: Token,
    pub lparen: Token,
    pub columns: Vec<IndexedColumn>,
    pub rparen: Token,
    pub conflict: Option<ConflictClause>,
}

impl TablePrimaryKey {
    pub fn unparse_into(&self, out: &mut String) {
        self.primary.write_source(out);
        self.key.write_source(out);
        self.lparen.write_source(out);
        for col in &self.columns {
            col.unparse_into(out);
        }
        self.rparen.write_source(out);
        if let Some(conflict) = &self.conflict {
            conflict.unparse_into(out);
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableUnique {
    pub unique: Token,
    pub lparen: Token,
    pub columns: Vec<IndexedColumn>,
    pub rparen: Token,
    pub conflict: Option<ConflictClause>,
}

impl TableUnique {
    pub fn unparse_into(&self, out: &mut String) {
        self.unique.write_source(out);
        self.lparen.write_source(out);
        for col in &self.columns {
            col.unparse_into(out);
        }
        self.rparen.write_source(out);
        if let Some(conflict) = &self.conflict {
            conflict.unparse_into(out);
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableForeignKey {
    pub foreign: Token,
    pub key: Token,
    pub lparen: Token,
    pub columns: Vec<IndexedColumn>,
    pub rparen: Token,
    pub clause: ForeignKeyClause,
}

impl TableForeignKey {
    pub fn unparse_into(&self, out: &mut String) {
        self.foreign.write_source(out);
        self.key.write_source(out);
        self.lparen.write_source(out);
        for col in &self.columns {
            col.unparse_into(out);
        }
        self.rparen.write_source(out);
        self.clause.unparse_into(out);
    }
}

/// `REFERENCES <table> [(cols)] [ON DELETE|UPDATE <action>]*` — shared by
/// the table-level FOREIGN KEY form and the column-level REFERENCES form.
#[derive(Debug, Clone)]
pub struct ForeignKeyClause {
    pub references: Token,
    pub table: QualifiedName,
    pub columns: Option<ReferencedColumns>,
    pub actions: Vec<ForeignKeyAction>,
}

impl ForeignKeyClause {
    /// Structural equality: referenced table, referenced columns, and the
    /// action set must all match. Unqualified table names compare as-is;
    /// the differ's default-schema resolution applies only to the tables
    /// being diffed, not to references.
    pub fn same(&self, other: &ForeignKeyClause) -> bool {
        if self.table.schema_text() != other.table.schema_text()
            || self.table.name_text() != other.table.name_text()
        {
            return false;
        }
        let cols_match = match (&self.columns, &other.columns) {
            (None, None) => true,
            (Some(a), Some(b)) => same_indexed_columns(&a.columns, &b.columns),
            _ => false,
        };
        cols_match
            && self.actions.len() == other.actions.len()
            && self
                .actions
                .iter()
                .zip(&other.actions)
                .all(|(a, b)| a.same(b))
    }

    pub fn unparse_into(&self, out: &mut String) {
        self.references.write_source(out);
        self.table.unparse_into(out);
        if let Some(cols) = &self.columns {
            cols.unparse_into(out);
        }
        for action in &self.actions {
            action.unparse_into(out);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReferencedColumns {
    pub lparen: Token,
    pub columns: Vec<IndexedColumn>,
    pub rparen: Token,
}

impl ReferencedColumns {
    pub fn unparse_into(&self, out: &mut String) {
        self.lparen.write_source(out);
        for col in &self.columns {
            col.unparse_into(out);
        }
        self.rparen.write_source(out);
    }
}

/// `ON DELETE CASCADE`, `ON UPDATE SET NULL`, ...
#[derive(Debug, Clone)]
pub struct ForeignKeyAction {
    pub on: Token,
    /// `DELETE` or `UPDATE`.
    pub event: Token,
    pub action: ActionKind,
    /// The tokens spelling out the action (`SET` `NULL`, `CASCADE`, ...).
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    SetNull,
    SetDefault,
    Cascade,
    Restrict,
    NoAction,
}

impl ForeignKeyAction {
    pub fn same(&self, other: &ForeignKeyAction) -> bool {
        self.event.kind == other.event.kind && self.action == other.action
    }

    pub fn unparse_into(&self, out: &mut String) {
        self.on.write_source(out);
        self.event.write_source(out);
        for tok in &self.tokens {
            tok.write_source(out);
        }
    }
}

/// `CHECK ( ... )` with the body kept as a balanced, opaque token run.
/// Structural equality is token-text equality.
#[derive(Debug, Clone)]
pub struct CheckConstraint {
    pub check: Token,
    pub lparen: Token,
    pub tokens: Vec<Token>,
    pub rparen: Token,
}

impl CheckConstraint {
    pub fn same(&self, other: &CheckConstraint) -> bool {
        self.tokens.len() == other.tokens.len()
            && self
                .tokens
                .iter()
                .zip(&other.tokens)
                .all(|(a, b)| a.text == b.text)
    }

    pub fn unparse_into(&self, out: &mut String) {
        self.check.write_source(out);
        self.lparen.write_source(out);
        for tok in &self.tokens {
            tok.write_source(out);
        }
        self.rparen.write_source(out);
    }
}

#[derive(Debug, Clone)]
pub struct ColumnConstraint {
    pub name: Option<ConstraintName>,
    pub body: ColumnConstraintBody,
}

impl ColumnConstraint {
    pub fn unparse_into(&self, out: &mut String) {
        if let Some(name) = &self.name {
            name.unparse_into(out);
        }
        self.body.unparse_into(out);
    }
}

#[derive(Debug, Clone)]
pub enum ColumnConstraintBody {
    PrimaryKey(ColumnPrimaryKey),
    NotNull(NotNull),
    Unique(ColumnUnique),
    Default(DefaultConstraint),
    Collate(Collate),
    References(ForeignKeyClause),
    Check(CheckConstraint),
}

impl ColumnConstraintBody {
    /// Kind-specific structural equality for diff pairing, analogous to
    /// [`TableConstraintBody::matches`].
    pub fn matches(&self, other: &ColumnConstraintBody) -> bool {
        use ColumnConstraintBody as B;
        match (self, other) {
            (B::PrimaryKey(_), B::PrimaryKey(_)) => true,
            (B::NotNull(_), B::NotNull(_)) => true,
            (B::Unique(_), B::Unique(_)) => true,
            (B::Default(a), B::Default(b)) => a.same(b),
            (B::Collate(a), B::Collate(b)) => a.name.same(&b.name),
            (B::References(a), B::References(b)) => a.same(b),
            (B::Check(a), B::Check(b)) => a.same(b),
            _ => false,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ColumnConstraintBody::PrimaryKey(_) => "primary key",
            ColumnConstraintBody::NotNull(_) => "not null",
            ColumnConstraintBody::Unique(_) => "unique",
            ColumnConstraintBody::Default(_) => "default",
            ColumnConstraintBody::Collate(_) => "collate",
            ColumnConstraintBody::References(_) => "references",
            ColumnConstraintBody::Check(_) => "check",
        }
    }

    pub fn unparse_into(&self, out: &mut String) {
        match self {
            ColumnConstraintBody::PrimaryKey(n) => n.unparse_into(out),
            ColumnConstraintBody::NotNull(n) => n.unparse_into(out),
            ColumnConstraintBody::Unique(n) => n.unparse_into(out),
            ColumnConstraintBody::Default(n) => n.unparse_into(out),
            ColumnConstraintBody::Collate(n) => n.unparse_into(out),
            ColumnConstraintBody::References(n) => n.unparse_into(out),
            ColumnConstraintBody::Check(n) => n.unparse_into(out),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnPrimaryKey {
    pub primary: Token,
    pub key: Token,
    /// `ASC` or `DESC`.
    pub order: Option<Token>,
    pub conflict: Option<ConflictClause>,
    pub autoincrement: Option<Token>,
}

impl ColumnPrimaryKey {
    pub fn unparse_into(&self, out: &mut String) {
        self.primary.write_source(out);
        self.key.write_source(out);
        if let Some(order) = &self.order {
            order.write_source(out);
        }
        if let Some(conflict) = &self.conflict {
            conflict.unparse_into(out);
        }
        if let Some(autoinc) = &self.autoincrement {
            autoinc.write_source(out);
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotNull {
    pub not: Token,
    pub null: Token,
}

impl NotNull {
    pub fn unparse_into(&self, out: &mut String) {
        self.not.write_source(out);
        self.null.write_source(out);
    }
}

#[derive(Debug, Clone)]
pub struct ColumnUnique {
    pub unique: Token,
    pub conflict: Option<ConflictClause>,
}

impl ColumnUnique {
    pub fn unparse_into(&self, out: &mut String) {
        self.unique.write_source(out);
        if let Some(conflict) = &self.conflict {
            conflict.unparse_into(out);
        }
    }
}

#[derive(Debug, Clone)]
pub struct DefaultConstraint {
    pub default: Token,
    pub value: DefaultValue,
}

impl DefaultConstraint {
    /// Defaults pair when their value spellings match; a changed default
    /// therefore diffs as remove + add.
    pub fn same(&self, other: &DefaultConstraint) -> bool {
        self.value.text() == other.value.text()
    }

    pub fn unparse_into(&self, out: &mut String) {
        self.default.write_source(out);
        self.value.unparse_into(out);
    }
}

#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// A literal token: number, string, `NULL`, or a bare identifier.
    Literal(Token),
    /// `-` followed by a numeric literal.
    Signed { sign: Token, number: Token },
    /// A parenthesised, balanced token run kept opaque.
    Parenthesized {
        lparen: Token,
        tokens: Vec<Token>,
        rparen: Token,
    },
}

impl DefaultValue {
    /// Canonical spelling used for structural comparison.
    pub fn text(&self) -> String {
        match self {
            DefaultValue::Literal(tok) => tok.text.clone(),
            DefaultValue::Signed { sign, number } => format!("{}{}", sign.text, number.text),
            DefaultValue::Parenthesized { tokens, .. } => tokens
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn unparse_into(&self, out: &mut String) {
        match self {
            DefaultValue::Literal(tok) => tok.write_source(out),
            DefaultValue::Signed { sign, number } => {
                sign.write_source(out);
                number.write_source(out);
            }
            DefaultValue::Parenthesized {
                lparen,
                tokens,
                rparen,
            } => {
                lparen.write_source(out);
                for tok in tokens {
                    tok.write_source(out);
                }
                rparen.write_source(out);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collate {
    pub collate: Token,
    pub name: Ident,
}

impl Collate {
    pub fn unparse_into(&self, out: &mut String) {
        self.collate.write_source(out);
        self.name.unparse_into(out);
    }
}

/// Emitter-synthesised `ALTER TABLE` statement. Shares the printer with
/// parsed nodes; never appears in parse output.
#[derive(Debug, Clone)]
pub struct AlterTable {
    pub alter: Token,
    pub table: Token,
    pub name: QualifiedName,
    pub action: AlterAction,
}

impl AlterTable {
    pub fn unparse_into(&self, out: &mut String) {
        self.alter.write_source(out);
        self.table.write_source(out);
        self.name.unparse_into(out);
        self.action.unparse_into(out);
    }
}

#[derive(Debug, Clone)]
pub enum AlterAction {
    AddColumn(AddColumn),
    DropColumn(DropColumn),
}

impl AlterAction {
    pub fn unparse_into(&self, out: &mut String) {
        match self {
            AlterAction::AddColumn(n) => n.unparse_into(out),
            AlterAction::DropColumn(n) => n.unparse_into(out),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddColumn {
    pub add: Token,
    pub column: ColumnDefinition,
}

impl AddColumn {
    pub fn unparse_into(&self, out: &mut String) {
        self.add.write_source(out);
        self.column.unparse_into(out);
    }
}

#[derive(Debug, Clone)]
pub struct DropColumn {
    pub drop: Token,
    pub column: Ident,
}

impl DropColumn {
    pub fn unparse_into(&self, out: &mut String) {
        self.drop.write_source(out);
        self.column.unparse_into(out);
    }
}

/// Emitter-synthesised `DROP TABLE IF EXISTS` statement.
#[derive(Debug, Clone)]
pub struct DropTable {
    pub drop: Token,
    pub table: Token,
    pub if_exists: Option<IfExists>,
    pub name: QualifiedName,
}

impl DropTable {
    pub fn unparse_into(&self, out: &mut String) {
        self.drop.write_source(out);
        self.table.write_source(out);
        if let Some(ie) = &self.if_exists {
            ie.unparse_into(out);
        }
        self.name.unparse_into(out);
    }
}

#[derive(Debug, Clone)]
pub struct IfExists {
    pub if_kw: Token,
    pub exists_kw: Token,
}

impl IfExists {
    pub fn unparse_into(&self, out: &mut String) {
        self.if_kw.write_source(out);
        self.exists_kw.write_source(out);
    }
}
