//! CREATE TABLE grammar
//!
//! A pragmatic subset of SQLite DDL. Statement dispatch lives here along
//! with every production below it. View, trigger, index, and virtual-table
//! creation are deliberate holes: they raise the unimplemented sentinel so
//! the pipeline can tell a missing feature from a user error.

use crate::ast::{
    ActionKind, CheckConstraint, Collate, ColumnConstraint, ColumnConstraintBody,
    ColumnDefinition, ColumnPrimaryKey, ColumnUnique, ConflictClause, ConstraintName, CreateTable,
    DefaultConstraint, DefaultValue, Explain, ForeignKeyAction, ForeignKeyClause, Ident,
    IfNotExists, IndexedColumn, NotNull, QualifiedName, ReferencedColumns, Statement,
    StatementKind, TableConstraint, TableConstraintBody, TableDefinition, TableForeignKey,
    TablePrimaryKey, TableUnique, TypeName,
};
use crate::parser::{ParseFault, Parser};
use crate::token::{Keyword, Token, TokenKind};

impl Parser {
    /// `statement := ('EXPLAIN' ('QUERY' 'PLAN')?)? createStatement`
    pub fn statement(&mut self) -> Result<Statement, ParseFault> {
        self.with_context("statement", |p| {
            let explain = p.maybe_explain()?;

            let kind = match p.current().kind {
                TokenKind::Keyword(Keyword::Create) => p.create_statement()?,
                _ => return Err(p.unexpected("a statement")),
            };

            Ok(Statement {
                explain,
                kind,
                semicolon: None,
            })
        })
    }

    fn maybe_explain(&mut self) -> Result<Option<Explain>, ParseFault> {
        let Some(explain) = self.accept_keyword(Keyword::Explain) else {
            return Ok(None);
        };
        let query_plan = match self.accept_keyword(Keyword::Query) {
            Some(query) => {
                let plan = self.expect_keyword(Keyword::Plan)?;
                Some((query, plan))
            }
            None => None,
        };
        Ok(Some(Explain { explain, query_plan }))
    }

    /// `createStatement := 'CREATE' ['TEMPORARY'] catalogObject`
    fn create_statement(&mut self) -> Result<StatementKind, ParseFault> {
        self.with_context("create statement", |p| {
            let create = p.expect_keyword(Keyword::Create)?;
            let temporary = p.accept_keyword(Keyword::Temporary);

            match p.current().kind {
                TokenKind::Keyword(Keyword::Table) => Ok(StatementKind::CreateTable(
                    p.create_table_statement(create, temporary)?,
                )),
                TokenKind::Keyword(Keyword::View) => {
                    Err(ParseFault::Unimplemented("create view statement"))
                }
                TokenKind::Keyword(Keyword::Trigger) => {
                    Err(ParseFault::Unimplemented("create trigger statement"))
                }
                TokenKind::Keyword(Keyword::Index) | TokenKind::Keyword(Keyword::Unique) => {
                    Err(ParseFault::Unimplemented("create index statement"))
                }
                TokenKind::Keyword(Keyword::Virtual) => {
                    Err(ParseFault::Unimplemented("create virtual table statement"))
                }
                _ => Err(p.unexpected("a catalog object after CREATE")),
            }
        })
    }

    fn create_table_statement(
        &mut self,
        create: Token,
        temporary: Option<Token>,
    ) -> Result<CreateTable, ParseFault> {
        self.with_context("create table statement", |p| {
            let table = p.expect_keyword(Keyword::Table)?;
            let if_not_exists = p.maybe_if_not_exists()?;
            let name = p.qualified_name()?;
            let definition = p.table_definition()?;
            let options = p.table_options();

            Ok(CreateTable {
                create,
                temporary,
                table,
                if_not_exists,
                name,
                definition,
                options,
            })
        })
    }

    /// `ifNotExists := 'IF' 'NOT' 'EXISTS'`
    fn maybe_if_not_exists(&mut self) -> Result<Option<IfNotExists>, ParseFault> {
        let Some(if_kw) = self.accept_keyword(Keyword::If) else {
            return Ok(None);
        };
        let not_kw = self.expect_keyword(Keyword::Not)?;
        let exists_kw = self.expect_keyword(Keyword::Exists)?;
        Ok(Some(IfNotExists {
            if_kw,
            not_kw,
            exists_kw,
        }))
    }

    /// `qualIdent := ident ('.' ident)?`
    fn qualified_name(&mut self) -> Result<QualifiedName, ParseFault> {
        self.with_context("qualified identifier", |p| {
            let first = p.identifier()?;
            match p.accept(TokenKind::Period) {
                Some(period) => {
                    let name = p.identifier()?;
                    Ok(QualifiedName {
                        schema: Some((first, period)),
                        name,
                    })
                }
                None => Ok(QualifiedName {
                    schema: None,
                    name: first,
                }),
            }
        })
    }

    pub(crate) fn identifier(&mut self) -> Result<Ident, ParseFault> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(Ident { token })
    }

    fn table_definition(&mut self) -> Result<TableDefinition, ParseFault> {
        self.with_context("table definition", |p| {
            let lparen = p.expect(TokenKind::LParen)?;
            let columns = p.column_definitions()?;
            let constraints = p.table_constraints(&columns)?;
            let rparen = p.expect(TokenKind::RParen)?;
            Ok(TableDefinition {
                lparen,
                columns,
                constraints,
                rparen,
            })
        })
    }

    /// Parse column definitions until `)` or a constraint-introducing
    /// keyword. A trailing comma before `)` is an error.
    fn column_definitions(&mut self) -> Result<Vec<ColumnDefinition>, ParseFault> {
        let mut columns = Vec::new();

        loop {
            let kind = self.current().kind;
            if kind == TokenKind::RParen || kind.starts_constraint() {
                break;
            }

            let mut def = self.column_definition()?;
            if self.current().kind == TokenKind::Comma {
                let comma = self.advance();
                if self.current().kind == TokenKind::RParen {
                    return Err(self.error_at(comma.range, "unexpected trailing comma"));
                }
                def.comma = Some(comma);
            }
            columns.push(def);
        }

        Ok(columns)
    }

    /// `columnDef := ident typeName columnConstraint*`
    fn column_definition(&mut self) -> Result<ColumnDefinition, ParseFault> {
        self.with_context("column definition", |p| {
            let name = p.identifier()?;
            let type_name = p.type_name()?;
            let constraints = p.column_constraints()?;
            Ok(ColumnDefinition {
                name,
                type_name,
                constraints,
                comma: None,
            })
        })
    }

    fn type_name(&mut self) -> Result<TypeName, ParseFault> {
        match self.current().kind {
            TokenKind::Identifier => Ok(TypeName {
                token: self.advance(),
            }),
            _ => Err(self.unexpected("a type name")),
        }
    }

    fn column_constraints(&mut self) -> Result<Vec<ColumnConstraint>, ParseFault> {
        let mut constraints = Vec::new();
        while !matches!(
            self.current().kind,
            TokenKind::Comma | TokenKind::RParen | TokenKind::Eof
        ) {
            constraints.push(self.column_constraint()?);
        }
        Ok(constraints)
    }

    /// `columnConstraint := ('CONSTRAINT' ident)? constraintBody`
    fn column_constraint(&mut self) -> Result<ColumnConstraint, ParseFault> {
        self.with_context("column constraint", |p| {
            let name = p.maybe_constraint_name()?;

            let body = match p.current().kind {
                TokenKind::Keyword(Keyword::Primary) => {
                    ColumnConstraintBody::PrimaryKey(p.column_primary_key()?)
                }
                TokenKind::Keyword(Keyword::Not) => {
                    let not = p.advance();
                    let null = p.expect_keyword(Keyword::Null)?;
                    ColumnConstraintBody::NotNull(NotNull { not, null })
                }
                TokenKind::Keyword(Keyword::Unique) => {
                    let unique = p.advance();
                    let conflict = p.maybe_conflict_clause()?;
                    ColumnConstraintBody::Unique(ColumnUnique { unique, conflict })
                }
                TokenKind::Keyword(Keyword::Default) => {
                    ColumnConstraintBody::Default(p.default_constraint()?)
                }
                TokenKind::Keyword(Keyword::Collate) => {
                    let collate = p.advance();
                    let name = p.identifier()?;
                    ColumnConstraintBody::Collate(Collate { collate, name })
                }
                TokenKind::Keyword(Keyword::References) => {
                    ColumnConstraintBody::References(p.foreign_key_clause()?)
                }
                TokenKind::Keyword(Keyword::Check) => {
                    ColumnConstraintBody::Check(p.check_constraint()?)
                }
                TokenKind::Keyword(Keyword::Generated) => {
                    return Err(p.unsupported("generated columns are not supported"));
                }
                _ => return Err(p.unexpected("a column constraint")),
            };

            Ok(ColumnConstraint { name, body })
        })
    }

    /// `primaryKey (col) := 'PRIMARY' 'KEY' ('ASC'|'DESC')? conflictClause?
    ///                      'AUTOINCREMENT'?`
    fn column_primary_key(&mut self) -> Result<ColumnPrimaryKey, ParseFault> {
        let primary = self.expect_keyword(Keyword::Primary)?;
        let key = self.expect_keyword(Keyword::Key)?;
        let order = self
            .accept_keyword(Keyword::Asc)
            .or_else(|| self.accept_keyword(Keyword::Desc));
        let conflict = self.maybe_conflict_clause()?;
        let autoincrement = self.accept_keyword(Keyword::Autoincrement);
        Ok(ColumnPrimaryKey {
            primary,
            key,
            order,
            conflict,
            autoincrement,
        })
    }

    fn default_constraint(&mut self) -> Result<DefaultConstraint, ParseFault> {
        let default = self.expect_keyword(Keyword::Default)?;
        let value = match self.current().kind {
            TokenKind::DecimalNumericLiteral
            | TokenKind::HexNumericLiteral
            | TokenKind::BinaryNumericLiteral
            | TokenKind::OctalNumericLiteral
            | TokenKind::StringLiteral
            | TokenKind::Identifier
            | TokenKind::Keyword(Keyword::Null) => DefaultValue::Literal(self.advance()),
            TokenKind::Minus => {
                let sign = self.advance();
                let number = self.expect(TokenKind::DecimalNumericLiteral)?;
                DefaultValue::Signed { sign, number }
            }
            TokenKind::LParen => {
                let lparen = self.advance();
                let (tokens, rparen) = self.balanced_tokens()?;
                DefaultValue::Parenthesized {
                    lparen,
                    tokens,
                    rparen,
                }
            }
            _ => return Err(self.unexpected("a default value")),
        };
        Ok(DefaultConstraint { default, value })
    }

    /// `conflictClause := 'ON' 'CONFLICT'
    ///                    ('ROLLBACK'|'ABORT'|'FAIL'|'IGNORE'|'REPLACE')`
    ///
    /// Only consumed when `ON` is actually a conflict clause; `ON DELETE` /
    /// `ON UPDATE` belong to foreign-key actions.
    fn maybe_conflict_clause(&mut self) -> Result<Option<ConflictClause>, ParseFault> {
        if self.current().kind != TokenKind::Keyword(Keyword::On) {
            return Ok(None);
        }
        let on = self.advance();
        let conflict = self.expect_keyword(Keyword::Conflict)?;
        let verb = match self.current().kind {
            TokenKind::Keyword(
                Keyword::Rollback
                | Keyword::Abort
                | Keyword::Fail
                | Keyword::Ignore
                | Keyword::Replace,
            ) => self.advance(),
            _ => {
                return Err(self.unexpected(
                    "a conflict action (ROLLBACK, ABORT, FAIL, IGNORE, or REPLACE)",
                ));
            }
        };
        Ok(Some(ConflictClause { on, conflict, verb }))
    }

    fn maybe_constraint_name(&mut self) -> Result<Option<ConstraintName>, ParseFault> {
        let Some(constraint_kw) = self.accept_keyword(Keyword::Constraint) else {
            return Ok(None);
        };
        let name = self.identifier()?;
        Ok(Some(ConstraintName {
            constraint_kw,
            name,
        }))
    }

    /// Parse table constraints until `)`.
    fn table_constraints(
        &mut self,
        columns: &[ColumnDefinition],
    ) -> Result<Vec<TableConstraint>, ParseFault> {
        let mut constraints = Vec::new();

        while self.current().kind != TokenKind::RParen {
            if self.at_end() {
                return Err(self.unexpected("')' at end of table definition"));
            }

            let mut constraint = self.table_constraint(columns)?;
            if self.current().kind == TokenKind::Comma {
                let comma = self.advance();
                if self.current().kind == TokenKind::RParen {
                    return Err(self.error_at(comma.range, "unexpected trailing comma"));
                }
                constraint.comma = Some(comma);
            }
            constraints.push(constraint);
        }

        Ok(constraints)
    }

    /// `tableConstraint := ('CONSTRAINT' ident)?
    ///                     (primaryKey | unique | check | foreignKey)`
    fn table_constraint(
        &mut self,
        columns: &[ColumnDefinition],
    ) -> Result<TableConstraint, ParseFault> {
        self.with_context("table constraint", |p| {
            let name = p.maybe_constraint_name()?;

            let body = match p.current().kind {
                TokenKind::Keyword(Keyword::Primary) => {
                    TableConstraintBody::PrimaryKey(p.table_primary_key(columns)?)
                }
                TokenKind::Keyword(Keyword::Unique) => {
                    TableConstraintBody::Unique(p.table_unique(columns)?)
                }
                TokenKind::Keyword(Keyword::Check) => {
                    TableConstraintBody::Check(p.check_constraint()?)
                }
                TokenKind::Keyword(Keyword::Foreign) => {
                    TableConstraintBody::ForeignKey(p.table_foreign_key(columns)?)
                }
                _ => return Err(p.unexpected("a table constraint")),
            };

            Ok(TableConstraint {
                name,
                body,
                comma: None,
            })
        })
    }

    /// `primaryKey (tbl) := 'PRIMARY' 'KEY' '(' indexedColumn
    ///                      (',' indexedColumn)* ')' conflictClause?`
    fn table_primary_key(
        &mut self,
        columns: &[ColumnDefinition],
    ) -> Result<TablePrimaryKey, ParseFault> {
        let primary = self.expect_keyword(Keyword::Primary)?;
        let key = self.expect_keyword(Keyword::Key)?;
        let lparen = self.expect(TokenKind::LParen)?;
        let indexed = self.indexed_columns(Some(columns))?;
        let rparen = self.expect(TokenKind::RParen)?;
        let conflict = self.maybe_conflict_clause()?;
        Ok(TablePrimaryKey {
            primary,
            key,
            lparen,
            columns: indexed,
            rparen,
            conflict,
        })
    }

    fn table_unique(&mut self, columns: &[ColumnDefinition]) -> Result<TableUnique, ParseFault> {
        let unique = self.expect_keyword(Keyword::Unique)?;
        let lparen = self.expect(TokenKind::LParen)?;
        let indexed = self.indexed_columns(Some(columns))?;
        let rparen = self.expect(TokenKind::RParen)?;
        let conflict = self.maybe_conflict_clause()?;
        Ok(TableUnique {
            unique,
            lparen,
            columns: indexed,
            rparen,
            conflict,
        })
    }

    fn table_foreign_key(
        &mut self,
        columns: &[ColumnDefinition],
    ) -> Result<TableForeignKey, ParseFault> {
        let foreign = self.expect_keyword(Keyword::Foreign)?;
        let key = self.expect_keyword(Keyword::Key)?;
        let lparen = self.expect(TokenKind::LParen)?;
        let indexed = self.indexed_columns(Some(columns))?;
        let rparen = self.expect(TokenKind::RParen)?;
        let clause = self.foreign_key_clause()?;
        Ok(TableForeignKey {
            foreign,
            key,
            lparen,
            columns: indexed,
            rparen,
            clause,
        })
    }

    /// `'REFERENCES' qualIdent ('(' ident (',' ident)* ')')?
    ///  ('ON' ('DELETE'|'UPDATE') action)*`
    fn foreign_key_clause(&mut self) -> Result<ForeignKeyClause, ParseFault> {
        self.with_context("foreign key clause", |p| {
            let references = p.expect_keyword(Keyword::References)?;
            let table = p.qualified_name()?;

            let columns = match p.accept(TokenKind::LParen) {
                Some(lparen) => {
                    // Referenced columns belong to the parent table; there
                    // is nothing local to resolve them against.
                    let cols = p.indexed_columns(None)?;
                    let rparen = p.expect(TokenKind::RParen)?;
                    Some(ReferencedColumns {
                        lparen,
                        columns: cols,
                        rparen,
                    })
                }
                None => None,
            };

            let mut actions = Vec::new();
            while p.current().kind == TokenKind::Keyword(Keyword::On) {
                match p.peek().kind {
                    TokenKind::Keyword(Keyword::Delete | Keyword::Update) => {
                        actions.push(p.foreign_key_action()?);
                    }
                    _ => break,
                }
            }

            Ok(ForeignKeyClause {
                references,
                table,
                columns,
                actions,
            })
        })
    }

    fn foreign_key_action(&mut self) -> Result<ForeignKeyAction, ParseFault> {
        let on = self.expect_keyword(Keyword::On)?;
        let event = match self.current().kind {
            TokenKind::Keyword(Keyword::Delete | Keyword::Update) => self.advance(),
            _ => return Err(self.unexpected("DELETE or UPDATE")),
        };

        let (action, tokens) = match self.current().kind {
            TokenKind::Keyword(Keyword::Set) => {
                let set = self.advance();
                match self.current().kind {
                    TokenKind::Keyword(Keyword::Null) => {
                        (ActionKind::SetNull, vec![set, self.advance()])
                    }
                    TokenKind::Keyword(Keyword::Default) => {
                        (ActionKind::SetDefault, vec![set, self.advance()])
                    }
                    _ => return Err(self.unexpected("NULL or DEFAULT after SET")),
                }
            }
            TokenKind::Keyword(Keyword::Cascade) => (ActionKind::Cascade, vec![self.advance()]),
            TokenKind::Keyword(Keyword::Restrict) => (ActionKind::Restrict, vec![self.advance()]),
            TokenKind::Keyword(Keyword::No) => {
                let no = self.advance();
                let action = self.expect_keyword(Keyword::Action)?;
                (ActionKind::NoAction, vec![no, action])
            }
            _ => return Err(self.unexpected("a foreign key action")),
        };

        Ok(ForeignKeyAction {
            on,
            event,
            action,
            tokens,
        })
    }

    /// Indexed columns separated by commas. When `resolve_against` is
    /// given, each name must match a column in that list; a miss records a
    /// semantic diagnostic on the offending identifier but parsing of the
    /// surrounding construct continues.
    fn indexed_columns(
        &mut self,
        resolve_against: Option<&[ColumnDefinition]>,
    ) -> Result<Vec<IndexedColumn>, ParseFault> {
        self.with_context("indexed column", |p| {
            let mut columns = Vec::new();
            loop {
                let name = p.identifier()?;
                if let Some(defs) = resolve_against
                    && !defs.iter().any(|c| c.name.text() == name.text())
                {
                    p.semantic_error(
                        name.token.range,
                        format!(
                            "no column named '{}' in this table definition",
                            name.text()
                        ),
                    );
                }
                let comma = p.accept(TokenKind::Comma);
                let done = comma.is_none();
                columns.push(IndexedColumn { name, comma });
                if done {
                    break;
                }
            }
            Ok(columns)
        })
    }

    /// `'CHECK' '(' ... ')'` with a balanced, opaque body.
    fn check_constraint(&mut self) -> Result<CheckConstraint, ParseFault> {
        let check = self.expect_keyword(Keyword::Check)?;
        let lparen = self.expect(TokenKind::LParen)?;
        let (tokens, rparen) = self.balanced_tokens()?;
        Ok(CheckConstraint {
            check,
            lparen,
            tokens,
            rparen,
        })
    }

    /// Collect tokens up to the `)` matching an already-consumed `(`.
    fn balanced_tokens(&mut self) -> Result<(Vec<Token>, Token), ParseFault> {
        let mut tokens = Vec::new();
        let mut depth = 1usize;
        loop {
            match self.current().kind {
                TokenKind::Eof => {
                    return Err(self.unexpected("')' to close the expression"));
                }
                TokenKind::LParen => {
                    depth += 1;
                    tokens.push(self.advance());
                }
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok((tokens, self.advance()));
                    }
                    tokens.push(self.advance());
                }
                _ => tokens.push(self.advance()),
            }
        }
    }

    /// Opaque table options after the closing `)`: identifier and comma
    /// runs such as `WITHOUT ROWID, STRICT`. Keywords stop the run so a
    /// following statement is never swallowed.
    fn table_options(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while matches!(self.current().kind, TokenKind::Identifier | TokenKind::Comma) {
            tokens.push(self.advance());
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::SourceText;

    fn parser(input: &str) -> Parser {
        Parser::from_source(SourceText::new("test.sql", input))
    }

    fn parse_ok(input: &str) -> crate::ast::Program {
        let mut p = parser(input);
        let program = p.parse_program().expect("no unimplemented branch");
        let errors: Vec<String> = p.errors().map(|e| e.message.clone()).collect();
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        program
    }

    fn single_create(input: &str) -> CreateTable {
        let program = parse_ok(input);
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0].kind {
            StatementKind::CreateTable(ct) => ct.clone(),
            other => panic!("expected create table, got {other:?}"),
        }
    }

    #[test]
    fn test_create_table_basic() {
        let ct = single_create("CREATE TABLE t (a INT, b TEXT);");
        assert_eq!(ct.name.name_text(), "t");
        assert_eq!(ct.definition.columns.len(), 2);
        assert_eq!(ct.definition.columns[0].name.text(), "a");
        assert_eq!(ct.definition.columns[0].type_name.text(), "INT");
        assert_eq!(ct.definition.columns[1].name.text(), "b");
        assert!(ct.definition.constraints.is_empty());
    }

    #[test]
    fn test_create_table_if_not_exists_and_schema() {
        let ct = single_create("CREATE TABLE IF NOT EXISTS aux.users (id integer);");
        assert!(ct.if_not_exists.is_some());
        assert_eq!(ct.name.schema_text(), Some("aux"));
        assert_eq!(ct.name.name_text(), "users");
    }

    #[test]
    fn test_create_temporary_table() {
        let ct = single_create("CREATE TEMP TABLE scratch (x REAL);");
        assert!(ct.temporary.is_some());
        assert_eq!(ct.name.name_text(), "scratch");
    }

    #[test]
    fn test_column_primary_key_autoincrement() {
        let ct = single_create("CREATE TABLE users (id integer PRIMARY KEY AUTOINCREMENT);");
        let col = &ct.definition.columns[0];
        assert_eq!(col.constraints.len(), 1);
        match &col.constraints[0].body {
            ColumnConstraintBody::PrimaryKey(pk) => {
                assert!(pk.autoincrement.is_some());
                assert!(pk.order.is_none());
                assert!(pk.conflict.is_none());
            }
            other => panic!("expected primary key, got {other:?}"),
        }
    }

    #[test]
    fn test_column_constraints_not_null_default() {
        let ct = single_create("CREATE TABLE t (a INT NOT NULL DEFAULT 0);");
        let col = &ct.definition.columns[0];
        assert_eq!(col.constraints.len(), 2);
        assert!(matches!(
            col.constraints[0].body,
            ColumnConstraintBody::NotNull(_)
        ));
        match &col.constraints[1].body {
            ColumnConstraintBody::Default(d) => assert_eq!(d.value.text(), "0"),
            other => panic!("expected default, got {other:?}"),
        }
    }

    #[test]
    fn test_column_default_signed_and_parenthesized() {
        let ct = single_create(
            "CREATE TABLE t (a INT DEFAULT -1, b TEXT DEFAULT 'x', c INT DEFAULT (1 = 2));",
        );
        let defaults: Vec<String> = ct
            .definition
            .columns
            .iter()
            .map(|c| match &c.constraints[0].body {
                ColumnConstraintBody::Default(d) => d.value.text(),
                other => panic!("expected default, got {other:?}"),
            })
            .collect();
        assert_eq!(defaults, vec!["-1", "x", "1 = 2"]);
    }

    #[test]
    fn test_conflict_clause_on_column_pk() {
        let ct = single_create("CREATE TABLE t (id INT PRIMARY KEY DESC ON CONFLICT REPLACE);");
        match &ct.definition.columns[0].constraints[0].body {
            ColumnConstraintBody::PrimaryKey(pk) => {
                assert_eq!(pk.order.as_ref().unwrap().text, "DESC");
                let conflict = pk.conflict.as_ref().unwrap();
                assert_eq!(conflict.verb_keyword(), Some(Keyword::Replace));
            }
            other => panic!("expected primary key, got {other:?}"),
        }
    }

    #[test]
    fn test_named_column_constraint() {
        let ct = single_create("CREATE TABLE t (a INT CONSTRAINT a_nn NOT NULL);");
        let constraint = &ct.definition.columns[0].constraints[0];
        assert_eq!(constraint.name.as_ref().unwrap().name.text(), "a_nn");
    }

    #[test]
    fn test_table_primary_key_resolves_columns() {
        let ct = single_create("CREATE TABLE t (a INT, b TEXT, PRIMARY KEY (a, b));");
        assert_eq!(ct.definition.constraints.len(), 1);
        match &ct.definition.constraints[0].body {
            TableConstraintBody::PrimaryKey(pk) => {
                let names: Vec<&str> = pk.columns.iter().map(|c| c.name.text()).collect();
                assert_eq!(names, vec!["a", "b"]);
            }
            other => panic!("expected primary key, got {other:?}"),
        }
    }

    #[test]
    fn test_unresolved_indexed_column_is_semantic_error_but_parse_continues() {
        let mut p = parser("CREATE TABLE t (a INT, PRIMARY KEY (missing));");
        let program = p.parse_program().expect("no unimplemented branch");
        // The statement still parsed...
        assert_eq!(program.statements.len(), 1);
        // ...but the unresolved name was reported.
        assert!(p.has_errors());
        let report = p.errors().next().unwrap();
        assert!(report.message.contains("no column named 'missing'"));
    }

    #[test]
    fn test_table_unique_and_check() {
        let ct = single_create("CREATE TABLE t (a INT, b INT, UNIQUE (a, b), CHECK (a > 0));");
        assert_eq!(ct.definition.constraints.len(), 2);
        assert!(matches!(
            ct.definition.constraints[0].body,
            TableConstraintBody::Unique(_)
        ));
        match &ct.definition.constraints[1].body {
            TableConstraintBody::Check(check) => {
                let texts: Vec<&str> = check.tokens.iter().map(|t| t.text.as_str()).collect();
                assert_eq!(texts, vec!["a", ">", "0"]);
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn test_check_with_nested_parens() {
        let ct = single_create("CREATE TABLE t (a INT, CHECK ((a > 0) != (a = 5)));");
        match &ct.definition.constraints[0].body {
            TableConstraintBody::Check(check) => {
                assert_eq!(check.tokens.len(), 11);
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn test_table_foreign_key() {
        let ct = single_create(
            "CREATE TABLE orders (id INT, user_id INT, \
             FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE);",
        );
        match &ct.definition.constraints[0].body {
            TableConstraintBody::ForeignKey(fk) => {
                assert_eq!(fk.columns[0].name.text(), "user_id");
                assert_eq!(fk.clause.table.name_text(), "users");
                let cols = fk.clause.columns.as_ref().unwrap();
                assert_eq!(cols.columns[0].name.text(), "id");
                assert_eq!(fk.clause.actions.len(), 1);
                assert_eq!(fk.clause.actions[0].action, ActionKind::Cascade);
            }
            other => panic!("expected foreign key, got {other:?}"),
        }
    }

    #[test]
    fn test_column_references_constraint() {
        let ct = single_create(
            "CREATE TABLE orders (user_id INT REFERENCES users (id) ON UPDATE SET NULL);",
        );
        match &ct.definition.columns[0].constraints[0].body {
            ColumnConstraintBody::References(clause) => {
                assert_eq!(clause.table.name_text(), "users");
                assert_eq!(clause.actions[0].action, ActionKind::SetNull);
            }
            other => panic!("expected references, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_comma_is_an_error() {
        let mut p = parser("CREATE TABLE t (a INT,);");
        let _ = p.parse_program().expect("no unimplemented branch");
        assert!(p.has_errors());
        assert!(
            p.errors()
                .any(|e| e.message.contains("unexpected trailing comma"))
        );
    }

    #[test]
    fn test_recovery_at_statement_boundary() {
        let mut p = parser("CREATE TABLE broken (42);\nCREATE TABLE ok (a INT);");
        let program = p.parse_program().expect("no unimplemented branch");
        // First statement failed, second survived recovery.
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0].kind {
            StatementKind::CreateTable(ct) => assert_eq!(ct.name.name_text(), "ok"),
            other => panic!("expected create table, got {other:?}"),
        }
        assert!(p.has_errors());
    }

    #[test]
    fn test_missing_semicolon_recovers_into_next_statement() {
        let mut p = parser("CREATE TABLE a (x INT)\nCREATE TABLE b (y INT);");
        let program = p.parse_program().expect("no unimplemented branch");
        assert!(p.has_errors());
        // Recovery consumed up to the `;`, so nothing useful was kept, but
        // the parser terminated cleanly.
        assert!(program.statements.len() <= 1);
    }

    #[test]
    fn test_create_view_is_unimplemented_sentinel() {
        let mut p = parser("CREATE VIEW v AS SELECT 1;");
        let err = p.parse_program().unwrap_err();
        assert_eq!(err, ParseFault::Unimplemented("create view statement"));
    }

    #[test]
    fn test_create_virtual_table_is_unimplemented_sentinel() {
        let mut p = parser("CREATE VIRTUAL TABLE fts USING fts5(body);");
        let err = p.parse_program().unwrap_err();
        assert_eq!(
            err,
            ParseFault::Unimplemented("create virtual table statement")
        );
    }

    #[test]
    fn test_generated_column_reports_unsupported() {
        let mut p = parser("CREATE TABLE t (a INT, b INT GENERATED ALWAYS AS (a * 2));");
        let _ = p.parse_program().expect("generated is recoverable");
        assert!(p.has_errors());
        assert!(
            p.errors()
                .any(|e| e.message.contains("generated columns are not supported"))
        );
    }

    #[test]
    fn test_explain_query_plan_prefix() {
        let program = parse_ok("EXPLAIN QUERY PLAN CREATE TABLE t (a INT);");
        let stmt = &program.statements[0];
        let explain = stmt.explain.as_ref().unwrap();
        assert!(explain.query_plan.is_some());
    }

    #[test]
    fn test_unparse_reproduces_source_exactly() {
        let input = "-- schema\nCREATE TABLE t (\n    a INT NOT NULL, -- key\n    b TEXT\n);\n";
        let program = parse_ok(input);
        assert_eq!(program.unparse(), input);
    }

    #[test]
    fn test_unparse_preserves_quoting_and_comments() {
        let input = "/* users: main */\nCREATE TABLE \"users\" (`id` integer, [name] text);\n";
        let program = parse_ok(input);
        assert_eq!(program.unparse(), input);
    }

    #[test]
    fn test_unparse_covers_constraints_and_options() {
        let input = "CREATE TABLE t (a INT, b INT, PRIMARY KEY (a) ON CONFLICT ABORT, \
                     UNIQUE (b), CHECK (a > 0)) WITHOUT ROWID;\n";
        let program = parse_ok(input);
        assert_eq!(program.unparse(), input);
    }

    #[test]
    fn test_reparse_of_unparse_is_structurally_equal() {
        let input = "CREATE TABLE t (a INT, b TEXT, PRIMARY KEY (a));";
        let first = parse_ok(input);
        let second = parse_ok(&first.unparse());
        let differ = crate::diff::Differ::new("main");
        assert!(differ.diff_schema(&first, &second).is_empty());
    }

    #[test]
    fn test_leading_comment_lands_in_create_token_trivia() {
        let program = parse_ok("-- hi\nCREATE TABLE t(a INT);");
        match &program.statements[0].kind {
            StatementKind::CreateTable(ct) => {
                assert_eq!(ct.create.leading_trivia, "-- hi\n");
            }
            other => panic!("expected create table, got {other:?}"),
        }
    }
}
