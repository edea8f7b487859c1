//! Recursive-descent parser over the lossless lexer
//!
//! Two-level error model. Ordinary syntax and semantic problems are
//! recorded as [`Report`]s in offset-keyed maps (so one source position
//! reports once) and surface as a recoverable [`ParseFault`]; the fault
//! propagates to the statement boundary, where the parser synchronises on
//! `;` and continues with the next statement. Unimplemented productions
//! raise the `Unimplemented` sentinel instead, which the statement loop
//! refuses to swallow.

pub mod ddl;

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::ast::Program;
use crate::lexer::Lexer;
use crate::report::{Label, Report, ReportKind};
use crate::token::{Keyword, SourceText, TextRange, Token, TokenKind};

/// Stable diagnostic codes.
pub mod codes {
    /// Unexpected token.
    pub const SYNTAX: u32 = 1;
    /// Unresolved reference (e.g. indexed column not in the column list).
    pub const SEMANTIC: u32 = 2;
    /// Construct the grammar recognises but does not support.
    pub const UNSUPPORTED: u32 = 3;
}

/// The parser's abort channel.
///
/// `Recoverable` is the normal outcome of a failed production: the
/// diagnostic has already been recorded, and the statement loop
/// resynchronises. `Unimplemented` marks a branch that is missing on
/// purpose; it aborts the whole parse so it can surface as its own exit
/// code rather than being mistaken for a user error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFault {
    #[error("parse error")]
    Recoverable,
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),
}

pub struct Parser {
    lexer: Lexer,
    current: Token,
    /// Human-readable production names, innermost last. Attached to every
    /// diagnostic as notes.
    context: Vec<&'static str>,
    errors: BTreeMap<usize, Report>,
    warnings: BTreeMap<usize, Report>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            context: Vec::new(),
            errors: BTreeMap::new(),
            warnings: BTreeMap::new(),
        }
    }

    pub fn from_source(source: Arc<SourceText>) -> Self {
        Self::new(Lexer::new(source))
    }

    pub fn source(&self) -> &Arc<SourceText> {
        self.lexer.source()
    }

    /// Parse the whole token stream into a program.
    ///
    /// Recoverable faults are absorbed here, statement by statement; the
    /// only error this returns is the unimplemented sentinel. Callers must
    /// still check [`Parser::has_errors`] before trusting the result.
    pub fn parse_program(&mut self) -> Result<Program, ParseFault> {
        let mut statements = Vec::new();

        while !self.at_end() {
            let parsed = self.statement().and_then(|mut stmt| {
                let semi = self.expect(TokenKind::SemiColon)?;
                stmt.semicolon = Some(semi);
                Ok(stmt)
            });

            match parsed {
                Ok(stmt) => statements.push(stmt),
                Err(ParseFault::Unimplemented(what)) => {
                    return Err(ParseFault::Unimplemented(what));
                }
                Err(ParseFault::Recoverable) => {
                    self.synchronise(&[TokenKind::SemiColon]);
                }
            }
        }

        Ok(Program {
            statements,
            eof: self.current.clone(),
        })
    }

    // --- Token operations ---

    pub fn at_end(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    /// One token of lookahead past the current token. Clones the lexer,
    /// which is O(1) because the buffer is shared.
    pub fn peek(&self) -> Token {
        self.lexer.peek_token()
    }

    /// Consume and return the current token.
    pub fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    /// Consume the current token when it has the wanted kind; otherwise
    /// record a diagnostic and raise a recoverable fault.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseFault> {
        if self.current.kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    pub fn expect_keyword(&mut self, kw: Keyword) -> Result<Token, ParseFault> {
        self.expect(TokenKind::Keyword(kw))
    }

    /// Consume the current token only when it matches.
    pub fn accept(&mut self, kind: TokenKind) -> Option<Token> {
        if self.current.kind == kind {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn accept_keyword(&mut self, kw: Keyword) -> Option<Token> {
        self.accept(TokenKind::Keyword(kw))
    }

    // --- Context stack ---

    pub fn with_context<T>(&mut self, name: &'static str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.context.push(name);
        let result = f(self);
        self.context.pop();
        result
    }

    fn context_notes(&self) -> Vec<String> {
        self.context.iter().rev().map(|c| format!("in {c}")).collect()
    }

    // --- Diagnostics ---

    /// Record a syntax diagnostic at the current token and raise the
    /// recoverable fault.
    pub fn unexpected(&mut self, expected: &str) -> ParseFault {
        let found = self.current.kind.describe();
        let report = Report::new(ReportKind::ParseError)
            .with_code(codes::SYNTAX)
            .with_message(format!("expected {expected}, found {found}"))
            .with_label(Label {
                source: Arc::clone(self.lexer.source()),
                range: self.current.range,
                note: format!("expected {expected} here"),
            })
            .with_notes(self.context_notes());
        self.record_error(self.current.range.start, report);
        ParseFault::Recoverable
    }

    /// Record a syntax diagnostic anchored at an arbitrary range and raise
    /// the recoverable fault.
    pub fn error_at(&mut self, range: TextRange, message: impl Into<String>) -> ParseFault {
        let message = message.into();
        let report = Report::new(ReportKind::ParseError)
            .with_code(codes::SYNTAX)
            .with_message(message.clone())
            .with_label(Label {
                source: Arc::clone(self.lexer.source()),
                range,
                note: message,
            })
            .with_notes(self.context_notes());
        self.record_error(range.start, report);
        ParseFault::Recoverable
    }

    /// Record an unsupported-construct diagnostic at the current token and
    /// raise the recoverable fault.
    pub fn unsupported(&mut self, message: impl Into<String>) -> ParseFault {
        let message = message.into();
        let report = Report::new(ReportKind::ParseError)
            .with_code(codes::UNSUPPORTED)
            .with_message(message.clone())
            .with_label(Label {
                source: Arc::clone(self.lexer.source()),
                range: self.current.range,
                note: message,
            })
            .with_notes(self.context_notes());
        self.record_error(self.current.range.start, report);
        ParseFault::Recoverable
    }

    /// Record a semantic diagnostic without raising a fault: the caller
    /// keeps parsing the surrounding construct.
    pub fn semantic_error(&mut self, range: TextRange, message: impl Into<String>) {
        let message = message.into();
        let report = Report::new(ReportKind::SemanticError)
            .with_code(codes::SEMANTIC)
            .with_message(message.clone())
            .with_label(Label {
                source: Arc::clone(self.lexer.source()),
                range,
                note: message,
            })
            .with_notes(self.context_notes());
        self.record_error(range.start, report);
    }

    fn record_error(&mut self, offset: usize, report: Report) {
        // The first report for a position wins; deeper layers surfacing
        // the same token add nothing.
        self.errors.entry(offset).or_insert(report);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All recorded errors, in source order.
    pub fn errors(&self) -> impl Iterator<Item = &Report> {
        self.errors.values()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Report> {
        self.warnings.values()
    }

    // --- Recovery ---

    /// Skip forward until a member of the recovery set, then consume it.
    /// The canonical recovery set is `[';']`.
    pub fn synchronise(&mut self, recovery: &[TokenKind]) {
        while !self.at_end() && !recovery.contains(&self.current.kind) {
            self.advance();
        }
        if !self.at_end() {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(input: &str) -> Parser {
        Parser::from_source(SourceText::new("test.sql", input))
    }

    #[test]
    fn test_expect_consumes_on_match() {
        let mut p = parser("CREATE TABLE");
        let tok = p.expect_keyword(Keyword::Create).expect("create");
        assert_eq!(tok.kind, TokenKind::Keyword(Keyword::Create));
        assert_eq!(p.current().kind, TokenKind::Keyword(Keyword::Table));
        assert!(!p.has_errors());
    }

    #[test]
    fn test_expect_records_error_and_faults() {
        let mut p = parser("TABLE");
        let fault = p.expect_keyword(Keyword::Create).unwrap_err();
        assert_eq!(fault, ParseFault::Recoverable);
        assert!(p.has_errors());
        let report = p.errors().next().unwrap();
        assert!(report.message.contains("expected keyword 'create'"));
        assert!(report.message.contains("keyword 'table'"));
    }

    #[test]
    fn test_errors_deduplicate_by_offset() {
        let mut p = parser("TABLE");
        let _ = p.expect_keyword(Keyword::Create);
        let _ = p.expect_keyword(Keyword::Explain);
        assert_eq!(p.errors().count(), 1);
        // first report wins
        assert!(p.errors().next().unwrap().message.contains("'create'"));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut p = parser("CREATE TABLE");
        assert_eq!(p.peek().kind, TokenKind::Keyword(Keyword::Table));
        assert_eq!(p.current().kind, TokenKind::Keyword(Keyword::Create));
        p.advance();
        assert_eq!(p.current().kind, TokenKind::Keyword(Keyword::Table));
    }

    #[test]
    fn test_synchronise_stops_after_semicolon() {
        let mut p = parser("garbage tokens here ; CREATE");
        p.synchronise(&[TokenKind::SemiColon]);
        assert_eq!(p.current().kind, TokenKind::Keyword(Keyword::Create));
    }

    #[test]
    fn test_synchronise_runs_to_eof() {
        let mut p = parser("no recovery token");
        p.synchronise(&[TokenKind::SemiColon]);
        assert!(p.at_end());
    }

    #[test]
    fn test_context_notes_attached_to_reports() {
        let mut p = parser("42");
        p.with_context("statement", |p| {
            p.with_context("create table statement", |p| {
                let _ = p.expect_keyword(Keyword::Create);
            });
        });
        let report = p.errors().next().unwrap();
        assert_eq!(
            report.notes,
            vec![
                "in create table statement".to_string(),
                "in statement".to_string()
            ]
        );
    }
}
