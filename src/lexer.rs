//! Lossless SQL lexer
//!
//! Produces tokens with leading and trailing trivia so the original text is
//! reproducible byte-for-byte. Two trivia modes: leading trivia swallows any
//! run of whitespace and comments before a token; trailing trivia stops just
//! after the first newline, so a comment at the end of a physical line stays
//! attached to the token that line belongs to.

use std::sync::Arc;

use crate::token::{FileLocation, Keyword, SourceText, TextRange, Token, TokenKind};

/// Cursor state over a shared source buffer.
///
/// Cloning is O(1): the buffer is behind an `Arc`, only the cursor is
/// copied. `peek_token` relies on this.
#[derive(Debug, Clone)]
pub struct Lexer {
    source: Arc<SourceText>,
    /// Rune index of the cursor.
    cur: usize,
    /// Rune index of the current beginning-of-line.
    bol: usize,
    /// Current row, 1-based.
    row: usize,
}

impl Lexer {
    pub fn new(source: Arc<SourceText>) -> Self {
        Self {
            source,
            cur: 0,
            bol: 0,
            row: 1,
        }
    }

    pub fn source(&self) -> &Arc<SourceText> {
        &self.source
    }

    pub fn at_end(&self) -> bool {
        self.cur >= self.source.raw.len()
    }

    fn current(&self) -> char {
        self.source.raw[self.cur]
    }

    fn peek_rune(&self) -> Option<char> {
        self.source.raw.get(self.cur + 1).copied()
    }

    fn eat(&mut self) -> char {
        let c = self.source.raw[self.cur];
        self.cur += 1;
        c
    }

    fn newline(&mut self) {
        self.bol = self.cur;
        self.row += 1;
    }

    /// Consume `\n`, spaces, tabs, and comments. Stops at the first
    /// non-trivia rune.
    fn consume_leading_trivia(&mut self) -> String {
        let start = self.cur;
        while !self.at_end() {
            match self.current() {
                '/' => {
                    if self.peek_rune() == Some('*') {
                        self.eat_block_comment();
                    } else {
                        break;
                    }
                }
                '\n' => {
                    self.eat();
                    self.newline();
                }
                ' ' | '\t' | '\r' => {
                    self.eat();
                }
                '-' => {
                    if self.peek_rune() == Some('-') {
                        self.eat_line_comment();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        self.source.slice(TextRange::new(start, self.cur))
    }

    /// Same grammar as leading trivia, but stops after consuming the first
    /// newline so the next token owns the whitespace of its own line.
    fn consume_trailing_trivia(&mut self) -> String {
        let start = self.cur;
        while !self.at_end() {
            match self.current() {
                '/' => {
                    if self.peek_rune() == Some('*') {
                        self.eat_block_comment();
                    } else {
                        break;
                    }
                }
                '\n' => {
                    self.eat();
                    self.newline();
                    break;
                }
                ' ' | '\t' | '\r' => {
                    self.eat();
                }
                '-' => {
                    if self.peek_rune() == Some('-') {
                        self.eat_line_comment();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        self.source.slice(TextRange::new(start, self.cur))
    }

    fn eat_block_comment(&mut self) {
        self.eat(); // '/'
        self.eat(); // '*'
        while !self.at_end() {
            if self.current() == '*' && self.peek_rune() == Some('/') {
                self.eat();
                self.eat();
                return;
            }
            if self.eat() == '\n' {
                self.newline();
            }
        }
    }

    fn eat_line_comment(&mut self) {
        // Leaves the terminating newline for the trivia loop.
        while !self.at_end() && self.current() != '\n' {
            self.eat();
        }
    }

    fn identifier(&mut self) -> String {
        let start = self.cur;
        while !self.at_end()
            && (self.current().is_alphanumeric() || self.current() == '_')
        {
            self.eat();
        }
        self.source.slice(TextRange::new(start, self.cur))
    }

    fn decimal_numeric(&mut self) -> String {
        let start = self.cur;
        let mut has_period = false;
        let mut has_exponent = false;

        while !self.at_end() {
            let c = self.current();
            if !has_period && c == '.' {
                self.eat();
                has_period = true;
                continue;
            }
            if !has_exponent && c == 'e' {
                self.eat();
                has_exponent = true;
                continue;
            }
            if !c.is_ascii_digit() {
                break;
            }
            self.eat();
        }

        if !self.at_end() && self.current() == 'f' {
            self.eat();
        }

        self.source.slice(TextRange::new(start, self.cur))
    }

    fn hex_numeric(&mut self) -> String {
        let start = self.cur;
        self.eat(); // 0
        self.eat(); // x
        while !self.at_end() && (self.current().is_ascii_hexdigit() || self.current() == '_') {
            self.eat();
        }
        self.source.slice(TextRange::new(start, self.cur))
    }

    fn binary_numeric(&mut self) -> String {
        let start = self.cur;
        self.eat(); // 0
        self.eat(); // b
        while !self.at_end() && matches!(self.current(), '0' | '1' | '_') {
            self.eat();
        }
        self.source.slice(TextRange::new(start, self.cur))
    }

    fn octal_numeric(&mut self) -> String {
        let start = self.cur;
        self.eat(); // 0
        self.eat(); // 0
        while !self.at_end() && (matches!(self.current(), '0'..='7') || self.current() == '_') {
            self.eat();
        }
        self.source.slice(TextRange::new(start, self.cur))
    }

    /// Quoted run terminated by `close`, honouring `\`-escapes when
    /// `escapable` is set. The enclosing characters are consumed but not
    /// part of the returned text.
    fn quoted(&mut self, close: char, escapable: bool) -> String {
        self.eat(); // opening quote
        let start = self.cur;
        let mut prev = '\0';
        while !self.at_end() {
            if self.current() == close && !(escapable && prev == '\\') {
                break;
            }
            prev = self.eat();
        }
        let end = self.cur;
        if !self.at_end() {
            self.eat(); // closing quote
        }
        self.source.slice(TextRange::new(start, end))
    }

    /// The token `next_token` would return, without advancing this lexer.
    pub fn peek_token(&self) -> Token {
        self.clone().next_token()
    }

    /// Lex one token: leading trivia, lexeme, then trailing trivia up to and
    /// including the newline that ends the token's physical line.
    pub fn next_token(&mut self) -> Token {
        let leading_trivia = self.consume_leading_trivia();

        if self.at_end() {
            let range = TextRange::new(self.cur, self.cur);
            return Token {
                kind: TokenKind::Eof,
                text: String::new(),
                leading_trivia,
                trailing_trivia: String::new(),
                range,
                location: FileLocation {
                    line: self.row,
                    col: self.cur - self.bol + 1,
                },
                source: Arc::clone(&self.source),
            };
        }

        let start = self.cur;
        let line = self.row;
        let (kind, text) = self.lex_one();
        let range = TextRange::new(start, self.cur);
        let location = FileLocation {
            line,
            col: start - self.bol + 1,
        };
        let trailing_trivia = self.consume_trailing_trivia();

        Token {
            kind,
            text,
            leading_trivia,
            trailing_trivia,
            range,
            location,
            source: Arc::clone(&self.source),
        }
    }

    fn lex_one(&mut self) -> (TokenKind, String) {
        let c = self.current();
        match c {
            ';' => (TokenKind::SemiColon, self.single()),
            ',' => (TokenKind::Comma, self.single()),
            '(' => (TokenKind::LParen, self.single()),
            ')' => (TokenKind::RParen, self.single()),
            '=' => (TokenKind::Equal, self.single()),
            '*' => (TokenKind::Star, self.single()),
            '/' => (TokenKind::Slash, self.single()),
            '!' => {
                self.eat();
                if !self.at_end() && self.current() == '=' {
                    self.eat();
                    (TokenKind::NotEqual, "!=".to_string())
                } else {
                    (TokenKind::Bang, "!".to_string())
                }
            }
            '>' => {
                self.eat();
                if !self.at_end() && self.current() == '=' {
                    self.eat();
                    (TokenKind::GreaterEqual, ">=".to_string())
                } else {
                    (TokenKind::Greater, ">".to_string())
                }
            }
            '<' => {
                self.eat();
                if !self.at_end() && self.current() == '=' {
                    self.eat();
                    (TokenKind::LessEqual, "<=".to_string())
                } else {
                    (TokenKind::Less, "<".to_string())
                }
            }
            '"' => (TokenKind::Identifier, self.quoted('"', true)),
            '`' => (TokenKind::Identifier, self.quoted('`', true)),
            '[' => (TokenKind::Identifier, self.quoted(']', false)),
            '\'' => (TokenKind::StringLiteral, self.quoted('\'', true)),
            '.' => {
                if self.peek_rune().is_some_and(|p| p.is_ascii_digit()) {
                    (TokenKind::DecimalNumericLiteral, self.decimal_numeric())
                } else {
                    (TokenKind::Period, self.single())
                }
            }
            // A '--' pair never reaches this point: the trivia pass has
            // already consumed line comments.
            '-' => (TokenKind::Minus, self.single()),
            '0' => match self.peek_rune() {
                Some(p) if p.to_ascii_lowercase() == 'x' => {
                    (TokenKind::HexNumericLiteral, self.hex_numeric())
                }
                Some(p) if p.to_ascii_lowercase() == 'b' => {
                    (TokenKind::BinaryNumericLiteral, self.binary_numeric())
                }
                Some('0') => (TokenKind::OctalNumericLiteral, self.octal_numeric()),
                _ => (TokenKind::DecimalNumericLiteral, self.decimal_numeric()),
            },
            '1'..='9' => (TokenKind::DecimalNumericLiteral, self.decimal_numeric()),
            _ if is_identifier_start(c) => {
                let text = self.identifier();
                match Keyword::lookup(&text) {
                    Some(kw) => (TokenKind::Keyword(kw), text),
                    None => (TokenKind::Identifier, text),
                }
            }
            _ => (TokenKind::Error, self.single()),
        }
    }

    fn single(&mut self) -> String {
        self.eat().to_string()
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexer(input: &str) -> Lexer {
        Lexer::new(SourceText::new("test.sql", input))
    }

    fn all_tokens(input: &str) -> Vec<Token> {
        let mut lex = lexer(input);
        let mut tokens = Vec::new();
        loop {
            let tok = lex.next_token();
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        tokens
    }

    /// Concatenating leading + lexeme + trailing for every token must
    /// reproduce the input byte-for-byte.
    fn round_trip(input: &str) -> String {
        let mut out = String::new();
        for tok in all_tokens(input) {
            tok.write_source(&mut out);
        }
        out
    }

    #[test]
    fn test_identifier_forms_all_unquote_to_same_text() {
        let toks = all_tokens("user_id [user_id] `user_id` \"user_id\"");
        assert_eq!(toks.len(), 5); // 4 identifiers + EOF
        for tok in &toks[..4] {
            assert_eq!(tok.kind, TokenKind::Identifier);
            assert_eq!(tok.text, "user_id");
        }
    }

    #[test]
    fn test_keywords_matched_case_insensitively() {
        let toks = all_tokens("CREATE table Temp");
        assert_eq!(toks[0].kind, TokenKind::Keyword(Keyword::Create));
        assert_eq!(toks[1].kind, TokenKind::Keyword(Keyword::Table));
        assert_eq!(toks[2].kind, TokenKind::Keyword(Keyword::Temporary));
        // The original spelling is preserved in the token text.
        assert_eq!(toks[1].text, "table");
    }

    #[test]
    fn test_punctuation_and_operators() {
        let toks = all_tokens("( ) , . ; = - * / ! != > >= < <=");
        let kinds: Vec<TokenKind> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Comma,
                TokenKind::Period,
                TokenKind::SemiColon,
                TokenKind::Equal,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Bang,
                TokenKind::NotEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_less_equal_is_one_token() {
        let toks = all_tokens("a <= b");
        assert_eq!(toks[1].kind, TokenKind::LessEqual);
        assert_eq!(toks[1].text, "<=");
    }

    #[test]
    fn test_numeric_bases() {
        let toks = all_tokens("42 0x1F_a0 0b10_01 0075 1.5 .25 1e10 3f");
        let kinds: Vec<TokenKind> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::DecimalNumericLiteral,
                TokenKind::HexNumericLiteral,
                TokenKind::BinaryNumericLiteral,
                TokenKind::OctalNumericLiteral,
                TokenKind::DecimalNumericLiteral,
                TokenKind::DecimalNumericLiteral,
                TokenKind::DecimalNumericLiteral,
                TokenKind::DecimalNumericLiteral,
                TokenKind::Eof,
            ]
        );
        assert_eq!(toks[1].text, "0x1F_a0");
        assert_eq!(toks[5].text, ".25");
        assert_eq!(toks[7].text, "3f");
    }

    #[test]
    fn test_string_literal_strips_quotes() {
        let toks = all_tokens("'hello world'");
        assert_eq!(toks[0].kind, TokenKind::StringLiteral);
        assert_eq!(toks[0].text, "hello world");
        // but the raw lexeme keeps them
        assert_eq!(toks[0].lexeme(), "'hello world'");
    }

    #[test]
    fn test_leading_comment_attaches_to_next_token() {
        let toks = all_tokens("-- hi\nCREATE TABLE t(a INT);");
        assert_eq!(toks[0].kind, TokenKind::Keyword(Keyword::Create));
        assert_eq!(toks[0].leading_trivia, "-- hi\n");
    }

    #[test]
    fn test_trailing_comment_stays_on_its_line() {
        // The comment after `INT` belongs to the INT token's trailing
        // trivia; the run of whitespace on the next line leads `b`.
        let toks = all_tokens("a INT -- first\n   b TEXT");
        let int_tok = &toks[1];
        assert_eq!(int_tok.text, "INT");
        assert_eq!(int_tok.trailing_trivia, " -- first\n");
        let b_tok = &toks[2];
        assert_eq!(b_tok.text, "b");
        assert_eq!(b_tok.leading_trivia, "   ");
    }

    #[test]
    fn test_block_comment_trivia() {
        let toks = all_tokens("/* table: users */\nCREATE");
        assert_eq!(toks[0].kind, TokenKind::Keyword(Keyword::Create));
        assert_eq!(toks[0].leading_trivia, "/* table: users */\n");
    }

    #[test]
    fn test_locations_are_one_based() {
        let toks = all_tokens("CREATE\n  TABLE");
        assert_eq!(toks[0].location, FileLocation { line: 1, col: 1 });
        assert_eq!(toks[1].location, FileLocation { line: 2, col: 3 });
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut lex = lexer("CREATE TABLE");
        let peeked = lex.peek_token();
        let next = lex.next_token();
        assert_eq!(peeked.kind, next.kind);
        assert_eq!(peeked.range, next.range);
        assert_eq!(lex.next_token().kind, TokenKind::Keyword(Keyword::Table));
    }

    #[test]
    fn test_round_trip_simple() {
        let input = "CREATE TABLE t (a INT, b TEXT);";
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn test_round_trip_with_comments_and_quoting() {
        let input =
            "-- leading\nCREATE TABLE \"users\" ( /* inline */ id integer );\n-- trailing\n";
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn test_round_trip_multiline() {
        let input = "CREATE TABLE t (\n    a INT, -- a\n    b TEXT\n);\n\nCREATE TABLE u (x REAL);\n";
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn test_unrecognised_rune_yields_error_token() {
        let toks = all_tokens("a % b");
        assert_eq!(toks[1].kind, TokenKind::Error);
        assert_eq!(toks[1].text, "%");
    }

    #[test]
    fn test_eof_token_has_empty_range_at_end() {
        let toks = all_tokens("a");
        let eof = toks.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert!(eof.range.is_empty());
        assert_eq!(eof.range.start, 1);
    }
}
