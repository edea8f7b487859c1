//! Token model: kinds, keyword table, spans, trivia
//!
//! Tokens carry everything needed to reproduce the source byte-for-byte:
//! the exact lexeme range, plus the whitespace and comments (trivia) on
//! either side. The keyword table is a bidirectional string↔kind index
//! derived at compile time.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Shared, immutable source buffer addressed by rune index.
///
/// Multi-byte characters count as one position, so spans and columns are
/// rune offsets, not byte offsets. The buffer is `Arc`-shared between the
/// lexer, every token, and the diagnostic renderer; nothing mutates it
/// after lexing starts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceText {
    pub file_name: String,
    pub raw: Vec<char>,
}

impl SourceText {
    pub fn new(file_name: impl Into<String>, text: &str) -> Arc<Self> {
        Arc::new(Self {
            file_name: file_name.into(),
            raw: text.chars().collect(),
        })
    }

    /// Extract the text covered by a range.
    pub fn slice(&self, range: TextRange) -> String {
        self.raw[range.start.min(self.raw.len())..range.end.min(self.raw.len())]
            .iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Half-open rune-index interval `[start, end)` into the source buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// 1-based line/column position within a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileLocation {
    pub line: usize,
    pub col: usize,
}

/// SQL keywords, matched case-insensitively after an identifier is lexed.
///
/// `EnumString` + `IntoStaticStr` give the bidirectional index: string to
/// kind for the lexer, kind to string for diagnostics and emission.
/// `temp` is an alias for `temporary`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Keyword {
    Create,
    Explain,
    Query,
    Plan,
    #[strum(serialize = "temporary", serialize = "temp")]
    Temporary,
    Virtual,
    View,
    Trigger,
    Index,
    Table,
    As,
    If,
    Not,
    Exists,
    Null,

    Constraint,
    Primary,
    Foreign,
    Key,
    Unique,
    Check,
    Default,
    Collate,
    References,
    Generated,
    Autoincrement,

    Asc,
    Desc,
    On,
    Conflict,

    Rollback,
    Abort,
    Fail,
    Ignore,
    Replace,

    Delete,
    Update,
    Set,
    Cascade,
    Restrict,
    No,
    Action,

    Alter,
    Add,
    Drop,
}

impl Keyword {
    /// Look up an identifier in the keyword index. Case-insensitive.
    pub fn lookup(text: &str) -> Option<Keyword> {
        Keyword::from_str(text).ok()
    }

    /// The canonical lowercase spelling.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token kinds. Single-character punctuation gets one variant per rune;
/// keywords nest the [`Keyword`] enum so dispatch stays exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    /// A rune the lexer does not recognise. The parser reports it and
    /// resynchronises.
    Error,

    LParen,
    RParen,
    Comma,
    Period,
    SemiColon,
    Equal,
    Minus,
    Star,
    Slash,
    Bang,

    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    DecimalNumericLiteral,
    HexNumericLiteral,
    BinaryNumericLiteral,
    OctalNumericLiteral,
    StringLiteral,

    Identifier,
    Keyword(Keyword),
}

impl TokenKind {
    /// Keywords that can begin a constraint. The column-definition list
    /// terminates when one of these (or `)`) is seen.
    pub fn starts_constraint(&self) -> bool {
        matches!(
            self,
            TokenKind::Keyword(
                Keyword::Constraint
                    | Keyword::Primary
                    | Keyword::Foreign
                    | Keyword::Unique
                    | Keyword::Check
                    | Keyword::Default
                    | Keyword::Collate
                    | Keyword::References
                    | Keyword::Generated
            )
        )
    }

    /// Human-readable form for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Error => "unrecognised character".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Period => "'.'".to_string(),
            TokenKind::SemiColon => "';'".to_string(),
            TokenKind::Equal => "'='".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Bang => "'!'".to_string(),
            TokenKind::NotEqual => "'!='".to_string(),
            TokenKind::Greater => "'>'".to_string(),
            TokenKind::GreaterEqual => "'>='".to_string(),
            TokenKind::Less => "'<'".to_string(),
            TokenKind::LessEqual => "'<='".to_string(),
            TokenKind::DecimalNumericLiteral => "numeric literal".to_string(),
            TokenKind::HexNumericLiteral => "hex numeric literal".to_string(),
            TokenKind::BinaryNumericLiteral => "binary numeric literal".to_string(),
            TokenKind::OctalNumericLiteral => "octal numeric literal".to_string(),
            TokenKind::StringLiteral => "string literal".to_string(),
            TokenKind::Identifier => "identifier".to_string(),
            TokenKind::Keyword(kw) => format!("keyword '{}'", kw.as_str()),
        }
    }
}

/// One lexed token.
///
/// `text` is the cooked form: quoted identifiers and string literals have
/// their enclosing characters stripped. The raw lexeme (quotes included)
/// is always recoverable from `range` via the shared source buffer.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub leading_trivia: String,
    pub trailing_trivia: String,
    pub range: TextRange,
    pub location: FileLocation,
    pub source: Arc<SourceText>,
}

impl Token {
    /// A token built by the emitter rather than the lexer. Carries no span.
    pub fn synthetic(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            leading_trivia: String::new(),
            trailing_trivia: String::new(),
            range: TextRange::default(),
            location: FileLocation::default(),
            source: Arc::new(SourceText::default()),
        }
    }

    /// A synthetic keyword token with an uppercase spelling.
    pub fn keyword(kw: Keyword) -> Self {
        Self::synthetic(TokenKind::Keyword(kw), kw.as_str().to_uppercase())
    }

    pub fn is_synthetic(&self) -> bool {
        self.range.is_empty() && self.source.is_empty()
    }

    /// The raw lexeme as written in the source, quoting characters
    /// included. Synthetic tokens fall back to their cooked text.
    pub fn lexeme(&self) -> String {
        if self.is_synthetic() {
            self.text.clone()
        } else {
            self.source.slice(self.range)
        }
    }

    /// Append `leading + lexeme + trailing` — the lossless reconstruction
    /// unit for round-tripping source text.
    pub fn write_source(&self, out: &mut String) {
        out.push_str(&self.leading_trivia);
        out.push_str(&self.lexeme());
        out.push_str(&self.trailing_trivia);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} {{ kind: {}, text: '{}' }}",
            self.source.file_name,
            self.location.line,
            self.location.col,
            self.kind.describe(),
            self.text
        )
    }
}
