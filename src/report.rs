//! Structured diagnostics with labelled source ranges
//!
//! A [`Report`] is a kind, a numeric code, a message, zero or more labels
//! pointing at ranges of the shared source buffer, and free-form notes.
//! The [`Renderer`] turns a report into the human-readable form:
//!
//! ```text
//! parse error[0001]: expected ';', found keyword 'create'
//!   ┌─ schema.sql:3:1
//!   │
//! 3 │ CREATE TABLE t (a INT)
//!   │ ^^^^^^ expected ';' here
//!   │
//!   = note: in statement
//! ```

use std::fmt;
use std::sync::Arc;

use crate::token::{SourceText, TextRange};

/// Diagnostic category. Semantic errors share the fate of syntax errors
/// (exit code 2); warnings render but never change the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    ParseError,
    SemanticError,
    Warning,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::ParseError => "parse error",
            ReportKind::SemanticError => "semantic error",
            ReportKind::Warning => "warning",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled range of source: which buffer, where, and what to say about it.
#[derive(Debug, Clone)]
pub struct Label {
    pub source: Arc<SourceText>,
    pub range: TextRange,
    pub note: String,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} {}",
            self.source.file_name, self.range.start, self.range.end, self.note
        )
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportKind,
    pub code: u32,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Report {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            code: 0,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = code;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_notes(mut self, notes: impl IntoIterator<Item = String>) -> Self {
        self.notes.extend(notes);
        self
    }
}

/// Maps a flat rune offset range onto displayable line coordinates.
#[derive(Debug)]
struct LineInfo {
    line_num: usize,
    content: String,
    /// 0-based column of the range start within this line.
    col: usize,
}

/// Renders reports into a caller-supplied sink. Opens no resources.
#[derive(Debug, Default)]
pub struct Renderer {
    gutter_width: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, report: &Report) -> String {
        let mut out = String::new();
        self.render_into(report, &mut out);
        out
    }

    pub fn render_into(&mut self, report: &Report, out: &mut String) {
        out.push_str(&format!(
            "{}[{:04}]: {}\n",
            report.kind, report.code, report.message
        ));

        for (i, label) in report.labels.iter().enumerate() {
            let lines = lines_in_range(&label.source, label.range);
            if lines.is_empty() {
                continue;
            }

            // Gutter sized to the widest line number in this snippet.
            let max_line = lines.last().map(|li| li.line_num).unwrap_or(0);
            self.gutter_width = max_line.to_string().len() + 1;

            let first = &lines[0];
            out.push_str(&format!(
                "{} ┌─ {}:{}:{}\n",
                self.pad(""),
                label.source.file_name,
                first.line_num,
                first.col + 1
            ));
            out.push_str(&format!("{} │\n", self.pad("")));

            for li in &lines {
                out.push_str(&format!(
                    "{} │ {}\n",
                    self.pad(&li.line_num.to_string()),
                    li.content
                ));
            }

            // Caret underline at the start of the range; widened to the
            // range length when it stays on one line.
            let mut pointer = format!("{} │ {}^", self.pad(""), " ".repeat(first.col));
            if lines.len() == 1 && label.range.len() > 1 {
                pointer.push_str(&"^".repeat(label.range.len() - 1));
            }
            if !label.note.is_empty() {
                pointer.push(' ');
                pointer.push_str(&label.note);
            }
            pointer.push('\n');
            out.push_str(&pointer);

            if i < report.labels.len() - 1 {
                out.push_str(&format!("{} │\n", self.pad("")));
            }
        }

        if !report.notes.is_empty() {
            out.push_str(&format!("{} │\n", self.pad("")));
            for note in &report.notes {
                out.push_str(&format!("{} = note: {}\n", self.pad(""), note));
            }
        }
    }

    fn pad(&self, s: &str) -> String {
        format!("{:>width$}", s, width = self.gutter_width)
    }
}

/// Collect the lines of `src` that intersect `range`, with the 0-based
/// column of the range start within its first line.
fn lines_in_range(src: &SourceText, range: TextRange) -> Vec<LineInfo> {
    let mut result = Vec::new();
    let text: String = src.raw.iter().collect();

    let mut current_line = 1usize;
    let mut line_start = 0usize;

    for content in text.split('\n') {
        let line_len = content.chars().count();
        let line_end = line_start + line_len;

        if line_end >= range.start && line_start <= range.end {
            let col = range.start.saturating_sub(line_start);
            result.push(LineInfo {
                line_num: current_line,
                content: content.to_string(),
                col,
            });
        }

        line_start = line_end + 1; // +1 for the '\n'
        current_line += 1;

        if line_start > range.end {
            break;
        }
    }

    result
}
