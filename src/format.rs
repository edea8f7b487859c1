//! Measure-then-render layout engine
//!
//! A group is first simulated in measure mode, which only tracks the
//! would-be column; if the content exceeds the configured width the group
//! is marked broken and soft `line` calls inside it render as hard
//! newlines. The measurement pass leaves no visible state behind, so the
//! closure runs twice with identical inputs.
//!
//! Padding at the start of a line comes from the innermost anchor when one
//! is active, otherwise from the indent level (four spaces per level).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatMode {
    Render,
    Measure,
}

/// Two-character identifier bracket, e.g. `""` or `` `` ``; empty disables
/// quoting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifierQuoting {
    start: String,
    end: String,
}

impl IdentifierQuoting {
    /// Build from a two-character string. Anything other than exactly two
    /// characters disables quoting, matching the permissive configuration
    /// surface.
    pub fn from_brackets(brackets: &str) -> Self {
        let chars: Vec<char> = brackets.chars().collect();
        if chars.len() == 2 {
            Self {
                start: chars[0].to_string(),
                end: chars[1].to_string(),
            }
        } else {
            Self::default()
        }
    }

    pub fn double_quotes() -> Self {
        Self::from_brackets("\"\"")
    }
}

pub const DEFAULT_MAX_WIDTH: usize = 80;

const INDENT_UNIT: &str = "    ";

/// The layout engine. Renders into an internal buffer; callers take the
/// finished string and write it to their sink.
#[derive(Debug)]
pub struct CoreFormatter {
    out: String,
    max_width: usize,
    quoting: IdentifierQuoting,

    column: usize,
    indent_level: usize,
    anchor_stack: Vec<usize>,

    mode: FormatMode,
    group_broken: bool,
}

impl CoreFormatter {
    pub fn new(max_width: usize, quoting: IdentifierQuoting) -> Self {
        Self {
            out: String::new(),
            max_width,
            quoting,
            column: 0,
            indent_level: 0,
            anchor_stack: Vec::new(),
            mode: FormatMode::Render,
            group_broken: false,
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn text(&mut self, s: &str) {
        let width = s.chars().count();
        if self.mode == FormatMode::Measure {
            self.column += width;
            return;
        }
        self.write_indent();
        self.out.push_str(s);
        self.column += width;
    }

    pub fn rune(&mut self, r: char) {
        if self.mode == FormatMode::Measure {
            self.column += 1;
            return;
        }
        self.write_indent();
        self.out.push(r);
        self.column += 1;
    }

    /// Emit `start + s + end` per the identifier quoting configuration.
    pub fn identifier(&mut self, s: &str) {
        let (start, end) = (self.quoting.start.clone(), self.quoting.end.clone());
        self.text(&start);
        self.text(s);
        self.text(&end);
    }

    pub fn space(&mut self) {
        self.rune(' ');
    }

    /// Soft line: a space while the enclosing group fits, a hard break once
    /// it is marked broken.
    pub fn line(&mut self) {
        if self.mode == FormatMode::Measure {
            self.column += 1; // measured as a space
            return;
        }
        if self.group_broken {
            self.hard_break();
        } else {
            self.space();
        }
    }

    /// Unconditional newline.
    pub fn hard_break(&mut self) {
        if self.mode == FormatMode::Measure {
            self.column = 0;
            return;
        }
        self.out.push('\n');
        self.column = 0;
    }

    pub fn indent(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent_level += 1;
        f(self);
        self.indent_level -= 1;
    }

    /// Pin the current column as the padding target for line starts within
    /// `f`. Anchors stack; the innermost wins.
    pub fn anchor(&mut self, f: impl FnOnce(&mut Self)) {
        let target = if self.column == 0 {
            self.padding()
        } else {
            self.column
        };
        self.anchor_stack.push(target);
        f(self);
        self.anchor_stack.pop();
    }

    /// Measure `f`; when the result would overflow the configured width,
    /// render it with soft lines broken.
    pub fn group(&mut self, f: impl Fn(&mut Self)) {
        let prev_mode = self.mode;
        let prev_column = self.column;
        let prev_broken = self.group_broken;

        self.mode = FormatMode::Measure;
        self.group_broken = false;
        f(self);

        let fits = self.column <= self.max_width;

        self.mode = prev_mode;
        self.column = prev_column;
        self.group_broken = !fits;

        if self.mode == FormatMode::Render {
            f(self);
        }

        self.group_broken = prev_broken;
    }

    fn write_indent(&mut self) {
        if self.column == 0 {
            let padding = self.padding();
            self.out.push_str(&" ".repeat(padding));
            self.column = padding;
        }
    }

    fn padding(&self) -> usize {
        match self.anchor_stack.last() {
            Some(anchor) => *anchor,
            None => self.indent_level * INDENT_UNIT.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(max_width: usize) -> CoreFormatter {
        CoreFormatter::new(max_width, IdentifierQuoting::double_quotes())
    }

    #[test]
    fn test_text_and_identifier_quoting() {
        let mut f = formatter(80);
        f.text("DROP TABLE ");
        f.identifier("users");
        assert_eq!(f.into_string(), "DROP TABLE \"users\"");
    }

    #[test]
    fn test_empty_quoting_emits_bare_identifiers() {
        let mut f = CoreFormatter::new(80, IdentifierQuoting::from_brackets(""));
        f.identifier("users");
        assert_eq!(f.into_string(), "users");
    }

    #[test]
    fn test_fitting_group_renders_soft_lines_as_spaces() {
        let mut f = formatter(80);
        f.group(|f| {
            f.text("a");
            f.line();
            f.text("b");
        });
        assert_eq!(f.into_string(), "a b");
    }

    #[test]
    fn test_overflowing_group_breaks_soft_lines() {
        let mut f = formatter(4);
        f.group(|f| {
            f.text("long");
            f.line();
            f.text("words");
        });
        assert_eq!(f.into_string(), "long\nwords");
    }

    #[test]
    fn test_indent_pads_line_starts() {
        let mut f = formatter(4);
        f.text("head");
        f.indent(|f| {
            f.group(|f| {
                f.line();
                f.text("body");
            });
        });
        f.hard_break();
        f.text("tail");
        assert_eq!(f.into_string(), "head\n    body\ntail");
    }

    #[test]
    fn test_anchor_aligns_following_lines() {
        let mut f = formatter(80);
        f.text("SELECT ");
        f.anchor(|f| {
            f.text("a,");
            f.hard_break();
            f.text("b");
        });
        assert_eq!(f.into_string(), "SELECT a,\n       b");
    }

    #[test]
    fn test_anchors_stack_and_pop() {
        let mut f = formatter(80);
        f.text("xx");
        f.anchor(|f| {
            f.text("yy");
            f.anchor(|f| {
                f.hard_break();
                f.text("inner");
            });
            f.hard_break();
            f.text("outer");
        });
        assert_eq!(f.into_string(), "xxyy\n    inner\n  outer");
    }

    #[test]
    fn test_measurement_leaves_no_visible_output() {
        let mut f = formatter(3);
        f.group(|f| {
            f.text("abcdef");
        });
        // rendered once, despite the measuring pass running the closure too
        assert_eq!(f.into_string(), "abcdef");
    }

    #[test]
    fn test_nested_group_can_fit_inside_broken_group() {
        let mut f = formatter(10);
        f.group(|f| {
            f.text("0123456789");
            f.line();
            f.group(|f| {
                f.text("ab");
                f.line();
                f.text("cd");
            });
        });
        // outer breaks, inner still fits on its own line
        assert_eq!(f.into_string(), "0123456789\nab cd");
    }

    #[test]
    fn test_hard_break_resets_measured_column() {
        let mut f = formatter(5);
        f.group(|f| {
            f.text("aaaa");
            f.hard_break();
            f.text("bbbb");
        });
        // measured column after the hard break never exceeds the width,
        // so soft lines would not have broken; output keeps the hard break
        assert_eq!(f.into_string(), "aaaa\nbbbb");
    }

    #[test]
    fn test_column_width_counts_runes_not_bytes() {
        let mut f = formatter(7);
        f.group(|f| {
            f.text("héllo");
            f.line();
            f.text("x");
        });
        // 5 runes + soft line + 1 rune = 7 columns, exactly fits; byte
        // counting would see 8 and break
        assert_eq!(f.into_string(), "héllo x");
    }
}
