// ABOUTME: Error types for lexing, parsing, and evaluation failures

use crate::context::Context;
use crate::position::Span;
use std::rc::Rc;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, ThisError)]
pub enum Error {
    #[error("{}", .0.render("Illegal Character"))]
    IllegalChar(Diagnostic),

    #[error("{}", .0.render("Expected Character"))]
    ExpectedChar(Diagnostic),

    #[error("{}", .0.render("Invalid Syntax"))]
    InvalidSyntax(Diagnostic),

    #[error("{0}")]
    Runtime(RuntimeError),
}

impl Error {
    pub fn illegal_char(span: Span, details: impl Into<String>) -> Self {
        Error::IllegalChar(Diagnostic {
            span,
            details: details.into(),
        })
    }

    pub fn expected_char(span: Span, details: impl Into<String>) -> Self {
        Error::ExpectedChar(Diagnostic {
            span,
            details: details.into(),
        })
    }

    pub fn invalid_syntax(span: Span, details: impl Into<String>) -> Self {
        Error::InvalidSyntax(Diagnostic {
            span,
            details: details.into(),
        })
    }

    /// The bare message, without location or traceback.
    pub fn details(&self) -> &str {
        match self {
            Error::IllegalChar(d) | Error::ExpectedChar(d) | Error::InvalidSyntax(d) => &d.details,
            Error::Runtime(e) => &e.details,
        }
    }
}

impl From<RuntimeError> for Error {
    fn from(error: RuntimeError) -> Self {
        Error::Runtime(error)
    }
}

/// A lex- or parse-phase error: a message anchored to a span.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub span: Span,
    pub details: String,
}

impl Diagnostic {
    fn render(&self, name: &str) -> String {
        format!(
            "{name}: {}\nFile {}, line {}\n\n{}",
            self.details,
            self.span.src.file_name,
            self.span.start.line + 1,
            underline(&self.span)
        )
    }
}

/// An evaluation-phase error. Carries the dynamic call frame at the failure
/// point so the traceback can be reconstructed.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub span: Span,
    pub details: String,
    pub context: Rc<Context>,
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

impl std::error::Error for RuntimeError {}

impl RuntimeError {
    pub fn new(span: Span, details: impl Into<String>, context: Rc<Context>) -> Self {
        RuntimeError {
            span,
            details: details.into(),
            context,
        }
    }

    fn render(&self) -> String {
        format!(
            "{}Runtime Error: {}\n\n{}",
            self.traceback(),
            self.details,
            underline(&self.span)
        )
    }

    /// One frame per dynamic context, outermost first.
    fn traceback(&self) -> String {
        let mut frames = Vec::new();
        let mut span = Some(self.span.clone());
        let mut context = Some(Rc::clone(&self.context));

        while let Some(ctx) = context {
            if let Some(s) = &span {
                frames.push(format!(
                    "    File {}, line {}, in {}\n",
                    s.src.file_name,
                    s.start.line + 1,
                    ctx.display_name
                ));
            }
            span = ctx.parent_entry_pos.clone();
            context = ctx.parent.clone();
        }

        frames.reverse();
        let mut out = String::from("Traceback (most recent call last):\n");
        for frame in &frames {
            out.push_str(frame);
        }
        out
    }
}

/// Render the source lines covered by `span` with a `^` underline beneath
/// the offending columns.
pub fn underline(span: &Span) -> String {
    let src = &span.src;
    let start = span.start;

    // The end position is exclusive; a span ending exactly on a line break
    // should not drag an empty extra line into the rendering.
    let mut last_line = span.end.line;
    let mut last_col = span.end.col;
    if last_line > start.line && last_col == 0 {
        last_line -= 1;
        last_col = src.line(last_line).chars().count();
    }

    let mut out = String::new();
    for line_no in start.line..=last_line {
        let line = src.line(line_no);
        let width = line.chars().count();
        let col_start = if line_no == start.line { start.col } else { 0 };
        let col_end = if line_no == last_line { last_col } else { width };
        let carets = col_end.saturating_sub(col_start).max(1);

        out.push_str(line);
        out.push('\n');
        out.push_str(&" ".repeat(col_start));
        out.push_str(&"^".repeat(carets));
        if line_no != last_line {
            out.push('\n');
        }
    }
    out.replace('\t', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Position, Source};

    fn span_of(text: &str, start_idx: usize, end_idx: usize) -> Span {
        let src = Source::new("<test>", text);
        let mut start = Position::default();
        let mut end = Position::default();
        for (i, ch) in text.chars().enumerate() {
            if i < start_idx {
                start.advance(ch);
            }
            if i < end_idx {
                end.advance(ch);
            }
        }
        Span::new(start, end, src)
    }

    #[test]
    fn test_underline_single_line() {
        let span = span_of("var x = oops", 8, 12);
        assert_eq!(underline(&span), "var x = oops\n        ^^^^");
    }

    #[test]
    fn test_underline_is_at_least_one_caret() {
        let span = span_of("abc", 1, 1);
        assert_eq!(underline(&span), "abc\n ^");
    }

    #[test]
    fn test_underline_spans_multiple_lines() {
        let span = span_of("ab\ncdef", 1, 5);
        assert_eq!(underline(&span), "ab\n ^\ncdef\n^^");
    }

    #[test]
    fn test_diagnostic_format() {
        let span = span_of("1 $ 2", 2, 3);
        let err = Error::illegal_char(span, "'$'");
        let text = err.to_string();
        assert!(text.starts_with("Illegal Character: '$'\nFile <test>, line 1\n\n"));
        assert!(text.contains("1 $ 2\n  ^"));
    }
}
