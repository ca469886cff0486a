// ABOUTME: Source buffers, positions, and spans used for diagnostics

use std::fmt;
use std::rc::Rc;

/// A loaded source buffer, shared by every span that points into it.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub file_name: String,
    pub text: String,
}

impl Source {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Rc<Self> {
        // The lexer never sees '\r': normalize line endings up front.
        let text = text.into().replace("\r\n", "\n").replace('\r', "\n");
        Rc::new(Source {
            file_name: file_name.into(),
            text,
        })
    }

    /// The text of one zero-based line, without its trailing newline.
    pub fn line(&self, line: usize) -> &str {
        self.text.split('\n').nth(line).unwrap_or("")
    }
}

/// A location in a source buffer. `idx` is a byte offset; `line` and `col`
/// are zero-based and count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub idx: usize,
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// Step past `ch`, tracking line and column.
    pub fn advance(&mut self, ch: char) {
        self.idx += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
    }
}

/// Half-open range `[start, end)` in a particular source buffer.
#[derive(Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
    pub src: Rc<Source>,
}

impl Span {
    pub fn new(start: Position, end: Position, src: Rc<Source>) -> Self {
        Span { start, end, src }
    }

    /// The span covering `self.start .. other.end`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
            src: Rc::clone(&self.src),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}..{}:{}",
            self.src.file_name,
            self.start.line + 1,
            self.start.col + 1,
            self.end.line + 1,
            self.end.col + 1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_lines_and_columns() {
        let mut pos = Position::default();
        pos.advance('a');
        assert_eq!((pos.idx, pos.line, pos.col), (1, 0, 1));
        pos.advance('\n');
        assert_eq!((pos.idx, pos.line, pos.col), (2, 1, 0));
        pos.advance('b');
        assert_eq!((pos.idx, pos.line, pos.col), (3, 1, 1));
    }

    #[test]
    fn test_source_normalizes_line_endings() {
        let src = Source::new("<test>", "a\r\nb\rc");
        assert_eq!(src.text, "a\nb\nc");
        assert_eq!(src.line(1), "b");
    }

    #[test]
    fn test_line_out_of_range_is_empty() {
        let src = Source::new("<test>", "only");
        assert_eq!(src.line(5), "");
    }
}
