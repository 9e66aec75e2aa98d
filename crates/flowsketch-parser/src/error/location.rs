//! Source locations attached to diagnostics.

use crate::span::Span;

/// Where in the source a diagnostic applies.
///
/// `line` and `column` are 1-based and count characters; `span` is the byte
/// range of the offending text, used by renderers that underline source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    line: usize,
    column: usize,
    span: Span,
}

impl Location {
    pub fn new(line: usize, column: usize, span: Span) -> Self {
        Self { line, column, span }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn span(&self) -> Span {
        self.span
    }
}
