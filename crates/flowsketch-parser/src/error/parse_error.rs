//! The ParseError type returned when no graph could be produced.

use std::fmt;

use crate::error::Diagnostic;

/// Error type for a failed parse.
///
/// Wraps one or more diagnostics. The first one is the primary error and
/// provides the `message`, `line` and `column` reported to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Message of the primary diagnostic.
    pub fn message(&self) -> &str {
        self.diagnostics
            .first()
            .map(Diagnostic::message)
            .unwrap_or_default()
    }

    /// Line of the primary diagnostic, if known.
    pub fn line(&self) -> Option<usize> {
        self.diagnostics.first().and_then(Diagnostic::line)
    }

    /// Column of the primary diagnostic, if known.
    pub fn column(&self) -> Option<usize> {
        self.diagnostics.first().and_then(Diagnostic::column)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}
