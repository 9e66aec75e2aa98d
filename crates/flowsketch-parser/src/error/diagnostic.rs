//! The core diagnostic type for the Flowsketch error system.

use std::fmt;

use crate::error::{Location, Severity, error_code::ErrorCode};

/// A diagnostic message with optional source location information.
///
/// # Example
///
/// ```text
/// warning[E100]: unrecognized line `A => B`
///   --> diagram.mmd:4:3
///    |
///  4 |   A => B
///    |   ^^^^^^ skipped
///    |
///    = help: edges are written `A --> B` or `A -.-> B`
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    location: Option<Location>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use flowsketch_parser::error::{Diagnostic, ErrorCode};
    ///
    /// let diag = Diagnostic::error("Empty input").with_code(ErrorCode::E001);
    /// assert_eq!(diag.to_string(), "error[E001]: Empty input");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source location, if known.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// 1-based line number, if known.
    pub fn line(&self) -> Option<usize> {
        self.location.map(|loc| loc.line())
    }

    /// 1-based column number, if known.
    pub fn column(&self) -> Option<usize> {
        self.location.map(|loc| loc.column())
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a source location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            location: None,
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
