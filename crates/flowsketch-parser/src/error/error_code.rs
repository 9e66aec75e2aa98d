//! Error codes for the Flowsketch diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Input errors (no graph is produced)
//! - `E1xx` - Line recognition diagnostics (strict-mode warnings)

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Input Errors (E0xx)
    // =========================================================================
    /// Empty input.
    ///
    /// The source text is empty or contains only whitespace.
    E001,

    /// Internal parser failure.
    ///
    /// Processing a line failed unexpectedly. The failure is caught and
    /// reported instead of aborting the caller.
    E002,

    // =========================================================================
    // Line Recognition (E1xx)
    // =========================================================================
    /// Unrecognized line.
    ///
    /// The line matches none of the node, edge or style forms and was
    /// skipped.
    E100,

    /// Invalid style property.
    ///
    /// A `style` directive named an unknown property or carried a value that
    /// is not a valid color or width. The property was ignored.
    E101,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "empty input",
            ErrorCode::E002 => "internal parser failure",
            ErrorCode::E100 => "unrecognized line",
            ErrorCode::E101 => "invalid style property",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "empty input");
        assert_eq!(ErrorCode::E101.description(), "invalid style property");
    }
}
