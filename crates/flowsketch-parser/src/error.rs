//! Error and diagnostic system for the Flowsketch parser.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Source locations (1-based line/column plus byte span)
//! - Severity levels
//! - A diagnostic collector for accumulating strict-mode warnings
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning with an optional error code, an optional source
//! location, and help text. A failed parse returns a [`ParseError`] wrapping
//! one or more error diagnostics.
//!
//! # Example
//!
//! ```
//! # use flowsketch_parser::error::{Diagnostic, ErrorCode, Location};
//! # use flowsketch_parser::Span;
//!
//! let diag = Diagnostic::warning("line was not recognized")
//!     .with_code(ErrorCode::E100)
//!     .with_location(Location::new(3, 5, Span::new(20..31)))
//!     .with_help("check the arrow syntax");
//!
//! assert_eq!(diag.line(), Some(3));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod location;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use location::Location;
pub use parse_error::ParseError;
pub use severity::Severity;
