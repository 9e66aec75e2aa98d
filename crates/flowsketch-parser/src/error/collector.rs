//! Collector for accumulating diagnostics during a parse.
//!
//! Warnings are only gathered in strict mode; otherwise they are dropped
//! at the point of emission and only traced in the log.

use log::trace;

use crate::error::{Diagnostic, ParseError};

/// A collector for accumulating diagnostics during a parse.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    keep_warnings: bool,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    ///
    /// With `keep_warnings` unset, warnings are discarded on emission.
    pub fn new(keep_warnings: bool) -> Self {
        Self {
            keep_warnings,
            ..Self::default()
        }
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        } else if !self.keep_warnings {
            trace!(diagnostic:%; "Discarding warning outside strict mode");
            return;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection.
    ///
    /// - If there are errors, returns `Err(ParseError)` with all diagnostics,
    ///   errors first.
    /// - Otherwise returns the collected warnings.
    pub fn finish(mut self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            self.diagnostics
                .sort_by_key(|diagnostic| diagnostic.severity().is_warning());
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}
