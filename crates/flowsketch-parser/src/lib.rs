//! # Flowsketch Parser
//!
//! Lenient, line-oriented parser for flowchart text. Every significant line
//! is matched independently against a fixed, ordered set of statement forms
//! (node declarations, solid/dashed/dotted edges, style directives); lines
//! that match nothing are skipped rather than failing the whole diagram.
//!
//! ## Usage
//!
//! ```
//! # use flowsketch_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         graph TD
//!         A[Start] --> B{Ready?}
//!         B -->|yes| C((Done))
//!         B -.-> A
//!     "#;
//!
//!     let graph = parse(source)?;
//!     assert_eq!(graph.nodes().len(), 3);
//!     assert_eq!(graph.edges().len(), 3);
//!     Ok(())
//! }
//! ```

pub mod error;
mod matchers;
mod parser;
mod registry;
mod source;
mod span;

pub use error::{Diagnostic, ErrorCode, ParseError, Severity};
pub use source::Direction;
pub use span::Span;

use log::info;

use flowsketch_core::Graph;

/// Outcome of [`parse`]: exactly one of a graph or an error.
pub type ParseResult = Result<Graph, ParseError>;

/// Options for [`parse_with_options`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    strict: bool,
}

impl ParseOptions {
    /// Lenient options: unrecognized lines are dropped silently.
    pub fn new() -> Self {
        Self::default()
    }

    /// In strict mode, skipped lines and ignored style properties are
    /// collected as warnings. The parse still succeeds.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

/// A parsed diagram together with what the parser noticed along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDiagram {
    graph: Graph,
    direction: Option<Direction>,
    warnings: Vec<Diagnostic>,
}

impl ParsedDiagram {
    pub(crate) fn new(graph: Graph, direction: Option<Direction>, warnings: Vec<Diagnostic>) -> Self {
        Self {
            graph,
            direction,
            warnings,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Direction named in the `graph`/`flowchart` header, if there was one
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Warnings collected in strict mode; always empty otherwise
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }
}

/// Parse flowchart text into a [`Graph`].
///
/// Node order follows first appearance; a node's shape and label come from
/// the last bracket form seen for its id. Every edge endpoint resolves to a
/// node of the returned graph.
///
/// # Errors
///
/// Returns a [`ParseError`] for empty or whitespace-only input
/// ([`ErrorCode::E001`]) and for unexpected internal failures
/// ([`ErrorCode::E002`]).
///
/// # Example
///
/// ```
/// # use flowsketch_parser::parse;
/// # use flowsketch_core::EdgeKind;
/// let graph = parse("A -.-> B").unwrap();
/// assert_eq!(graph.edges()[0].kind(), EdgeKind::Dashed);
///
/// let err = parse("   ").unwrap_err();
/// assert_eq!(err.message(), "Empty input");
/// ```
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, ParseOptions::default()).map(ParsedDiagram::into_graph)
}

/// Parse flowchart text, returning the header direction and any strict-mode
/// warnings alongside the graph.
///
/// # Example
///
/// ```
/// # use flowsketch_parser::{parse_with_options, Direction, ErrorCode, ParseOptions};
/// let source = "flowchart LR\nA --> B\nA => C\n";
/// let parsed = parse_with_options(source, ParseOptions::new().with_strict(true)).unwrap();
///
/// assert_eq!(parsed.direction(), Some(Direction::LeftRight));
/// assert_eq!(parsed.graph().nodes().len(), 2);
/// assert_eq!(parsed.warnings()[0].code(), Some(ErrorCode::E100));
/// assert_eq!(parsed.warnings()[0].line(), Some(3));
/// ```
pub fn parse_with_options(
    source: &str,
    options: ParseOptions,
) -> Result<ParsedDiagram, ParseError> {
    let parsed = parser::parse_source(source, options)?;
    info!(
        nodes = parsed.graph.nodes().len(),
        edges = parsed.graph.edges().len(),
        warnings = parsed.warnings.len();
        "Parsed flowchart"
    );
    Ok(parsed)
}
