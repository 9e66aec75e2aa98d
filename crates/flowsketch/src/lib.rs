//! Flowsketch - flowchart text to positioned graphs.
//!
//! Parses a small flowchart language (`A[Start] --> B{Ok?}`) into a graph
//! model and lays it out with a layered layout engine, falling back to a
//! grid when the engine fails. The result is a graph whose nodes all carry
//! a position and size, ready for a renderer.

pub mod config;
pub mod layout;

mod error;

pub use flowsketch_core::{color, geometry, graph, viewport};
pub use flowsketch_parser::{Direction, ParseOptions, ParsedDiagram};

pub use error::FlowsketchError;
pub use layout::{
    EngineError, GridOptions, LayoutAdapter, LayoutEngine, LayoutOptions, SugiyamaEngine,
};

use std::sync::Arc;

use log::{debug, info, trace};

use flowsketch_core::{Graph, LayoutResult};

use config::AppConfig;

/// Builder for parsing and laying out Flowsketch diagrams.
///
/// # Examples
///
/// ```rust
/// use flowsketch::{DiagramBuilder, config::AppConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = "graph TD\nA[Start] --> B{Ok?}\nB -->|yes| C((Done))";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let diagram = builder.parse(source).expect("Failed to parse");
/// let result = builder.layout(diagram.graph()).await;
///
/// assert_eq!(result.graph().nodes().len(), 3);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
    adapter: LayoutAdapter,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Parser strictness, layout spacing and fallback grid settings
    pub fn new(config: AppConfig) -> Self {
        let adapter = LayoutAdapter::new(config.layout().options()).with_grid(config.layout().grid());
        Self { config, adapter }
    }

    /// Replace the layout engine, keeping the configured options.
    pub fn with_engine(mut self, engine: Arc<dyn LayoutEngine>) -> Self {
        self.adapter = self.adapter.with_engine(engine);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source text into a graph.
    ///
    /// Unrecognized lines are skipped; in strict mode they are reported as
    /// warnings on the returned [`ParsedDiagram`].
    ///
    /// # Errors
    ///
    /// Returns [`FlowsketchError::Parse`] for empty input or an internal
    /// parser failure.
    pub fn parse(&self, source: &str) -> Result<ParsedDiagram, FlowsketchError> {
        info!(strict = self.config.parser().strict(); "Parsing diagram");

        let parsed = flowsketch_parser::parse_with_options(source, self.config.parser().options())
            .map_err(|err| FlowsketchError::new_parse_error(err, source))?;

        debug!(warnings = parsed.warnings().len(); "Diagram parsed successfully");
        trace!(graph:? = parsed.graph(); "Parsed graph");

        Ok(parsed)
    }

    /// Lay out a graph. Never fails; see [`LayoutAdapter::layout`].
    pub async fn layout(&self, graph: &Graph) -> LayoutResult {
        self.adapter.layout(graph).await
    }

    /// Parse and lay out `source` in one go.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsketchError::Parse`] if parsing fails.
    pub async fn build(&self, source: &str) -> Result<LayoutResult, FlowsketchError> {
        let parsed = self.parse(source)?;
        Ok(self.layout(parsed.graph()).await)
    }
}
