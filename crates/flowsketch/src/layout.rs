//! Layout adapter
//!
//! [`LayoutAdapter`] turns a [`Graph`] into a positioned [`LayoutResult`]:
//!
//! 1. An empty graph short-circuits to an empty result of a default size.
//! 2. The graph is converted to the engine schema; pinned nodes become fixed.
//! 3. The [`LayoutEngine`] runs on a blocking worker thread.
//! 4. The engine output is reconciled with the original graph: shapes,
//!    styles and pins come back, pinned coordinates win.
//! 5. If the engine fails, panics or loses a node, the graph is placed on
//!    a grid instead.
//!
//! `layout` never fails: every call resolves to a renderable result.

mod convert;
mod engine;
mod fallback;
mod sugiyama;

use std::{any::Any, fmt, sync::Arc};

use log::{debug, info, warn};
use tokio::task::{self, JoinError};

use flowsketch_core::{Graph, LayoutResult, geometry::Size};

pub use engine::{
    EdgeRoute, EngineEdge, EngineError, EngineGraph, EngineLayout, EngineNode, LayoutEngine,
    LayoutOptions, NodePlacement,
};
pub use fallback::{GridOptions, grid_layout};
pub use sugiyama::SugiyamaEngine;

/// Drawing size reported for a graph without nodes.
pub fn empty_bounds() -> Size {
    Size::new(800.0, 600.0)
}

/// Steps of a single layout call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutPhase {
    Converting,
    Computing,
    Reconciling,
    Failed,
    FallbackComputing,
    Done,
}

impl fmt::Display for LayoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Converting => "converting",
            Self::Computing => "computing",
            Self::Reconciling => "reconciling",
            Self::Failed => "failed",
            Self::FallbackComputing => "fallback-computing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(phase: LayoutPhase) {
    debug!(phase:%; "Layout phase");
}

/// Positions graphs with a [`LayoutEngine`], falling back to a grid.
///
/// The adapter holds no per-call state; concurrent `layout` calls are
/// independent of each other.
///
/// # Examples
///
/// ```
/// # use flowsketch::layout::LayoutAdapter;
/// # use flowsketch_core::{Edge, Graph, Node};
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let graph = Graph::new(
///     vec![Node::new("A"), Node::new("B")],
///     vec![Edge::new("A", "B")],
/// );
///
/// let result = LayoutAdapter::default().layout(&graph).await;
/// assert!(result.graph().nodes().iter().all(|n| n.position().is_some()));
/// # }
/// ```
#[derive(Clone)]
pub struct LayoutAdapter {
    engine: Arc<dyn LayoutEngine>,
    options: LayoutOptions,
    grid: GridOptions,
}

impl fmt::Debug for LayoutAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutAdapter")
            .field("options", &self.options)
            .field("grid", &self.grid)
            .finish_non_exhaustive()
    }
}

impl Default for LayoutAdapter {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

impl LayoutAdapter {
    /// Creates an adapter running [`SugiyamaEngine`] with `options`.
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            engine: Arc::new(SugiyamaEngine::new()),
            options,
            grid: GridOptions::default(),
        }
    }

    /// Replaces the layout engine.
    pub fn with_engine(mut self, engine: Arc<dyn LayoutEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Replaces the fallback grid geometry.
    pub fn with_grid(mut self, grid: GridOptions) -> Self {
        self.grid = grid;
        self
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn grid(&self) -> &GridOptions {
        &self.grid
    }

    /// Lays out `graph`.
    ///
    /// Pinned nodes keep their position exactly. Every other node gets a
    /// position and a size, and routed edges get their `points`.
    pub async fn layout(&self, graph: &Graph) -> LayoutResult {
        if graph.is_empty() {
            debug!("Empty graph, skipping layout engine");
            return LayoutResult::new(Graph::default(), empty_bounds());
        }

        let dangling = graph.dangling_edges().count();
        if dangling > 0 {
            warn!(dangling; "Graph has edges to unknown nodes");
        }

        let result = match self.run_engine(graph).await {
            Ok(result) => result,
            Err(err) => {
                enter(LayoutPhase::Failed);
                warn!(err:%; "Layout engine failed, falling back to grid layout");
                enter(LayoutPhase::FallbackComputing);
                fallback::grid_layout(graph, &self.grid)
            }
        };
        enter(LayoutPhase::Done);

        info!(
            nodes = result.graph().nodes().len(),
            edges = result.graph().edges().len(),
            width = result.bounds().width(),
            height = result.bounds().height();
            "Layout calculated"
        );
        result
    }

    async fn run_engine(&self, graph: &Graph) -> Result<LayoutResult, EngineError> {
        enter(LayoutPhase::Converting);
        let engine_graph = convert::to_engine_model(graph);

        enter(LayoutPhase::Computing);
        let engine = Arc::clone(&self.engine);
        let options = self.options;
        let layout = task::spawn_blocking(move || engine.compute(&engine_graph, &options))
            .await
            .map_err(join_error)??;

        enter(LayoutPhase::Reconciling);
        convert::from_engine_model(graph, &layout, options.padding())
    }
}

fn join_error(err: JoinError) -> EngineError {
    if err.is_panic() {
        EngineError::Panicked(panic_message(err.into_panic().as_ref()))
    } else {
        EngineError::Failed("layout task was cancelled".to_string())
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
