//! The layout engine capability and the schema it speaks.
//!
//! An engine only positions boxes: it sees ids, labels and sizes, never node
//! shapes or styles. Edges are identified by positional ids (`e0`, `e1`...)
//! so that repeated `A-B` edges stay distinct on the engine side.

use flowsketch_core::geometry::{Point, Size};
use thiserror::Error;

/// Errors reported by a [`LayoutEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("edge `{edge}` references unknown node `{node}`")]
    UnknownNode { edge: String, node: String },

    #[error("node `{0}` is missing from the engine output")]
    MissingNode(String),

    #[error("layout engine panicked: {0}")]
    Panicked(String),

    #[error("layout failed: {0}")]
    Failed(String),
}

/// Tuning knobs handed to the engine on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    node_spacing: f32,
    layer_spacing: f32,
    padding: f32,
    thoroughness: u32,
    simplify_bend_points: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            node_spacing: 80.0,
            layer_spacing: 100.0,
            padding: 50.0,
            thoroughness: 7,
            simplify_bend_points: false,
        }
    }
}

impl LayoutOptions {
    /// Set the horizontal gap between nodes of the same layer
    pub fn with_node_spacing(mut self, spacing: f32) -> Self {
        self.node_spacing = spacing;
        self
    }

    /// Set the vertical gap between layers
    pub fn with_layer_spacing(mut self, spacing: f32) -> Self {
        self.layer_spacing = spacing;
        self
    }

    /// Set the padding around the whole drawing
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Set how hard the engine should work on crossing minimisation; `0` is
    /// the quickest
    pub fn with_thoroughness(mut self, thoroughness: u32) -> Self {
        self.thoroughness = thoroughness;
        self
    }

    /// Drop bend points that lie on a straight segment
    pub fn with_simplify_bend_points(mut self, simplify: bool) -> Self {
        self.simplify_bend_points = simplify;
        self
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    pub fn layer_spacing(&self) -> f32 {
        self.layer_spacing
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn thoroughness(&self) -> u32 {
        self.thoroughness
    }

    pub fn simplify_bend_points(&self) -> bool {
        self.simplify_bend_points
    }
}

/// A box to be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineNode {
    id: String,
    label: String,
    size: Size,
    fixed: Option<Point>,
}

impl EngineNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, size: Size) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            size,
            fixed: None,
        }
    }

    /// Marks the node as fixed: the engine must place it at `position`.
    pub fn with_fixed_position(mut self, position: Point) -> Self {
        self.fixed = Some(position);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Position the engine must not change, if any
    pub fn fixed_position(&self) -> Option<Point> {
        self.fixed
    }
}

/// A connection between two [`EngineNode`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineEdge {
    id: String,
    source: String,
    target: String,
    label: Option<String>,
}

impl EngineEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    /// Attaches a label to be centered on the edge.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Input of a layout computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineGraph {
    nodes: Vec<EngineNode>,
    edges: Vec<EngineEdge>,
}

impl EngineGraph {
    pub fn new(nodes: Vec<EngineNode>, edges: Vec<EngineEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[EngineNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EngineEdge] {
        &self.edges
    }
}

/// Where the engine put a node (top-left corner) and how big it is.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePlacement {
    id: String,
    position: Point,
    size: Size,
}

impl NodePlacement {
    pub fn new(id: impl Into<String>, position: Point, size: Size) -> Self {
        Self {
            id: id.into(),
            position,
            size,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

/// The routed path of one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRoute {
    id: String,
    start: Point,
    bends: Vec<Point>,
    end: Point,
}

impl EdgeRoute {
    pub fn new(id: impl Into<String>, start: Point, bends: Vec<Point>, end: Point) -> Self {
        Self {
            id: id.into(),
            start,
            bends,
            end,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn bends(&self) -> &[Point] {
        &self.bends
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Start point, bend points and end point, in order.
    pub fn points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.bends.len() + 2);
        points.push(self.start);
        points.extend_from_slice(&self.bends);
        points.push(self.end);
        points
    }
}

/// Output of a layout computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineLayout {
    nodes: Vec<NodePlacement>,
    edges: Vec<EdgeRoute>,
    size: Size,
}

impl EngineLayout {
    pub fn new(nodes: Vec<NodePlacement>, edges: Vec<EdgeRoute>, size: Size) -> Self {
        Self { nodes, edges, size }
    }

    pub fn nodes(&self) -> &[NodePlacement] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRoute] {
        &self.edges
    }

    /// Width and height of the whole drawing, padding included
    pub fn size(&self) -> Size {
        self.size
    }
}

/// A layered layout algorithm.
///
/// Implementations receive typed nodes (id, size, optional fixed position)
/// and typed edges, and must return a placement for every node. Fixed nodes
/// should be placed at their fixed position; the adapter enforces it anyway.
/// Edge routes are optional.
///
/// `compute` runs on a blocking worker thread, so implementations may take
/// their time; they should return [`EngineError`] rather than panic, but a
/// panic is contained as well.
pub trait LayoutEngine: Send + Sync {
    /// Place the nodes of `graph`
    fn compute(
        &self,
        graph: &EngineGraph,
        options: &LayoutOptions,
    ) -> Result<EngineLayout, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_options_defaults() {
        let options = LayoutOptions::default();
        assert_eq!(options.node_spacing(), 80.0);
        assert_eq!(options.layer_spacing(), 100.0);
        assert_eq!(options.padding(), 50.0);
        assert_eq!(options.thoroughness(), 7);
        assert!(!options.simplify_bend_points());
    }

    #[test]
    fn test_edge_route_points_order() {
        let route = EdgeRoute::new(
            "e0",
            Point::new(0.0, 0.0),
            vec![Point::new(0.0, 10.0), Point::new(20.0, 10.0)],
            Point::new(20.0, 20.0),
        );
        assert_eq!(
            route.points(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 10.0),
                Point::new(20.0, 10.0),
                Point::new(20.0, 20.0),
            ]
        );
    }

    #[test]
    fn test_engine_error_messages() {
        let err = EngineError::UnknownNode {
            edge: "e3".to_string(),
            node: "Z".to_string(),
        };
        assert_eq!(err.to_string(), "edge `e3` references unknown node `Z`");
        assert_eq!(
            EngineError::MissingNode("B".to_string()).to_string(),
            "node `B` is missing from the engine output"
        );
    }
}
