//! The canonical flowchart graph model.
//!
//! A [`Graph`] is an ordered list of [`Node`]s (first-declared order) and an
//! ordered list of [`Edge`]s (source-line order). It decouples the textual
//! syntax from rendering: the parser produces it, the layout adapter returns
//! a positioned copy of it, and a renderer consumes it.
//!
//! All types serialize to JSON with camelCase field names so a renderer on
//! the other side of the boundary sees `strokeWidth`, `type` and friends.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    geometry::{Point, Size},
    viewport::DragEvent,
};

/// Returns `true` if `c` may appear in a node identifier.
///
/// Identifiers are case-sensitive and limited to ASCII letters, digits and
/// underscores.
pub fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// The closed set of node shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Rectangle,
    Circle,
    Diamond,
    Rounded,
    Stadium,
}

impl NodeShape {
    /// Returns the box size used for a node of this shape when the node
    /// carries no explicit size.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowsketch_core::{NodeShape, geometry::Size};
    ///
    /// assert_eq!(NodeShape::Circle.default_size(), Size::new(80.0, 80.0));
    /// assert_eq!(NodeShape::Stadium.default_size(), Size::new(120.0, 60.0));
    /// ```
    pub fn default_size(self) -> Size {
        match self {
            NodeShape::Rectangle | NodeShape::Rounded | NodeShape::Stadium => {
                Size::new(120.0, 60.0)
            }
            NodeShape::Circle => Size::new(80.0, 80.0),
            NodeShape::Diamond => Size::new(100.0, 80.0),
        }
    }
}

/// Per-node style overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fill: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stroke: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stroke_width: Option<f32>,
}

impl NodeStyle {
    pub fn fill(&self) -> Option<&Color> {
        self.fill.as_ref()
    }

    pub fn stroke(&self) -> Option<&Color> {
        self.stroke.as_ref()
    }

    pub fn stroke_width(&self) -> Option<f32> {
        self.stroke_width
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = Some(width);
        self
    }

    /// Returns `true` when no override is set
    pub fn is_empty(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none() && self.stroke_width.is_none()
    }

    /// Overlays `other` on top of this style; fields set in `other` win.
    pub fn merge(&mut self, other: NodeStyle) {
        if other.fill.is_some() {
            self.fill = other.fill;
        }
        if other.stroke.is_some() {
            self.stroke = other.stroke;
        }
        if other.stroke_width.is_some() {
            self.stroke_width = other.stroke_width;
        }
    }
}

/// A flowchart node.
///
/// A node is positioned by layout unless it is `pinned`, in which case its
/// position is authoritative input rather than output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: String,
    label: String,
    #[serde(default)]
    shape: NodeShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<NodeStyle>,
    #[serde(default)]
    pinned: bool,
}

impl Node {
    /// Creates a rectangle node labelled with its own id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            shape: NodeShape::default(),
            position: None,
            size: None,
            style: None,
            pinned: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_shape(mut self, shape: NodeShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Marks the node as pinned at `position`.
    pub fn pinned_at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self.pinned = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Returns the explicit size, or the shape's default size.
    pub fn effective_size(&self) -> Size {
        self.size.unwrap_or_else(|| self.shape.default_size())
    }

    pub fn style(&self) -> Option<&NodeStyle> {
        self.style.as_ref()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Returns the pinned position, if this node is pinned and has one.
    pub fn pinned_position(&self) -> Option<Point> {
        if self.pinned { self.position } else { None }
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_shape(&mut self, shape: NodeShape) {
        self.shape = shape;
    }

    /// Overlays style overrides onto this node's existing style.
    pub fn merge_style(&mut self, style: NodeStyle) {
        if style.is_empty() {
            return;
        }
        self.style.get_or_insert_with(NodeStyle::default).merge(style);
    }
}

/// The line style of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Arrow,
    Dashed,
    Dotted,
}

/// A directed edge between two nodes.
///
/// The id is derived as `"<from>-<to>"` and is not unique when the same pair
/// is connected more than once; consumers must not key on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    id: String,
    from: String,
    to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(rename = "type", default)]
    kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<Vec<Point>>,
}

impl Edge {
    /// Creates an arrow edge with the derived `"<from>-<to>"` id.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowsketch_core::{Edge, EdgeKind};
    ///
    /// let edge = Edge::new("A", "B");
    /// assert_eq!(edge.id(), "A-B");
    /// assert_eq!(edge.kind(), EdgeKind::Arrow);
    /// ```
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        Self {
            id: format!("{from}-{to}"),
            from,
            to,
            label: None,
            kind: EdgeKind::default(),
            points: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the routing waypoints. Only layout produces these.
    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = Some(points);
        self
    }

    /// Returns a copy of this edge without routing waypoints
    pub fn without_points(mut self) -> Self {
        self.points = None;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn points(&self) -> Option<&[Point]> {
        self.points.as_deref()
    }

    /// Returns `true` for an edge whose endpoints are the same node
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Ordered nodes plus ordered edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Returns `true` when the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates edges whose `from` or `to` does not resolve to a node.
    ///
    /// A graph produced by the parser never has any.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|edge| {
            self.node(edge.from()).is_none() || self.node(edge.to()).is_none()
        })
    }

    /// Applies a drag event from the render layer: the node takes the new
    /// position and becomes pinned.
    ///
    /// Returns `false` if no node has the event's id.
    pub fn apply_drag(&mut self, event: &DragEvent) -> bool {
        match self.nodes.iter_mut().find(|node| node.id == event.node_id()) {
            Some(node) => {
                node.position = Some(event.position());
                node.pinned = true;
                true
            }
            None => {
                debug!(node_id = event.node_id(); "Drag event for unknown node ignored");
                false
            }
        }
    }

    /// Carries pinned positions from `previous` onto this graph.
    ///
    /// Only ids that this graph declares keep their pin; pins of nodes that
    /// disappeared from the source are dropped.
    pub fn with_pins_from(mut self, previous: &Graph) -> Self {
        let pins: HashMap<&str, Point> = previous
            .nodes
            .iter()
            .filter_map(|node| node.pinned_position().map(|p| (node.id(), p)))
            .collect();

        for node in &mut self.nodes {
            if let Some(&position) = pins.get(node.id.as_str()) {
                node.position = Some(position);
                node.pinned = true;
            }
        }
        self
    }
}

/// A positioned graph together with the size of its drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    graph: Graph,
    bounds: Size,
}

impl LayoutResult {
    pub fn new(graph: Graph, bounds: Size) -> Self {
        Self { graph, bounds }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Width and height of the laid-out drawing
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> Graph {
        Graph::new(
            vec![
                Node::new("A").with_label("Start"),
                Node::new("B").with_shape(NodeShape::Diamond),
            ],
            vec![Edge::new("A", "B"), Edge::new("A", "B").with_label("again")],
        )
    }

    #[test]
    fn test_node_defaults() {
        let node = Node::new("svc");
        assert_eq!(node.label(), "svc");
        assert_eq!(node.shape(), NodeShape::Rectangle);
        assert!(node.position().is_none());
        assert!(!node.is_pinned());
        assert_eq!(node.effective_size(), Size::new(120.0, 60.0));
    }

    #[test]
    fn test_explicit_size_beats_shape_default() {
        let node = Node::new("c")
            .with_shape(NodeShape::Circle)
            .with_size(Size::new(10.0, 20.0));
        assert_eq!(node.effective_size(), Size::new(10.0, 20.0));
    }

    #[test]
    fn test_default_sizes() {
        assert_eq!(NodeShape::Rectangle.default_size(), Size::new(120.0, 60.0));
        assert_eq!(NodeShape::Rounded.default_size(), Size::new(120.0, 60.0));
        assert_eq!(NodeShape::Circle.default_size(), Size::new(80.0, 80.0));
        assert_eq!(NodeShape::Diamond.default_size(), Size::new(100.0, 80.0));
    }

    #[test]
    fn test_duplicate_edges_share_id() {
        let graph = sample_graph();
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.edges()[0].id(), graph.edges()[1].id());
    }

    #[test]
    fn test_dangling_edges() {
        let graph = Graph::new(vec![Node::new("A")], vec![Edge::new("A", "Z")]);
        let dangling: Vec<_> = graph.dangling_edges().map(Edge::id).collect();
        assert_eq!(dangling, vec!["A-Z"]);
        assert_eq!(sample_graph().dangling_edges().count(), 0);
    }

    #[test]
    fn test_apply_drag_pins_node() {
        let mut graph = sample_graph();
        let applied = graph.apply_drag(&DragEvent::new("B", Point::new(300.0, 40.0)));
        assert!(applied);

        let node = graph.node("B").unwrap();
        assert!(node.is_pinned());
        assert_eq!(node.pinned_position(), Some(Point::new(300.0, 40.0)));

        assert!(!graph.apply_drag(&DragEvent::new("missing", Point::default())));
    }

    #[test]
    fn test_with_pins_from_keeps_redeclared_ids_only() {
        let previous = Graph::new(
            vec![
                Node::new("A").pinned_at(Point::new(10.0, 10.0)),
                Node::new("Gone").pinned_at(Point::new(99.0, 99.0)),
                Node::new("B").with_position(Point::new(5.0, 5.0)),
            ],
            vec![],
        );

        let graph = sample_graph().with_pins_from(&previous);

        assert_eq!(
            graph.node("A").unwrap().pinned_position(),
            Some(Point::new(10.0, 10.0))
        );
        // unpinned positions are layout output, not carried over
        assert!(graph.node("B").unwrap().position().is_none());
        assert!(graph.node("Gone").is_none());
        assert_eq!(graph.node("A").unwrap().label(), "Start");
    }

    #[test]
    fn test_merge_style_overlays_fields() {
        let mut node = Node::new("A");
        node.merge_style(NodeStyle::default().with_stroke_width(2.0));
        node.merge_style(
            NodeStyle::default()
                .with_fill(Color::new("red").unwrap())
                .with_stroke_width(4.0),
        );

        let style = node.style().unwrap();
        assert_eq!(style.fill().map(Color::as_str), Some("red"));
        assert_eq!(style.stroke_width(), Some(4.0));
        assert!(style.stroke().is_none());
    }

    #[test]
    fn test_json_field_names() {
        let mut graph = Graph::new(
            vec![
                Node::new("A")
                    .with_shape(NodeShape::Circle)
                    .with_style(NodeStyle::default().with_stroke_width(4.0)),
            ],
            vec![Edge::new("A", "A").with_kind(EdgeKind::Dashed)],
        );
        graph.apply_drag(&DragEvent::new("A", Point::new(1.0, 2.0)));

        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["nodes"][0]["shape"], "circle");
        assert_eq!(json["nodes"][0]["pinned"], true);
        assert_eq!(json["nodes"][0]["position"]["x"], 1.0);
        assert_eq!(json["nodes"][0]["style"]["strokeWidth"], 4.0);
        assert_eq!(json["edges"][0]["type"], "dashed");
        assert!(json["edges"][0].get("points").is_none());

        let back: Graph = serde_json::from_value(json).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn test_layout_result_accessors() {
        let result = LayoutResult::new(sample_graph(), Size::new(800.0, 600.0));
        assert_eq!(result.bounds(), Size::new(800.0, 600.0));
        assert_eq!(result.graph().nodes().len(), 2);
        assert_eq!(result.into_graph().edges().len(), 2);
    }
}
