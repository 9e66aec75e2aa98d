//! Node registry used while building a graph.
//!
//! Nodes are keyed by id in first-appearance order. A declaration that
//! carries a bracket form always overwrites label and shape (last write
//! wins); a bare reference only creates a default node when the id is new.

use indexmap::IndexMap;
use log::trace;

use flowsketch_core::{Edge, Graph, Node, NodeStyle};

use crate::matchers::{EdgeDecl, Endpoint, ShapeDecl};

#[derive(Debug, Default)]
pub(crate) struct NodeRegistry {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
}

impl NodeRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers `id` with the given shape and label, replacing any earlier
    /// shape and label but keeping its position in the node order.
    ///
    /// An empty bracket (`A[]`) labels the node with its id.
    pub(crate) fn declare(&mut self, id: &str, decl: &ShapeDecl) {
        let node = self.entry(id);
        node.set_shape(decl.shape());
        match decl.label() {
            "" => node.set_label(id),
            label => node.set_label(label),
        }
    }

    /// Registers `id` with defaults unless it is already known.
    pub(crate) fn reference(&mut self, id: &str) {
        self.entry(id);
    }

    fn endpoint(&mut self, endpoint: &Endpoint<'_>) {
        match endpoint.shape() {
            Some(decl) => self.declare(endpoint.id(), decl),
            None => self.reference(endpoint.id()),
        }
    }

    /// Registers both endpoints (source first) and appends the edge.
    pub(crate) fn connect(&mut self, decl: &EdgeDecl<'_>) {
        self.endpoint(decl.source());
        self.endpoint(decl.target());

        let mut edge = Edge::new(decl.source().id(), decl.target().id()).with_kind(decl.kind());
        if let Some(label) = decl.label() {
            edge = edge.with_label(label);
        }
        self.edges.push(edge);
    }

    /// Overlays style overrides on `id`, registering it if needed.
    pub(crate) fn style(&mut self, id: &str, style: NodeStyle) {
        self.entry(id).merge_style(style);
    }

    fn entry(&mut self, id: &str) -> &mut Node {
        if !self.nodes.contains_key(id) {
            trace!(id; "Registering node");
        }
        self.nodes
            .entry(id.to_string())
            .or_insert_with(|| Node::new(id))
    }

    pub(crate) fn into_graph(self) -> Graph {
        Graph::new(self.nodes.into_values().collect(), self.edges)
    }
}
