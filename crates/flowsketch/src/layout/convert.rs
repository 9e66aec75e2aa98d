//! Mapping between the graph model and the engine schema.
//!
//! [`to_engine_model`] and [`from_engine_model`] are total over well-formed
//! input: everything the engine does not understand (shapes, styles, the
//! pinned flag, edge kinds) is taken from the original graph on the way back.

use std::collections::HashMap;

use log::trace;

use flowsketch_core::{
    Graph, LayoutResult,
    geometry::{Bounds, Point, Size},
};

use crate::layout::engine::{
    EdgeRoute, EngineEdge, EngineError, EngineGraph, EngineLayout, EngineNode, NodePlacement,
};

/// Engine-side id of the edge at `index`.
pub(crate) fn engine_edge_id(index: usize) -> String {
    format!("e{index}")
}

/// Builds the engine input for `graph`.
///
/// Node sizes are the explicit size or the shape default; pinned nodes carry
/// their position as a fixed coordinate.
pub(crate) fn to_engine_model(graph: &Graph) -> EngineGraph {
    let nodes = graph
        .nodes()
        .iter()
        .map(|node| {
            let engine_node = EngineNode::new(node.id(), node.label(), node.effective_size());
            match node.pinned_position() {
                Some(position) => engine_node.with_fixed_position(position),
                None => engine_node,
            }
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .enumerate()
        .map(|(index, edge)| {
            let engine_edge = EngineEdge::new(engine_edge_id(index), edge.from(), edge.to());
            match edge.label() {
                Some(label) => engine_edge.with_label(label),
                None => engine_edge,
            }
        })
        .collect();

    EngineGraph::new(nodes, edges)
}

/// Rebuilds a positioned graph from the engine output.
///
/// Each node keeps its id, label, shape, style and pinned flag and takes the
/// engine's position and size; pinned nodes keep their own position whatever
/// the engine said. Edges take the engine route as `points`, or no points if
/// the engine did not route them. `bounds` is the engine's drawing size,
/// grown to contain every pinned node plus `padding`.
///
/// # Errors
///
/// Returns [`EngineError::MissingNode`] if the engine did not place a node.
pub(crate) fn from_engine_model(
    graph: &Graph,
    layout: &EngineLayout,
    padding: f32,
) -> Result<LayoutResult, EngineError> {
    let placements: HashMap<&str, &NodePlacement> = layout
        .nodes()
        .iter()
        .map(|placement| (placement.id(), placement))
        .collect();
    let routes: HashMap<&str, &EdgeRoute> = layout
        .edges()
        .iter()
        .map(|route| (route.id(), route))
        .collect();

    let mut bounds = layout.size();
    let mut nodes = Vec::with_capacity(graph.nodes().len());
    for node in graph.nodes() {
        let placement = placements
            .get(node.id())
            .ok_or_else(|| EngineError::MissingNode(node.id().to_string()))?;

        let (position, size) = match node.pinned_position() {
            Some(pinned) => {
                let size = node.size().unwrap_or_else(|| placement.size());
                bounds = grow_to_contain(bounds, pinned.to_bounds(size), padding);
                (pinned, size)
            }
            None => (placement.position(), placement.size()),
        };

        nodes.push(node.clone().with_position(position).with_size(size));
    }

    let edges = graph
        .edges()
        .iter()
        .enumerate()
        .map(|(index, edge)| match routes.get(engine_edge_id(index).as_str()) {
            Some(route) => edge.clone().with_points(route.points()),
            None => {
                trace!(edge = edge.id(), index; "Edge has no route");
                edge.clone().without_points()
            }
        })
        .collect();

    Ok(LayoutResult::new(Graph::new(nodes, edges), bounds))
}

/// Grows `size` (a drawing anchored at the origin) to contain `node` with
/// `padding` to its right and below.
pub(crate) fn grow_to_contain(size: Size, node: Bounds, padding: f32) -> Size {
    size.max(Size::new(node.max_x() + padding, node.max_y() + padding))
}

/// Top-left corner that centers a box of `size` on `center`.
pub(crate) fn top_left_for_center(center: Point, size: Size) -> Point {
    Point::new(center.x() - size.width() / 2.0, center.y() - size.height() / 2.0)
}
