//! Layered layout engine built on `rust-sugiyama`.
//!
//! `rust-sugiyama` assigns layers and orders vertices within layers to keep
//! crossings low. It works on unit-sized vertices, so this engine only takes
//! layer and column indices from it and does the size-aware part itself:
//!
//! 1. Connected components are laid out by `rust-sugiyama` and placed side by
//!    side, in order of their first node.
//! 2. Nodes without a (non self-loop) edge go on the top layer, to the right.
//! 3. Each layer is as tall as its tallest node; nodes are centered in it.
//! 4. Fixed nodes stay exactly where they were fixed. They are left out of
//!    the layering, and free nodes that would overlap one are pushed right.
//! 5. Edges get orthogonal routes: out of the bottom of the source, into the
//!    top of the target, with two bends at mid height.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    panic,
};

use log::{debug, trace};
use rust_sugiyama::configure::{Config, CrossingMinimization};

use flowsketch_core::geometry::{Bounds, Point, Size};

use crate::layout::{
    convert::top_left_for_center,
    engine::{
        EdgeRoute, EngineError, EngineGraph, EngineLayout, LayoutEngine, LayoutOptions,
        NodePlacement,
    },
    panic_message,
};

/// Horizontal distance between adjacent vertices inside `rust-sugiyama`.
const VERTEX_SPACING: f64 = 10.0;
/// Two `rust-sugiyama` y coordinates closer than this are the same layer.
const LAYER_EPSILON: f64 = 1e-3;
/// How far a self-loop sticks out to the right of its node.
const SELF_LOOP_OFFSET: f32 = 30.0;
/// Thoroughness from which crossings are reduced with the median heuristic.
const MEDIAN_THOROUGHNESS: u32 = 5;

/// The default [`LayoutEngine`].
///
/// Layout is always top-down. [`LayoutOptions::thoroughness`] selects how
/// much effort goes into crossing reduction: `0` runs a single barycenter
/// pass, anything above adds vertex transposition, and from
/// `MEDIAN_THOROUGHNESS` on the median heuristic is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct SugiyamaEngine;

impl SugiyamaEngine {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutEngine for SugiyamaEngine {
    fn compute(
        &self,
        graph: &EngineGraph,
        options: &LayoutOptions,
    ) -> Result<EngineLayout, EngineError> {
        let links = resolve_links(graph)?;
        let slots = assign_slots(graph, &links, options)?;
        let positions = place_nodes(graph, &slots, options)?;
        let routes = route_edges(graph, &links, &positions, options);
        let size = drawing_size(graph, &positions, &routes, options.padding());

        let nodes = graph
            .nodes()
            .iter()
            .zip(&positions)
            .map(|(node, &position)| NodePlacement::new(node.id(), position, node.size()))
            .collect();

        debug!(
            nodes = graph.nodes().len(),
            edges = routes.len(),
            width = size.width(),
            height = size.height();
            "Sugiyama layout computed"
        );

        Ok(EngineLayout::new(nodes, routes, size))
    }
}

/// Layer and horizontal center of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slot {
    rank: usize,
    center_x: f32,
}

/// Resolves every edge to a `(source, target)` pair of node indices.
fn resolve_links(graph: &EngineGraph) -> Result<Vec<(usize, usize)>, EngineError> {
    let index: HashMap<&str, usize> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id(), i))
        .collect();

    graph
        .edges()
        .iter()
        .map(|edge| {
            let lookup = |id: &str| {
                index.get(id).copied().ok_or_else(|| EngineError::UnknownNode {
                    edge: edge.id().to_string(),
                    node: id.to_string(),
                })
            };
            Ok((lookup(edge.source())?, lookup(edge.target())?))
        })
        .collect()
}

/// Layer and center of every free node. Fixed nodes get no slot.
fn assign_slots(
    graph: &EngineGraph,
    links: &[(usize, usize)],
    options: &LayoutOptions,
) -> Result<Vec<Option<Slot>>, EngineError> {
    let node_count = graph.nodes().len();
    let is_fixed = |index: usize| graph.nodes()[index].fixed_position().is_some();
    let max_width = graph
        .nodes()
        .iter()
        .filter(|node| node.fixed_position().is_none())
        .map(|node| node.size().width())
        .fold(0.0_f32, f32::max);
    let column_width = max_width + options.node_spacing();

    // rust-sugiyama needs dense vertex ids; only connected free nodes get one
    let mut compact: Vec<Option<u32>> = vec![None; node_count];
    let mut members: Vec<usize> = Vec::new();
    let mut seen = HashSet::new();
    let mut sugiyama_edges = Vec::new();
    for &(source, target) in links {
        if source == target || is_fixed(source) || is_fixed(target) {
            continue;
        }
        if !seen.insert((source, target)) {
            continue;
        }
        let source_id = compact_id(&mut compact, &mut members, source);
        let target_id = compact_id(&mut compact, &mut members, target);
        sugiyama_edges.push((source_id, target_id));
    }

    let mut slots: Vec<Option<Slot>> = vec![None; node_count];
    let mut next_left = options.padding();

    if !sugiyama_edges.is_empty() {
        let config = sugiyama_config(options);
        let mut components: Vec<Vec<(usize, f64, f64)>> = run_sugiyama(sugiyama_edges, config)?
            .into_iter()
            .map(|coords| {
                coords
                    .into_iter()
                    .filter_map(|(id, (x, y))| members.get(id).map(|&node| (node, x, y)))
                    .collect::<Vec<_>>()
            })
            .filter(|component| !component.is_empty())
            .collect();
        components.sort_by_key(|component| {
            component
                .iter()
                .map(|&(node, _, _)| node)
                .min()
                .unwrap_or(usize::MAX)
        });

        for component in &components {
            let ranks = component_ranks(component, links);
            let min_x = component
                .iter()
                .map(|&(_, x, _)| x)
                .fold(f64::INFINITY, f64::min);

            let mut widest_column = 0.0_f32;
            for (&(node, x, _), rank) in component.iter().zip(ranks) {
                let column = ((x - min_x) / VERTEX_SPACING) as f32;
                slots[node] = Some(Slot {
                    rank,
                    center_x: next_left + column * column_width + max_width / 2.0,
                });
                widest_column = widest_column.max(column);
            }
            trace!(nodes = component.len(), columns = widest_column + 1.0; "Placed component");

            next_left += widest_column * column_width + max_width + options.node_spacing();
        }
    }

    for (index, node) in graph.nodes().iter().enumerate() {
        if slots[index].is_some() || is_fixed(index) {
            continue;
        }
        if compact[index].is_some() {
            return Err(EngineError::MissingNode(node.id().to_string()));
        }
        let width = node.size().width();
        slots[index] = Some(Slot {
            rank: 0,
            center_x: next_left + width / 2.0,
        });
        next_left += width + options.node_spacing();
    }

    Ok(slots)
}

fn compact_id(compact: &mut [Option<u32>], members: &mut Vec<usize>, node: usize) -> u32 {
    *compact[node].get_or_insert_with(|| {
        members.push(node);
        (members.len() - 1) as u32
    })
}

fn sugiyama_config(options: &LayoutOptions) -> Config {
    let thoroughness = options.thoroughness();
    let c_minimization = if thoroughness >= MEDIAN_THOROUGHNESS {
        CrossingMinimization::Median
    } else {
        CrossingMinimization::Barycenter
    };

    Config {
        minimum_length: 1,
        vertex_spacing: VERTEX_SPACING,
        c_minimization,
        transpose: thoroughness > 0,
        ..Default::default()
    }
}

/// Calls `rust-sugiyama`, turning a panic into an [`EngineError`].
fn run_sugiyama(
    edges: Vec<(u32, u32)>,
    config: Config,
) -> Result<Vec<Vec<(usize, (f64, f64))>>, EngineError> {
    debug!(
        edges = edges.len(),
        transpose = config.transpose;
        "Applying Sugiyama algorithm"
    );

    let layouts = panic::catch_unwind(move || rust_sugiyama::from_edges(&edges, &config));

    match layouts {
        Ok(results) if results.is_empty() => Err(EngineError::Failed(
            "rust-sugiyama returned empty layout results".to_string(),
        )),
        Ok(results) => Ok(results.into_iter().map(|(coords, _, _)| coords).collect()),
        Err(payload) => Err(EngineError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Layer index of each vertex of a component, top layer first.
///
/// Layers are the distinct y coordinates of the component. The order is
/// chosen so that most edges point down.
fn component_ranks(component: &[(usize, f64, f64)], links: &[(usize, usize)]) -> Vec<usize> {
    let mut levels: Vec<f64> = component.iter().map(|&(_, _, y)| y).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup_by(|a, b| (*a - *b).abs() < LAYER_EPSILON);

    let level_of = |y: f64| {
        levels
            .iter()
            .position(|&level| (level - y).abs() < LAYER_EPSILON)
            .unwrap_or(0)
    };
    let mut ranks: Vec<usize> = component.iter().map(|&(_, _, y)| level_of(y)).collect();

    let rank_of: HashMap<usize, usize> = component
        .iter()
        .map(|&(node, _, _)| node)
        .zip(ranks.iter().copied())
        .collect();
    let (mut down, mut up) = (0, 0);
    for (source, target) in links {
        if let (Some(s), Some(t)) = (rank_of.get(source), rank_of.get(target)) {
            if s < t {
                down += 1;
            } else if s > t {
                up += 1;
            }
        }
    }

    if up > down {
        let last = levels.len() - 1;
        for rank in &mut ranks {
            *rank = last - *rank;
        }
    }
    ranks
}

fn place_nodes(
    graph: &EngineGraph,
    slots: &[Option<Slot>],
    options: &LayoutOptions,
) -> Result<Vec<Point>, EngineError> {
    let layer_count = slots.iter().flatten().map(|slot| slot.rank + 1).max().unwrap_or(0);

    let mut heights = vec![0.0_f32; layer_count];
    for (node, slot) in graph.nodes().iter().zip(slots) {
        if let Some(slot) = slot {
            heights[slot.rank] = heights[slot.rank].max(node.size().height());
        }
    }

    let mut tops = Vec::with_capacity(layer_count);
    let mut y = options.padding();
    for height in &heights {
        tops.push(y);
        y += height + options.layer_spacing();
    }

    let mut positions = graph
        .nodes()
        .iter()
        .zip(slots)
        .map(|(node, slot)| match (node.fixed_position(), slot) {
            (Some(fixed), _) => Ok(fixed),
            (None, Some(slot)) => {
                let center = Point::new(
                    slot.center_x,
                    tops[slot.rank] + heights[slot.rank] / 2.0,
                );
                Ok(top_left_for_center(center, node.size()))
            }
            (None, None) => Err(EngineError::MissingNode(node.id().to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    clear_fixed_nodes(graph, slots, &mut positions, options.node_spacing());
    Ok(positions)
}

/// Pushes free nodes to the right until none of them overlaps a fixed node.
///
/// Each layer is swept left to right, so a pushed node also pushes the nodes
/// after it instead of landing on them.
fn clear_fixed_nodes(
    graph: &EngineGraph,
    slots: &[Option<Slot>],
    positions: &mut [Point],
    spacing: f32,
) {
    let fixed: Vec<Bounds> = graph
        .nodes()
        .iter()
        .filter_map(|node| Some(node.fixed_position()?.to_bounds(node.size())))
        .collect();
    if fixed.is_empty() {
        return;
    }
    let spacing = spacing.max(0.0);

    let mut layers: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, slot) in slots.iter().enumerate() {
        if let Some(slot) = slot {
            layers.entry(slot.rank).or_default().push(index);
        }
    }

    for members in layers.values_mut() {
        members.sort_by(|&a, &b| positions[a].x().total_cmp(&positions[b].x()));

        let mut cursor = f32::NEG_INFINITY;
        for &index in members.iter() {
            let size = graph.nodes()[index].size();
            let y = positions[index].y();
            let mut x = positions[index].x().max(cursor);
            // every push moves past the blocking box, so each blocks at most once
            while let Some(blocker) = fixed
                .iter()
                .find(|bounds| Point::new(x, y).to_bounds(size).intersects(bounds))
            {
                x = blocker.max_x() + spacing;
            }
            if x != positions[index].x() {
                trace!(node = graph.nodes()[index].id(), x; "Moved clear of fixed node");
            }
            positions[index] = Point::new(x, y);
            cursor = x + size.width() + spacing;
        }
    }
}

fn route_edges(
    graph: &EngineGraph,
    links: &[(usize, usize)],
    positions: &[Point],
    options: &LayoutOptions,
) -> Vec<EdgeRoute> {
    let bounds = |index: usize| positions[index].to_bounds(graph.nodes()[index].size());

    graph
        .edges()
        .iter()
        .zip(links)
        .map(|(edge, &(source, target))| {
            let (start, bends, end) = if source == target {
                self_loop_route(bounds(source))
            } else {
                orthogonal_route(bounds(source), bounds(target))
            };
            let bends = if options.simplify_bend_points() {
                simplify_bends(start, &bends, end)
            } else {
                bends
            };
            EdgeRoute::new(edge.id(), start, bends, end)
        })
        .collect()
}

/// Route leaving and entering through facing sides, with two bends halfway.
fn orthogonal_route(source: Bounds, target: Bounds) -> (Point, Vec<Point>, Point) {
    let (source_center, target_center) = (source.center(), target.center());

    let (start, end, vertical) = if target.min_y() >= source.max_y() {
        (
            Point::new(source_center.x(), source.max_y()),
            Point::new(target_center.x(), target.min_y()),
            true,
        )
    } else if target.max_y() <= source.min_y() {
        (
            Point::new(source_center.x(), source.min_y()),
            Point::new(target_center.x(), target.max_y()),
            true,
        )
    } else if target.min_x() >= source.max_x() {
        (
            Point::new(source.max_x(), source_center.y()),
            Point::new(target.min_x(), target_center.y()),
            false,
        )
    } else {
        (
            Point::new(source.min_x(), source_center.y()),
            Point::new(target.max_x(), target_center.y()),
            false,
        )
    };

    let mid = start.midpoint(end);
    let bends = if vertical {
        vec![Point::new(start.x(), mid.y()), Point::new(end.x(), mid.y())]
    } else {
        vec![Point::new(mid.x(), start.y()), Point::new(mid.x(), end.y())]
    };
    (start, bends, end)
}

/// Loop out of and back into the right side of a node.
fn self_loop_route(node: Bounds) -> (Point, Vec<Point>, Point) {
    let center = node.center();
    let quarter = node.height() / 4.0;
    let right = node.max_x();
    let outside = right + SELF_LOOP_OFFSET;

    (
        Point::new(right, center.y() - quarter),
        vec![
            Point::new(outside, center.y() - quarter),
            Point::new(outside, center.y() + quarter),
        ],
        Point::new(right, center.y() + quarter),
    )
}

/// Drops bends lying on the segment between their neighbours.
fn simplify_bends(start: Point, bends: &[Point], end: Point) -> Vec<Point> {
    let mut kept = Vec::with_capacity(bends.len());
    let mut previous = start;
    for (i, &bend) in bends.iter().enumerate() {
        let next = bends.get(i + 1).copied().unwrap_or(end);
        if is_collinear(previous, bend, next) {
            continue;
        }
        kept.push(bend);
        previous = bend;
    }
    kept
}

fn is_collinear(a: Point, b: Point, c: Point) -> bool {
    let ab = b.sub_point(a);
    let ac = c.sub_point(a);
    (ab.x() * ac.y() - ab.y() * ac.x()).abs() < 1e-3
}

fn drawing_size(
    graph: &EngineGraph,
    positions: &[Point],
    routes: &[EdgeRoute],
    padding: f32,
) -> Size {
    let node_extents = graph
        .nodes()
        .iter()
        .zip(positions)
        .map(|(node, position)| position.to_bounds(node.size()));
    let route_extents = routes
        .iter()
        .flat_map(EdgeRoute::points)
        .map(|point| point.to_bounds(Size::default()));

    node_extents
        .chain(route_extents)
        .reduce(|a, b| a.merge(&b))
        .map(|extent| Size::new(extent.max_x() + padding, extent.max_y() + padding))
        .unwrap_or_default()
}
