//! Grid placement used when the layout engine fails.
//!
//! Nodes are laid out left to right, top to bottom, in input order, every
//! node the same size. Pinned nodes keep their position. Edges are left
//! unrouted.

use log::debug;

use flowsketch_core::{
    Graph, LayoutResult,
    geometry::{Point, Size},
};

use crate::layout::convert::grow_to_contain;

/// Cell geometry of the fallback grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOptions {
    columns: usize,
    column_spacing: f32,
    row_spacing: f32,
    margin: f32,
    node_size: Size,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            columns: 4,
            column_spacing: 150.0,
            row_spacing: 100.0,
            margin: 50.0,
            node_size: Size::new(120.0, 60.0),
        }
    }
}

impl GridOptions {
    /// Set the number of nodes per row. Zero is treated as one.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    pub fn with_column_spacing(mut self, spacing: f32) -> Self {
        self.column_spacing = spacing;
        self
    }

    pub fn with_row_spacing(mut self, spacing: f32) -> Self {
        self.row_spacing = spacing;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the size given to every node, whatever its shape
    pub fn with_node_size(mut self, size: Size) -> Self {
        self.node_size = size;
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn column_spacing(&self) -> f32 {
        self.column_spacing
    }

    pub fn row_spacing(&self) -> f32 {
        self.row_spacing
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn node_size(&self) -> Size {
        self.node_size
    }

    /// Top-left corner of the `index`-th cell.
    fn cell(&self, index: usize) -> Point {
        let columns = self.columns.max(1);
        Point::new(
            (index % columns) as f32 * self.column_spacing + self.margin,
            (index / columns) as f32 * self.row_spacing + self.margin,
        )
    }

    /// Drawing size of a grid holding `count` nodes.
    fn extent(&self, count: usize) -> Size {
        let columns = self.columns.max(1);
        let used_columns = count.min(columns);
        let rows = count.div_ceil(columns);
        Size::new(
            used_columns as f32 * self.column_spacing + 2.0 * self.margin,
            rows as f32 * self.row_spacing + 2.0 * self.margin,
        )
    }
}

/// Lays `graph` out on a grid.
///
/// The `i`-th node goes to `x = (i % columns) * column_spacing + margin`,
/// `y = (i / columns) * row_spacing + margin`. Never fails.
pub fn grid_layout(graph: &Graph, options: &GridOptions) -> LayoutResult {
    let size = options.node_size();
    let mut bounds = options.extent(graph.nodes().len());

    let nodes = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let position = match node.pinned_position() {
                Some(pinned) => {
                    bounds = grow_to_contain(bounds, pinned.to_bounds(size), options.margin());
                    pinned
                }
                None => options.cell(index),
            };
            node.clone().with_position(position).with_size(size)
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| edge.clone().without_points())
        .collect();

    debug!(
        nodes = graph.nodes().len(),
        width = bounds.width(),
        height = bounds.height();
        "Grid layout computed"
    );

    LayoutResult::new(Graph::new(nodes, edges), bounds)
}

#[cfg(test)]
mod tests {
    use flowsketch_core::{Edge, Node, NodeShape};

    use super::*;

    fn graph_of(count: usize) -> Graph {
        let nodes = (0..count).map(|i| Node::new(format!("N{i}"))).collect();
        Graph::new(nodes, vec![])
    }

    #[test]
    fn test_grid_positions_follow_input_order() {
        let result = grid_layout(&graph_of(6), &GridOptions::default());

        let positions: Vec<_> = result
            .graph()
            .nodes()
            .iter()
            .map(|node| node.position().unwrap())
            .collect();
        assert_eq!(
            positions,
            vec![
                Point::new(50.0, 50.0),
                Point::new(200.0, 50.0),
                Point::new(350.0, 50.0),
                Point::new(500.0, 50.0),
                Point::new(50.0, 150.0),
                Point::new(200.0, 150.0),
            ]
        );
    }

    #[test]
    fn test_grid_bounds() {
        let options = GridOptions::default();

        assert_eq!(grid_layout(&graph_of(1), &options).bounds(), Size::new(250.0, 200.0));
        assert_eq!(grid_layout(&graph_of(4), &options).bounds(), Size::new(700.0, 200.0));
        assert_eq!(grid_layout(&graph_of(5), &options).bounds(), Size::new(700.0, 300.0));
    }

    #[test]
    fn test_grid_ignores_shape_sizes() {
        let graph = Graph::new(
            vec![
                Node::new("A").with_shape(NodeShape::Circle),
                Node::new("B")
                    .with_shape(NodeShape::Diamond)
                    .with_size(Size::new(300.0, 300.0)),
            ],
            vec![],
        );
        let result = grid_layout(&graph, &GridOptions::default());

        for node in result.graph().nodes() {
            assert_eq!(node.size(), Some(Size::new(120.0, 60.0)));
        }
        assert_eq!(result.graph().node("A").unwrap().shape(), NodeShape::Circle);
    }

    #[test]
    fn test_grid_keeps_pins_and_grows_bounds() {
        let graph = Graph::new(
            vec![
                Node::new("A"),
                Node::new("B").pinned_at(Point::new(900.0, 40.0)),
            ],
            vec![Edge::new("A", "B").with_points(vec![Point::default()])],
        );
        let result = grid_layout(&graph, &GridOptions::default());

        let b = result.graph().node("B").unwrap();
        assert_eq!(b.position(), Some(Point::new(900.0, 40.0)));
        assert!(b.is_pinned());
        assert_eq!(result.bounds(), Size::new(1070.0, 200.0));
        assert!(result.graph().edges()[0].points().is_none());
    }

    #[test]
    fn test_zero_columns_behaves_like_one() {
        let options = GridOptions::default().with_columns(0);
        let result = grid_layout(&graph_of(2), &options);

        assert_eq!(
            result.graph().nodes()[1].position(),
            Some(Point::new(50.0, 150.0))
        );
        assert_eq!(result.bounds(), Size::new(250.0, 300.0));
    }
}
