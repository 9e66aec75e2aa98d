//! Flowsketch Core Types and Definitions
//!
//! This crate provides the canonical graph model shared by the Flowsketch
//! parser, the layout adapter and any renderer consuming their output. It
//! includes:
//!
//! - **Graph**: Nodes, edges and the graph container ([`graph`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: CSS color validation for style overrides ([`color::Color`])
//! - **Viewport**: Render-boundary state and drag events ([`viewport`] module)

pub mod color;
pub mod geometry;
pub mod graph;
pub mod viewport;

pub use graph::{Edge, EdgeKind, Graph, LayoutResult, Node, NodeShape, NodeStyle};
