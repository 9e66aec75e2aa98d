//! Types shared with the render layer.
//!
//! The renderer owns pan/zoom and dragging; this module only defines what
//! crosses the boundary: the [`ViewportState`] it keeps next to a laid-out
//! graph, and the [`DragEvent`] it emits when the user moves a node.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};

/// Pan/zoom transform applied by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    scale: f32,
    translate_x: f32,
    translate_y: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

impl ViewportState {
    pub fn new(scale: f32, translate_x: f32, translate_y: f32) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Computes the transform that fits a drawing of `bounds` inside a
    /// `canvas`, centered, never zooming in past 1:1.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowsketch_core::{geometry::Size, viewport::ViewportState};
    ///
    /// let view = ViewportState::fit(Size::new(1600.0, 600.0), Size::new(800.0, 600.0));
    /// assert_eq!(view.scale(), 0.5);
    /// assert_eq!(view.translate_x(), 0.0);
    /// assert_eq!(view.translate_y(), 150.0);
    /// ```
    pub fn fit(bounds: Size, canvas: Size) -> Self {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Self::default();
        }

        let scale = (canvas.width() / bounds.width())
            .min(canvas.height() / bounds.height())
            .min(1.0);

        Self {
            scale,
            translate_x: (canvas.width() - bounds.width() * scale) / 2.0,
            translate_y: (canvas.height() - bounds.height() * scale) / 2.0,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn translate_x(&self) -> f32 {
        self.translate_x
    }

    pub fn translate_y(&self) -> f32 {
        self.translate_y
    }

    /// Maps a point on screen back into layout coordinates.
    ///
    /// Renderers use this to turn a pointer position into the position
    /// carried by a [`DragEvent`].
    pub fn to_layout(&self, screen: Point) -> Point {
        Point::new(
            (screen.x() - self.translate_x) / self.scale,
            (screen.y() - self.translate_y) / self.scale,
        )
    }
}

/// A node was dragged to a new position by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEvent {
    node_id: String,
    position: Point,
}

impl DragEvent {
    pub fn new(node_id: impl Into<String>, position: Point) -> Self {
        Self {
            node_id: node_id.into(),
            position,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_fit_small_drawing_is_centered_unscaled() {
        let view = ViewportState::fit(Size::new(200.0, 100.0), Size::new(800.0, 600.0));
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.translate_x(), 300.0);
        assert_eq!(view.translate_y(), 250.0);
    }

    #[test]
    fn test_fit_large_drawing_scales_down() {
        let view = ViewportState::fit(Size::new(800.0, 1200.0), Size::new(400.0, 300.0));
        assert!(approx_eq!(f32, view.scale(), 0.25));
        assert!(approx_eq!(f32, view.translate_x(), 100.0));
        assert!(approx_eq!(f32, view.translate_y(), 0.0));
    }

    #[test]
    fn test_fit_degenerate_bounds() {
        let view = ViewportState::fit(Size::new(0.0, 0.0), Size::new(400.0, 300.0));
        assert_eq!(view, ViewportState::default());
    }

    #[test]
    fn test_to_layout_inverts_transform() {
        let view = ViewportState::new(0.5, 100.0, 20.0);
        let p = view.to_layout(Point::new(150.0, 70.0));
        assert!(approx_eq!(f32, p.x(), 100.0));
        assert!(approx_eq!(f32, p.y(), 100.0));
    }
}
