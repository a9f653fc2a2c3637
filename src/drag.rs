//! Node placement from the palette, node dragging and canvas panning.
//!
//! Drags are absolute, not incremental: every pointer move recomputes the
//! target from the pointer position captured at pointer-down, so rounding
//! never accumulates over a long drag.

use crate::config::EditorConfig;
use crate::node::{NodeId, Point};
use crate::viewport::Viewport;

/// Canvas position for a node dropped from the palette at `screen`.
///
/// The drop point marks the node's anchor (half its width across, a little
/// below the header), not its top-left corner.
pub fn drop_position(viewport: &Viewport, config: &EditorConfig, screen: Point) -> Point {
    viewport.screen_to_canvas(screen.offset(-config.drop_anchor_x, -config.drop_anchor_y))
}

/// An in-progress node drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeDrag {
    pub node: NodeId,
    pointer_start: Point,
    initial: Point,
}

impl NodeDrag {
    /// Capture the pointer (screen space) and the node's canvas position.
    pub fn begin(node: NodeId, pointer: Point, initial: Point) -> Self {
        Self {
            node,
            pointer_start: pointer,
            initial,
        }
    }

    /// Node position for the current pointer.
    pub fn position_for(&self, pointer: Point, viewport: &Viewport) -> Point {
        let (dx, dy) = viewport.screen_delta_to_canvas(
            pointer.x - self.pointer_start.x,
            pointer.y - self.pointer_start.y,
        );
        self.initial.offset(dx, dy)
    }

    pub fn initial(&self) -> Point {
        self.initial
    }
}

/// An in-progress canvas pan, started by pressing on empty canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanDrag {
    pointer_start: Point,
    pan_start: Point,
    moved: bool,
}

impl PanDrag {
    pub fn begin(pointer: Point, pan: Point) -> Self {
        Self {
            pointer_start: pointer,
            pan_start: pan,
            moved: false,
        }
    }

    /// Pan for the current pointer. Once the pointer has travelled past
    /// `threshold` screen units the gesture stops counting as a click.
    pub fn pan_for(&mut self, pointer: Point, zoom: f32, threshold: f32) -> Point {
        let dx = pointer.x - self.pointer_start.x;
        let dy = pointer.y - self.pointer_start.y;
        if dx * dx + dy * dy > threshold * threshold {
            self.moved = true;
        }
        let z = if zoom > 0.0 { zoom } else { 1.0 };
        self.pan_start.offset(dx / z, dy / z)
    }

    /// Whether the press never left the click threshold.
    pub fn is_click(&self) -> bool {
        !self.moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_position_subtracts_anchor() {
        let config = EditorConfig::default();
        let vp = Viewport::default();
        assert_eq!(
            drop_position(&vp, &config, Point::new(300.0, 200.0)),
            Point::new(200.0, 150.0)
        );
    }

    #[test]
    fn test_drop_position_divides_by_zoom() {
        let config = EditorConfig::default();
        let mut vp = Viewport::default();
        vp.set_zoom(2.0);
        assert_eq!(
            drop_position(&vp, &config, Point::new(300.0, 200.0)),
            Point::new(100.0, 75.0)
        );
    }

    #[test]
    fn test_node_drag_follows_pointer() {
        let vp = Viewport::default();
        let drag = NodeDrag::begin(NodeId(1), Point::new(10.0, 10.0), Point::new(100.0, 100.0));
        assert_eq!(drag.position_for(Point::new(40.0, 5.0), &vp), Point::new(130.0, 95.0));
        // Back to the start pointer returns to the initial position
        assert_eq!(drag.position_for(Point::new(10.0, 10.0), &vp), drag.initial());
    }

    #[test]
    fn test_node_drag_scales_with_zoom() {
        let mut vp = Viewport::default();
        vp.set_zoom(2.0);
        let drag = NodeDrag::begin(NodeId(1), Point::ZERO, Point::new(50.0, 50.0));
        assert_eq!(drag.position_for(Point::new(100.0, -40.0), &vp), Point::new(100.0, 30.0));
    }

    #[test]
    fn test_pan_drag_click_threshold() {
        let mut pan = PanDrag::begin(Point::new(100.0, 100.0), Point::ZERO);
        pan.pan_for(Point::new(102.0, 101.0), 1.0, 3.0);
        assert!(pan.is_click());

        let result = pan.pan_for(Point::new(150.0, 80.0), 1.0, 3.0);
        assert!(!pan.is_click());
        assert_eq!(result, Point::new(50.0, -20.0));

        // Returning near the start does not turn it back into a click
        pan.pan_for(Point::new(100.0, 100.0), 1.0, 3.0);
        assert!(!pan.is_click());
    }

    #[test]
    fn test_pan_drag_divides_by_zoom() {
        let mut pan = PanDrag::begin(Point::ZERO, Point::new(10.0, 10.0));
        assert_eq!(pan.pan_for(Point::new(40.0, 20.0), 2.0, 3.0), Point::new(30.0, 20.0));
    }
}
