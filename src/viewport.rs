//! Zoom and pan state, and conversion between screen and canvas space.
//!
//! The canvas is rendered with `scale(zoom)` followed by `translate(pan)`, so
//! pan is expressed in canvas units:
//!
//! ```text
//! screen = (canvas + pan) * zoom
//! canvas = screen / zoom - pan
//! ```
//!
//! Screen coordinates are relative to the canvas element's top-left corner.

use crate::config::ZoomConfig;
use crate::node::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pan: Point,
    limits: ZoomConfig,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl Viewport {
    /// Limits that are not a usable range (non-finite, non-positive or
    /// inverted) fall back to [`ZoomConfig::default`].
    pub fn new(limits: ZoomConfig) -> Self {
        let limits = if usable(&limits) {
            limits
        } else {
            tracing::warn!(?limits, "unusable zoom limits, using defaults");
            ZoomConfig::default()
        };
        Self {
            zoom: 1.0_f32.clamp(limits.min, limits.max),
            pan: Point::ZERO,
            limits,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    /// Zoom in by one step. Returns `true` if the zoom level changed.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom + self.limits.step)
    }

    /// Zoom out by one step. Returns `true` if the zoom level changed.
    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom - self.limits.step)
    }

    /// Apply a wheel event: scrolling up (negative delta) zooms in.
    pub fn wheel(&mut self, delta_y: f32) -> bool {
        if delta_y < 0.0 {
            self.zoom_in()
        } else {
            self.zoom_out()
        }
    }

    /// Set the zoom level, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        let clamped = round_step(zoom).clamp(self.limits.min, self.limits.max);
        let changed = clamped != self.zoom;
        self.zoom = clamped;
        changed
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, screen_dx: f32, screen_dy: f32) {
        self.pan = self.pan.offset(screen_dx / self.zoom, screen_dy / self.zoom);
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    /// Back to zoom 1.0 and no pan.
    pub fn reset(&mut self) {
        *self = Self::new(self.limits);
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(screen.x / self.zoom - self.pan.x, screen.y / self.zoom - self.pan.y)
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            (canvas.x + self.pan.x) * self.zoom,
            (canvas.y + self.pan.y) * self.zoom,
        )
    }

    /// Convert a screen-space distance (e.g. a pointer delta) to canvas units.
    pub fn screen_delta_to_canvas(&self, dx: f32, dy: f32) -> (f32, f32) {
        (dx / self.zoom, dy / self.zoom)
    }
}

fn usable(limits: &ZoomConfig) -> bool {
    [limits.min, limits.max, limits.step].iter().all(|v| v.is_finite())
        && limits.min > 0.0
        && limits.step > 0.0
        && limits.min <= limits.max
}

/// Snap to 1e-4 so repeated ±0.1 steps land exactly on the clamp bounds.
fn round_step(zoom: f32) -> f32 {
    (zoom * 10_000.0).round() / 10_000.0
}
