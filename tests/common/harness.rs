//! Test harness around an editor session.
//!
//! Provides a session with activity tracking, a renderer, and helpers for
//! simulating pointer interactions in screen space.

#![allow(dead_code)]

use super::ActivityTracker;
use workflow_canvas::ports::{anchor_in, node_rect};
use workflow_canvas::{
    CanvasRenderer, EditorConfig, EditorSession, NodeId, NodeType, Point, PointerOutcome, PortRef,
    ViewChanges,
};

/// Install a test subscriber once per process. Output is captured by the
/// test runner and only shown for failing tests.
pub fn init_logging() {
    let _ = workflow_canvas::logging::init("warn,workflow_canvas=debug");
}

/// Test harness for driving an editor session.
pub struct EditorHarness {
    pub session: EditorSession<ActivityTracker>,
    pub renderer: CanvasRenderer,
    pub tracker: ActivityTracker,
}

impl Default for EditorHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorHarness {
    /// Create a harness with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        init_logging();
        let tracker = ActivityTracker::new();
        Self {
            session: EditorSession::with_sink(config, tracker.clone()),
            renderer: CanvasRenderer::new(),
            tracker,
        }
    }

    /// Add a node at a canvas position.
    pub fn node(&mut self, node_type: NodeType, x: f32, y: f32) -> NodeId {
        self.session.create_node(node_type, Point::new(x, y))
    }

    /// Connect two nodes, panicking if the connection is rejected.
    pub fn connect(&mut self, from: NodeId, to: NodeId, scenario: Option<usize>) -> usize {
        self.session
            .add_connection(from, to, scenario)
            .expect("connection should be accepted")
    }

    pub fn render(&mut self) -> ViewChanges {
        self.renderer.render(&self.session)
    }

    // === Screen geometry ===

    /// Screen position of a port anchor.
    pub fn port_screen(&self, port: PortRef) -> Point {
        let session = &self.session;
        let anchor = anchor_in(session.current(), port, &session.config().node)
            .expect("port should exist");
        session.viewport().canvas_to_screen(anchor)
    }

    /// Screen position of a node's centre.
    pub fn node_center_screen(&self, node: NodeId) -> Point {
        let session = &self.session;
        let n = session.current().node(node).expect("node should exist");
        let (x, y, w, h) = node_rect(n, &session.config().node);
        session
            .viewport()
            .canvas_to_screen(Point::new(x + w / 2.0, y + h / 2.0))
    }

    pub fn position(&self, node: NodeId) -> Point {
        self.session
            .current()
            .node(node)
            .expect("node should exist")
            .position
    }

    // === Pointer simulation ===

    /// Press, move and release the pointer. Returns the release outcome.
    pub fn drag(&mut self, from: Point, to: Point) -> PointerOutcome {
        self.session.pointer_down(from);
        let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
        self.session.pointer_move(mid);
        self.session.pointer_move(to);
        self.session.pointer_up(to)
    }

    /// Press and release at the same position.
    pub fn click(&mut self, at: Point) -> PointerOutcome {
        self.session.pointer_down(at);
        self.session.pointer_up(at)
    }

    /// Drag a new connection from an output port onto a screen position.
    pub fn drag_connection(&mut self, source: PortRef, to: Point) -> PointerOutcome {
        let start = self.port_screen(source);
        self.drag(start, to)
    }

    /// Every (from, to, scenario) triple of the current workflow.
    pub fn edges(&self) -> Vec<(NodeId, NodeId, Option<usize>)> {
        self.session
            .current()
            .connections()
            .iter()
            .map(|c| (c.from, c.to, c.scenario))
            .collect()
    }
}
