//! Connection routing: curve geometry for committed connections, the
//! in-progress edge shown while dragging from a port, and the click-to-connect
//! arming state.
//!
//! Curves are computed between screen-space anchors and mapped back into canvas
//! space when written as path commands (see [`crate::path::connection_path`]).

use crate::config::NodeLayout;
use crate::graph::{Connection, Workflow};
use crate::node::{Node, NodeId, NodeKind, Point};
use crate::path::{connection_path, CubicBezier};
use crate::ports::{anchor_in, PortRef};
use crate::viewport::Viewport;

/// Screen-space `(source, destination)` anchors of a connection.
///
/// Returns `None` if either endpoint or the source scenario port is gone.
pub fn connection_anchors(
    workflow: &Workflow,
    connection: &Connection,
    viewport: &Viewport,
    layout: &NodeLayout,
) -> Option<(Point, Point)> {
    let start = anchor_in(workflow, PortRef::output(connection.from, connection.scenario), layout)?;
    let end = anchor_in(workflow, PortRef::input(connection.to), layout)?;
    Some((viewport.canvas_to_screen(start), viewport.canvas_to_screen(end)))
}

/// Screen-space curve of a committed connection.
pub fn connection_curve(
    workflow: &Workflow,
    connection: &Connection,
    viewport: &Viewport,
    layout: &NodeLayout,
    offset: f32,
) -> Option<CubicBezier> {
    let (start, end) = connection_anchors(workflow, connection, viewport, layout)?;
    Some(CubicBezier::flowchart(start, end, offset))
}

/// Path commands of a committed connection, ready for the scaled canvas.
pub fn connection_path_commands(
    workflow: &Workflow,
    connection: &Connection,
    viewport: &Viewport,
    layout: &NodeLayout,
    offset: f32,
) -> Option<String> {
    let (start, end) = connection_anchors(workflow, connection, viewport, layout)?;
    Some(connection_path(start, end, viewport, offset))
}

/// The scenario a connection from `node` uses when no port was picked
/// explicitly: the first branch of a condition node, nothing otherwise.
pub fn default_scenario(node: &Node) -> Option<usize> {
    match &node.kind {
        NodeKind::Condition(_) => Some(0),
        _ => None,
    }
}

/// Consecutive `(from, to)` pairs of a selection, in selection order.
pub fn chain_pairs(selection: &[NodeId]) -> Vec<(NodeId, NodeId)> {
    selection.windows(2).map(|w| (w[0], w[1])).collect()
}

/// An edge being dragged out of an output port.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingConnection {
    source: PortRef,
    /// Live pointer position, screen space.
    cursor: Point,
}

impl PendingConnection {
    /// Start dragging from `source`, with the pointer at `cursor`.
    ///
    /// Returns `None` if `source` is not an output port.
    pub fn start(source: PortRef, cursor: Point) -> Option<Self> {
        if source.is_input() {
            return None;
        }
        Some(Self { source, cursor })
    }

    pub fn source(&self) -> PortRef {
        self.source
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn update(&mut self, cursor: Point) {
        self.cursor = cursor;
    }

    /// Preview curve from the source port's anchor to the live cursor.
    ///
    /// `None` once the source node or port no longer exists.
    pub fn preview_path(
        &self,
        workflow: &Workflow,
        viewport: &Viewport,
        layout: &NodeLayout,
        offset: f32,
    ) -> Option<String> {
        let anchor = viewport.canvas_to_screen(anchor_in(workflow, self.source, layout)?);
        Some(connection_path(anchor, self.cursor, viewport, offset))
    }

    /// The connection this drag commits when released over `target`.
    pub fn into_connection(self, target: NodeId) -> Connection {
        Connection::new(self.source.node, target, self.source.scenario())
    }
}

/// Click-to-connect arming state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectArm {
    #[default]
    Idle,
    /// First click landed on this node; the next click on another node connects.
    Armed(NodeId),
}

impl ConnectArm {
    pub fn pending_source(&self) -> Option<NodeId> {
        match self {
            ConnectArm::Armed(node) => Some(*node),
            ConnectArm::Idle => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, ConnectArm::Armed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PortArityValidator;
    use crate::node::{NodeType, WorkflowId};

    fn workflow() -> Workflow {
        let mut wf = Workflow::new(WorkflowId(1), "wf");
        wf.insert_node(NodeId(1), NodeKind::new(NodeType::Trigger), Point::new(0.0, 0.0));
        wf.insert_node(NodeId(2), NodeKind::new(NodeType::Condition), Point::new(400.0, 0.0));
        wf.insert_node(NodeId(3), NodeKind::new(NodeType::Notification), Point::new(800.0, 100.0));
        wf
    }

    #[test]
    fn test_anchors_use_port_geometry() {
        let wf = workflow();
        let layout = NodeLayout::default();
        let vp = Viewport::default();
        let conn = Connection::new(NodeId(1), NodeId(2), None);

        let (start, end) = connection_anchors(&wf, &conn, &vp, &layout).unwrap();
        assert_eq!(start.x, 200.0);
        assert_eq!(end.x, 400.0);
    }

    #[test]
    fn test_anchors_scale_with_zoom() {
        let wf = workflow();
        let layout = NodeLayout::default();
        let mut vp = Viewport::default();
        let conn = Connection::new(NodeId(1), NodeId(2), None);
        let (s1, e1) = connection_anchors(&wf, &conn, &vp, &layout).unwrap();
        vp.set_zoom(2.0);
        let (s2, e2) = connection_anchors(&wf, &conn, &vp, &layout).unwrap();
        assert_eq!(s2.x, s1.x * 2.0);
        assert_eq!(e2.y, e1.y * 2.0);
    }

    #[test]
    fn test_path_for_missing_scenario_is_none() {
        let wf = workflow();
        let conn = Connection::new(NodeId(2), NodeId(3), Some(4));
        let path = connection_path_commands(&wf, &conn, &Viewport::default(), &NodeLayout::default(), 100.0);
        assert!(path.is_none());
    }

    #[test]
    fn test_path_is_stable_across_calls() {
        let wf = workflow();
        let conn = Connection::new(NodeId(2), NodeId(3), Some(0));
        let layout = NodeLayout::default();
        let vp = Viewport::default();
        let a = connection_path_commands(&wf, &conn, &vp, &layout, 100.0);
        let b = connection_path_commands(&wf, &conn, &vp, &layout, 100.0);
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn test_pending_connection_rejects_input_port() {
        assert!(PendingConnection::start(PortRef::input(NodeId(2)), Point::ZERO).is_none());
    }

    #[test]
    fn test_pending_connection_carries_scenario() {
        let mut wf = workflow();
        let mut pending =
            PendingConnection::start(PortRef::output(NodeId(2), Some(0)), Point::new(600.0, 80.0)).unwrap();
        pending.update(Point::new(750.0, 120.0));
        assert_eq!(pending.cursor(), Point::new(750.0, 120.0));

        let preview = pending
            .preview_path(&wf, &Viewport::default(), &NodeLayout::default(), 50.0)
            .unwrap();
        assert!(preview.starts_with("M 600 "));
        assert!(preview.ends_with("750 120"));

        let conn = pending.into_connection(NodeId(3));
        assert_eq!(conn, Connection::new(NodeId(2), NodeId(3), Some(0)));
        assert!(wf.add_connection(conn, &PortArityValidator).is_ok());
    }

    #[test]
    fn test_default_scenario() {
        let wf = workflow();
        assert_eq!(default_scenario(wf.node(NodeId(2)).unwrap()), Some(0));
        assert_eq!(default_scenario(wf.node(NodeId(1)).unwrap()), None);
    }

    #[test]
    fn test_chain_pairs() {
        let ids = [NodeId(4), NodeId(1), NodeId(7)];
        assert_eq!(
            chain_pairs(&ids),
            vec![(NodeId(4), NodeId(1)), (NodeId(1), NodeId(7))]
        );
        assert!(chain_pairs(&ids[..1]).is_empty());
    }

    #[test]
    fn test_connect_arm() {
        let arm = ConnectArm::Armed(NodeId(5));
        assert!(arm.is_armed());
        assert_eq!(arm.pending_source(), Some(NodeId(5)));
        assert_eq!(ConnectArm::default().pending_source(), None);
    }
}
