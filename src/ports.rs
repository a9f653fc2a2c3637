//! Port derivation and anchor geometry.
//!
//! Ports are not stored. They are derived from a node's kind, and their
//! anchors are a pure function of node position, kind and port index, so no
//! caller ever needs to read geometry back from a rendered view.

use crate::config::NodeLayout;
use crate::graph::Workflow;
use crate::node::{Node, NodeId, NodeKind, Point};

/// Which side of a node a port sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortKind {
    Input,
    /// Output port. `Some(i)` is scenario `i` of a condition node.
    Output(Option<usize>),
}

/// A port on a specific node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub node: NodeId,
    pub kind: PortKind,
}

impl PortRef {
    pub fn input(node: NodeId) -> Self {
        Self {
            node,
            kind: PortKind::Input,
        }
    }

    pub fn output(node: NodeId, scenario: Option<usize>) -> Self {
        Self {
            node,
            kind: PortKind::Output(scenario),
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, PortKind::Input)
    }

    pub fn scenario(&self) -> Option<usize> {
        match self.kind {
            PortKind::Output(scenario) => scenario,
            PortKind::Input => None,
        }
    }
}

/// Output ports of a node, in port order.
pub fn output_ports(node: &Node) -> Vec<PortRef> {
    match &node.kind {
        NodeKind::Condition(props) => (0..props.scenarios.len())
            .map(|i| PortRef::output(node.id, Some(i)))
            .collect(),
        _ if node.node_type().has_outputs() => vec![PortRef::output(node.id, None)],
        _ => Vec::new(),
    }
}

/// The input port of a node, if it has one.
pub fn input_port(node: &Node) -> Option<PortRef> {
    node.node_type().has_input().then(|| PortRef::input(node.id))
}

/// Every port of a node: the input first, then the outputs.
pub fn ports(node: &Node) -> Vec<PortRef> {
    input_port(node)
        .into_iter()
        .chain(output_ports(node))
        .collect()
}

/// Whether `port` exists on `node` in its current shape.
pub fn has_port(node: &Node, port: PortRef) -> bool {
    if port.node != node.id {
        return false;
    }
    match port.kind {
        PortKind::Input => node.node_type().has_input(),
        PortKind::Output(scenario) => output_ports(node).iter().any(|p| p.scenario() == scenario),
    }
}

/// Height of a node box. Condition nodes grow with their scenario count.
pub fn node_height(node: &Node, layout: &NodeLayout) -> f32 {
    let input_rows = node.node_type().descriptor().inputs.len();
    let rows = node.kind.scenario_count().unwrap_or(0).max(input_rows);
    layout.padding * 2.0
        + layout.header_height
        + layout.description_height
        + rows as f32 * layout.row_height
}

/// Canvas-space bounds of a node as `(x, y, width, height)`.
pub fn node_rect(node: &Node, layout: &NodeLayout) -> (f32, f32, f32, f32) {
    (
        node.position.x,
        node.position.y,
        layout.width,
        node_height(node, layout),
    )
}

/// Canvas-space anchor of a port.
///
/// Inputs sit on the left edge at mid height and single outputs on the right
/// edge at mid height. Scenario outputs are stacked down the right edge, one
/// per body row.
pub fn port_anchor(node: &Node, kind: PortKind, layout: &NodeLayout) -> Point {
    let (x, y, w, h) = node_rect(node, layout);
    match kind {
        PortKind::Input => Point::new(x, y + h / 2.0),
        PortKind::Output(None) => Point::new(x + w, y + h / 2.0),
        PortKind::Output(Some(index)) => {
            let body_top = y + layout.padding + layout.header_height + layout.description_height;
            Point::new(
                x + w,
                body_top + index as f32 * layout.row_height + layout.row_height / 2.0,
            )
        }
    }
}

/// Resolve a port reference against a workflow and return its anchor.
pub fn anchor_in(workflow: &Workflow, port: PortRef, layout: &NodeLayout) -> Option<Point> {
    let node = workflow.node(port.node)?;
    has_port(node, port).then(|| port_anchor(node, port.kind, layout))
}

/// Highlight state of a single port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortState {
    pub port: PortRef,
    pub satisfied: bool,
}

/// Satisfaction state of every port in the workflow, node by node.
pub fn port_states(workflow: &Workflow) -> Vec<PortState> {
    workflow
        .nodes()
        .iter()
        .flat_map(ports)
        .map(|port| PortState {
            port,
            satisfied: match port.kind {
                PortKind::Input => workflow.is_input_satisfied(port.node),
                PortKind::Output(scenario) => workflow.is_output_satisfied(port.node, scenario),
            },
        })
        .collect()
}
