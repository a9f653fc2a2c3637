//! Level 3: Connection Tests
//!
//! Tests drag-from-port, click-to-connect, chain-connect, cascade deletion
//! and port highlighting.

mod common;

use common::harness::EditorHarness;
use workflow_canvas::activity::icons;
use workflow_canvas::{
    ConnectOutcome, ConnectionError, Gesture, NodeId, NodeType, Point, PointerOutcome, PortKind,
    PortRef, PropertyEdit,
};

// ============================================================================
// Drag from port
// ============================================================================

#[test]
fn test_drag_from_output_to_node_body_connects() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Trigger, 0.0, 0.0);
    let b = harness.node(NodeType::Batch, 400.0, 0.0);

    let target = harness.node_center_screen(b);
    let outcome = harness.drag_connection(PortRef::output(a, None), target);

    assert_eq!(outcome, PointerOutcome::Connect(ConnectOutcome::Connected(0)));
    assert_eq!(harness.edges(), vec![(a, b, None)]);
    assert_eq!(harness.session.preview_path(), None, "preview is discarded");
    let (message, icon, _) = harness.tracker.last().unwrap();
    assert_eq!(message, "Connected node-1 to node-2");
    assert_eq!(icon, icons::CONNECT);
}

#[test]
fn test_drag_onto_input_port_connects() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Batch, 0.0, 0.0);
    let b = harness.node(NodeType::Notification, 400.0, 200.0);

    let input = harness.port_screen(PortRef::input(b));
    harness.drag_connection(PortRef::output(a, None), input);
    assert_eq!(harness.edges(), vec![(a, b, None)]);
}

#[test]
fn test_preview_follows_cursor() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Trigger, 0.0, 0.0);
    let start = harness.port_screen(PortRef::output(a, None));

    assert_eq!(
        harness.session.pointer_down(start),
        PointerOutcome::ConnectionStarted(PortRef::output(a, None))
    );
    let first = harness.session.preview_path().unwrap();
    harness.session.pointer_move(Point::new(500.0, 300.0));
    let second = harness.session.preview_path().unwrap();

    assert_ne!(first, second);
    assert!(second.ends_with("500 300"), "preview ends at the cursor: {second}");
    assert!(matches!(harness.session.gesture(), Gesture::DraggingConnection(_)));
}

#[test]
fn test_release_on_empty_canvas_discards() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Trigger, 0.0, 0.0);
    harness.node(NodeType::Batch, 400.0, 0.0);
    let revision = harness.session.revision();

    let outcome = harness.drag_connection(PortRef::output(a, None), Point::new(900.0, 900.0));

    assert_eq!(outcome, PointerOutcome::Connect(ConnectOutcome::Discarded));
    assert!(harness.edges().is_empty());
    assert!(harness.session.revision() > revision, "preview removal is redrawn");
}

#[test]
fn test_release_on_trigger_is_rejected() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Batch, 0.0, 0.0);
    let t = harness.node(NodeType::Trigger, 400.0, 0.0);

    let target = harness.node_center_screen(t);
    let outcome = harness.drag_connection(PortRef::output(a, None), target);

    assert_eq!(
        outcome,
        PointerOutcome::Connect(ConnectOutcome::Rejected(ConnectionError::TargetHasNoInput {
            node: t,
            node_type: NodeType::Trigger,
        }))
    );
    assert!(harness.edges().is_empty());
}

#[test]
fn test_release_on_source_is_self_loop() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Batch, 0.0, 0.0);
    let center = harness.node_center_screen(a);
    let outcome = harness.drag_connection(PortRef::output(a, None), center);
    assert_eq!(
        outcome,
        PointerOutcome::Connect(ConnectOutcome::Rejected(ConnectionError::SelfLoop(a)))
    );
}

#[test]
fn test_drag_from_scenario_port_carries_scenario() {
    let mut harness = EditorHarness::new();
    let c = harness.node(NodeType::Condition, 0.0, 0.0);
    harness.session.edit_node(c, PropertyEdit::AppendScenario).unwrap();
    let n = harness.node(NodeType::Notification, 400.0, 0.0);

    let target = harness.node_center_screen(n);
    harness.drag_connection(PortRef::output(c, Some(1)), target);
    assert_eq!(harness.edges(), vec![(c, n, Some(1))]);
}

// ============================================================================
// Click to connect
// ============================================================================

#[test]
fn test_click_connect_arms_then_connects() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Trigger, 0.0, 0.0);
    let b = harness.node(NodeType::CreateIssue, 300.0, 0.0);

    assert_eq!(harness.session.click_connect(a), ConnectOutcome::Armed(a));
    assert_eq!(harness.session.pending_connect(), Some(a));
    assert_eq!(harness.session.click_connect(b), ConnectOutcome::Connected(0));
    assert_eq!(harness.session.pending_connect(), None);
    assert_eq!(harness.edges(), vec![(a, b, None)]);
}

#[test]
fn test_click_connect_same_node_disarms() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Trigger, 0.0, 0.0);
    harness.session.click_connect(a);
    assert_eq!(harness.session.click_connect(a), ConnectOutcome::Disarmed);
    assert_eq!(harness.session.pending_connect(), None);
    assert!(harness.edges().is_empty());
}

#[test]
fn test_click_connect_invalid_pair_disarms() {
    let mut harness = EditorHarness::new();
    let n = harness.node(NodeType::Notification, 0.0, 0.0);
    let b = harness.node(NodeType::Batch, 300.0, 0.0);
    harness.session.click_connect(n);
    assert!(matches!(
        harness.session.click_connect(b),
        ConnectOutcome::Rejected(ConnectionError::SourceHasNoOutputs { .. })
    ));
    assert_eq!(harness.session.pending_connect(), None);
}

#[test]
fn test_click_connect_from_condition_uses_first_scenario() {
    let mut harness = EditorHarness::new();
    let c = harness.node(NodeType::Condition, 0.0, 0.0);
    let n = harness.node(NodeType::Notification, 300.0, 0.0);
    harness.session.click_connect(c);
    harness.session.click_connect(n);
    assert_eq!(harness.edges(), vec![(c, n, Some(0))]);
}

#[test]
fn test_chain_connect_follows_selection_order() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Trigger, 0.0, 0.0);
    let b = harness.node(NodeType::Batch, 300.0, 0.0);
    let n = harness.node(NodeType::Notification, 600.0, 0.0);
    let c = harness.node(NodeType::CommentSync, 900.0, 0.0);

    for id in [a, b, n, c] {
        harness.session.click_node(id, true);
    }
    let outcome = harness.session.click_connect(a);

    // n -> c is skipped, notifications have no outputs
    assert_eq!(
        outcome,
        ConnectOutcome::Chained {
            created: vec![0, 1],
            skipped: 1
        }
    );
    assert_eq!(harness.edges(), vec![(a, b, None), (b, n, None)]);
    assert!(harness.session.selection().nodes().is_empty());
}

// ============================================================================
// Cascade and port highlighting
// ============================================================================

#[test]
fn test_remove_middle_node_cascades() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Trigger, 0.0, 0.0);
    let b = harness.node(NodeType::CreateIssue, 300.0, 0.0);
    let c = harness.node(NodeType::Notification, 600.0, 0.0);
    harness.connect(a, b, None);
    harness.connect(b, c, None);

    assert!(harness.session.remove_node(b));

    assert!(harness.edges().is_empty());
    assert_eq!(harness.session.current().nodes().len(), 2);
    assert_eq!(harness.tracker.last().unwrap().0, "Removed node");
}

#[test]
fn test_scenario_port_highlighting() {
    let mut harness = EditorHarness::new();
    let cond = harness.node(NodeType::Condition, 0.0, 0.0);
    harness.session.edit_node(cond, PropertyEdit::AppendScenario).unwrap();
    harness.session.edit_node(cond, PropertyEdit::AppendScenario).unwrap();
    let n = harness.node(NodeType::Notification, 400.0, 0.0);
    harness.connect(cond, n, Some(2));

    let outputs: Vec<(Option<usize>, bool)> = harness
        .session
        .port_states()
        .into_iter()
        .filter(|s| s.port.node == cond)
        .filter_map(|s| match s.port.kind {
            PortKind::Output(scenario) => Some((scenario, s.satisfied)),
            PortKind::Input => None,
        })
        .collect();

    assert_eq!(
        outputs,
        vec![(Some(0), false), (Some(1), false), (Some(2), true)]
    );
    assert!(harness.session.current().is_input_satisfied(n));
    assert!(!harness.session.current().is_input_satisfied(cond));
}

#[test]
fn test_removing_connection_unhighlights_ports() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Trigger, 0.0, 0.0);
    let b = harness.node(NodeType::Batch, 300.0, 0.0);
    harness.connect(a, b, None);
    harness.session.remove_connection_at(0);

    assert!(harness.session.port_states().iter().all(|s| !s.satisfied));
    assert_eq!(harness.session.remove_connection_at(0), None);
}

#[test]
fn test_duplicates_allowed_by_default() {
    let mut harness = EditorHarness::new();
    let a = harness.node(NodeType::Trigger, 0.0, 0.0);
    let b = harness.node(NodeType::Batch, 300.0, 0.0);
    harness.connect(a, b, None);
    assert_eq!(harness.session.add_connection(a, b, None), Ok(1));
    assert_eq!(harness.edges().len(), 2);
    assert!(harness.session.current().contains_node(NodeId(2)));
}
