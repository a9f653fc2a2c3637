//! Level 7: Scalability & Invariant Tests
//!
//! Builds larger graphs and checks the structural invariants hold after long
//! sequences of edits, and that rendering stays consistent.

mod common;

use common::harness::EditorHarness;
use workflow_canvas::{NodeId, NodeType, Point};

/// Deterministic pseudo-random sequence so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[(self.next() as usize) % items.len()]
    }
}

fn build_grid(harness: &mut EditorHarness, count: usize, seed: u64) -> Vec<NodeId> {
    let mut rng = Lcg(seed);
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let node_type = rng.pick(&NodeType::PALETTE);
        let x = (i % 20) as f32 * 250.0;
        let y = (i / 20) as f32 * 200.0;
        ids.push(harness.node(node_type, x, y));
    }
    for _ in 0..count * 2 {
        let from = rng.pick(&ids);
        let to = rng.pick(&ids);
        let node = harness.session.current().node(from).unwrap();
        let scenario = node.kind.scenario_count().map(|k| (rng.next() as usize) % k);
        // Invalid pairs are expected and simply rejected
        let _ = harness.session.add_connection(from, to, scenario);
    }
    ids
}

fn assert_invariants(harness: &EditorHarness) {
    let wf = harness.session.current();
    for c in wf.connections() {
        let from = wf.node(c.from).expect("connection source exists");
        let to = wf.node(c.to).expect("connection target exists");
        assert_ne!(c.from, c.to, "no self loops");
        assert_ne!(to.node_type(), NodeType::Trigger, "triggers have no input");
        assert_ne!(from.node_type(), NodeType::Notification, "notifications have no output");
        match (from.kind.scenario_count(), c.scenario) {
            (Some(k), Some(s)) => assert!(s < k, "scenario {s} within {k} ports"),
            (None, None) => {}
            other => panic!("scenario mismatch {other:?}"),
        }
    }
}

#[test]
fn test_many_nodes_keep_invariants() {
    let mut harness = EditorHarness::new();
    build_grid(&mut harness, 200, 7);
    assert_eq!(harness.session.current().nodes().len(), 200);
    assert!(!harness.session.current().connections().is_empty());
    assert_invariants(&harness);
}

#[test]
fn test_cascade_over_random_removals() {
    let mut harness = EditorHarness::new();
    let ids = build_grid(&mut harness, 120, 42);
    let mut rng = Lcg(99);

    for _ in 0..40 {
        let victim = rng.pick(&ids);
        harness.session.remove_node(victim);
        assert!(
            harness
                .session
                .current()
                .connections()
                .iter()
                .all(|c| c.from != victim && c.to != victim),
            "no connection references a removed node"
        );
        assert_invariants(&harness);
    }
}

#[test]
fn test_render_is_idempotent_at_scale() {
    let mut harness = EditorHarness::new();
    build_grid(&mut harness, 150, 3);

    let first = harness.render();
    assert_eq!(first.attached.len(), 150);
    let paths = harness.renderer.connection_paths().to_vec();
    assert_eq!(paths.len(), harness.session.current().connections().len());

    let second = harness.render();
    assert!(second.is_empty());
    assert_eq!(harness.renderer.connection_paths(), paths.as_slice());
}

#[test]
fn test_render_tracks_removals() {
    let mut harness = EditorHarness::new();
    let ids = build_grid(&mut harness, 60, 11);
    harness.render();

    for id in ids.iter().take(10) {
        harness.session.remove_node(*id);
    }
    let changes = harness.render();
    assert_eq!(changes.detached, ids[..10].to_vec());
    assert_eq!(harness.renderer.view_count(), 50);
    assert_eq!(
        harness.renderer.connection_paths().len(),
        harness.session.current().connections().len()
    );
}

#[test]
fn test_zoom_stays_clamped() {
    let mut harness = EditorHarness::new();
    let mut rng = Lcg(5);
    for _ in 0..500 {
        let delta = if rng.next() % 3 == 0 { 120.0 } else { -120.0 };
        harness.session.wheel(delta);
        let zoom = harness.session.viewport().zoom();
        assert!((0.5..=2.0).contains(&zoom), "zoom {zoom} escaped its range");
    }
    for _ in 0..30 {
        harness.session.wheel(120.0);
    }
    assert_eq!(harness.session.viewport().zoom(), 0.5);
}

#[test]
fn test_selection_exclusivity_under_mixed_clicks() {
    let mut harness = EditorHarness::new();
    let ids = build_grid(&mut harness, 40, 21);
    let connections = harness.session.current().connections().len();
    let mut rng = Lcg(8);

    for _ in 0..300 {
        match rng.next() % 3 {
            0 => {
                harness.session.click_node(rng.pick(&ids), rng.next() % 2 == 0);
            }
            1 if connections > 0 => {
                harness.session.click_connection((rng.next() as usize) % connections);
            }
            _ => harness.session.close_panel(),
        }
        let selection = harness.session.selection();
        assert!(
            selection.nodes().is_empty() || selection.connection().is_none(),
            "nodes and a connection are never selected together"
        );
    }
}

#[test]
fn test_long_drag_does_not_drift() {
    let mut harness = EditorHarness::new();
    let id = harness.node(NodeType::Batch, 100.0, 100.0);
    let start = harness.node_center_screen(id);

    harness.session.pointer_down(start);
    for step in 1..=1000 {
        let wobble = if step % 2 == 0 { 0.3 } else { -0.3 };
        harness.session.pointer_move(start.offset(wobble, wobble));
    }
    harness.session.pointer_up(start);
    assert_eq!(harness.position(id), Point::new(100.0, 100.0));
}
