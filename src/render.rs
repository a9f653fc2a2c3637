//! Renderer projection of an editor session.
//!
//! [`CanvasRenderer`] turns the model into what a view layer draws: node
//! views keyed by opaque view handles, connection paths and port dots. Every
//! call to [`CanvasRenderer::render`] recomputes all geometry from the model,
//! so nothing can go stale between revisions.
//!
//! # Example
//!
//! ```ignore
//! use workflow_canvas::{CanvasRenderer, EditorSession};
//!
//! let mut session = EditorSession::default();
//! let mut renderer = CanvasRenderer::new();
//!
//! let model = Rc::new(VecModel::<ConnectionPath>::default());
//! renderer.bind_model(model.clone(), |index, path, color| ConnectionPath { index, path, color });
//! window.set_connection_paths(ModelRc::from(model));
//!
//! // After every session change:
//! renderer.render(&session);
//! ```

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use slint::{Color, Model, SharedString, VecModel};

use crate::activity::ActivitySink;
use crate::graph::Workflow;
use crate::node::NodeId;
use crate::ports::{self, node_rect, port_anchor, PortKind};
use crate::routing::connection_path_commands;
use crate::session::EditorSession;

/// Stroke of the selected connection.
pub fn selected_connection_color() -> Color {
    Color::from_rgb_u8(0xef, 0x44, 0x44)
}

/// Stroke of every other connection and of the drag preview.
pub fn connection_color() -> Color {
    Color::from_rgb_u8(0x3b, 0x82, 0xf6)
}

/// Fill of a port with at least one connection.
pub fn satisfied_port_color() -> Color {
    Color::from_rgb_u8(0x22, 0xc5, 0x5e)
}

/// Fill of an unconnected port.
pub fn idle_port_color() -> Color {
    Color::from_rgb_u8(0x6b, 0x72, 0x80)
}

/// Opaque identifier of a rendered node view. Never equal to a model id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub u32);

/// A committed connection as drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionPath {
    /// Index into the workflow's connection list.
    pub index: usize,
    pub path_commands: String,
    pub color: Color,
}

/// A port dot, positioned in canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortDot {
    pub node: NodeId,
    pub kind: PortKind,
    pub x: f32,
    pub y: f32,
    pub color: Color,
}

/// A node view, positioned in canvas space.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
    pub handle: ViewHandle,
    pub node: NodeId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub selected: bool,
}

/// What changed in the handle map during a render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewChanges {
    pub attached: Vec<NodeId>,
    pub detached: Vec<NodeId>,
    /// Nodes whose port set changed; their views were rebuilt under a new handle.
    pub rebuilt: Vec<NodeId>,
}

impl ViewChanges {
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty() && self.rebuilt.is_empty()
    }
}

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer {
    fn sync(&self, paths: &[ConnectionPath]);
}

/// Concrete implementation of ModelSyncer for a specific row type.
struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(i32, SharedString, Color) -> P,
{
    fn sync(&self, paths: &[ConnectionPath]) {
        // Update existing rows or add new ones
        for (i, path) in paths.iter().enumerate() {
            let item = (self.constructor)(
                path.index as i32,
                SharedString::from(path.path_commands.as_str()),
                path.color,
            );
            if i < self.model.row_count() {
                self.model.set_row_data(i, item);
            } else {
                self.model.push(item);
            }
        }
        // Remove excess rows
        while self.model.row_count() > paths.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ViewSlot {
    handle: ViewHandle,
    port_count: usize,
}

/// Owns the model id to view handle map and the derived connection paths.
#[derive(Default)]
pub struct CanvasRenderer {
    views: HashMap<NodeId, ViewSlot>,
    next_handle: u32,
    paths: Vec<ConnectionPath>,
    syncer: Option<Box<dyn ModelSyncer>>,
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a Slint model for automatic synchronization.
    ///
    /// After binding, every call to [`render`](Self::render) rewrites the
    /// model rows from `(connection index, path commands, stroke colour)`.
    pub fn bind_model<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(i32, SharedString, Color) -> P + 'static,
    {
        self.syncer = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// View handle currently attached to `node`.
    pub fn handle(&self, node: NodeId) -> Option<ViewHandle> {
        self.views.get(&node).map(|slot| slot.handle)
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Paths computed by the last render, in connection order.
    pub fn connection_paths(&self) -> &[ConnectionPath] {
        &self.paths
    }

    fn alloc_handle(&mut self) -> ViewHandle {
        self.next_handle += 1;
        ViewHandle(self.next_handle)
    }

    /// Bring the handle map in line with `workflow`: attach new nodes,
    /// detach removed ones and rebuild nodes whose port count changed.
    pub fn reconcile(&mut self, workflow: &Workflow) -> ViewChanges {
        let mut changes = ViewChanges::default();

        let live: HashSet<NodeId> = workflow.nodes().iter().map(|n| n.id).collect();
        self.views.retain(|id, _| {
            let keep = live.contains(id);
            if !keep {
                changes.detached.push(*id);
            }
            keep
        });
        changes.detached.sort();

        for node in workflow.nodes() {
            let port_count = ports::ports(node).len();
            match self.views.get(&node.id).copied() {
                None => {
                    let handle = self.alloc_handle();
                    self.views.insert(node.id, ViewSlot { handle, port_count });
                    changes.attached.push(node.id);
                }
                Some(slot) if slot.port_count != port_count => {
                    let handle = self.alloc_handle();
                    self.views.insert(node.id, ViewSlot { handle, port_count });
                    changes.rebuilt.push(node.id);
                }
                Some(_) => {}
            }
        }

        if !changes.is_empty() {
            tracing::debug!(
                attached = changes.attached.len(),
                detached = changes.detached.len(),
                rebuilt = changes.rebuilt.len(),
                "node views reconciled"
            );
        }
        changes
    }

    /// Recompute everything for the session's current state.
    pub fn render<S: ActivitySink>(&mut self, session: &EditorSession<S>) -> ViewChanges {
        let workflow = session.current();
        let changes = self.reconcile(workflow);

        let config = session.config();
        let selected = session.selection().connection();
        self.paths = workflow
            .connections()
            .iter()
            .enumerate()
            .filter_map(|(index, connection)| {
                let path_commands = connection_path_commands(
                    workflow,
                    connection,
                    session.viewport(),
                    &config.node,
                    config.curve_offset,
                )?;
                let color = if selected == Some(index) {
                    selected_connection_color()
                } else {
                    connection_color()
                };
                Some(ConnectionPath {
                    index,
                    path_commands,
                    color,
                })
            })
            .collect();

        // Auto-sync to bound model if present
        if let Some(syncer) = &self.syncer {
            syncer.sync(&self.paths);
        }
        changes
    }

    /// Node views for the current workflow, in stacking order.
    pub fn node_views<S: ActivitySink>(&self, session: &EditorSession<S>) -> Vec<NodeView> {
        let layout = &session.config().node;
        session
            .current()
            .nodes()
            .iter()
            .filter_map(|node| {
                let handle = self.handle(node.id)?;
                let (x, y, width, height) = node_rect(node, layout);
                Some(NodeView {
                    handle,
                    node: node.id,
                    x,
                    y,
                    width,
                    height,
                    selected: session.selection().contains(node.id),
                })
            })
            .collect()
    }
}

/// Port dots with their highlight colour, from the current connection list.
pub fn port_dots<S: ActivitySink>(session: &EditorSession<S>) -> Vec<PortDot> {
    let workflow = session.current();
    let layout = &session.config().node;
    session
        .port_states()
        .into_iter()
        .filter_map(|state| {
            let node = workflow.node(state.port.node)?;
            let anchor = port_anchor(node, state.port.kind, layout);
            Some(PortDot {
                node: node.id,
                kind: state.port.kind,
                x: anchor.x,
                y: anchor.y,
                color: if state.satisfied {
                    satisfied_port_color()
                } else {
                    idle_port_color()
                },
            })
        })
        .collect()
}
