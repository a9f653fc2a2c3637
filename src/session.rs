//! The editor session: every piece of editor state, and every user action.
//!
//! Hosts route pointer, keyboard and button events into an [`EditorSession`]
//! and re-render whenever [`EditorSession::revision`] changes. All geometry is
//! derived from the model on demand; the session never stores rendered
//! positions.

use std::time::Duration;

use tracing::{debug, info};

use crate::activity::{colors, icons, ActivityLog, ActivitySink};
use crate::config::EditorConfig;
use crate::drag::{drop_position, NodeDrag, PanDrag};
use crate::error::{ConnectionError, EditorError};
use crate::format;
use crate::graph::{types_can_connect, CompositeValidator, Connection, Workflow};
use crate::hit_test::{find_connection_at, find_drop_target, find_node_at, find_port_at};
use crate::node::{NodeId, NodeKind, NodeType, Point, WorkflowId};
use crate::ports::{self, PortRef, PortState};
use crate::properties::{apply_edit, EditOutcome, PropertyEdit};
use crate::routing::{chain_pairs, default_scenario, ConnectArm, PendingConnection};
use crate::selection::SelectionManager;
use crate::viewport::Viewport;

/// Label shown on the save button after a save.
pub const SAVE_FLASH_LABEL: &str = "Saved!";
/// How long the save confirmation stays visible.
pub const SAVE_FLASH_DURATION: Duration = Duration::from_millis(2000);

/// One row of the workflow picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowSummary {
    pub id: WorkflowId,
    pub name: String,
    pub node_count: usize,
    pub connection_count: usize,
}

/// Transient confirmation a host shows after an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusFlash {
    pub label: &'static str,
    pub duration: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Delete,
    Escape,
}

impl Key {
    /// Map a key name or the text Slint reports for a key event.
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "Delete" | "\u{7f}" => Some(Key::Delete),
            "Escape" | "\u{1b}" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// The pointer gesture in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    DraggingNode(NodeDrag),
    DraggingConnection(PendingConnection),
    Panning(PanDrag),
}

/// Result of a connect action (button click, chain or port drag).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// First click: this node is now the pending source.
    Armed(NodeId),
    /// Second click on the same node cancelled the pending connect.
    Disarmed,
    Connected(usize),
    /// Multi-selection chain. Holds the indices of the created connections
    /// and how many consecutive pairs were skipped as invalid.
    Chained { created: Vec<usize>, skipped: usize },
    Rejected(ConnectionError),
    /// A port drag was released away from any node.
    Discarded,
}

/// What a pointer event did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
    Ignored,
    ConnectionStarted(PortRef),
    NodeDragStarted(NodeId),
    PanStarted,
    /// A drag or pan in progress was updated.
    Updated,
    NodeMoved(NodeId),
    Panned,
    /// Press and release on empty canvas: selection cleared, panel closed.
    CanvasClicked,
    Connect(ConnectOutcome),
}

/// Every piece of editor state, threaded explicitly through each action.
pub struct EditorSession<S = ActivityLog> {
    config: EditorConfig,
    workflows: Vec<Workflow>,
    current: usize,
    next_node: u32,
    next_workflow: u32,
    viewport: Viewport,
    selection: SelectionManager,
    gesture: Gesture,
    arm: ConnectArm,
    validator: CompositeValidator,
    activity: S,
    revision: u64,
}

impl Default for EditorSession<ActivityLog> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession<ActivityLog> {
    /// Session with the bundled in-memory activity log.
    pub fn new(config: EditorConfig) -> Self {
        let log = ActivityLog::with_capacity(config.activity_capacity);
        Self::with_sink(config, log)
    }
}

impl<S: ActivitySink> EditorSession<S> {
    /// Fresh session holding a single empty "Workflow 1".
    pub fn with_sink(config: EditorConfig, activity: S) -> Self {
        let validator = CompositeValidator::standard(config.reject_duplicate_connections);
        Self {
            viewport: Viewport::new(config.zoom),
            config,
            workflows: vec![Workflow::new(WorkflowId(1), "Workflow 1")],
            current: 0,
            next_node: 1,
            next_workflow: 2,
            selection: SelectionManager::new(),
            gesture: Gesture::Idle,
            arm: ConnectArm::Idle,
            validator,
            activity,
            revision: 0,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn activity(&self) -> &S {
        &self.activity
    }

    /// Bumped by every change that affects what is drawn.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn record(&mut self, message: &str, icon: &str, color: &str) {
        self.activity.record(message, icon, color);
    }

    // === Workflows ===

    /// The workflow every editing action targets.
    pub fn current(&self) -> &Workflow {
        &self.workflows[self.current]
    }

    fn current_mut(&mut self) -> &mut Workflow {
        &mut self.workflows[self.current]
    }

    pub fn current_workflow_id(&self) -> WorkflowId {
        self.current().id
    }

    pub fn workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    pub fn workflow(&self, id: WorkflowId) -> Option<&Workflow> {
        self.workflows.iter().find(|w| w.id == id)
    }

    /// Workflows in creation order.
    pub fn list_workflows(&self) -> Vec<WorkflowSummary> {
        self.workflows
            .iter()
            .map(|w| WorkflowSummary {
                id: w.id,
                name: w.name.clone(),
                node_count: w.nodes().len(),
                connection_count: w.connections().len(),
            })
            .collect()
    }

    /// Create a workflow and make it current. Unnamed workflows are called
    /// "Workflow N" after their position in the list.
    pub fn create_workflow(&mut self, name: Option<&str>) -> WorkflowId {
        let id = self.alloc_workflow_id();
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Workflow {}", self.workflows.len() + 1),
        };
        info!(workflow = %id, %name, "workflow created");
        self.record(&format!("Created workflow: {name}"), icons::CREATE, colors::BLUE);
        self.workflows.push(Workflow::new(id, name));
        self.current = self.workflows.len() - 1;
        self.reset_view_state();
        id
    }

    /// Make `id` current. The view resets and every selection and gesture
    /// is dropped, even when `id` is already current.
    pub fn switch_workflow(&mut self, id: WorkflowId) -> Result<(), EditorError> {
        let index = self
            .workflows
            .iter()
            .position(|w| w.id == id)
            .ok_or(EditorError::WorkflowNotFound(id))?;
        debug!(workflow = %id, "switching workflow");
        self.current = index;
        self.reset_view_state();
        Ok(())
    }

    fn alloc_workflow_id(&mut self) -> WorkflowId {
        let id = WorkflowId(self.next_workflow);
        self.next_workflow += 1;
        id
    }

    fn reset_view_state(&mut self) {
        self.viewport.reset();
        self.selection.clear();
        self.gesture = Gesture::Idle;
        self.arm = ConnectArm::Idle;
        self.touch();
    }

    // === Viewport ===

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom_in(&mut self) -> bool {
        let changed = self.viewport.zoom_in();
        if changed {
            self.touch();
        }
        changed
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.viewport.zoom_out();
        if changed {
            self.touch();
        }
        changed
    }

    pub fn wheel(&mut self, delta_y: f32) -> bool {
        let changed = self.viewport.wheel(delta_y);
        if changed {
            self.touch();
        }
        changed
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.viewport.pan_by(dx, dy);
        self.touch();
    }

    // === Graph mutations ===

    /// Add a node of `node_type` at a canvas position.
    pub fn create_node(&mut self, node_type: NodeType, position: Point) -> NodeId {
        self.insert_node(NodeKind::new(node_type), position)
    }

    /// Add a node from a palette tag. Unknown tags create an unknown node.
    pub fn create_node_named(&mut self, type_name: &str, position: Point) -> NodeId {
        self.insert_node(NodeKind::from_type_name(type_name), position)
    }

    /// Drop a palette entry at a screen position.
    pub fn place_node(&mut self, type_name: &str, screen: Point) -> NodeId {
        let position = drop_position(&self.viewport, &self.config, screen);
        self.create_node_named(type_name, position)
    }

    fn insert_node(&mut self, kind: NodeKind, position: Point) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        let node_type = kind.node_type();
        self.current_mut().insert_node(id, kind, position);
        info!(node = %id, %node_type, x = position.x, y = position.y, "node created");
        let title = node_type.descriptor().title;
        self.record(&format!("Added node: {title}"), icons::CREATE, colors::BLUE);
        self.touch();
        id
    }

    /// Move a node to a canvas position.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> bool {
        let moved = self.current_mut().set_position(id, position);
        if moved {
            self.touch();
        }
        moved
    }

    /// Remove a node and its connections. Returns `false` for unknown ids.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let cascaded = self.current().connections_touching(id);
        if self.current_mut().remove_node(id).is_none() {
            debug!(node = %id, "remove ignored, node not found");
            return false;
        }
        info!(node = %id, cascaded = cascaded.len(), "node removed");

        self.selection.remove_node(id);
        if let Some(selected) = self.selection.connection() {
            if cascaded.contains(&selected) {
                self.selection.clear_connection();
            } else {
                // Surviving edge: shift past every cascaded index before it
                let shift = cascaded.iter().filter(|&&i| i < selected).count();
                if shift > 0 {
                    self.selection.select_connection(selected - shift);
                }
            }
        }
        if self.arm.pending_source() == Some(id) {
            self.arm = ConnectArm::Idle;
        }
        let gesture_uses_node = match self.gesture {
            Gesture::DraggingNode(drag) => drag.node == id,
            Gesture::DraggingConnection(pending) => pending.source().node == id,
            _ => false,
        };
        if gesture_uses_node {
            self.gesture = Gesture::Idle;
        }

        self.record("Removed node", icons::REMOVE, colors::RED);
        self.touch();
        true
    }

    /// Validate and add a connection to the current workflow.
    pub fn add_connection(
        &mut self,
        from: NodeId,
        to: NodeId,
        scenario: Option<usize>,
    ) -> Result<usize, ConnectionError> {
        let connection = Connection::new(from, to, scenario);
        let index = match self.workflows[self.current].add_connection(connection, &self.validator) {
            Ok(index) => index,
            Err(err) => {
                debug!(%from, %to, ?scenario, error = %err, "connection rejected");
                return Err(err);
            }
        };
        info!(%from, %to, ?scenario, index, "connection created");
        self.record(&format!("Connected {from} to {to}"), icons::CONNECT, colors::GREEN);
        self.touch();
        Ok(index)
    }

    /// Remove a connection by index. Out-of-range indices are ignored.
    pub fn remove_connection_at(&mut self, index: usize) -> Option<Connection> {
        let removed = self.current_mut().remove_connection_at(index)?;
        match self.selection.connection() {
            Some(selected) if selected == index => self.selection.clear_connection(),
            Some(selected) if selected > index => self.selection.select_connection(selected - 1),
            _ => {}
        }
        info!(from = %removed.from, to = %removed.to, index, "connection removed");
        self.record("Removed connection", icons::REMOVE, colors::RED);
        self.touch();
        Some(removed)
    }

    /// Apply a property panel edit to a node of the current workflow.
    pub fn edit_node(&mut self, id: NodeId, edit: PropertyEdit) -> Result<EditOutcome, EditorError> {
        let kind = self
            .current_mut()
            .kind_mut(id)
            .ok_or(EditorError::NodeNotFound(id))?;
        let name = edit.name();
        let outcome = apply_edit(kind, edit).inspect_err(|err| {
            debug!(node = %id, edit = name, error = %err, "property edit rejected");
        })?;
        if outcome == EditOutcome::TopologyChanged {
            info!(node = %id, edit = name, "node ports changed");
        }
        self.touch();
        Ok(outcome)
    }

    /// Port highlight state for the current workflow.
    pub fn port_states(&self) -> Vec<PortState> {
        ports::port_states(self.current())
    }

    // === Pointer gestures ===

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Start dragging `node` with the pointer at `screen`.
    pub fn begin_node_drag(&mut self, node: NodeId, screen: Point) -> bool {
        let Some(initial) = self.current().node(node).map(|n| n.position) else {
            return false;
        };
        self.gesture = Gesture::DraggingNode(NodeDrag::begin(node, screen, initial));
        true
    }

    /// Start dragging a new connection out of an output port.
    pub fn begin_connection_drag(&mut self, port: PortRef, screen: Point) -> bool {
        let exists = self
            .current()
            .node(port.node)
            .is_some_and(|node| ports::has_port(node, port));
        match PendingConnection::start(port, screen) {
            Some(pending) if exists => {
                self.gesture = Gesture::DraggingConnection(pending);
                self.touch();
                true
            }
            _ => false,
        }
    }

    /// Pointer pressed on the canvas at a screen position.
    ///
    /// An output port starts a connection drag, an input port does nothing,
    /// a node body starts a node drag and empty canvas starts a pan.
    pub fn pointer_down(&mut self, screen: Point) -> PointerOutcome {
        let port = find_port_at(
            self.current(),
            &self.viewport,
            &self.config.node,
            screen,
            self.config.port_hit_radius,
        );
        if let Some(port) = port {
            if self.begin_connection_drag(port, screen) {
                return PointerOutcome::ConnectionStarted(port);
            }
            return PointerOutcome::Ignored;
        }

        if let Some(node) = find_node_at(self.current(), &self.viewport, &self.config.node, screen) {
            if self.begin_node_drag(node, screen) {
                return PointerOutcome::NodeDragStarted(node);
            }
        }

        self.gesture = Gesture::Panning(PanDrag::begin(screen, self.viewport.pan()));
        PointerOutcome::PanStarted
    }

    pub fn pointer_move(&mut self, screen: Point) -> PointerOutcome {
        match self.gesture {
            Gesture::Idle => PointerOutcome::Ignored,
            Gesture::DraggingNode(drag) => {
                let position = drag.position_for(screen, &self.viewport);
                self.current_mut().set_position(drag.node, position);
                self.touch();
                PointerOutcome::Updated
            }
            Gesture::DraggingConnection(mut pending) => {
                pending.update(screen);
                self.gesture = Gesture::DraggingConnection(pending);
                self.touch();
                PointerOutcome::Updated
            }
            Gesture::Panning(mut pan) => {
                let target = pan.pan_for(screen, self.viewport.zoom(), self.config.click_threshold);
                self.gesture = Gesture::Panning(pan);
                if pan.is_click() {
                    return PointerOutcome::Ignored;
                }
                self.viewport.set_pan(target);
                self.touch();
                PointerOutcome::Updated
            }
        }
    }

    pub fn pointer_up(&mut self, screen: Point) -> PointerOutcome {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => PointerOutcome::Ignored,
            Gesture::DraggingNode(drag) => {
                let position = drag.position_for(screen, &self.viewport);
                self.current_mut().set_position(drag.node, position);
                self.touch();
                PointerOutcome::NodeMoved(drag.node)
            }
            Gesture::DraggingConnection(pending) => {
                self.touch();
                let target = find_drop_target(self.current(), &self.viewport, &self.config, screen);
                let Some(target) = target else {
                    debug!(source = %pending.source().node, "connection drag discarded");
                    return PointerOutcome::Connect(ConnectOutcome::Discarded);
                };
                let connection = pending.into_connection(target);
                let outcome =
                    match self.add_connection(connection.from, connection.to, connection.scenario) {
                        Ok(index) => ConnectOutcome::Connected(index),
                        Err(err) => ConnectOutcome::Rejected(err),
                    };
                PointerOutcome::Connect(outcome)
            }
            Gesture::Panning(mut pan) => {
                let target = pan.pan_for(screen, self.viewport.zoom(), self.config.click_threshold);
                if pan.is_click() {
                    self.selection.clear();
                    self.touch();
                    return PointerOutcome::CanvasClicked;
                }
                self.viewport.set_pan(target);
                self.touch();
                PointerOutcome::Panned
            }
        }
    }

    /// Preview path of the connection being dragged, if any.
    pub fn preview_path(&self) -> Option<String> {
        match &self.gesture {
            Gesture::DraggingConnection(pending) => pending.preview_path(
                self.current(),
                &self.viewport,
                &self.config.node,
                self.config.preview_offset,
            ),
            _ => None,
        }
    }

    // === Clicks and keys ===

    /// Source node armed by a first connect click.
    pub fn pending_connect(&self) -> Option<NodeId> {
        self.arm.pending_source()
    }

    /// Connect button on a node.
    ///
    /// With several nodes selected this chain-connects the selection.
    /// Otherwise the first click arms `node` as the source and the next click
    /// on a different node connects the two.
    pub fn click_connect(&mut self, node: NodeId) -> ConnectOutcome {
        if !self.current().contains_node(node) {
            return ConnectOutcome::Rejected(ConnectionError::NodeNotFound(node));
        }
        if self.selection.len() > 1 {
            return self.chain_connect();
        }

        match self.arm {
            ConnectArm::Idle => {
                self.arm = ConnectArm::Armed(node);
                self.touch();
                ConnectOutcome::Armed(node)
            }
            ConnectArm::Armed(source) if source == node => {
                self.arm = ConnectArm::Idle;
                self.touch();
                ConnectOutcome::Disarmed
            }
            ConnectArm::Armed(source) => {
                self.arm = ConnectArm::Idle;
                self.touch();
                let scenario = self.current().node(source).and_then(default_scenario);
                match self.add_connection(source, node, scenario) {
                    Ok(index) => ConnectOutcome::Connected(index),
                    Err(err) => ConnectOutcome::Rejected(err),
                }
            }
        }
    }

    /// Connect consecutive selected nodes in selection order, skipping
    /// pairs the validators reject, then clear the node selection.
    pub fn chain_connect(&mut self) -> ConnectOutcome {
        let mut created = Vec::new();
        let mut skipped = 0;
        for (from, to) in chain_pairs(self.selection.nodes()) {
            let node_type = |id| self.current().node(id).map(|n| n.node_type());
            let compatible = match (node_type(from), node_type(to)) {
                (Some(source), Some(target)) => types_can_connect(source, target),
                _ => false,
            };
            if !compatible {
                debug!(%from, %to, "chain pair skipped, types cannot connect");
                skipped += 1;
                continue;
            }
            let scenario = self.current().node(from).and_then(default_scenario);
            match self.add_connection(from, to, scenario) {
                Ok(index) => created.push(index),
                Err(_) => skipped += 1,
            }
        }
        debug!(created = created.len(), skipped, "chain connect finished");
        self.selection.clear_nodes();
        self.touch();
        ConnectOutcome::Chained { created, skipped }
    }

    /// Click on a node body.
    pub fn click_node(&mut self, node: NodeId, shift_held: bool) -> bool {
        if !self.current().contains_node(node) {
            return false;
        }
        self.selection.handle_interaction(node, shift_held);
        self.touch();
        true
    }

    /// Click on a connection curve by index.
    pub fn click_connection(&mut self, index: usize) -> bool {
        if index >= self.current().connections().len() {
            return false;
        }
        self.selection.select_connection(index);
        self.touch();
        true
    }

    /// Select the connection under a screen position, if any.
    pub fn select_connection_at(&mut self, screen: Point) -> Option<usize> {
        let index = find_connection_at(self.current(), &self.viewport, &self.config, screen)?;
        self.click_connection(index);
        Some(index)
    }

    /// Close the property panel, clearing every selection.
    pub fn close_panel(&mut self) {
        self.selection.clear();
        self.touch();
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Handle a key press. Returns `true` if the key did something.
    pub fn key_down(&mut self, key: Key) -> bool {
        match key {
            Key::Delete => match self.selection.connection() {
                Some(index) => {
                    self.remove_connection_at(index);
                    true
                }
                None => false,
            },
            Key::Escape => {
                let dragging = matches!(self.gesture, Gesture::DraggingConnection(_));
                if !dragging && !self.arm.is_armed() {
                    return false;
                }
                if dragging {
                    self.gesture = Gesture::Idle;
                }
                self.arm = ConnectArm::Idle;
                self.touch();
                true
            }
        }
    }

    // === Save, run, import and export ===

    /// Record a save. Nothing is persisted.
    pub fn save_current(&mut self) -> StatusFlash {
        let name = self.current().name.clone();
        info!(workflow = %self.current_workflow_id(), %name, "workflow saved");
        self.record(&format!("Saved workflow: {name}"), icons::SAVE, colors::GREEN);
        StatusFlash {
            label: SAVE_FLASH_LABEL,
            duration: SAVE_FLASH_DURATION,
        }
    }

    /// Record a run of the current workflow. Nothing is executed.
    pub fn run_current(&mut self) {
        let name = self.current().name.clone();
        info!(workflow = %self.current_workflow_id(), %name, "workflow run");
        self.record(&format!("Ran workflow: {name}"), icons::RUN, colors::BLUE);
    }

    /// Record a run of every workflow, in creation order.
    pub fn run_all(&mut self) {
        let names: Vec<String> = self.workflows.iter().map(|w| w.name.clone()).collect();
        info!(count = names.len(), "running all workflows");
        for name in names {
            self.record(&format!("Ran workflow: {name}"), icons::RUN_ALL, colors::TEAL);
        }
    }

    /// Export the current workflow as a JSON document.
    pub fn export_current(&self) -> Result<String, EditorError> {
        Ok(format::to_json(self.current())?)
    }

    /// Import a JSON document as a new workflow. The current workflow does
    /// not change. Node ids are reallocated from the session counter.
    pub fn import_workflow(&mut self, json: &str) -> Result<WorkflowId, EditorError> {
        let record = format::from_json(json)?;
        let id = WorkflowId(self.next_workflow);
        let (workflow, next_node) =
            format::build_workflow(record, id, self.next_node, &self.validator)?;

        self.next_workflow += 1;
        self.next_node = next_node;
        let name = workflow.name.clone();
        info!(workflow = %id, %name, nodes = workflow.nodes().len(), "workflow imported");
        self.workflows.push(workflow);
        self.record(&format!("Created workflow: {name}"), icons::CREATE, colors::BLUE);
        self.touch();
        Ok(id)
    }
}
