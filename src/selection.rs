use crate::node::NodeId;
use slint::{Model, VecModel};

/// Current selection.
///
/// Either an ordered list of nodes or a single connection index is selected,
/// never both. Node order is click order, which chain-connect relies on.
/// The property panel subject is tracked separately: shift-clicks change the
/// selection without moving the panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionManager {
    nodes: Vec<NodeId>,
    connection: Option<usize>,
    panel: Option<NodeId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click on a node.
    ///
    /// A plain click selects just this node and opens the panel on it. A
    /// shift-click toggles membership and leaves the panel alone. Either way
    /// any selected connection is deselected.
    pub fn handle_interaction(&mut self, id: NodeId, shift_held: bool) {
        self.connection = None;
        if shift_held {
            if let Some(index) = self.nodes.iter().position(|&n| n == id) {
                self.nodes.remove(index);
            } else {
                self.nodes.push(id);
            }
        } else {
            self.nodes.clear();
            self.nodes.push(id);
            self.panel = Some(id);
        }
    }

    /// Select a connection by index, deselecting every node.
    pub fn select_connection(&mut self, index: usize) {
        self.nodes.clear();
        self.connection = Some(index);
    }

    /// Clear the current selection and close the panel.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connection = None;
        self.panel = None;
    }

    /// Deselect every node, keeping the panel and connection state.
    pub fn clear_nodes(&mut self) {
        self.nodes.clear();
    }

    pub fn clear_connection(&mut self) {
        self.connection = None;
    }

    /// Forget a removed node. Closes the panel if it was the subject.
    pub fn remove_node(&mut self, id: NodeId) {
        self.nodes.retain(|&n| n != id);
        if self.panel == Some(id) {
            self.panel = None;
        }
    }

    /// Check if a node is selected
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Selected nodes in click order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn connection(&self) -> Option<usize> {
        self.connection
    }

    /// Node whose properties the panel is showing.
    pub fn panel(&self) -> Option<NodeId> {
        self.panel
    }

    /// Get the number of selected nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if nothing at all is selected
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connection.is_none()
    }

    /// Sync the selected node ids to a Slint VecModel, in click order
    pub fn sync_to_model(&self, model: &VecModel<i32>) {
        // Clear and repopulate to ensure exact match
        while model.row_count() > 0 {
            model.remove(0);
        }
        for id in &self.nodes {
            model.push(id.0 as i32);
        }
    }
}
