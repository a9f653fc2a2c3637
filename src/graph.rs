use crate::error::ConnectionError;
use crate::node::{Node, NodeId, NodeKind, NodeType, Point, WorkflowId};
use serde::{Deserialize, Serialize};

/// A directed edge between two nodes of the same workflow.
///
/// `scenario` names the output port on a condition source node. It is `None`
/// for every other source type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
    pub scenario: Option<usize>,
}

impl Connection {
    pub fn new(from: NodeId, to: NodeId, scenario: Option<usize>) -> Self {
        Self { from, to, scenario }
    }

    /// Whether either endpoint is `node`.
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }
}

/// One workflow graph: its nodes and the connections between them.
#[derive(Clone, Debug, PartialEq)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
}

impl Workflow {
    pub fn new(id: WorkflowId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Append a node. The caller owns id allocation.
    pub fn insert_node(&mut self, id: NodeId, kind: NodeKind, position: Point) -> &Node {
        self.nodes.push(Node::new(id, kind, position));
        &self.nodes[self.nodes.len() - 1]
    }

    /// Move a node. Returns `false` if the node does not exist.
    pub fn set_position(&mut self, id: NodeId, position: Point) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Remove a node and every connection that starts or ends at it.
    ///
    /// Returns the removed node and the cascaded connections, or `None` if the
    /// node was not in this workflow.
    pub fn remove_node(&mut self, id: NodeId) -> Option<(Node, Vec<Connection>)> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        let node = self.nodes.remove(index);
        let mut removed = Vec::new();
        self.connections.retain(|c| {
            if c.touches(id) {
                removed.push(*c);
                false
            } else {
                true
            }
        });
        Some((node, removed))
    }

    /// Validate with `validator` and append. Returns the new connection's index.
    pub fn add_connection<V>(
        &mut self,
        connection: Connection,
        validator: &V,
    ) -> Result<usize, ConnectionError>
    where
        V: ConnectionValidator + ?Sized,
    {
        validator.validate(&connection, self)?;
        self.connections.push(connection);
        Ok(self.connections.len() - 1)
    }

    /// Remove the connection at `index`, if any.
    pub fn remove_connection_at(&mut self, index: usize) -> Option<Connection> {
        if index < self.connections.len() {
            Some(self.connections.remove(index))
        } else {
            None
        }
    }

    /// Indices of every connection touching `node`.
    pub fn connections_touching(&self, node: NodeId) -> Vec<usize> {
        self.connections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.touches(node))
            .map(|(i, _)| i)
            .collect()
    }

    /// Check if an identical connection already exists.
    ///
    /// Direction and scenario both matter.
    pub fn duplicate_connection_exists(&self, connection: &Connection) -> bool {
        self.connections.iter().any(|c| c == connection)
    }

    /// An input port is satisfied when at least one connection targets its node.
    pub fn is_input_satisfied(&self, node: NodeId) -> bool {
        self.connections.iter().any(|c| c.to == node)
    }

    /// An output port is satisfied when at least one connection starts at
    /// exactly this `(node, scenario)` pair.
    pub fn is_output_satisfied(&self, node: NodeId, scenario: Option<usize>) -> bool {
        self.connections
            .iter()
            .any(|c| c.from == node && c.scenario == scenario)
    }

    /// Mutable access to a node's properties. Crate-internal: property edits
    /// must go through [`crate::properties`] so the node type stays fixed.
    pub(crate) fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        self.node_mut(id).map(|n| &mut n.kind)
    }
}

// ============================================================================
// Connection Validation Framework
// ============================================================================

/// Trait for connection validation rules.
///
/// Validators see the candidate connection and the workflow it would be added
/// to. Compose several with [`CompositeValidator`].
///
/// # Example
///
/// ```
/// use workflow_canvas::{Connection, ConnectionValidator, ConnectionError, Workflow};
///
/// struct NoFanOut;
///
/// impl ConnectionValidator for NoFanOut {
///     fn validate(&self, c: &Connection, wf: &Workflow) -> Result<(), ConnectionError> {
///         if wf.connections().iter().any(|e| e.from == c.from && e.scenario == c.scenario) {
///             Err(ConnectionError::Duplicate { from: c.from, to: c.to })
///         } else {
///             Ok(())
///         }
///     }
/// }
/// ```
pub trait ConnectionValidator {
    fn validate(&self, connection: &Connection, workflow: &Workflow) -> Result<(), ConnectionError>;
}

/// The structural rules every connection must satisfy:
///
/// 1. Both nodes exist
/// 2. No self loops
/// 3. The source has an output port (not a notification or unknown node)
/// 4. The destination has an input port (not a trigger)
/// 5. Condition sources name an existing scenario; other sources name none
#[derive(Clone, Copy, Debug, Default)]
pub struct PortArityValidator;

impl ConnectionValidator for PortArityValidator {
    fn validate(&self, connection: &Connection, workflow: &Workflow) -> Result<(), ConnectionError> {
        let from = workflow
            .node(connection.from)
            .ok_or(ConnectionError::NodeNotFound(connection.from))?;
        let to = workflow
            .node(connection.to)
            .ok_or(ConnectionError::NodeNotFound(connection.to))?;

        if from.id == to.id {
            return Err(ConnectionError::SelfLoop(from.id));
        }

        let from_type = from.node_type();
        if !from_type.has_outputs() {
            return Err(ConnectionError::SourceHasNoOutputs {
                node: from.id,
                node_type: from_type,
            });
        }

        let to_type = to.node_type();
        if !to_type.has_input() {
            return Err(ConnectionError::TargetHasNoInput {
                node: to.id,
                node_type: to_type,
            });
        }

        match (from.kind.scenario_count(), connection.scenario) {
            (Some(_), None) => Err(ConnectionError::ScenarioRequired(from.id)),
            (Some(count), Some(scenario)) if scenario >= count => {
                Err(ConnectionError::ScenarioOutOfRange {
                    node: from.id,
                    scenario,
                    count,
                })
            }
            (None, Some(scenario)) => Err(ConnectionError::UnexpectedScenario {
                node: from.id,
                scenario,
            }),
            _ => Ok(()),
        }
    }
}

/// Rejects a connection identical to an existing one.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDuplicatesValidator;

impl ConnectionValidator for NoDuplicatesValidator {
    fn validate(&self, connection: &Connection, workflow: &Workflow) -> Result<(), ConnectionError> {
        if workflow.duplicate_connection_exists(connection) {
            Err(ConnectionError::Duplicate {
                from: connection.from,
                to: connection.to,
            })
        } else {
            Ok(())
        }
    }
}

/// Runs validators in order and returns the first rejection.
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn ConnectionValidator + Send + Sync>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator. Validators run in insertion order.
    pub fn add<V>(mut self, validator: V) -> Self
    where
        V: ConnectionValidator + Send + Sync + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }

    /// The structural rules, plus duplicate rejection when requested.
    pub fn standard(reject_duplicates: bool) -> Self {
        let composite = Self::new().add(PortArityValidator);
        if reject_duplicates {
            composite.add(NoDuplicatesValidator)
        } else {
            composite
        }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl ConnectionValidator for CompositeValidator {
    fn validate(&self, connection: &Connection, workflow: &Workflow) -> Result<(), ConnectionError> {
        self.validators
            .iter()
            .try_for_each(|v| v.validate(connection, workflow))
    }
}

/// Which node types can legally be connected `from -> to`, ignoring scenarios.
pub fn types_can_connect(from: NodeType, to: NodeType) -> bool {
    from.has_outputs() && to.has_input()
}

// ============================================================================
// Tests
// ============================================================================
