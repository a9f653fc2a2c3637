//! Error types for the workflow editor.
//!
//! Nothing in the editor is fatal. Every error here means "no mutation
//! occurred" and is returned to the caller so a host can decide whether to
//! surface it.

use crate::node::{NodeId, NodeType, WorkflowId};
use thiserror::Error;

/// Reasons a connection between two nodes was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Node {0} not found in the current workflow")]
    NodeNotFound(NodeId),

    #[error("Cannot connect {0} to itself")]
    SelfLoop(NodeId),

    #[error("{node} is a {node_type} node and has no output ports")]
    SourceHasNoOutputs { node: NodeId, node_type: NodeType },

    #[error("{node} is a {node_type} node and has no input port")]
    TargetHasNoInput { node: NodeId, node_type: NodeType },

    #[error("{node} has {count} scenario outputs, scenario {scenario} does not exist")]
    ScenarioOutOfRange {
        node: NodeId,
        scenario: usize,
        count: usize,
    },

    #[error("{0} is a condition node, a scenario output must be chosen")]
    ScenarioRequired(NodeId),

    #[error("{node} has a single output, scenario {scenario} is not allowed")]
    UnexpectedScenario { node: NodeId, scenario: usize },

    #[error("Connection from {from} to {to} already exists")]
    Duplicate { from: NodeId, to: NodeId },
}

/// Errors from editor operations other than connecting nodes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Node {0} not found in the current workflow")]
    NodeNotFound(NodeId),

    #[error("Workflow {0} not found")]
    WorkflowNotFound(WorkflowId),

    #[error("Property edit '{edit}' does not apply to a {node_type} node")]
    PropertyMismatch { node_type: NodeType, edit: &'static str },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidProperty { field: &'static str, reason: String },

    #[error("Required field '{0}' is missing")]
    MissingField(&'static str),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Errors reading or writing the workflow document format.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("Failed to parse workflow document: {0}")]
    Json(String),

    #[error("Unsupported workflow document version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Node {0} appears more than once in the document")]
    DuplicateNode(NodeId),

    #[error("Condition node {0} has no scenarios")]
    EmptyConditionNode(NodeId),

    #[error("Connection {index} is invalid: {source}")]
    InvalidConnection {
        index: usize,
        #[source]
        source: ConnectionError,
    },
}

/// Errors loading an [`EditorConfig`](crate::config::EditorConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
