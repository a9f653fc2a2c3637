//! Versioned JSON document for exporting and importing a single workflow.
//!
//! ```json
//! { "version": 1, "workflow": { "name": "...", "nodes": [...], "connections": [...] } }
//! ```
//!
//! Importing never trusts the document: node ids are reallocated and every
//! connection is re-validated against the rebuilt graph.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConnectionError, FormatError};
use crate::graph::{Connection, ConnectionValidator, Workflow};
use crate::node::{Node, NodeId, WorkflowId};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub version: u32,
    pub workflow: WorkflowRecord,
}

/// Serialized form of a workflow. Ids are only meaningful inside the document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl From<&Workflow> for WorkflowRecord {
    fn from(workflow: &Workflow) -> Self {
        Self {
            name: workflow.name.clone(),
            nodes: workflow.nodes().to_vec(),
            connections: workflow.connections().to_vec(),
        }
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Serialize `workflow` as a pretty-printed document.
pub fn to_json(workflow: &Workflow) -> Result<String, FormatError> {
    let document = WorkflowDocument {
        version: FORMAT_VERSION,
        workflow: workflow.into(),
    };
    serde_json::to_string_pretty(&document).map_err(|e| FormatError::Json(e.to_string()))
}

/// Parse a document and check its version. Does not validate the graph.
pub fn from_json(text: &str) -> Result<WorkflowRecord, FormatError> {
    let probe: VersionProbe =
        serde_json::from_str(text).map_err(|e| FormatError::Json(e.to_string()))?;
    if probe.version != FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion {
            found: probe.version,
            expected: FORMAT_VERSION,
        });
    }
    let document: WorkflowDocument =
        serde_json::from_str(text).map_err(|e| FormatError::Json(e.to_string()))?;
    Ok(document.workflow)
}

/// Rebuild a parsed record as workflow `id`.
///
/// Node ids are reassigned in document order starting at `first_node_id`.
/// Returns the workflow and the next free node id. Nothing is consumed on
/// error, so callers can commit their id counter only on success.
pub fn build_workflow<V>(
    record: WorkflowRecord,
    id: WorkflowId,
    first_node_id: u32,
    validator: &V,
) -> Result<(Workflow, u32), FormatError>
where
    V: ConnectionValidator + ?Sized,
{
    let mut remap: HashMap<NodeId, NodeId> = HashMap::with_capacity(record.nodes.len());
    let mut next = first_node_id;
    let mut workflow = Workflow::new(id, record.name);

    for node in record.nodes {
        let fresh = NodeId(next);
        if remap.insert(node.id, fresh).is_some() {
            return Err(FormatError::DuplicateNode(node.id));
        }
        if node.kind.scenario_count() == Some(0) {
            return Err(FormatError::EmptyConditionNode(node.id));
        }
        next += 1;
        workflow.insert_node(fresh, node.kind, node.position);
    }

    for (index, connection) in record.connections.into_iter().enumerate() {
        let lookup = |old: NodeId| {
            remap.get(&old).copied().ok_or(FormatError::InvalidConnection {
                index,
                source: ConnectionError::NodeNotFound(old),
            })
        };
        let remapped = Connection::new(lookup(connection.from)?, lookup(connection.to)?, connection.scenario);
        workflow
            .add_connection(remapped, validator)
            .map_err(|source| FormatError::InvalidConnection { index, source })?;
    }

    Ok((workflow, next))
}
