//! Node identity, node kinds and their typed properties.
//!
//! A node's type is fixed at creation. Each [`NodeKind`] variant carries the
//! properties edited through the side panel; only [`ConditionProps`] affects
//! graph topology (one output port per scenario).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque node identifier, unique across every workflow of an editor session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Opaque workflow identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(pub u32);

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "workflow-{}", self.0)
    }
}

/// A 2D point. Canvas-space unless a function says otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// The fixed enumeration of node types offered by the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Trigger,
    CreateIssue,
    LinkIssue,
    Condition,
    Notification,
    Batch,
    CommentSync,
    Unknown,
}

impl NodeType {
    /// Every palette type, in palette order. `Unknown` is not offered.
    pub const PALETTE: [NodeType; 7] = [
        NodeType::Trigger,
        NodeType::CreateIssue,
        NodeType::LinkIssue,
        NodeType::Condition,
        NodeType::Notification,
        NodeType::Batch,
        NodeType::CommentSync,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Trigger => "trigger",
            NodeType::CreateIssue => "create-issue",
            NodeType::LinkIssue => "link-issue",
            NodeType::Condition => "condition",
            NodeType::Notification => "notification",
            NodeType::Batch => "batch",
            NodeType::CommentSync => "comment-sync",
            NodeType::Unknown => "unknown",
        }
    }

    /// Whether nodes of this type expose an input port.
    pub fn has_input(self) -> bool {
        !matches!(self, NodeType::Trigger)
    }

    /// Whether nodes of this type expose at least one output port
    /// (condition nodes always have at least one scenario).
    pub fn has_outputs(self) -> bool {
        !matches!(self, NodeType::Notification | NodeType::Unknown)
    }

    /// Static display data for the node header and body.
    pub fn descriptor(self) -> NodeDescriptor {
        match self {
            NodeType::Trigger => NodeDescriptor {
                title: "Trigger",
                icon: "fas fa-play",
                color: "text-blue-400",
                description: "Start workflow",
                inputs: &["Event"],
            },
            NodeType::CreateIssue => NodeDescriptor {
                title: "Create Issue",
                icon: "fas fa-plus-circle",
                color: "text-blue-600",
                description: "Create GitHub issue",
                inputs: &["Issue title", "Labels"],
            },
            NodeType::LinkIssue => NodeDescriptor {
                title: "Link Issue",
                icon: "fas fa-link",
                color: "text-orange-400",
                description: "Link to existing issue",
                inputs: &["Issue number"],
            },
            NodeType::Condition => NodeDescriptor {
                title: "Condition",
                icon: "fas fa-question-circle",
                color: "text-green-400",
                description: "Add logic branch",
                inputs: &["Condition expression"],
            },
            NodeType::Notification => NodeDescriptor {
                title: "Notification",
                icon: "fas fa-bell",
                color: "text-blue-400",
                description: "Send alerts",
                inputs: &["Channel"],
            },
            NodeType::Batch => NodeDescriptor {
                title: "Batch Process",
                icon: "fas fa-layer-group",
                color: "text-teal-400",
                description: "Process multiple items",
                inputs: &["Item source"],
            },
            NodeType::CommentSync => NodeDescriptor {
                title: "Comment Sync",
                icon: "fas fa-comment-dots",
                color: "text-pink-400",
                description: "Sync comments",
                inputs: &["Sync direction"],
            },
            NodeType::Unknown => NodeDescriptor {
                title: "Unknown",
                icon: "fas fa-question",
                color: "text-gray-400",
                description: "",
                inputs: &[],
            },
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = ();

    /// Parses a palette tag. `"unknown"` is not a palette tag and is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::PALETTE
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

/// Header and body display data for a node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub title: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    pub inputs: &'static [&'static str],
}

// ============================================================================
// Typed properties
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    #[default]
    #[serde(rename = "SonarQube issue created")]
    IssueCreated,
    #[serde(rename = "SonarQube issue updated")]
    IssueUpdated,
    #[serde(rename = "Manual trigger")]
    Manual,
    #[serde(rename = "Scheduled trigger")]
    Scheduled,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    #[default]
    #[serde(rename = "Every hour")]
    EveryHour,
    #[serde(rename = "Every day")]
    EveryDay,
    #[serde(rename = "Every week")]
    EveryWeek,
    #[serde(rename = "Custom cron")]
    Cron(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerProps {
    pub event: TriggerEvent,
    /// Only meaningful when `event` is [`TriggerEvent::Scheduled`].
    pub schedule: Schedule,
    pub apply_condition: bool,
    pub filter: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateIssueProps {
    pub title_template: String,
    pub labels: Vec<Label>,
    pub output: String,
}

impl Default for CreateIssueProps {
    fn default() -> Self {
        Self {
            title_template: "[{{severity}}] {{message}}".to_string(),
            labels: Vec::new(),
            output: String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkStrategy {
    #[default]
    #[serde(rename = "Create sub-issue")]
    SubIssue,
    #[serde(rename = "Add comment")]
    Comment,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkIssueProps {
    pub strategy: LinkStrategy,
    pub parent_issue: String,
    pub output: String,
}

/// One branch of a condition node. Each scenario owns an output port.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub condition: String,
    pub output: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionProps {
    pub scenarios: Vec<Scenario>,
}

impl Default for ConditionProps {
    fn default() -> Self {
        Self {
            scenarios: vec![Scenario::default()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NotificationChannel {
    Discord { webhook_url: String, channel: String },
    Teams { webhook_url: String, team: String },
    Slack { webhook_url: String, channel: String },
    Email { recipients: String, subject: String },
    Desktop { title: String, content: String },
}

impl Default for NotificationChannel {
    fn default() -> Self {
        NotificationChannel::Discord {
            webhook_url: String::new(),
            channel: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationProps {
    pub channel: NotificationChannel,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchProps {
    pub batch_size: u32,
    pub output: String,
}

impl BatchProps {
    pub const MIN_SIZE: u32 = 1;
    pub const MAX_SIZE: u32 = 100;
}

impl Default for BatchProps {
    fn default() -> Self {
        Self {
            batch_size: 10,
            output: String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncDirection {
    #[default]
    #[serde(rename = "GitHub to Sonar")]
    GithubToSonar,
    #[serde(rename = "Sonar to GitHub")]
    SonarToGithub,
    Both,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentSyncProps {
    pub direction: SyncDirection,
    pub output: String,
}

/// A node's type together with its typed properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "properties", rename_all = "kebab-case")]
pub enum NodeKind {
    Trigger(TriggerProps),
    CreateIssue(CreateIssueProps),
    LinkIssue(LinkIssueProps),
    Condition(ConditionProps),
    Notification(NotificationProps),
    Batch(BatchProps),
    CommentSync(CommentSyncProps),
    /// Placeholder for a palette tag the editor does not know.
    Unknown { type_name: String },
}

impl NodeKind {
    /// Default properties for a freshly placed node of `node_type`.
    pub fn new(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Trigger => NodeKind::Trigger(TriggerProps::default()),
            NodeType::CreateIssue => NodeKind::CreateIssue(CreateIssueProps::default()),
            NodeType::LinkIssue => NodeKind::LinkIssue(LinkIssueProps::default()),
            NodeType::Condition => NodeKind::Condition(ConditionProps::default()),
            NodeType::Notification => NodeKind::Notification(NotificationProps::default()),
            NodeType::Batch => NodeKind::Batch(BatchProps::default()),
            NodeType::CommentSync => NodeKind::CommentSync(CommentSyncProps::default()),
            NodeType::Unknown => NodeKind::Unknown {
                type_name: String::new(),
            },
        }
    }

    /// Resolve a palette tag. Unknown tags become [`NodeKind::Unknown`]
    /// carrying the original string.
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name.parse::<NodeType>() {
            Ok(t) => NodeKind::new(t),
            Err(()) => NodeKind::Unknown {
                type_name: type_name.to_string(),
            },
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Trigger(_) => NodeType::Trigger,
            NodeKind::CreateIssue(_) => NodeType::CreateIssue,
            NodeKind::LinkIssue(_) => NodeType::LinkIssue,
            NodeKind::Condition(_) => NodeType::Condition,
            NodeKind::Notification(_) => NodeType::Notification,
            NodeKind::Batch(_) => NodeType::Batch,
            NodeKind::CommentSync(_) => NodeType::CommentSync,
            NodeKind::Unknown { .. } => NodeType::Unknown,
        }
    }

    /// Number of scenarios if this is a condition node.
    pub fn scenario_count(&self) -> Option<usize> {
        match self {
            NodeKind::Condition(props) => Some(props.scenarios.len()),
            _ => None,
        }
    }
}

/// A node placed on a workflow canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub position: Point,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, position: Point) -> Self {
        Self { id, kind, position }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }
}
