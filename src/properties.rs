//! Typed property edits from the node panel.
//!
//! Each edit targets exactly one node type. Applying an edit to a node of a
//! different type is refused without touching the node, so a node's type can
//! never change after it is placed.

use crate::error::EditorError;
use crate::node::{
    BatchProps, Label, LinkStrategy, NodeKind, NotificationChannel, Scenario, Schedule,
    SyncDirection, TriggerEvent,
};

/// A single change made in the property panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyEdit {
    TriggerEvent(TriggerEvent),
    Schedule(Schedule),
    ApplyCondition(bool),
    Filter(String),
    TitleTemplate(String),
    AddLabel(Label),
    LinkStrategy(LinkStrategy),
    ParentIssue(String),
    /// Rewrite an existing scenario's fields.
    Scenario {
        index: usize,
        condition: String,
        output: String,
    },
    /// Add an empty scenario, and with it a new output port.
    AppendScenario,
    NotificationChannel(NotificationChannel),
    Content(String),
    BatchSize(u32),
    SyncDirection(SyncDirection),
    /// Output data of any node with a single output field.
    OutputData(String),
}

impl PropertyEdit {
    pub fn name(&self) -> &'static str {
        match self {
            PropertyEdit::TriggerEvent(_) => "trigger-event",
            PropertyEdit::Schedule(_) => "schedule",
            PropertyEdit::ApplyCondition(_) => "apply-condition",
            PropertyEdit::Filter(_) => "filter",
            PropertyEdit::TitleTemplate(_) => "title-template",
            PropertyEdit::AddLabel(_) => "add-label",
            PropertyEdit::LinkStrategy(_) => "link-strategy",
            PropertyEdit::ParentIssue(_) => "parent-issue",
            PropertyEdit::Scenario { .. } => "scenario",
            PropertyEdit::AppendScenario => "append-scenario",
            PropertyEdit::NotificationChannel(_) => "notification-channel",
            PropertyEdit::Content(_) => "content",
            PropertyEdit::BatchSize(_) => "batch-size",
            PropertyEdit::SyncDirection(_) => "sync-direction",
            PropertyEdit::OutputData(_) => "output-data",
        }
    }
}

/// What an applied edit changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// Only configuration changed; ports and geometry are as before.
    ConfigOnly,
    /// The node's port set changed and its view must be rebuilt.
    TopologyChanged,
}

/// Apply `edit` to `kind`.
///
/// On error `kind` is left exactly as it was.
pub fn apply_edit(kind: &mut NodeKind, edit: PropertyEdit) -> Result<EditOutcome, EditorError> {
    let mismatch = |kind: &NodeKind, edit: &PropertyEdit| EditorError::PropertyMismatch {
        node_type: kind.node_type(),
        edit: edit.name(),
    };

    match (kind, edit) {
        (NodeKind::Trigger(props), PropertyEdit::TriggerEvent(event)) => props.event = event,
        (NodeKind::Trigger(props), PropertyEdit::Schedule(schedule)) => {
            if let Schedule::Cron(expr) = &schedule {
                if expr.trim().is_empty() {
                    return Err(EditorError::MissingField("cron"));
                }
            }
            props.schedule = schedule;
        }
        (NodeKind::Trigger(props), PropertyEdit::ApplyCondition(on)) => props.apply_condition = on,
        (NodeKind::Trigger(props), PropertyEdit::Filter(filter)) => props.filter = filter,

        (NodeKind::CreateIssue(props), PropertyEdit::TitleTemplate(template)) => {
            props.title_template = template
        }
        (NodeKind::CreateIssue(props), PropertyEdit::AddLabel(label)) => {
            if label.name.trim().is_empty() {
                return Err(EditorError::MissingField("label name"));
            }
            if label.color.trim().is_empty() {
                return Err(EditorError::MissingField("label color"));
            }
            props.labels.push(label);
        }

        (NodeKind::LinkIssue(props), PropertyEdit::LinkStrategy(strategy)) => {
            props.strategy = strategy
        }
        (NodeKind::LinkIssue(props), PropertyEdit::ParentIssue(parent)) => {
            props.parent_issue = parent
        }

        (NodeKind::Condition(props), PropertyEdit::Scenario { index, condition, output }) => {
            let count = props.scenarios.len();
            let scenario = props.scenarios.get_mut(index).ok_or_else(|| {
                EditorError::InvalidProperty {
                    field: "scenario",
                    reason: format!("index {index} out of range for {count} scenarios"),
                }
            })?;
            *scenario = Scenario { condition, output };
        }
        (NodeKind::Condition(props), PropertyEdit::AppendScenario) => {
            props.scenarios.push(Scenario::default());
            return Ok(EditOutcome::TopologyChanged);
        }

        (NodeKind::Notification(props), PropertyEdit::NotificationChannel(channel)) => {
            props.channel = channel
        }
        (NodeKind::Notification(props), PropertyEdit::Content(content)) => props.content = content,

        (NodeKind::Batch(props), PropertyEdit::BatchSize(size)) => {
            if !(BatchProps::MIN_SIZE..=BatchProps::MAX_SIZE).contains(&size) {
                return Err(EditorError::InvalidProperty {
                    field: "batch size",
                    reason: format!(
                        "{size} is outside {}..={}",
                        BatchProps::MIN_SIZE,
                        BatchProps::MAX_SIZE
                    ),
                });
            }
            props.batch_size = size;
        }

        (NodeKind::CommentSync(props), PropertyEdit::SyncDirection(direction)) => {
            props.direction = direction
        }

        (NodeKind::CreateIssue(props), PropertyEdit::OutputData(out)) => props.output = out,
        (NodeKind::LinkIssue(props), PropertyEdit::OutputData(out)) => props.output = out,
        (NodeKind::Batch(props), PropertyEdit::OutputData(out)) => props.output = out,
        (NodeKind::CommentSync(props), PropertyEdit::OutputData(out)) => props.output = out,

        (kind, edit) => return Err(mismatch(&*kind, &edit)),
    }

    Ok(EditOutcome::ConfigOnly)
}
