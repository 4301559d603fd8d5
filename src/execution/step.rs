//! Simulated Step Records
//!
//! A [`Step`] is one line of the execution trace. Its `details` text is
//! derived purely from the node's type and payload, one template per type.
//! Nothing here performs the action it describes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflow::model::{Node, NodeData, NodeType};

/// Outcome of a simulated step. Simulation never fails a step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// One entry of the execution trace.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// 1-based position in the whole trace
    pub step_number: usize,
    pub node_id: String,
    pub node_type: NodeType,
    pub label: String,
    pub status: StepStatus,
    /// Rendered description of what the step does
    pub details: String,
}

impl Step {
    /// Builds the trace entry for `node` at position `step_number`.
    pub fn for_node(node: &Node, step_number: usize) -> Self {
        let label = if node.label().is_empty() {
            "Unnamed Step".to_string()
        } else {
            node.label().to_string()
        };

        Self {
            step_number,
            node_id: node.id.clone(),
            node_type: node.node_type(),
            label,
            status: StepStatus::Completed,
            details: describe(&node.data),
        }
    }
}

/// Returns `value` unless it is empty, in which case `fallback`.
fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Renders the human-readable description of a node.
pub fn describe(data: &NodeData) -> String {
    match data {
        NodeData::Start(d) => format!(
            "Starting workflow: {}",
            or_default(&d.title, "Untitled Workflow")
        ),
        NodeData::Task(d) => format!(
            "Task assigned to {}: {}",
            or_default(&d.assignee, "Unassigned"),
            or_default(&d.title, "Untitled Task")
        ),
        NodeData::Approval(d) => format!(
            "Approval required from {}: {}",
            d.approver_role.map_or("Unknown", |role| role.as_str()),
            or_default(&d.title, "Untitled Approval")
        ),
        NodeData::Automated(d) => {
            let action = if !d.action_label.is_empty() {
                d.action_label.as_str()
            } else {
                or_default(&d.action, "No action selected")
            };
            format!("Automated action: {}", action)
        }
        NodeData::End(d) => format!(
            "Workflow completed: {}",
            or_default(&d.end_message, "End of workflow")
        ),
        NodeData::Unknown(d) => format!("Executing step: {}", or_default(&d.label, "Unknown")),
    }
}
