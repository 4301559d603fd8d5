//! Workflow Graph Model
//!
//! Typed nodes and directed edges as the editor hands them over.
//!
//! # Example JSON Format
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "node_0", "type": "startNode", "position": { "x": 0, "y": 0 },
//!       "data": { "label": "Onboarding", "title": "Onboarding", "metadata": [] } },
//!     { "id": "node_1", "type": "taskNode", "position": { "x": 0, "y": 120 },
//!       "data": { "label": "Collect documents", "title": "Collect documents",
//!                 "assignee": "hr@acme.test" } },
//!     { "id": "node_2", "type": "endNode", "position": { "x": 0, "y": 240 },
//!       "data": { "label": "Done", "endMessage": "Done", "showSummary": true } }
//!   ],
//!   "edges": [
//!     { "id": "edge_0", "source": "node_0", "target": "node_1" },
//!     { "id": "edge_1", "source": "node_1", "target": "node_2" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while decoding a node from the export document.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Node '{id}' has invalid {kind} data: {source}")]
    InvalidPayload {
        id: String,
        kind: String,
        source: serde_json::Error,
    },

    #[error("Unknown approver role '{0}' (expected Manager, HRBP, Director, VP or CEO)")]
    UnknownApproverRole(String),
}

/// Kind of a workflow node.
///
/// Serialized with the editor's type names (`startNode`, `taskNode`, ...).
/// Type names the engine does not know are kept verbatim in [`NodeType::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    Start,
    Task,
    Approval,
    Automated,
    End,
    Unknown(String),
}

impl NodeType {
    /// Parses an editor type name. Never fails; foreign names become `Unknown`.
    pub fn parse(name: &str) -> Self {
        match name {
            "startNode" => Self::Start,
            "taskNode" => Self::Task,
            "approvalNode" => Self::Approval,
            "automatedNode" => Self::Automated,
            "endNode" => Self::End,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The editor type name used in the export document.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Start => "startNode",
            Self::Task => "taskNode",
            Self::Approval => "approvalNode",
            Self::Automated => "automatedNode",
            Self::End => "endNode",
            Self::Unknown(name) => name.as_str(),
        }
    }

    /// Short human name ("Start", "Task", ...).
    pub fn display_name(&self) -> &str {
        match self {
            Self::Start => "Start",
            Self::Task => "Task",
            Self::Approval => "Approval",
            Self::Automated => "Automated",
            Self::End => "End",
            Self::Unknown(name) => name.as_str(),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

/// Role that must sign off an approval node.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApproverRole {
    Manager,
    #[serde(rename = "HRBP")]
    Hrbp,
    Director,
    #[serde(rename = "VP")]
    Vp,
    #[serde(rename = "CEO")]
    Ceo,
}

impl ApproverRole {
    /// All roles in the order the editor offers them.
    pub const ALL: [ApproverRole; 5] = [
        ApproverRole::Manager,
        ApproverRole::Hrbp,
        ApproverRole::Director,
        ApproverRole::Vp,
        ApproverRole::Ceo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Hrbp => "HRBP",
            Self::Director => "Director",
            Self::Vp => "VP",
            Self::Ceo => "CEO",
        }
    }
}

impl fmt::Display for ApproverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApproverRole {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s.trim())
            .ok_or_else(|| ModelError::UnknownApproverRole(s.to_string()))
    }
}

/// Deserializes an approver role where `""` or `null` means "not chosen yet".
fn optional_role<'de, D>(deserializer: D) -> Result<Option<ApproverRole>, D::Error>
where
    D: Deserializer<'de>,
{
    let val = Value::deserialize(deserializer)?;
    match val {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.parse().map(Some).map_err(de::Error::custom),
        _ => Err(de::Error::custom("Expected approver role string")),
    }
}

/// Deserializes a threshold that may be a number, a numeric string, or empty.
fn optional_threshold<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let val = Value::deserialize(deserializer)?;
    match val {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("Threshold '{}' is not a number", s))),
        Value::Number(n) => Ok(n.as_f64()),
        _ => Err(de::Error::custom("Expected number or numeric string")),
    }
}

/// Ordered key/value pair used for start metadata and task custom fields.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Payload of the entry node.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StartData {
    pub label: String,
    pub title: String,
    pub metadata: Vec<KeyValue>,
    /// Fields the engine does not interpret, kept for export
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of a human task.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskData {
    pub label: String,
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub due_date: String,
    pub custom_fields: Vec<KeyValue>,
    /// Fields the engine does not interpret, kept for export
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of an approval gate.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApprovalData {
    pub label: String,
    pub title: String,
    #[serde(deserialize_with = "optional_role", skip_serializing_if = "Option::is_none")]
    pub approver_role: Option<ApproverRole>,
    #[serde(
        deserialize_with = "optional_threshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_approve_threshold: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Loaded spelling of `approverRole` / `autoApproveThreshold` when it
    /// differs from the typed form (`""`, `"250"`); reused on export while the
    /// typed value is unchanged.
    #[serde(skip)]
    pub editor_spelling: Map<String, Value>,
}

impl ApprovalData {
    const ROLE_KEY: &'static str = "approverRole";
    const THRESHOLD_KEY: &'static str = "autoApproveThreshold";

    fn typed_value(&self, key: &str) -> Option<Value> {
        match key {
            Self::ROLE_KEY => self.approver_role.map(|role| Value::from(role.as_str())),
            Self::THRESHOLD_KEY => self.auto_approve_threshold.map(Value::from),
            _ => None,
        }
    }

    fn still_reads_as(&self, key: &str, original: &Value) -> bool {
        match key {
            Self::ROLE_KEY => optional_role(original.clone()).ok() == Some(self.approver_role),
            Self::THRESHOLD_KEY => {
                optional_threshold(original.clone()).ok() == Some(self.auto_approve_threshold)
            }
            _ => false,
        }
    }

    fn remember_spelling(&mut self, raw: &Value) {
        for key in [Self::ROLE_KEY, Self::THRESHOLD_KEY] {
            if let Some(original) = raw.get(key) {
                if self.typed_value(key).as_ref() != Some(original) {
                    self.editor_spelling.insert(key.to_string(), original.clone());
                }
            }
        }
    }

    fn to_wire(&self) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            for (key, original) in &self.editor_spelling {
                if self.still_reads_as(key, original) {
                    map.insert(key.clone(), original.clone());
                }
            }
        }
        Ok(value)
    }
}

/// Payload of a simulated automated action.
///
/// `action_label` caches the catalog label at the time the action was picked,
/// so rendering never needs the catalog.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AutomatedData {
    pub label: String,
    pub title: String,
    pub action: String,
    pub action_label: String,
    pub action_params: BTreeMap<String, String>,
    /// Fields the engine does not interpret, kept for export
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of a terminal node.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EndData {
    pub label: String,
    pub end_message: String,
    pub show_summary: bool,
    /// Fields the engine does not interpret, kept for export
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of a node whose type the engine does not know.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownData {
    pub kind: String,
    pub label: String,
    pub raw: Value,
}

/// Type-specific node payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Start(StartData),
    Task(TaskData),
    Approval(ApprovalData),
    Automated(AutomatedData),
    End(EndData),
    Unknown(UnknownData),
}

impl NodeData {
    /// Fresh payload for a node dropped onto the canvas.
    pub fn placeholder(kind: &NodeType) -> Self {
        let label = format!("New {}", kind.as_str().trim_end_matches("Node"));
        match kind {
            NodeType::Start => Self::Start(StartData {
                label,
                ..Default::default()
            }),
            NodeType::Task => Self::Task(TaskData {
                label,
                ..Default::default()
            }),
            NodeType::Approval => Self::Approval(ApprovalData {
                label,
                ..Default::default()
            }),
            NodeType::Automated => Self::Automated(AutomatedData {
                label,
                ..Default::default()
            }),
            NodeType::End => Self::End(EndData {
                label,
                ..Default::default()
            }),
            NodeType::Unknown(name) => Self::Unknown(UnknownData {
                kind: name.clone(),
                label,
                raw: Value::Object(Default::default()),
            }),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Start(_) => NodeType::Start,
            Self::Task(_) => NodeType::Task,
            Self::Approval(_) => NodeType::Approval,
            Self::Automated(_) => NodeType::Automated,
            Self::End(_) => NodeType::End,
            Self::Unknown(data) => NodeType::Unknown(data.kind.clone()),
        }
    }

    /// Display label; empty when never set.
    pub fn label(&self) -> &str {
        match self {
            Self::Start(d) => &d.label,
            Self::Task(d) => &d.label,
            Self::Approval(d) => &d.label,
            Self::Automated(d) => &d.label,
            Self::End(d) => &d.label,
            Self::Unknown(d) => &d.label,
        }
    }

    /// Recomputes the display label from the title (or end message).
    pub fn refresh_label(&mut self) {
        match self {
            Self::Start(d) => d.label = d.title.clone(),
            Self::Task(d) => d.label = d.title.clone(),
            Self::Approval(d) => d.label = d.title.clone(),
            Self::Automated(d) => d.label = d.title.clone(),
            Self::End(d) => d.label = d.end_message.clone(),
            Self::Unknown(_) => {}
        }
    }

    fn decode(id: &str, kind: NodeType, raw: Value) -> Result<Self, ModelError> {
        let invalid = |source| ModelError::InvalidPayload {
            id: id.to_string(),
            kind: kind.as_str().to_string(),
            source,
        };
        let raw = match raw {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let data = match &kind {
            NodeType::Start => Self::Start(serde_json::from_value(raw).map_err(invalid)?),
            NodeType::Task => Self::Task(serde_json::from_value(raw).map_err(invalid)?),
            NodeType::Approval => {
                let mut data: ApprovalData =
                    serde_json::from_value(raw.clone()).map_err(invalid)?;
                data.remember_spelling(&raw);
                Self::Approval(data)
            }
            NodeType::Automated => Self::Automated(serde_json::from_value(raw).map_err(invalid)?),
            NodeType::End => Self::End(serde_json::from_value(raw).map_err(invalid)?),
            NodeType::Unknown(name) => Self::Unknown(UnknownData {
                kind: name.clone(),
                label: raw
                    .get("label")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                raw,
            }),
        };
        Ok(data)
    }

    fn encode(&self) -> Value {
        let encoded = match self {
            Self::Start(d) => serde_json::to_value(d),
            Self::Task(d) => serde_json::to_value(d),
            Self::Approval(d) => d.to_wire(),
            Self::Automated(d) => serde_json::to_value(d),
            Self::End(d) => serde_json::to_value(d),
            Self::Unknown(d) => return d.raw.clone(),
        };
        encoded.unwrap_or_default()
    }
}

/// Canvas position. Carried only so exports round-trip.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Wire shape of a node in the export document.
#[derive(Serialize, Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    kind: NodeType,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    data: Value,
}

/// A typed vertex of the workflow graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct Node {
    /// Unique identifier (e.g. `node_3`)
    pub id: String,
    /// UI-only canvas position
    pub position: Position,
    /// Type-specific payload
    pub data: NodeData,
}

impl TryFrom<RawNode> for Node {
    type Error = ModelError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let data = NodeData::decode(&raw.id, raw.kind, raw.data)?;
        Ok(Self {
            id: raw.id,
            position: raw.position,
            data,
        })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        Self {
            kind: node.data.node_type(),
            data: node.data.encode(),
            id: node.id,
            position: node.position,
        }
    }
}

impl Node {
    /// Creates a node and derives its label from the payload.
    pub fn new(id: impl Into<String>, data: NodeData) -> Self {
        let mut data = data;
        data.refresh_label();
        Self {
            id: id.into(),
            position: Position::default(),
            data,
        }
    }

    pub fn start(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(
            id,
            NodeData::Start(StartData {
                title: title.into(),
                ..Default::default()
            }),
        )
    }

    pub fn task(id: impl Into<String>, title: impl Into<String>, assignee: impl Into<String>) -> Self {
        Self::new(
            id,
            NodeData::Task(TaskData {
                title: title.into(),
                assignee: assignee.into(),
                ..Default::default()
            }),
        )
    }

    pub fn approval(
        id: impl Into<String>,
        title: impl Into<String>,
        approver_role: Option<ApproverRole>,
    ) -> Self {
        Self::new(
            id,
            NodeData::Approval(ApprovalData {
                title: title.into(),
                approver_role,
                ..Default::default()
            }),
        )
    }

    pub fn automated(
        id: impl Into<String>,
        title: impl Into<String>,
        action: impl Into<String>,
        action_label: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            NodeData::Automated(AutomatedData {
                title: title.into(),
                action: action.into(),
                action_label: action_label.into(),
                ..Default::default()
            }),
        )
    }

    pub fn end(id: impl Into<String>, end_message: impl Into<String>) -> Self {
        Self::new(
            id,
            NodeData::End(EndData {
                end_message: end_message.into(),
                ..Default::default()
            }),
        )
    }

    /// Sets the canvas position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    pub fn label(&self) -> &str {
        self.data.label()
    }

    /// Label for messages, falling back to the id when no label is set.
    pub fn display_name(&self) -> &str {
        let label = self.label();
        if label.is_empty() {
            self.id.as_str()
        } else {
            label
        }
    }
}

/// Directed connection between two nodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Snapshot of a workflow: nodes and edges in declaration order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Appends a node (builder style).
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Appends an edge with an id derived from its endpoints (builder style).
    pub fn connect(mut self, source: &str, target: &str) -> Self {
        let id = format!("edge_{}_{}", source, target);
        self.edges.push(Edge::new(id, source, target));
        self
    }

    /// First node with the given id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Nodes of one kind, in declaration order.
    pub fn nodes_of_type<'a>(&'a self, kind: &'a NodeType) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.node_type() == *kind)
    }

    /// Start nodes in declaration order.
    pub fn start_nodes(&self) -> Vec<&Node> {
        self.nodes_of_type(&NodeType::Start).collect()
    }

    /// Targets of edges leaving `id`, in edge-declaration order.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source == id)
            .map(|e| e.target.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_parse_known() {
        assert_eq!(NodeType::parse("startNode"), NodeType::Start);
        assert_eq!(NodeType::parse("approvalNode"), NodeType::Approval);
        assert_eq!(NodeType::Automated.as_str(), "automatedNode");
    }

    #[test]
    fn test_node_type_parse_unknown_is_preserved() {
        let kind = NodeType::parse("delayNode");
        assert_eq!(kind, NodeType::Unknown("delayNode".to_string()));
        assert_eq!(kind.as_str(), "delayNode");
    }

    #[test]
    fn test_label_follows_title() {
        let node = Node::task("t1", "Collect documents", "alice");
        assert_eq!(node.label(), "Collect documents");

        let end = Node::end("e", "All done");
        assert_eq!(end.label(), "All done");
    }

    #[test]
    fn test_builder_keeps_id_verbatim() {
        let node = Node::start(" s", "S");
        assert_eq!(node.id, " s");

        let graph = Graph::new()
            .with_node(node)
            .with_node(Node::end("e", "E"))
            .connect(" s", "e");
        assert_eq!(graph.outgoing(" s").collect::<Vec<_>>(), vec!["e"]);
        assert!(graph.contains_node(" s"));
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let node = Node::task("t1", "", "");
        assert_eq!(node.display_name(), "t1");
    }

    #[test]
    fn test_placeholder_labels() {
        assert_eq!(NodeData::placeholder(&NodeType::Start).label(), "New start");
        assert_eq!(NodeData::placeholder(&NodeType::Automated).label(), "New automated");
    }

    #[test]
    fn test_deserialize_editor_document() {
        let json = r#"{
            "nodes": [
                {"id": "node_0", "type": "startNode", "position": {"x": 10, "y": 20},
                 "data": {"label": "Hire", "title": "Hire", "metadata": [{"key": "dept", "value": "ops"}]}},
                {"id": "node_1", "type": "approvalNode", "position": {"x": 0, "y": 0},
                 "data": {"label": "Sign off", "title": "Sign off", "approverRole": "HRBP", "autoApproveThreshold": "250"}},
                {"id": "node_2", "type": "endNode", "position": {"x": 0, "y": 0},
                 "data": {"label": "New end", "title": ""}}
            ],
            "edges": [{"id": "e1", "source": "node_0", "target": "node_1"}]
        }"#;

        let graph: Graph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.nodes[0].position, Position::new(10.0, 20.0));

        match &graph.nodes[0].data {
            NodeData::Start(d) => assert_eq!(d.metadata, vec![KeyValue::new("dept", "ops")]),
            other => panic!("unexpected payload: {:?}", other),
        }
        match &graph.nodes[1].data {
            NodeData::Approval(d) => {
                assert_eq!(d.approver_role, Some(ApproverRole::Hrbp));
                assert_eq!(d.auto_approve_threshold, Some(250.0));
            }
            other => panic!("unexpected payload: {:?}", other),
        }
        assert_eq!(graph.nodes[2].label(), "New end");
    }

    #[test]
    fn test_empty_role_and_threshold_are_none() {
        let json = r#"{"id": "a", "type": "approvalNode",
            "data": {"title": "x", "approverRole": "", "autoApproveThreshold": ""}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        match node.data {
            NodeData::Approval(d) => {
                assert!(d.approver_role.is_none());
                assert!(d.auto_approve_threshold.is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_editor_spelling_survives_until_edited() {
        let json = r#"{"id": "a", "type": "approvalNode",
            "data": {"title": "x", "approverRole": "", "autoApproveThreshold": "250"}}"#;
        let mut node: Node = serde_json::from_str(json).unwrap();

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["data"]["approverRole"], "");
        assert_eq!(value["data"]["autoApproveThreshold"], "250");

        if let NodeData::Approval(d) = &mut node.data {
            d.approver_role = Some(ApproverRole::Director);
            d.auto_approve_threshold = None;
        }
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["data"]["approverRole"], "Director");
        assert!(value["data"].get("autoApproveThreshold").is_none());
    }

    #[test]
    fn test_unmodelled_fields_are_kept() {
        let json = r#"{"id": "e", "type": "endNode",
            "data": {"label": "New end", "title": "", "extra": 7}}"#;
        let node: Node = serde_json::from_str(json).unwrap();

        match &node.data {
            NodeData::End(d) => assert_eq!(d.extra.get("extra"), Some(&Value::from(7))),
            other => panic!("unexpected payload: {:?}", other),
        }
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["data"]["title"], "");
        assert_eq!(value["data"]["extra"], 7);
    }

    #[test]
    fn test_invalid_role_is_rejected() {
        let json = r#"{"id": "a", "type": "approvalNode", "data": {"approverRole": "Intern"}}"#;
        let result: Result<Node, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_data_uses_defaults() {
        let json = r#"{"id": "t", "type": "taskNode"}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_type(), NodeType::Task);
        assert_eq!(node.label(), "");
    }

    #[test]
    fn test_unknown_node_keeps_raw_data() {
        let json = r#"{"id": "x", "type": "delayNode", "data": {"label": "Wait", "hours": 4}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.label(), "Wait");

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["type"], "delayNode");
        assert_eq!(back["data"]["hours"], 4);
    }

    #[test]
    fn test_serialize_uses_editor_field_names() {
        let node = Node::approval("a", "Budget", Some(ApproverRole::Ceo)).at(1.0, 2.0);
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["type"], "approvalNode");
        assert_eq!(value["position"]["x"], 1.0);
        assert_eq!(value["data"]["approverRole"], "CEO");
        assert_eq!(value["data"]["label"], "Budget");
        assert!(value["data"].get("autoApproveThreshold").is_none());
    }

    #[test]
    fn test_outgoing_preserves_edge_order() {
        let graph = Graph::new()
            .with_node(Node::start("s", "Start"))
            .with_node(Node::task("b", "B", ""))
            .with_node(Node::task("a", "A", ""))
            .connect("s", "b")
            .connect("s", "a");

        let targets: Vec<&str> = graph.outgoing("s").collect();
        assert_eq!(targets, vec!["b", "a"]);
        assert!(graph.outgoing("a").next().is_none());
    }

    #[test]
    fn test_start_nodes_in_declaration_order() {
        let graph = Graph::new()
            .with_node(Node::task("t", "T", ""))
            .with_node(Node::start("s2", "Second"))
            .with_node(Node::start("s1", "First"));

        let ids: Vec<&str> = graph.start_nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["s2", "s1"]);
    }

    #[test]
    fn test_graph_default_is_empty() {
        let graph = Graph::default();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert!(graph.node("missing").is_none());
    }
}
