//! Workflow Validation
//!
//! Structural checks run before a workflow may be simulated:
//! - Entry (Start) and terminal (End) presence
//! - Disconnected nodes
//! - Reference integrity (dangling edges, duplicate ids)
//! - Cycle detection
//!
//! Every check runs and all errors are reported together, so the user can
//! fix several problems in one pass. [`check`] is the only way to obtain a
//! [`ValidatedGraph`], which is what the planner requires.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::{debug, info, warn};

use super::model::{Graph, NodeType};

/// Validation error types for user-friendly error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingStart,
    MissingEnd,
    DisconnectedNodes(Vec<String>),
    DuplicateNodeId(String),
    UnknownSource { edge: String, node: String },
    UnknownTarget { edge: String, node: String },
    Cycle,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => write!(f, "Workflow must have a Start Node"),
            Self::MissingEnd => write!(f, "Workflow must have an End Node"),
            Self::DisconnectedNodes(names) => {
                write!(f, "Disconnected nodes found: {}", names.join(", "))
            }
            Self::DuplicateNodeId(id) => write!(f, "Duplicate node ID: '{}'", id),
            Self::UnknownSource { edge, node } => {
                write!(f, "Edge '{}' references unknown source node '{}'", edge, node)
            }
            Self::UnknownTarget { edge, node } => {
                write!(f, "Edge '{}' references unknown target node '{}'", edge, node)
            }
            Self::Cycle => write!(f, "Workflow contains cycles - infinite loops detected"),
        }
    }
}

/// All structural problems found in one graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Error messages in the order the checks produced them.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("\n"))
    }
}

impl std::error::Error for ValidationReport {}

/// A graph that passed every structural check.
///
/// Holding one proves the graph is acyclic and has a Start node, which is
/// what the planner relies on.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedGraph<'a> {
    graph: &'a Graph,
}

impl<'a> ValidatedGraph<'a> {
    pub fn graph(&self) -> &'a Graph {
        self.graph
    }
}

/// Checks that at least one node of `kind` exists.
fn has_node_of_type(graph: &Graph, kind: &NodeType) -> bool {
    graph.nodes_of_type(kind).next().is_some()
}

/// Lists nodes that appear in no edge. Lone nodes are exempt.
fn find_disconnected(graph: &Graph) -> Vec<String> {
    if graph.nodes.len() <= 1 {
        return Vec::new();
    }

    let connected: HashSet<&str> = graph
        .edges
        .iter()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect();

    graph
        .nodes
        .iter()
        .filter(|n| !connected.contains(n.id.as_str()))
        .map(|n| {
            debug!("Node '{}' has no incident edges", n.id);
            n.display_name().to_string()
        })
        .collect()
}

/// Checks ids are unique and every edge endpoint exists.
fn check_references(graph: &Graph) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut seen_ids: HashSet<&str> = HashSet::new();
    for node in &graph.nodes {
        if !seen_ids.insert(node.id.as_str()) {
            errors.push(ValidationError::DuplicateNodeId(node.id.clone()));
        }
    }

    for edge in &graph.edges {
        if !seen_ids.contains(edge.source.as_str()) {
            errors.push(ValidationError::UnknownSource {
                edge: edge.id.clone(),
                node: edge.source.clone(),
            });
        }
        if !seen_ids.contains(edge.target.as_str()) {
            errors.push(ValidationError::UnknownTarget {
                edge: edge.id.clone(),
                node: edge.target.clone(),
            });
        }
    }

    errors
}

/// Detects a directed cycle with an iterative depth-first search.
///
/// Each DFS frame holds a node and the index of the next neighbour to try.
/// A node is on `on_stack` while its frame is live; reaching such a node
/// again closes a cycle. Edges to unknown nodes are ignored.
pub fn has_cycle(graph: &Graph) -> bool {
    let mut adjacency: HashMap<&str, Vec<&str>> = graph
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), Vec::new()))
        .collect();

    for edge in &graph.edges {
        if !adjacency.contains_key(edge.target.as_str()) {
            continue;
        }
        if let Some(neighbors) = adjacency.get_mut(edge.source.as_str()) {
            neighbors.push(edge.target.as_str());
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();

    for root in graph.nodes.iter().map(|n| n.id.as_str()) {
        if visited.contains(root) {
            continue;
        }

        visited.insert(root);
        on_stack.insert(root);
        let mut frames: Vec<(&str, usize)> = vec![(root, 0)];

        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;
            let neighbors = adjacency.get(node).map(Vec::as_slice).unwrap_or(&[]);

            match neighbors.get(next) {
                Some(&neighbor) => {
                    frame.1 += 1;
                    if on_stack.contains(neighbor) {
                        debug!("Back edge '{}' -> '{}' closes a cycle", node, neighbor);
                        return true;
                    }
                    if visited.insert(neighbor) {
                        on_stack.insert(neighbor);
                        frames.push((neighbor, 0));
                    }
                }
                None => {
                    on_stack.remove(node);
                    frames.pop();
                }
            }
        }
    }

    false
}

/// Runs every structural check and returns the typed errors.
pub fn validate_errors(graph: &Graph) -> Vec<ValidationError> {
    info!(
        "Validating workflow with {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );

    let mut errors = Vec::new();

    if !has_node_of_type(graph, &NodeType::Start) {
        errors.push(ValidationError::MissingStart);
    }

    if !has_node_of_type(graph, &NodeType::End) {
        errors.push(ValidationError::MissingEnd);
    }

    let disconnected = find_disconnected(graph);
    if !disconnected.is_empty() {
        errors.push(ValidationError::DisconnectedNodes(disconnected));
    }

    errors.extend(check_references(graph));

    if has_cycle(graph) {
        errors.push(ValidationError::Cycle);
    }

    if errors.is_empty() {
        info!("Workflow validated");
    } else {
        warn!("Workflow has {} validation errors", errors.len());
    }

    errors
}

/// Validates a workflow and returns human-readable messages.
///
/// An empty list means the workflow is valid.
pub fn validate(graph: &Graph) -> Vec<String> {
    validate_errors(graph).iter().map(|e| e.to_string()).collect()
}

/// Validates a workflow, yielding a [`ValidatedGraph`] on success.
pub fn check(graph: &Graph) -> Result<ValidatedGraph<'_>, ValidationReport> {
    let errors = validate_errors(graph);
    if errors.is_empty() {
        Ok(ValidatedGraph { graph })
    } else {
        Err(ValidationReport { errors })
    }
}
