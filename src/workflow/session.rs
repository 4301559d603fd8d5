//! Editor Session
//!
//! Owns the graph being edited together with the id counters used to mint
//! node and edge ids. Each session counts independently, so two editors (or
//! two tests) never share hidden state.

use log::{debug, info};
use thiserror::Error;

use super::model::{Edge, Graph, Node, NodeData, NodeType, Position};

/// Errors raised by editing operations.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Edge '{0}' not found")]
    EdgeNotFound(String),

    #[error("Node '{id}' is a {expected} node, cannot store {found} data")]
    TypeMismatch {
        id: String,
        expected: String,
        found: String,
    },
}

/// One editing session: the working graph plus id counters.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    graph: Graph,
    next_node_id: usize,
    next_edge_id: usize,
}

/// Returns N for ids of the form `{prefix}N`.
fn numeric_suffix(id: &str, prefix: &str) -> Option<usize> {
    id.strip_prefix(prefix)?.parse().ok()
}

impl EditorSession {
    /// Starts an empty session; the first node is `node_0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes editing an existing graph (e.g. a loaded export).
    ///
    /// Counters continue after the highest `node_N` / `edge_N` already present.
    pub fn from_graph(graph: Graph) -> Self {
        let next_node_id = graph
            .nodes
            .iter()
            .filter_map(|n| numeric_suffix(&n.id, "node_"))
            .max()
            .map_or(0, |n| n + 1);
        let next_edge_id = graph
            .edges
            .iter()
            .filter_map(|e| numeric_suffix(&e.id, "edge_"))
            .max()
            .map_or(0, |n| n + 1);

        info!(
            "Resuming session with {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );

        Self {
            graph,
            next_node_id,
            next_edge_id,
        }
    }

    /// Read-only view of the working graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Immutable snapshot handed to the validator and planner.
    pub fn snapshot(&self) -> Graph {
        self.graph.clone()
    }

    /// Adds a placeholder node of the given kind and returns its id.
    pub fn add_node(&mut self, kind: NodeType, position: Position) -> String {
        let id = format!("node_{}", self.next_node_id);
        self.next_node_id += 1;

        let node = Node {
            id: id.clone(),
            position,
            data: NodeData::placeholder(&kind),
        };
        debug!("Added {} node '{}'", kind.display_name(), id);
        self.graph.nodes.push(node);
        id
    }

    /// Replaces a node's payload and recomputes its label.
    pub fn update_node(&mut self, id: &str, data: NodeData) -> Result<(), SessionError> {
        let node = self.node_mut(id)?;

        let expected = node.node_type();
        let found = data.node_type();
        if expected != found {
            return Err(SessionError::TypeMismatch {
                id: id.to_string(),
                expected: expected.display_name().to_string(),
                found: found.display_name().to_string(),
            });
        }

        node.data = data;
        node.data.refresh_label();
        debug!("Updated node '{}' (label: '{}')", id, node.label());
        Ok(())
    }

    /// Edits a node's payload in place, then recomputes its label.
    pub fn edit_node<F>(&mut self, id: &str, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut NodeData),
    {
        let node = self.node_mut(id)?;
        edit(&mut node.data);
        node.data.refresh_label();
        Ok(())
    }

    /// Moves a node on the canvas.
    pub fn move_node(&mut self, id: &str, position: Position) -> Result<(), SessionError> {
        self.node_mut(id)?.position = position;
        Ok(())
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Node, SessionError> {
        let index = self
            .graph
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| SessionError::NodeNotFound(id.to_string()))?;

        let before = self.graph.edges.len();
        self.graph
            .edges
            .retain(|e| e.source != id && e.target != id);
        debug!(
            "Removed node '{}' and {} incident edges",
            id,
            before - self.graph.edges.len()
        );

        Ok(self.graph.nodes.remove(index))
    }

    /// Connects two existing nodes and returns the new edge id.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<String, SessionError> {
        for endpoint in [source, target] {
            if !self.graph.contains_node(endpoint) {
                return Err(SessionError::NodeNotFound(endpoint.to_string()));
            }
        }

        let id = format!("edge_{}", self.next_edge_id);
        self.next_edge_id += 1;
        self.graph.edges.push(Edge::new(id.clone(), source, target));
        debug!("Connected '{}' -> '{}' as '{}'", source, target, id);
        Ok(id)
    }

    /// Removes a single edge.
    pub fn remove_edge(&mut self, id: &str) -> Result<Edge, SessionError> {
        let index = self
            .graph
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| SessionError::EdgeNotFound(id.to_string()))?;
        Ok(self.graph.edges.remove(index))
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node, SessionError> {
        self.graph
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| SessionError::NodeNotFound(id.to_string()))
    }
}
