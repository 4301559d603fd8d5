//! Execution Planner
//!
//! Walks a validated workflow from its Start node and produces the ordered
//! execution trace:
//! - Depth-first pre-order, children in edge-declaration order
//! - One step counter shared by every branch (numbers are `1..=k`, no gaps)
//! - Each node emitted at most once, however many paths reach it
//! - Nodes the walk never reaches are listed separately, not reported as errors

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::model::{Graph, Node};
use super::validator::ValidatedGraph;
use crate::execution::step::Step;

/// Ordered trace produced by the planner.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExecutionPlan {
    /// Steps in execution order
    pub steps: Vec<Step>,
    /// Ids of nodes not reachable from the entry node, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreached: Vec<String>,
}

impl ExecutionPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Builds the execution trace for a validated workflow.
pub struct ExecutionPlanner;

impl ExecutionPlanner {
    /// Plans a graph that passed validation.
    pub fn plan(validated: &ValidatedGraph<'_>) -> ExecutionPlan {
        traverse(validated.graph())
    }
}

/// Depth-first pre-order walk from the first declared Start node.
///
/// Uses an explicit stack and a visited set, so it terminates on any input;
/// only validated graphs get a meaningful trace though. Children are pushed
/// in reverse so the first declared edge is explored first.
pub(crate) fn traverse(graph: &Graph) -> ExecutionPlan {
    let starts = graph.start_nodes();
    let Some(entry) = starts.first() else {
        debug!("No Start node, nothing to plan");
        return ExecutionPlan {
            steps: Vec::new(),
            unreached: graph.nodes.iter().map(|n| n.id.clone()).collect(),
        };
    };

    if starts.len() > 1 {
        warn!(
            "Workflow has {} Start nodes; simulating from the first one ('{}')",
            starts.len(),
            entry.id
        );
    }

    // First declaration wins for duplicated ids.
    let mut index: HashMap<&str, &Node> = HashMap::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        index.entry(node.id.as_str()).or_insert(node);
    }

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = vec![entry.id.as_str()];
    let mut steps = Vec::new();

    while let Some(node_id) = stack.pop() {
        if !visited.insert(node_id) {
            continue;
        }

        let Some(&node) = index.get(node_id) else {
            debug!("Skipping edge target '{}' with no node", node_id);
            continue;
        };

        let step = Step::for_node(node, steps.len() + 1);
        debug!("Step {}: {}", step.step_number, step.details);
        steps.push(step);

        if let Some(children) = adjacency.get(node_id) {
            stack.extend(children.iter().rev().copied());
        }
    }

    let unreached: Vec<String> = graph
        .nodes
        .iter()
        .filter(|n| !visited.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect();

    if !unreached.is_empty() {
        info!("{} nodes not reachable from Start: {:?}", unreached.len(), unreached);
    }

    info!("Planned {} steps", steps.len());
    ExecutionPlan { steps, unreached }
}
