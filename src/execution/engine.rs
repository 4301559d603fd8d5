//! Workflow Simulation Engine
//!
//! Ties validation and planning together: a workflow is validated first and
//! only planned when it carries no structural errors. The result is either
//! the ordered trace or the full list of validation messages.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::workflow::planner::ExecutionPlanner;
use crate::workflow::validator::check;
use crate::workflow::Graph;

use super::step::Step;

/// Message attached to every successful simulation.
pub const SUCCESS_MESSAGE: &str = "Workflow simulation completed successfully";

/// Result of simulating one workflow snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SimulationOutcome {
    Success {
        steps: Vec<Step>,
        message: String,
        /// Nodes not reachable from the Start node
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        unreached: Vec<String>,
    },
    Failure {
        errors: Vec<String>,
    },
}

impl SimulationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Trace steps; empty on failure.
    pub fn steps(&self) -> &[Step] {
        match self {
            Self::Success { steps, .. } => steps.as_slice(),
            Self::Failure { .. } => &[],
        }
    }

    /// Validation messages; empty on success.
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Success { .. } => &[],
            Self::Failure { errors } => errors.as_slice(),
        }
    }
}

/// A simulation outcome stamped with when it was produced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub simulated_at: DateTime<Utc>,
    pub node_count: usize,
    pub edge_count: usize,
    #[serde(flatten)]
    pub outcome: SimulationOutcome,
}

/// Synchronous validate-then-plan simulator.
///
/// # Example
///
/// ```
/// use hrflow::execution::Simulator;
/// use hrflow::workflow::{Graph, Node};
///
/// let graph = Graph::new()
///     .with_node(Node::start("s", "Onboarding"))
///     .with_node(Node::end("e", "Done"))
///     .connect("s", "e");
///
/// let outcome = Simulator::simulate(&graph);
/// assert_eq!(outcome.steps().len(), 2);
/// ```
pub struct Simulator;

impl Simulator {
    /// Validates the graph and, if valid, plans its execution trace.
    pub fn simulate(graph: &Graph) -> SimulationOutcome {
        match check(graph) {
            Ok(validated) => {
                let plan = ExecutionPlanner::plan(&validated);
                info!("Simulation produced {} steps", plan.steps.len());
                SimulationOutcome::Success {
                    steps: plan.steps,
                    message: SUCCESS_MESSAGE.to_string(),
                    unreached: plan.unreached,
                }
            }
            Err(report) => {
                warn!("Simulation rejected: {} validation errors", report.errors.len());
                SimulationOutcome::Failure {
                    errors: report.messages(),
                }
            }
        }
    }

    /// Simulates and stamps the outcome with graph size and time.
    pub fn report(graph: &Graph) -> SimulationReport {
        SimulationReport {
            simulated_at: Utc::now(),
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            outcome: Self::simulate(graph),
        }
    }
}
