//! Async Service Boundary
//!
//! The editor talks to the engine through two asynchronous calls, each with
//! a simulated network latency:
//! - `list_automations` (default 300 ms)
//! - `simulate` (default 500 ms)
//!
//! The work behind both is synchronous; the delay only happens before it.
//! Every call receives its own graph snapshot, so concurrent calls do not
//! interfere.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::{AutomationCatalog, AutomationDescriptor, StaticCatalog};
use crate::execution::engine::{SimulationOutcome, Simulator};
use crate::execution::step::Step;
use crate::workflow::Graph;

/// Latencies applied at the service boundary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Delay before answering `list_automations`, in milliseconds
    pub automation_latency_ms: u64,
    /// Delay before answering `simulate`, in milliseconds
    pub simulation_latency_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            automation_latency_ms: 300,
            simulation_latency_ms: 500,
        }
    }
}

impl ServiceConfig {
    /// No artificial latency; used by the CLI and tests.
    pub fn immediate() -> Self {
        Self {
            automation_latency_ms: 0,
            simulation_latency_ms: 0,
        }
    }
}

/// Successful simulation response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationSuccess {
    pub success: bool,
    pub steps: Vec<Step>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreached: Vec<String>,
}

/// Rejected simulation response: every validation message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SimulationFailure {
    pub errors: Vec<String>,
}

impl std::fmt::Display for SimulationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.errors.join("\n"))
    }
}

impl std::error::Error for SimulationFailure {}

/// Async facade over the catalog and simulator.
#[derive(Clone)]
pub struct WorkflowService {
    catalog: Arc<dyn AutomationCatalog + Send + Sync>,
    config: ServiceConfig,
}

impl Default for WorkflowService {
    fn default() -> Self {
        Self::new(StaticCatalog::builtin(), ServiceConfig::default())
    }
}

impl WorkflowService {
    pub fn new<C>(catalog: C, config: ServiceConfig) -> Self
    where
        C: AutomationCatalog + Send + Sync + 'static,
    {
        Self {
            catalog: Arc::new(catalog),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Lists the available automated actions.
    pub async fn list_automations(&self) -> Vec<AutomationDescriptor> {
        delay(self.config.automation_latency_ms).await;
        let automations = self.catalog.list_automations();
        debug!("Serving {} automations", automations.len());
        automations
    }

    /// Validates and simulates a workflow snapshot.
    pub async fn simulate(&self, workflow: Graph) -> Result<SimulationSuccess, SimulationFailure> {
        delay(self.config.simulation_latency_ms).await;

        match Simulator::simulate(&workflow) {
            SimulationOutcome::Success {
                steps,
                message,
                unreached,
            } => Ok(SimulationSuccess {
                success: true,
                steps,
                message,
                unreached,
            }),
            SimulationOutcome::Failure { errors } => Err(SimulationFailure { errors }),
        }
    }
}

async fn delay(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
