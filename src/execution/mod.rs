//! Workflow Simulation Module
//!
//! Runs a workflow "on paper": validation first, then the execution trace.
//! Automated actions are described, never invoked.
//!
//! # Architecture
//!
//! - [`engine`]: Validate-then-plan simulator and its outcome types
//! - [`step`]: Trace entries and per-type step descriptions

pub mod engine;
pub mod step;

pub use engine::{SimulationOutcome, SimulationReport, Simulator};
pub use step::{Step, StepStatus};
