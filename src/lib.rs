//! HRFlow - Workflow Validation and Simulation Engine
//!
//! The engine behind a visual designer for HR approval and automation
//! workflows. Given a graph of typed nodes (Start, Task, Approval, Automated,
//! End) and directed edges, it validates the structure, detects cycles and
//! produces a numbered, human-readable execution trace.
//!
//! # Architecture
//!
//! - [`workflow`]: Graph model, editor session, document I/O, validation, planning
//! - [`execution`]: Simulator and trace step rendering
//! - [`catalog`]: Registry of automated actions and their parameter forms
//! - [`service`]: Async boundary with simulated latency
//!
//! # Example
//!
//! ```rust,no_run
//! use hrflow::execution::Simulator;
//! use hrflow::load_workflow;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let graph = load_workflow("workflow.json")?;
//!
//!     let outcome = Simulator::simulate(&graph);
//!     for step in outcome.steps() {
//!         println!("{}. {}", step.step_number, step.details);
//!     }
//!     for error in outcome.errors() {
//!         eprintln!("{}", error);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod execution;
pub mod service;
pub mod workflow;

// Re-export commonly used types
pub use catalog::{AutomationCatalog, AutomationDescriptor, StaticCatalog};
pub use execution::engine::Simulator;
pub use workflow::model::{Edge, Graph, Node};
pub use workflow::parser::load_workflow;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "HRFlow";
