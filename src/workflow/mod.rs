//! Workflow Definition Module
//!
//! Graph model, editing, document I/O, validation and planning for HR
//! approval workflows.
//!
//! # Structure
//!
//! - [`model`]: Core data structures (Node, Edge, Graph)
//! - [`session`]: Editor session owning the graph and its id counters
//! - [`parser`]: Loading and exporting workflow documents
//! - [`validator`]: Structural checks and cycle detection
//! - [`planner`]: Deterministic execution trace

pub mod model;
pub mod parser;
pub mod planner;
pub mod session;
pub mod validator;

pub use model::{ApproverRole, Edge, Graph, Node, NodeData, NodeType, Position};
pub use parser::{export_json, load_workflow, save_workflow};
pub use planner::{ExecutionPlan, ExecutionPlanner};
pub use session::EditorSession;
pub use validator::{check, validate, ValidatedGraph, ValidationError, ValidationReport};
