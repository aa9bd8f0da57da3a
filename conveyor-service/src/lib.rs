//! Service boundary for the Conveyor client.
//!
//! The [`WorkflowService`] trait is the contract an orchestration platform
//! must provide for this client: start-execution requests, task-list polling,
//! task completion responses, and heartbeats. [`LocalWorkflowService`] is an
//! in-memory implementation used by tests and the samples; it routes tasks
//! but owns no durable state.

pub mod local;
pub mod requests;
pub mod service;

pub use local::LocalWorkflowService;
pub use requests::*;
pub use service::WorkflowService;
