//! Client for workflow operations against a Conveyor service.

pub mod client;
pub mod options;

pub use client::{WorkflowClient, WorkflowRun};
pub use options::{ClientOptions, StartWorkflowOptions};
