//! # Conveyor - a minimal workflow-orchestration client
//!
//! This is a meta-crate that re-exports the Conveyor crates for convenient
//! access.
//!
//! ```rust,no_run
//! use conveyor::client::WorkflowClient;
//! use conveyor::core::{ConveyorError, ConveyorResult};
//! use conveyor::workflow::WorkflowContext;
//! use conveyor::activity::ActivityContext;
//! ```
//!
//! ## Re-exported crates
//!
//! - [`core`] - Core types, errors, and serialization
//! - [`service`] - Service boundary trait and in-memory implementation
//! - [`client`] - Client for workflow operations
//! - [`worker`] - Worker for hosting workflows and activities
//! - [`workflow`] - Workflow authoring API
//! - [`activity`] - Activity authoring API
//! - [`testsuite`] - Testing utilities

pub use conveyor_activity as activity;
pub use conveyor_client as client;
pub use conveyor_core as core;
pub use conveyor_service as service;
pub use conveyor_testsuite as testsuite;
pub use conveyor_worker as worker;
pub use conveyor_workflow as workflow;
pub use serde_json;
