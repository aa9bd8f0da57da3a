//! Worker for hosting Conveyor workflows and activities.
//!
//! A [`Worker`] binds a registry of workflow and activity implementations to
//! a (domain, task list) pair on a [`WorkflowService`], polls for tasks, and
//! dispatches them to the registered functions.
//!
//! [`WorkflowService`]: conveyor_service::WorkflowService

pub mod handlers;
pub mod heartbeat;
pub mod pollers;
pub mod registry;
pub mod worker;

pub use registry::{
    Activity, ActivityFn, ActivityRegisterOptions, Workflow, WorkflowFn, WorkflowRegisterOptions,
    WorkerRegistry,
};
pub use worker::{Worker, WorkerError, WorkerHandle, WorkerOptions};
