//! Workflow authoring API for Conveyor.
//!
//! A workflow function receives a [`WorkflowContext`], attaches
//! [`ActivityOptions`] to it, and invokes activities through it. The
//! suspension while an activity runs is handled by the orchestration
//! service; the context only awaits the scheduled task's result.
//!
//! [`ActivityOptions`]: conveyor_core::ActivityOptions

pub mod context;

pub use context::{WorkflowContext, WorkflowError};
