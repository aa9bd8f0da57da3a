//! Activity authoring API for Conveyor.
//!
//! Provides the context handed to activity implementations, including
//! heartbeat recording and cancellation checks.

pub mod context;

pub use context::{ActivityContext, ActivityError, ActivityRuntime};
pub use conveyor_core::ActivityInfo;
