//! Testing framework for Conveyor workflows and activities.
//!
//! [`TestWorkflowEnvironment`] runs registered workflows and activities
//! against an in-memory service, without a running orchestration platform.

pub mod suite;
pub mod tracing_setup;

pub use suite::TestWorkflowEnvironment;
pub use tracing_setup::{init_test_tracing, init_tracing};
