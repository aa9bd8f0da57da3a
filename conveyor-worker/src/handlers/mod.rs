//! Task handlers invoked by the pollers.

pub mod activity;
pub mod workflow;
