//! Core types for the Conveyor client.
//!
//! These types describe workflow executions, task lists, and the option
//! structs that are forwarded verbatim to the orchestration service.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Workflow execution identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub workflow_id: String,
    pub run_id: String,
}

impl WorkflowExecution {
    pub fn new(workflow_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            run_id: run_id.into(),
        }
    }
}

/// Workflow type, identified by its registered external name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowType {
    pub name: String,
}

impl WorkflowType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Activity type, identified by its registered external name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityType {
    pub name: String,
}

impl ActivityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A named queue through which the service routes work to workers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskList {
    pub name: String,
    pub kind: TaskListKind,
}

impl TaskList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TaskListKind::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(i32)]
pub enum TaskListKind {
    #[default]
    Normal = 0,
    Sticky = 1,
}

/// Options attached to a workflow context before invoking an activity.
///
/// All timeouts are forwarded unmodified to the orchestration service;
/// enforcement is the service's responsibility, not the client's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityOptions {
    /// Task list to schedule the activity on
    pub task_list: String,
    /// Schedule to start timeout
    pub schedule_to_start_timeout: Duration,
    /// Start to close timeout
    pub start_to_close_timeout: Duration,
    /// Heartbeat timeout
    pub heartbeat_timeout: Duration,
}

impl Default for ActivityOptions {
    fn default() -> Self {
        Self {
            task_list: String::new(),
            schedule_to_start_timeout: Duration::from_secs(0),
            start_to_close_timeout: Duration::from_secs(0),
            heartbeat_timeout: Duration::from_secs(0),
        }
    }
}

/// Workflow information available inside a workflow context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowInfo {
    pub workflow_execution: WorkflowExecution,
    pub workflow_type: WorkflowType,
    pub domain: String,
    pub task_list: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub execution_start_to_close_timeout: Duration,
    pub attempt: i32,
}

/// Activity information available inside an activity context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityInfo {
    pub activity_id: String,
    pub activity_type: ActivityType,
    pub task_token: String,
    pub workflow_execution: WorkflowExecution,
    pub attempt: i32,
    pub scheduled_time: chrono::DateTime<chrono::Utc>,
    pub started_time: chrono::DateTime<chrono::Utc>,
    pub heartbeat_timeout: Duration,
}

/// Default identity string for a worker or client process
pub fn process_identity(role: &str) -> String {
    format!(
        "conveyor-{}@{}-pid-{}",
        role,
        std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string()),
        std::process::id()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_options_default_to_zero_timeouts() {
        let options = ActivityOptions::default();
        assert_eq!(options.schedule_to_start_timeout, Duration::from_secs(0));
        assert_eq!(options.start_to_close_timeout, Duration::from_secs(0));
        assert_eq!(options.heartbeat_timeout, Duration::from_secs(0));
        assert!(options.task_list.is_empty());
    }

    #[test]
    fn task_list_defaults_to_normal_kind() {
        let task_list = TaskList::new("SimpleWorker");
        assert_eq!(task_list.kind, TaskListKind::Normal);
        assert_eq!(task_list.name, "SimpleWorker");
    }

    #[test]
    fn process_identity_includes_role_and_pid() {
        let identity = process_identity("worker");
        assert!(identity.starts_with("conveyor-worker@"));
        assert!(identity.contains(&format!("pid-{}", std::process::id())));
    }
}
