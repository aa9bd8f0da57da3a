//! Request and response structs for the workflow service boundary.

use conveyor_core::{ActivityType, TaskList, WorkflowExecution, WorkflowType};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Start workflow execution request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartWorkflowExecutionRequest {
    pub domain: String,
    pub workflow_id: String,
    pub workflow_type: WorkflowType,
    pub task_list: TaskList,
    pub input: Option<Vec<u8>>,
    pub execution_start_to_close_timeout: Duration,
    pub identity: String,
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartWorkflowExecutionResponse {
    pub run_id: String,
}

/// Long-poll for a workflow execution's terminal result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetWorkflowExecutionResultRequest {
    pub domain: String,
    pub workflow_execution: WorkflowExecution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetWorkflowExecutionResultResponse {
    pub result: Option<Vec<u8>>,
}

/// Poll for workflow task request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollForWorkflowTaskRequest {
    pub domain: String,
    pub task_list: TaskList,
    pub identity: String,
}

/// A workflow task handed to a worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollForWorkflowTaskResponse {
    pub task_token: String,
    pub workflow_execution: WorkflowExecution,
    pub workflow_type: WorkflowType,
    pub input: Option<Vec<u8>>,
    pub execution_start_to_close_timeout: Duration,
    pub attempt: i32,
    pub scheduled_time: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondWorkflowExecutionCompletedRequest {
    pub task_token: String,
    pub result: Option<Vec<u8>>,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondWorkflowExecutionFailedRequest {
    pub task_token: String,
    pub reason: String,
    pub details: Option<Vec<u8>>,
    pub identity: String,
}

/// Schedule an activity task on behalf of a running workflow.
///
/// The three timeout fields are carried through from [`ActivityOptions`]
/// without interpretation.
///
/// [`ActivityOptions`]: conveyor_core::ActivityOptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleActivityTaskRequest {
    pub domain: String,
    pub workflow_execution: WorkflowExecution,
    pub activity_id: String,
    pub activity_type: ActivityType,
    pub task_list: TaskList,
    pub input: Option<Vec<u8>>,
    pub schedule_to_start_timeout: Duration,
    pub start_to_close_timeout: Duration,
    pub heartbeat_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleActivityTaskResponse {
    pub task_token: String,
}

/// Long-poll for a scheduled activity's result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetActivityTaskResultRequest {
    pub task_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetActivityTaskResultResponse {
    pub result: Option<Vec<u8>>,
}

/// Poll for activity task request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollForActivityTaskRequest {
    pub domain: String,
    pub task_list: TaskList,
    pub identity: String,
}

/// An activity task handed to a worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollForActivityTaskResponse {
    pub task_token: String,
    pub activity_id: String,
    pub activity_type: ActivityType,
    pub input: Option<Vec<u8>>,
    pub workflow_execution: WorkflowExecution,
    pub attempt: i32,
    pub scheduled_time: chrono::DateTime<chrono::Utc>,
    pub started_time: chrono::DateTime<chrono::Utc>,
    pub heartbeat_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondActivityTaskCompletedRequest {
    pub task_token: String,
    pub result: Option<Vec<u8>>,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondActivityTaskFailedRequest {
    pub task_token: String,
    pub reason: String,
    pub details: Option<Vec<u8>>,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordActivityTaskHeartbeatRequest {
    pub task_token: String,
    pub details: Option<Vec<u8>>,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordActivityTaskHeartbeatResponse {
    pub cancel_requested: bool,
}
