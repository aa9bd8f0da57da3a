//! The workflow service trait consumed by the client and the worker.

use crate::requests::*;
use async_trait::async_trait;
use conveyor_core::ConveyorResult;

/// Contract the external orchestration platform provides to this client.
///
/// The client crate consumes the start/result operations; the worker crate
/// consumes the poll/respond/heartbeat operations. Task routing, timeout
/// enforcement, and durability all live behind this boundary.
#[async_trait]
pub trait WorkflowService: Send + Sync {
    /// Request that a new workflow execution begin
    async fn start_workflow_execution(
        &self,
        request: StartWorkflowExecutionRequest,
    ) -> ConveyorResult<StartWorkflowExecutionResponse>;

    /// Long-poll for a workflow execution's terminal result
    async fn get_workflow_execution_result(
        &self,
        request: GetWorkflowExecutionResultRequest,
    ) -> ConveyorResult<GetWorkflowExecutionResultResponse>;

    /// Poll a task list for the next workflow task.
    ///
    /// Returns `Ok(None)` when the long-poll window elapses with no work.
    async fn poll_for_workflow_task(
        &self,
        request: PollForWorkflowTaskRequest,
    ) -> ConveyorResult<Option<PollForWorkflowTaskResponse>>;

    async fn respond_workflow_execution_completed(
        &self,
        request: RespondWorkflowExecutionCompletedRequest,
    ) -> ConveyorResult<()>;

    async fn respond_workflow_execution_failed(
        &self,
        request: RespondWorkflowExecutionFailedRequest,
    ) -> ConveyorResult<()>;

    /// Schedule an activity task onto a task list
    async fn schedule_activity_task(
        &self,
        request: ScheduleActivityTaskRequest,
    ) -> ConveyorResult<ScheduleActivityTaskResponse>;

    /// Long-poll for a scheduled activity's result
    async fn get_activity_task_result(
        &self,
        request: GetActivityTaskResultRequest,
    ) -> ConveyorResult<GetActivityTaskResultResponse>;

    /// Poll a task list for the next activity task.
    ///
    /// Returns `Ok(None)` when the long-poll window elapses with no work.
    async fn poll_for_activity_task(
        &self,
        request: PollForActivityTaskRequest,
    ) -> ConveyorResult<Option<PollForActivityTaskResponse>>;

    async fn respond_activity_task_completed(
        &self,
        request: RespondActivityTaskCompletedRequest,
    ) -> ConveyorResult<()>;

    async fn respond_activity_task_failed(
        &self,
        request: RespondActivityTaskFailedRequest,
    ) -> ConveyorResult<()>;

    /// Record progress for a running activity; the response reports whether
    /// cancellation has been requested for it.
    async fn record_activity_task_heartbeat(
        &self,
        request: RecordActivityTaskHeartbeatRequest,
    ) -> ConveyorResult<RecordActivityTaskHeartbeatResponse>;
}
