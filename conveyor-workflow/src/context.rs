//! Workflow context bound to a service handle and a workflow task.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use conveyor_core::{ActivityOptions, ActivityType, ConveyorError, DataConverter, JsonDataConverter, TaskList, WorkflowInfo};
use conveyor_service::{
    GetActivityTaskResultRequest, ScheduleActivityTaskRequest, WorkflowService,
};

/// Error type for workflow logic
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Workflow error: {0}")]
    Generic(String),
    #[error("Activity failed: {reason}")]
    ActivityFailed {
        reason: String,
        details: Option<Vec<u8>>,
    },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<ConveyorError> for WorkflowError {
    fn from(err: ConveyorError) -> Self {
        match err {
            ConveyorError::ActivityTaskFailed { reason, details } => {
                WorkflowError::ActivityFailed { reason, details }
            }
            ConveyorError::Serialization(msg) => WorkflowError::Serialization(msg),
            other => WorkflowError::Transport(other.to_string()),
        }
    }
}

/// Context handed to a workflow implementation.
///
/// Activity options must be attached before invoking an activity; they are
/// forwarded to the service verbatim.
pub struct WorkflowContext {
    info: WorkflowInfo,
    task_token: String,
    service: Arc<dyn WorkflowService>,
    activity_options: Option<ActivityOptions>,
    converter: JsonDataConverter,
    activity_seq: AtomicU32,
}

impl WorkflowContext {
    pub fn new(service: Arc<dyn WorkflowService>, task_token: String, info: WorkflowInfo) -> Self {
        Self {
            info,
            task_token,
            service,
            activity_options: None,
            converter: JsonDataConverter::new(),
            activity_seq: AtomicU32::new(0),
        }
    }

    /// Get workflow information
    pub fn workflow_info(&self) -> &WorkflowInfo {
        &self.info
    }

    /// Token identifying the workflow task this context is bound to
    pub fn task_token(&self) -> &str {
        &self.task_token
    }

    /// Attach activity options to the context, consuming and returning it
    pub fn with_activity_options(mut self, options: ActivityOptions) -> Self {
        self.activity_options = Some(options);
        self
    }

    /// Currently attached activity options, if any
    pub fn activity_options(&self) -> Option<&ActivityOptions> {
        self.activity_options.as_ref()
    }

    /// Invoke an activity by its registered name and await its result.
    ///
    /// When the attached options leave the task list empty, the workflow's
    /// own task list is used.
    pub async fn execute_activity<I, O>(
        &self,
        activity_type: &str,
        input: &I,
    ) -> Result<O, WorkflowError>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let options = self.activity_options.clone().ok_or_else(|| {
            WorkflowError::Generic(
                "activity options must be attached before executing an activity".to_string(),
            )
        })?;

        let task_list = if options.task_list.is_empty() {
            self.info.task_list.clone()
        } else {
            options.task_list.clone()
        };

        let input_bytes = self
            .converter
            .encode(input)
            .map_err(|e| WorkflowError::Serialization(e.to_string()))?;

        let activity_id = self.activity_seq.fetch_add(1, Ordering::Relaxed);

        debug!(
            activity_type,
            activity_id,
            workflow_id = %self.info.workflow_execution.workflow_id,
            "scheduling activity"
        );

        let scheduled = self
            .service
            .schedule_activity_task(ScheduleActivityTaskRequest {
                domain: self.info.domain.clone(),
                workflow_execution: self.info.workflow_execution.clone(),
                activity_id: activity_id.to_string(),
                activity_type: ActivityType::new(activity_type),
                task_list: TaskList::new(task_list),
                input: Some(input_bytes),
                schedule_to_start_timeout: options.schedule_to_start_timeout,
                start_to_close_timeout: options.start_to_close_timeout,
                heartbeat_timeout: options.heartbeat_timeout,
            })
            .await?;

        let response = self
            .service
            .get_activity_task_result(GetActivityTaskResultRequest {
                task_token: scheduled.task_token,
            })
            .await?;

        let result_bytes = response.result.unwrap_or_else(|| b"null".to_vec());
        self.converter
            .decode(&result_bytes)
            .map_err(|e| WorkflowError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conveyor_core::{WorkflowExecution, WorkflowType};
    use conveyor_service::{
        LocalWorkflowService, PollForActivityTaskRequest, RespondActivityTaskCompletedRequest,
    };
    use std::time::Duration;

    fn context(service: Arc<LocalWorkflowService>) -> WorkflowContext {
        WorkflowContext::new(
            service,
            "task-token".to_string(),
            WorkflowInfo {
                workflow_execution: WorkflowExecution::new("wf", "run"),
                workflow_type: WorkflowType::new("SimpleWorkflow"),
                domain: "simple-domain".to_string(),
                task_list: "SimpleWorker".to_string(),
                start_time: chrono::Utc::now(),
                execution_start_to_close_timeout: Duration::from_secs(1),
                attempt: 1,
            },
        )
    }

    #[tokio::test]
    async fn execute_activity_requires_attached_options() {
        let service = Arc::new(LocalWorkflowService::new());
        let ctx = context(service);
        let result: Result<String, _> = ctx.execute_activity("SimpleActivity", &"x").await;
        assert!(matches!(result, Err(WorkflowError::Generic(_))));
    }

    #[tokio::test]
    async fn execute_activity_round_trips_through_the_service() {
        let service = Arc::new(LocalWorkflowService::new());
        let ctx = context(service.clone()).with_activity_options(ActivityOptions {
            task_list: String::new(),
            schedule_to_start_timeout: Duration::from_secs(1),
            start_to_close_timeout: Duration::from_secs(300),
            heartbeat_timeout: Duration::from_secs(180),
        });

        // Stand in for an activity worker on the same task list
        let worker_service = service.clone();
        let worker = tokio::spawn(async move {
            let task = worker_service
                .poll_for_activity_task(PollForActivityTaskRequest {
                    domain: "simple-domain".to_string(),
                    task_list: conveyor_core::TaskList::new("SimpleWorker"),
                    identity: "test".to_string(),
                })
                .await
                .unwrap()
                .expect("activity task");
            let input: String = serde_json::from_slice(task.input.as_deref().unwrap()).unwrap();
            let output = serde_json::to_vec(&format!("Processed: {}", input)).unwrap();
            worker_service
                .respond_activity_task_completed(RespondActivityTaskCompletedRequest {
                    task_token: task.task_token,
                    result: Some(output),
                    identity: "test".to_string(),
                })
                .await
                .unwrap();
        });

        let result: String = ctx
            .execute_activity("SimpleActivity", &"MyArgument")
            .await
            .unwrap();
        assert_eq!(result, "Processed: MyArgument");
        worker.await.unwrap();

        // The empty task list in the options fell back to the workflow's own
        let schedules = service.recorded_activity_schedules();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].task_list.name, "SimpleWorker");
        assert_eq!(schedules[0].schedule_to_start_timeout, Duration::from_secs(1));
    }
}
