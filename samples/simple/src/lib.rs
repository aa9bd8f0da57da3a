//! Minimal two-step workflow sample.
//!
//! `simple_workflow` invokes `simple_activity` once and logs the result; the
//! activity prefixes its input with `"Processed: "`. Both are registered
//! under fixed external names so a trigger request can find them.

use std::time::Duration;

use tracing::info;

use conveyor_activity::{ActivityContext, ActivityError};
use conveyor_core::ActivityOptions;
use conveyor_worker::{ActivityRegisterOptions, Worker, WorkflowRegisterOptions};
use conveyor_workflow::{WorkflowContext, WorkflowError};

/// External name the workflow is registered and triggered under
pub const SIMPLE_WORKFLOW_NAME: &str = "SimpleWorkflow";
/// External name the activity is invoked under
pub const SIMPLE_ACTIVITY_NAME: &str = "SimpleActivity";

/// Immutable configuration shared by the worker and trigger runners.
///
/// The domain and task list must match between registration and trigger
/// requests or the service never routes the work to this worker.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub domain: String,
    pub task_list: String,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            domain: "simple-domain".to_string(),
            task_list: "SimpleWorker".to_string(),
        }
    }
}

/// Orchestration logic: call the activity, await its result, log it.
pub async fn simple_workflow(ctx: WorkflowContext, value: String) -> Result<String, WorkflowError> {
    let task_list = ctx.workflow_info().task_list.clone();
    let ctx = ctx.with_activity_options(ActivityOptions {
        task_list,
        schedule_to_start_timeout: Duration::from_secs(1),
        start_to_close_timeout: Duration::from_secs(5 * 60),
        heartbeat_timeout: Duration::from_secs(3 * 60),
    });

    let result: String = ctx.execute_activity(SIMPLE_ACTIVITY_NAME, &value).await?;
    info!(result = %result, "Done");
    Ok(result)
}

/// The unit of actual work: prefix the input. This is where real business
/// logic would go.
pub async fn simple_activity(
    _ctx: ActivityContext,
    value: String,
) -> Result<String, ActivityError> {
    info!(value = %value, "SimpleActivity");
    Ok(format!("Processed: {}", value))
}

/// Register the sample workflow and activity on a worker
pub fn register_sample(worker: &Worker) {
    worker.register_workflow_with_options(
        simple_workflow,
        WorkflowRegisterOptions {
            name: SIMPLE_WORKFLOW_NAME.to_string(),
        },
    );
    worker.register_activity_with_options(
        simple_activity,
        ActivityRegisterOptions {
            name: SIMPLE_ACTIVITY_NAME.to_string(),
            enable_auto_heartbeat: true,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use conveyor_core::{ActivityInfo, ActivityType, WorkflowExecution};

    fn inert_context() -> ActivityContext {
        ActivityContext::new(
            ActivityInfo {
                activity_id: "0".to_string(),
                activity_type: ActivityType::new(SIMPLE_ACTIVITY_NAME),
                task_token: "token".to_string(),
                workflow_execution: WorkflowExecution::new("wf", "run"),
                attempt: 1,
                scheduled_time: chrono::Utc::now(),
                started_time: chrono::Utc::now(),
                heartbeat_timeout: Duration::from_secs(180),
            },
            None,
        )
    }

    #[tokio::test]
    async fn activity_prefixes_its_input() {
        let result = simple_activity(inert_context(), "MyArgument".to_string())
            .await
            .unwrap();
        assert_eq!(result, "Processed: MyArgument");
    }

    #[tokio::test]
    async fn activity_never_fails_on_empty_input() {
        let result = simple_activity(inert_context(), String::new()).await;
        assert_eq!(result.unwrap(), "Processed: ");
    }

    #[test]
    fn config_defaults_match_registration_constants() {
        let config = SampleConfig::default();
        assert_eq!(config.domain, "simple-domain");
        assert_eq!(config.task_list, "SimpleWorker");
    }
}
