//! Workflow task handler.

use std::sync::Arc;

use tracing::{error, info, warn};

use conveyor_core::{ConveyorResult, WorkflowInfo};
use conveyor_service::{
    PollForWorkflowTaskResponse, RespondWorkflowExecutionCompletedRequest,
    RespondWorkflowExecutionFailedRequest, WorkflowService,
};
use conveyor_workflow::WorkflowContext;

use crate::registry::WorkerRegistry;

/// Run one workflow task to completion and report the outcome
pub async fn handle(
    service: Arc<dyn WorkflowService>,
    domain: &str,
    task_list: &str,
    identity: &str,
    registry: &WorkerRegistry,
    task: PollForWorkflowTaskResponse,
) -> ConveyorResult<()> {
    let workflow_type = task.workflow_type.name.clone();

    let Some(workflow) = registry.get_workflow(&workflow_type) else {
        warn!(workflow_type = %workflow_type, "workflow not registered");
        service
            .respond_workflow_execution_failed(RespondWorkflowExecutionFailedRequest {
                task_token: task.task_token,
                reason: format!("workflow '{}' not registered", workflow_type),
                details: None,
                identity: identity.to_string(),
            })
            .await?;
        return Ok(());
    };

    let info = WorkflowInfo {
        workflow_execution: task.workflow_execution.clone(),
        workflow_type: task.workflow_type.clone(),
        domain: domain.to_string(),
        task_list: task_list.to_string(),
        start_time: task.scheduled_time,
        execution_start_to_close_timeout: task.execution_start_to_close_timeout,
        attempt: task.attempt,
    };
    let ctx = WorkflowContext::new(service.clone(), task.task_token.clone(), info);

    // Spawned so a panicking workflow takes down the task, not the poller
    let outcome = tokio::spawn(workflow.execute(ctx, task.input.clone())).await;

    match outcome {
        Ok(Ok(result)) => {
            info!(
                workflow_type = %workflow_type,
                workflow_id = %task.workflow_execution.workflow_id,
                "workflow completed"
            );
            service
                .respond_workflow_execution_completed(RespondWorkflowExecutionCompletedRequest {
                    task_token: task.task_token,
                    result,
                    identity: identity.to_string(),
                })
                .await?;
        }
        Ok(Err(e)) => {
            error!(
                workflow_type = %workflow_type,
                workflow_id = %task.workflow_execution.workflow_id,
                error = %e,
                "workflow failed"
            );
            service
                .respond_workflow_execution_failed(RespondWorkflowExecutionFailedRequest {
                    task_token: task.task_token,
                    reason: e.to_string(),
                    details: None,
                    identity: identity.to_string(),
                })
                .await?;
        }
        Err(join_error) => {
            error!(
                workflow_type = %workflow_type,
                error = %join_error,
                "workflow panicked"
            );
            service
                .respond_workflow_execution_failed(RespondWorkflowExecutionFailedRequest {
                    task_token: task.task_token,
                    reason: format!("workflow panicked: {}", join_error),
                    details: None,
                    identity: identity.to_string(),
                })
                .await?;
        }
    }

    Ok(())
}
