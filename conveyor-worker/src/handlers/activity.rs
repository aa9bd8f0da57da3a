//! Activity task handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{error, info, warn};

use conveyor_activity::{ActivityContext, ActivityError, ActivityRuntime};
use conveyor_core::{ActivityInfo, ConveyorResult};
use conveyor_service::{
    PollForActivityTaskResponse, RespondActivityTaskCompletedRequest,
    RespondActivityTaskFailedRequest, WorkflowService,
};

use crate::heartbeat::start_heartbeat_loop;
use crate::registry::WorkerRegistry;

/// Runtime wiring heartbeats and cancellation into the hosting worker
struct WorkerActivityRuntime {
    heartbeat_details: Arc<Mutex<Option<Vec<u8>>>>,
    cancelled: Arc<AtomicBool>,
}

impl ActivityRuntime for WorkerActivityRuntime {
    fn record_heartbeat(&self, details: Option<Vec<u8>>) {
        *self.heartbeat_details.lock().expect("lock poisoned") = details;
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Run one activity task and report the outcome
pub async fn handle(
    service: Arc<dyn WorkflowService>,
    identity: &str,
    registry: &WorkerRegistry,
    task: PollForActivityTaskResponse,
) -> ConveyorResult<()> {
    let activity_type = task.activity_type.name.clone();

    let Some(registered) = registry.get_activity(&activity_type) else {
        warn!(activity_type = %activity_type, "activity not registered");
        service
            .respond_activity_task_failed(RespondActivityTaskFailedRequest {
                task_token: task.task_token,
                reason: format!("activity '{}' not registered", activity_type),
                details: None,
                identity: identity.to_string(),
            })
            .await?;
        return Ok(());
    };

    let heartbeat_details = Arc::new(Mutex::new(None));
    let cancelled = Arc::new(AtomicBool::new(false));
    let runtime = Arc::new(WorkerActivityRuntime {
        heartbeat_details: heartbeat_details.clone(),
        cancelled: cancelled.clone(),
    });

    let activity_info = ActivityInfo {
        activity_id: task.activity_id.clone(),
        activity_type: task.activity_type.clone(),
        task_token: task.task_token.clone(),
        workflow_execution: task.workflow_execution.clone(),
        attempt: task.attempt,
        scheduled_time: task.scheduled_time,
        started_time: task.started_time,
        heartbeat_timeout: task.heartbeat_timeout,
    };
    let ctx = ActivityContext::new(activity_info, Some(runtime));

    let (stop_heartbeat_tx, stop_heartbeat_rx) = oneshot::channel();
    let heartbeat_handle =
        if registered.auto_heartbeat && task.heartbeat_timeout > Duration::from_secs(0) {
            Some(start_heartbeat_loop(
                service.clone(),
                task.task_token.clone(),
                task.heartbeat_timeout,
                identity.to_string(),
                heartbeat_details,
                cancelled,
                stop_heartbeat_rx,
            ))
        } else {
            None
        };

    info!(activity_type = %activity_type, activity_id = %task.activity_id, "executing activity");

    // Spawned so a panicking activity takes down the task, not the poller
    let outcome = tokio::spawn(registered.activity.execute(ctx, task.input.clone())).await;

    let _ = stop_heartbeat_tx.send(());
    if let Some(handle) = heartbeat_handle {
        let _ = handle.await;
    }

    let result = match outcome {
        Ok(result) => result,
        Err(join_error) => Err(ActivityError::Panic(join_error.to_string())),
    };

    match result {
        Ok(output) => {
            info!(activity_type = %activity_type, "activity completed");
            service
                .respond_activity_task_completed(RespondActivityTaskCompletedRequest {
                    task_token: task.task_token,
                    result: output,
                    identity: identity.to_string(),
                })
                .await?;
        }
        Err(e) => {
            error!(activity_type = %activity_type, error = %e, "activity failed");
            service
                .respond_activity_task_failed(RespondActivityTaskFailedRequest {
                    task_token: task.task_token,
                    reason: e.reason().to_string(),
                    details: Some(e.to_string().into_bytes()),
                    identity: identity.to_string(),
                })
                .await?;
        }
    }

    Ok(())
}
