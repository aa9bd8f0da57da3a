//! Poll loops for workflow and activity tasks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error};

use conveyor_core::TaskList;
use conveyor_service::{PollForActivityTaskRequest, PollForWorkflowTaskRequest, WorkflowService};

use crate::handlers;
use crate::registry::WorkerRegistry;

const POLL_ERROR_BACKOFF: Duration = Duration::from_millis(200);

pub async fn workflow_poll_loop(
    service: Arc<dyn WorkflowService>,
    domain: String,
    task_list: String,
    identity: String,
    registry: Arc<WorkerRegistry>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let request = PollForWorkflowTaskRequest {
            domain: domain.clone(),
            task_list: TaskList::new(task_list.clone()),
            identity: identity.clone(),
        };

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            polled = service.poll_for_workflow_task(request) => match polled {
                Ok(Some(task)) => {
                    if let Err(e) = handlers::workflow::handle(
                        service.clone(),
                        &domain,
                        &task_list,
                        &identity,
                        &registry,
                        task,
                    )
                    .await
                    {
                        error!(error = %e, "workflow task handling failed");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "workflow task poll failed");
                    tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                }
            }
        }
    }
    debug!(task_list = %task_list, "workflow poller stopped");
}

pub async fn activity_poll_loop(
    service: Arc<dyn WorkflowService>,
    domain: String,
    task_list: String,
    identity: String,
    registry: Arc<WorkerRegistry>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let request = PollForActivityTaskRequest {
            domain: domain.clone(),
            task_list: TaskList::new(task_list.clone()),
            identity: identity.clone(),
        };

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            polled = service.poll_for_activity_task(request) => match polled {
                Ok(Some(task)) => {
                    if let Err(e) =
                        handlers::activity::handle(service.clone(), &identity, &registry, task)
                            .await
                    {
                        error!(error = %e, "activity task handling failed");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "activity task poll failed");
                    tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                }
            }
        }
    }
    debug!(task_list = %task_list, "activity poller stopped");
}
