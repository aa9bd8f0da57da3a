//! In-memory workflow service.
//!
//! `LocalWorkflowService` routes tasks through per-(domain, task list) queues
//! and resolves results through oneshot waiters. It exists so the client
//! contract can be exercised in-process; it owns no durable state, enforces
//! no timeouts, and performs no retries. Timeout values arriving in schedule
//! requests are recorded verbatim so tests can assert they were forwarded
//! unmodified.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot, Mutex as AsyncMutex};
use tracing::debug;
use uuid::Uuid;

use conveyor_core::{ConveyorError, ConveyorResult};

use crate::requests::*;
use crate::service::WorkflowService;

/// Terminal outcome of a workflow execution or activity task
type TaskOutcome = Result<Option<Vec<u8>>, (String, Option<Vec<u8>>)>;

struct TaskQueues {
    workflow_tx: mpsc::UnboundedSender<PollForWorkflowTaskResponse>,
    workflow_rx: AsyncMutex<mpsc::UnboundedReceiver<PollForWorkflowTaskResponse>>,
    activity_tx: mpsc::UnboundedSender<PollForActivityTaskResponse>,
    activity_rx: AsyncMutex<mpsc::UnboundedReceiver<PollForActivityTaskResponse>>,
}

impl TaskQueues {
    fn new() -> Self {
        let (workflow_tx, workflow_rx) = mpsc::unbounded_channel();
        let (activity_tx, activity_rx) = mpsc::unbounded_channel();
        Self {
            workflow_tx,
            workflow_rx: AsyncMutex::new(workflow_rx),
            activity_tx,
            activity_rx: AsyncMutex::new(activity_rx),
        }
    }
}

/// In-memory implementation of [`WorkflowService`]
pub struct LocalWorkflowService {
    queues: DashMap<(String, String), Arc<TaskQueues>>,
    workflow_waiters: DashMap<String, oneshot::Sender<TaskOutcome>>,
    workflow_results: DashMap<String, oneshot::Receiver<TaskOutcome>>,
    activity_waiters: DashMap<String, oneshot::Sender<TaskOutcome>>,
    activity_results: DashMap<String, oneshot::Receiver<TaskOutcome>>,
    /// workflow id -> run id, cleared when the execution closes
    open_executions: DashMap<String, String>,
    /// run id -> workflow id
    run_index: DashMap<String, String>,
    heartbeats: DashMap<String, Option<Vec<u8>>>,
    cancel_requested: DashMap<String, ()>,
    start_requests: Mutex<Vec<StartWorkflowExecutionRequest>>,
    activity_schedules: Mutex<Vec<ScheduleActivityTaskRequest>>,
    poll_window: Duration,
}

impl LocalWorkflowService {
    pub fn new() -> Self {
        Self {
            queues: DashMap::new(),
            workflow_waiters: DashMap::new(),
            workflow_results: DashMap::new(),
            activity_waiters: DashMap::new(),
            activity_results: DashMap::new(),
            open_executions: DashMap::new(),
            run_index: DashMap::new(),
            heartbeats: DashMap::new(),
            cancel_requested: DashMap::new(),
            start_requests: Mutex::new(Vec::new()),
            activity_schedules: Mutex::new(Vec::new()),
            poll_window: Duration::from_secs(1),
        }
    }

    /// Shorten or lengthen the long-poll window (useful in tests)
    pub fn with_poll_window(mut self, window: Duration) -> Self {
        self.poll_window = window;
        self
    }

    fn queue(&self, domain: &str, task_list: &str) -> Arc<TaskQueues> {
        self.queues
            .entry((domain.to_string(), task_list.to_string()))
            .or_insert_with(|| Arc::new(TaskQueues::new()))
            .clone()
    }

    fn close_execution(&self, run_id: &str) {
        if let Some((_, workflow_id)) = self.run_index.remove(run_id) {
            // Only clear the open marker if it still points at this run
            if self
                .open_executions
                .get(&workflow_id)
                .map(|entry| entry.value() == run_id)
                .unwrap_or(false)
            {
                self.open_executions.remove(&workflow_id);
            }
        }
    }

    /// Start requests seen so far, in arrival order
    pub fn recorded_start_requests(&self) -> Vec<StartWorkflowExecutionRequest> {
        self.start_requests.lock().expect("lock poisoned").clone()
    }

    /// Activity schedule requests seen so far, in arrival order
    pub fn recorded_activity_schedules(&self) -> Vec<ScheduleActivityTaskRequest> {
        self.activity_schedules
            .lock()
            .expect("lock poisoned")
            .clone()
    }

    /// Latest heartbeat details recorded for a running activity
    pub fn last_heartbeat(&self, task_token: &str) -> Option<Option<Vec<u8>>> {
        self.heartbeats.get(task_token).map(|d| d.value().clone())
    }

    /// Flag an activity so its next heartbeat response requests cancellation
    pub fn request_activity_cancellation(&self, task_token: &str) {
        self.cancel_requested.insert(task_token.to_string(), ());
    }
}

impl Default for LocalWorkflowService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowService for LocalWorkflowService {
    async fn start_workflow_execution(
        &self,
        request: StartWorkflowExecutionRequest,
    ) -> ConveyorResult<StartWorkflowExecutionResponse> {
        if request.domain.is_empty() {
            return Err(ConveyorError::BadRequest {
                message: "domain is required".to_string(),
            });
        }
        if request.workflow_type.name.is_empty() {
            return Err(ConveyorError::BadRequest {
                message: "workflow type is required".to_string(),
            });
        }
        if request.task_list.name.is_empty() {
            return Err(ConveyorError::BadRequest {
                message: "task list is required".to_string(),
            });
        }
        if self.open_executions.contains_key(&request.workflow_id) {
            return Err(ConveyorError::WorkflowExecutionAlreadyStarted {
                message: format!("workflow '{}' is already running", request.workflow_id),
            });
        }

        let run_id = Uuid::new_v4().to_string();
        self.start_requests
            .lock()
            .expect("lock poisoned")
            .push(request.clone());

        let (tx, rx) = oneshot::channel();
        self.workflow_waiters.insert(run_id.clone(), tx);
        self.workflow_results.insert(run_id.clone(), rx);
        self.open_executions
            .insert(request.workflow_id.clone(), run_id.clone());
        self.run_index
            .insert(run_id.clone(), request.workflow_id.clone());

        let task = PollForWorkflowTaskResponse {
            task_token: run_id.clone(),
            workflow_execution: conveyor_core::WorkflowExecution::new(
                request.workflow_id.clone(),
                run_id.clone(),
            ),
            workflow_type: request.workflow_type.clone(),
            input: request.input.clone(),
            execution_start_to_close_timeout: request.execution_start_to_close_timeout,
            attempt: 1,
            scheduled_time: chrono::Utc::now(),
        };

        let queue = self.queue(&request.domain, &request.task_list.name);
        queue
            .workflow_tx
            .send(task)
            .map_err(|_| ConveyorError::Transport("workflow task queue closed".to_string()))?;

        debug!(
            workflow_id = %request.workflow_id,
            run_id = %run_id,
            task_list = %request.task_list.name,
            "workflow execution started"
        );

        Ok(StartWorkflowExecutionResponse { run_id })
    }

    async fn get_workflow_execution_result(
        &self,
        request: GetWorkflowExecutionResultRequest,
    ) -> ConveyorResult<GetWorkflowExecutionResultResponse> {
        let run_id = &request.workflow_execution.run_id;
        let (_, rx) =
            self.workflow_results
                .remove(run_id)
                .ok_or_else(|| ConveyorError::EntityNotExists {
                    message: format!("no pending result for run '{}'", run_id),
                })?;

        let outcome = rx
            .await
            .map_err(|_| ConveyorError::Transport("result channel dropped".to_string()))?;

        match outcome {
            Ok(result) => Ok(GetWorkflowExecutionResultResponse { result }),
            Err((reason, details)) => Err(ConveyorError::WorkflowExecutionFailed { reason, details }),
        }
    }

    async fn poll_for_workflow_task(
        &self,
        request: PollForWorkflowTaskRequest,
    ) -> ConveyorResult<Option<PollForWorkflowTaskResponse>> {
        let queue = self.queue(&request.domain, &request.task_list.name);
        let mut rx = queue.workflow_rx.lock().await;
        match tokio::time::timeout(self.poll_window, rx.recv()).await {
            Ok(Some(task)) => Ok(Some(task)),
            Ok(None) => Err(ConveyorError::Transport(
                "workflow task queue closed".to_string(),
            )),
            Err(_) => Ok(None),
        }
    }

    async fn respond_workflow_execution_completed(
        &self,
        request: RespondWorkflowExecutionCompletedRequest,
    ) -> ConveyorResult<()> {
        let (_, tx) = self
            .workflow_waiters
            .remove(&request.task_token)
            .ok_or_else(|| ConveyorError::EntityNotExists {
                message: format!("unknown workflow task token '{}'", request.task_token),
            })?;
        self.close_execution(&request.task_token);
        // The trigger side may never ask for the result
        let _ = tx.send(Ok(request.result));
        Ok(())
    }

    async fn respond_workflow_execution_failed(
        &self,
        request: RespondWorkflowExecutionFailedRequest,
    ) -> ConveyorResult<()> {
        let (_, tx) = self
            .workflow_waiters
            .remove(&request.task_token)
            .ok_or_else(|| ConveyorError::EntityNotExists {
                message: format!("unknown workflow task token '{}'", request.task_token),
            })?;
        self.close_execution(&request.task_token);
        let _ = tx.send(Err((request.reason, request.details)));
        Ok(())
    }

    async fn schedule_activity_task(
        &self,
        request: ScheduleActivityTaskRequest,
    ) -> ConveyorResult<ScheduleActivityTaskResponse> {
        if request.activity_type.name.is_empty() {
            return Err(ConveyorError::BadRequest {
                message: "activity type is required".to_string(),
            });
        }
        if request.task_list.name.is_empty() {
            return Err(ConveyorError::BadRequest {
                message: "task list is required".to_string(),
            });
        }

        let task_token = Uuid::new_v4().to_string();
        self.activity_schedules
            .lock()
            .expect("lock poisoned")
            .push(request.clone());

        let (tx, rx) = oneshot::channel();
        self.activity_waiters.insert(task_token.clone(), tx);
        self.activity_results.insert(task_token.clone(), rx);

        let now = chrono::Utc::now();
        let task = PollForActivityTaskResponse {
            task_token: task_token.clone(),
            activity_id: request.activity_id.clone(),
            activity_type: request.activity_type.clone(),
            input: request.input.clone(),
            workflow_execution: request.workflow_execution.clone(),
            attempt: 1,
            scheduled_time: now,
            started_time: now,
            heartbeat_timeout: request.heartbeat_timeout,
        };

        let queue = self.queue(&request.domain, &request.task_list.name);
        queue
            .activity_tx
            .send(task)
            .map_err(|_| ConveyorError::Transport("activity task queue closed".to_string()))?;

        debug!(
            activity_type = %request.activity_type.name,
            task_list = %request.task_list.name,
            task_token = %task_token,
            "activity task scheduled"
        );

        Ok(ScheduleActivityTaskResponse { task_token })
    }

    async fn get_activity_task_result(
        &self,
        request: GetActivityTaskResultRequest,
    ) -> ConveyorResult<GetActivityTaskResultResponse> {
        let (_, rx) = self
            .activity_results
            .remove(&request.task_token)
            .ok_or_else(|| ConveyorError::EntityNotExists {
                message: format!("no pending result for activity '{}'", request.task_token),
            })?;

        let outcome = rx
            .await
            .map_err(|_| ConveyorError::Transport("result channel dropped".to_string()))?;

        match outcome {
            Ok(result) => Ok(GetActivityTaskResultResponse { result }),
            Err((reason, details)) => Err(ConveyorError::ActivityTaskFailed { reason, details }),
        }
    }

    async fn poll_for_activity_task(
        &self,
        request: PollForActivityTaskRequest,
    ) -> ConveyorResult<Option<PollForActivityTaskResponse>> {
        let queue = self.queue(&request.domain, &request.task_list.name);
        let mut rx = queue.activity_rx.lock().await;
        match tokio::time::timeout(self.poll_window, rx.recv()).await {
            Ok(Some(mut task)) => {
                task.started_time = chrono::Utc::now();
                Ok(Some(task))
            }
            Ok(None) => Err(ConveyorError::Transport(
                "activity task queue closed".to_string(),
            )),
            Err(_) => Ok(None),
        }
    }

    async fn respond_activity_task_completed(
        &self,
        request: RespondActivityTaskCompletedRequest,
    ) -> ConveyorResult<()> {
        let (_, tx) = self
            .activity_waiters
            .remove(&request.task_token)
            .ok_or_else(|| ConveyorError::EntityNotExists {
                message: format!("unknown activity task token '{}'", request.task_token),
            })?;
        self.heartbeats.remove(&request.task_token);
        self.cancel_requested.remove(&request.task_token);
        let _ = tx.send(Ok(request.result));
        Ok(())
    }

    async fn respond_activity_task_failed(
        &self,
        request: RespondActivityTaskFailedRequest,
    ) -> ConveyorResult<()> {
        let (_, tx) = self
            .activity_waiters
            .remove(&request.task_token)
            .ok_or_else(|| ConveyorError::EntityNotExists {
                message: format!("unknown activity task token '{}'", request.task_token),
            })?;
        self.heartbeats.remove(&request.task_token);
        self.cancel_requested.remove(&request.task_token);
        let _ = tx.send(Err((request.reason, request.details)));
        Ok(())
    }

    async fn record_activity_task_heartbeat(
        &self,
        request: RecordActivityTaskHeartbeatRequest,
    ) -> ConveyorResult<RecordActivityTaskHeartbeatResponse> {
        if !self.activity_waiters.contains_key(&request.task_token) {
            return Err(ConveyorError::EntityNotExists {
                message: format!("unknown activity task token '{}'", request.task_token),
            });
        }
        self.heartbeats
            .insert(request.task_token.clone(), request.details);
        Ok(RecordActivityTaskHeartbeatResponse {
            cancel_requested: self.cancel_requested.contains_key(&request.task_token),
        })
    }
}
