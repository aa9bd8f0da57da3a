//! Worker lifecycle: registration, startup, and shutdown.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use conveyor_activity::{ActivityContext, ActivityError};
use conveyor_core::process_identity;
use conveyor_service::WorkflowService;
use conveyor_workflow::{WorkflowContext, WorkflowError};

use crate::pollers;
use crate::registry::{
    ActivityFn, ActivityRegisterOptions, WorkerRegistry, WorkflowFn, WorkflowRegisterOptions,
};

/// Worker errors
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Worker already started")]
    AlreadyStarted,
    #[error("No workflows or activities registered")]
    NothingRegistered,
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Worker options
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    /// Identity reported to the service
    pub identity: String,
    /// Concurrent workflow task pollers
    pub workflow_task_pollers: usize,
    /// Concurrent activity task pollers
    pub activity_task_pollers: usize,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            identity: process_identity("worker"),
            workflow_task_pollers: 2,
            activity_task_pollers: 2,
        }
    }
}

/// A worker hosting workflows and activities for one (domain, task list) pair
pub struct Worker {
    service: Arc<dyn WorkflowService>,
    domain: String,
    task_list: String,
    options: WorkerOptions,
    registry: Arc<WorkerRegistry>,
    started: AtomicBool,
}

impl Worker {
    pub fn new(
        service: Arc<dyn WorkflowService>,
        domain: impl Into<String>,
        task_list: impl Into<String>,
        options: WorkerOptions,
    ) -> Self {
        Self {
            service,
            domain: domain.into(),
            task_list: task_list.into(),
            options,
            registry: Arc::new(WorkerRegistry::new()),
            started: AtomicBool::new(false),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn task_list(&self) -> &str {
        &self.task_list
    }

    /// Register a typed workflow function under an external name
    pub fn register_workflow_with_options<F, Fut, I, O>(
        &self,
        workflow: F,
        options: WorkflowRegisterOptions,
    ) where
        F: Fn(WorkflowContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, WorkflowError>> + Send + 'static,
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
    {
        self.registry
            .register_workflow(options, Box::new(WorkflowFn::new(workflow)));
    }

    /// Register a typed activity function under an external name
    pub fn register_activity_with_options<F, Fut, I, O>(
        &self,
        activity: F,
        options: ActivityRegisterOptions,
    ) where
        F: Fn(ActivityContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ActivityError>> + Send + 'static,
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
    {
        self.registry
            .register_activity(options, Box::new(ActivityFn::new(activity)));
    }

    /// Start polling for tasks.
    ///
    /// Fails when nothing is registered or the worker is already running.
    /// The returned handle owns the poller tasks; dropping it without calling
    /// [`WorkerHandle::shutdown`] stops them on the next poll cycle.
    pub fn start(&self) -> Result<WorkerHandle, WorkerError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(WorkerError::AlreadyStarted);
        }
        if self.registry.is_empty() {
            return Err(WorkerError::NothingRegistered);
        }
        if self.options.workflow_task_pollers == 0 && self.options.activity_task_pollers == 0 {
            return Err(WorkerError::InvalidConfiguration(
                "at least one poller is required".to_string(),
            ));
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut tasks = Vec::new();

        if !self.registry.registered_workflows().is_empty() {
            for _ in 0..self.options.workflow_task_pollers {
                tasks.push(tokio::spawn(pollers::workflow_poll_loop(
                    self.service.clone(),
                    self.domain.clone(),
                    self.task_list.clone(),
                    self.options.identity.clone(),
                    self.registry.clone(),
                    shutdown_rx.clone(),
                )));
            }
        }
        if !self.registry.registered_activities().is_empty() {
            for _ in 0..self.options.activity_task_pollers {
                tasks.push(tokio::spawn(pollers::activity_poll_loop(
                    self.service.clone(),
                    self.domain.clone(),
                    self.task_list.clone(),
                    self.options.identity.clone(),
                    self.registry.clone(),
                    shutdown_rx.clone(),
                )));
            }
        }

        info!(
            domain = %self.domain,
            task_list = %self.task_list,
            workflows = ?self.registry.registered_workflows(),
            activities = ?self.registry.registered_activities(),
            "worker started"
        );

        Ok(WorkerHandle { shutdown_tx, tasks })
    }
}

/// Handle to a running worker
pub struct WorkerHandle {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Signal the pollers to stop and wait for them to drain
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            let _ = task.await;
        }
        info!("worker stopped");
    }
}
