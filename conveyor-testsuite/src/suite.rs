//! In-process workflow test environment.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use conveyor_activity::{ActivityContext, ActivityError};
use conveyor_client::{ClientOptions, StartWorkflowOptions, WorkflowClient};
use conveyor_core::{ConveyorError, ConveyorResult};
use conveyor_service::LocalWorkflowService;
use conveyor_worker::{
    ActivityRegisterOptions, Worker, WorkerHandle, WorkerOptions, WorkflowRegisterOptions,
};
use conveyor_workflow::{WorkflowContext, WorkflowError};

const TEST_DOMAIN: &str = "test-domain";
const TEST_TASK_LIST: &str = "test-task-list";
const RESULT_WAIT: Duration = Duration::from_secs(10);

/// Test environment running workflows through a real worker against the
/// in-memory service.
pub struct TestWorkflowEnvironment {
    service: Arc<LocalWorkflowService>,
    worker: Worker,
    handle: Option<WorkerHandle>,
}

impl TestWorkflowEnvironment {
    pub fn new() -> Self {
        let service =
            Arc::new(LocalWorkflowService::new().with_poll_window(Duration::from_millis(50)));
        let worker = Worker::new(
            service.clone(),
            TEST_DOMAIN,
            TEST_TASK_LIST,
            WorkerOptions::default(),
        );
        Self {
            service,
            worker,
            handle: None,
        }
    }

    /// The in-memory service behind this environment, for assertions on
    /// recorded requests.
    pub fn service(&self) -> Arc<LocalWorkflowService> {
        self.service.clone()
    }

    /// Register a workflow under an external name
    pub fn register_workflow<F, Fut, I, O>(&mut self, name: &str, workflow: F)
    where
        F: Fn(WorkflowContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, WorkflowError>> + Send + 'static,
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
    {
        self.worker.register_workflow_with_options(
            workflow,
            WorkflowRegisterOptions {
                name: name.to_string(),
            },
        );
    }

    /// Register an activity under an external name
    pub fn register_activity<F, Fut, I, O>(&mut self, name: &str, activity: F)
    where
        F: Fn(ActivityContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ActivityError>> + Send + 'static,
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
    {
        self.worker.register_activity_with_options(
            activity,
            ActivityRegisterOptions {
                name: name.to_string(),
                enable_auto_heartbeat: false,
            },
        );
    }

    /// Register an activity with registration options
    pub fn register_activity_with_options<F, Fut, I, O>(
        &mut self,
        activity: F,
        options: ActivityRegisterOptions,
    ) where
        F: Fn(ActivityContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ActivityError>> + Send + 'static,
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
    {
        self.worker.register_activity_with_options(activity, options);
    }

    /// Execute a registered workflow by name and await its typed result
    pub async fn execute_workflow<I, O>(
        &mut self,
        workflow_type: &str,
        input: &I,
    ) -> ConveyorResult<O>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        if self.handle.is_none() {
            let handle = self
                .worker
                .start()
                .map_err(|e| ConveyorError::Other(e.to_string()))?;
            self.handle = Some(handle);
        }

        let client = WorkflowClient::new(
            self.service.clone(),
            TEST_DOMAIN,
            ClientOptions::default(),
        );
        let run = client
            .execute_workflow(
                StartWorkflowOptions {
                    id: String::new(),
                    task_list: TEST_TASK_LIST.to_string(),
                    execution_start_to_close_timeout: Duration::from_secs(60),
                },
                workflow_type,
                input,
            )
            .await?;

        tokio::time::timeout(RESULT_WAIT, run.get_result())
            .await
            .map_err(|_| ConveyorError::Other("workflow result wait timed out".to_string()))?
    }

    /// Stop the environment's worker, if it was started
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.shutdown().await;
        }
    }
}

impl Default for TestWorkflowEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conveyor_core::ActivityOptions;

    #[tokio::test]
    async fn register_and_execute_workflow() {
        let mut env = TestWorkflowEnvironment::new();

        env.register_workflow("greet", |_ctx: WorkflowContext, name: String| async move {
            Ok::<_, WorkflowError>(format!("Hello, {}!", name))
        });

        let result: String = env
            .execute_workflow("greet", &"World".to_string())
            .await
            .unwrap();
        assert_eq!(result, "Hello, World!");
        env.shutdown().await;
    }

    #[tokio::test]
    async fn workflow_executes_activity() {
        let mut env = TestWorkflowEnvironment::new();

        env.register_activity("double", |_ctx: ActivityContext, n: i32| async move {
            Ok::<_, ActivityError>(n * 2)
        });

        env.register_workflow("calc", |ctx: WorkflowContext, n: i32| async move {
            let ctx = ctx.with_activity_options(ActivityOptions {
                start_to_close_timeout: Duration::from_secs(30),
                ..Default::default()
            });
            let doubled: i32 = ctx.execute_activity("double", &n).await?;
            Ok::<_, WorkflowError>(doubled)
        });

        let result: i32 = env.execute_workflow("calc", &21).await.unwrap();
        assert_eq!(result, 42);
        env.shutdown().await;
    }

    #[tokio::test]
    async fn unregistered_workflow_fails() {
        let mut env = TestWorkflowEnvironment::new();
        env.register_workflow("known", |_ctx: WorkflowContext, _: ()| async move {
            Ok::<_, WorkflowError>(())
        });

        let result: ConveyorResult<()> = env.execute_workflow("unknown", &()).await;
        assert!(result.is_err());
        env.shutdown().await;
    }
}
