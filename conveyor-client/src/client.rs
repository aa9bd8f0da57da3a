//! Workflow client and run handle.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::info;
use uuid::Uuid;

use conveyor_core::{
    ConveyorError, ConveyorResult, DataConverter, JsonDataConverter, TaskList, WorkflowExecution,
    WorkflowType,
};
use conveyor_service::{
    GetWorkflowExecutionResultRequest, StartWorkflowExecutionRequest, WorkflowService,
};

use crate::options::{ClientOptions, StartWorkflowOptions};

/// Client scoped to one domain on a workflow service
pub struct WorkflowClient {
    service: Arc<dyn WorkflowService>,
    domain: String,
    options: ClientOptions,
    converter: JsonDataConverter,
}

impl WorkflowClient {
    pub fn new(
        service: Arc<dyn WorkflowService>,
        domain: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        Self {
            service,
            domain: domain.into(),
            options,
            converter: JsonDataConverter::new(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Request that a new workflow execution begin.
    ///
    /// Returns as soon as the service accepts the request; it does not wait
    /// for the execution to complete.
    pub async fn start_workflow<I: Serialize>(
        &self,
        options: StartWorkflowOptions,
        workflow_type: &str,
        input: &I,
    ) -> ConveyorResult<WorkflowExecution> {
        if options.task_list.is_empty() {
            return Err(ConveyorError::InvalidArgument(
                "task list is required to start a workflow".to_string(),
            ));
        }

        let workflow_id = if options.id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            options.id.clone()
        };

        let input_bytes = self.converter.encode(input)?;

        let response = self
            .service
            .start_workflow_execution(StartWorkflowExecutionRequest {
                domain: self.domain.clone(),
                workflow_id: workflow_id.clone(),
                workflow_type: WorkflowType::new(workflow_type),
                task_list: TaskList::new(options.task_list.clone()),
                input: Some(input_bytes),
                execution_start_to_close_timeout: options.execution_start_to_close_timeout,
                identity: self.options.identity.clone(),
                request_id: Uuid::new_v4().to_string(),
            })
            .await?;

        info!(
            workflow_type,
            workflow_id = %workflow_id,
            run_id = %response.run_id,
            task_list = %options.task_list,
            "workflow execution requested"
        );

        Ok(WorkflowExecution::new(workflow_id, response.run_id))
    }

    /// Start a workflow and return a handle that can await its result
    pub async fn execute_workflow<I: Serialize>(
        &self,
        options: StartWorkflowOptions,
        workflow_type: &str,
        input: &I,
    ) -> ConveyorResult<WorkflowRun> {
        let execution = self.start_workflow(options, workflow_type, input).await?;
        Ok(WorkflowRun {
            service: self.service.clone(),
            domain: self.domain.clone(),
            execution,
        })
    }
}

/// Handle to a started workflow execution
pub struct WorkflowRun {
    service: Arc<dyn WorkflowService>,
    domain: String,
    execution: WorkflowExecution,
}

impl WorkflowRun {
    pub fn execution(&self) -> &WorkflowExecution {
        &self.execution
    }

    /// Await the execution's terminal result
    pub async fn get_result<O: DeserializeOwned>(&self) -> ConveyorResult<O> {
        let response = self
            .service
            .get_workflow_execution_result(GetWorkflowExecutionResultRequest {
                domain: self.domain.clone(),
                workflow_execution: self.execution.clone(),
            })
            .await?;

        let result_bytes = response.result.unwrap_or_else(|| b"null".to_vec());
        let converter = JsonDataConverter::new();
        Ok(converter.decode(&result_bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conveyor_service::{
        LocalWorkflowService, RespondWorkflowExecutionCompletedRequest,
    };
    use std::time::Duration;

    fn client(service: Arc<LocalWorkflowService>) -> WorkflowClient {
        WorkflowClient::new(service, "simple-domain", ClientOptions::default())
    }

    #[tokio::test]
    async fn start_workflow_requires_a_task_list() {
        let service = Arc::new(LocalWorkflowService::new());
        let client = client(service);
        let err = client
            .start_workflow(
                StartWorkflowOptions::default(),
                "SimpleWorkflow",
                &"MyArgument",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ConveyorError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn start_workflow_forwards_options_verbatim() {
        let service = Arc::new(LocalWorkflowService::new());
        let client = client(service.clone());

        let execution = client
            .start_workflow(
                StartWorkflowOptions {
                    id: String::new(),
                    task_list: "SimpleWorker".to_string(),
                    execution_start_to_close_timeout: Duration::from_secs(1),
                },
                "SimpleWorkflow",
                &"MyArgument",
            )
            .await
            .unwrap();

        assert!(!execution.workflow_id.is_empty());
        assert!(!execution.run_id.is_empty());

        let requests = service.recorded_start_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].domain, "simple-domain");
        assert_eq!(requests[0].task_list.name, "SimpleWorker");
        assert_eq!(requests[0].workflow_type.name, "SimpleWorkflow");
        assert_eq!(
            requests[0].execution_start_to_close_timeout,
            Duration::from_secs(1)
        );
        let input: String =
            serde_json::from_slice(requests[0].input.as_deref().unwrap()).unwrap();
        assert_eq!(input, "MyArgument");
    }

    #[tokio::test]
    async fn run_handle_awaits_the_result() {
        let service = Arc::new(LocalWorkflowService::new());
        let client = client(service.clone());

        let run = client
            .execute_workflow(
                StartWorkflowOptions {
                    id: "wf-run".to_string(),
                    task_list: "SimpleWorker".to_string(),
                    execution_start_to_close_timeout: Duration::from_secs(1),
                },
                "SimpleWorkflow",
                &"MyArgument",
            )
            .await
            .unwrap();

        service
            .respond_workflow_execution_completed(RespondWorkflowExecutionCompletedRequest {
                task_token: run.execution().run_id.clone(),
                result: Some(serde_json::to_vec("Processed: MyArgument").unwrap()),
                identity: "test".to_string(),
            })
            .await
            .unwrap();

        let result: String = run.get_result().await.unwrap();
        assert_eq!(result, "Processed: MyArgument");
    }
}
