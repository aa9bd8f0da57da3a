//! End-to-end coverage for the simple sample: worker and trigger sharing one
//! in-memory service.

use std::sync::Arc;
use std::time::Duration;

use conveyor_client::{ClientOptions, StartWorkflowOptions, WorkflowClient};
use conveyor_service::LocalWorkflowService;
use conveyor_testsuite::init_test_tracing;
use conveyor_worker::{Worker, WorkerOptions};

use simple_sample::{register_sample, SampleConfig, SIMPLE_WORKFLOW_NAME};

const RESULT_WAIT: Duration = Duration::from_secs(10);

fn start_options() -> StartWorkflowOptions {
    StartWorkflowOptions {
        id: String::new(),
        task_list: SampleConfig::default().task_list,
        execution_start_to_close_timeout: Duration::from_secs(1),
    }
}

#[tokio::test]
async fn trigger_and_worker_complete_the_workflow() {
    init_test_tracing();
    let config = SampleConfig::default();
    let service = Arc::new(LocalWorkflowService::new().with_poll_window(Duration::from_millis(50)));

    let worker = Worker::new(
        service.clone(),
        config.domain.clone(),
        config.task_list.clone(),
        WorkerOptions::default(),
    );
    register_sample(&worker);
    let handle = worker.start().unwrap();

    let client = WorkflowClient::new(service.clone(), config.domain.clone(), ClientOptions::default());
    let run = client
        .execute_workflow(start_options(), SIMPLE_WORKFLOW_NAME, &"MyArgument")
        .await
        .unwrap();

    let result: String = tokio::time::timeout(RESULT_WAIT, run.get_result())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result, "Processed: MyArgument");

    // Exactly one activity was scheduled, with the workflow's input and
    // timeouts passed through unchanged.
    let schedules = service.recorded_activity_schedules();
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0].activity_type.name, "SimpleActivity");
    assert_eq!(schedules[0].task_list.name, config.task_list);
    let input: String = serde_json::from_slice(schedules[0].input.as_deref().unwrap()).unwrap();
    assert_eq!(input, "MyArgument");
    assert_eq!(schedules[0].schedule_to_start_timeout, Duration::from_secs(1));
    assert_eq!(
        schedules[0].start_to_close_timeout,
        Duration::from_secs(5 * 60)
    );
    assert_eq!(schedules[0].heartbeat_timeout, Duration::from_secs(3 * 60));

    handle.shutdown().await;
}

#[tokio::test]
async fn trigger_returns_before_the_workflow_runs() {
    init_test_tracing();
    let config = SampleConfig::default();
    // No worker attached: the start request is accepted anyway.
    let service = Arc::new(LocalWorkflowService::new().with_poll_window(Duration::from_millis(50)));
    let client = WorkflowClient::new(service.clone(), config.domain, ClientOptions::default());

    let execution = client
        .start_workflow(start_options(), SIMPLE_WORKFLOW_NAME, &"MyArgument")
        .await
        .unwrap();

    assert!(!execution.workflow_id.is_empty());
    assert!(!execution.run_id.is_empty());
    assert!(service.recorded_activity_schedules().is_empty());
}

#[tokio::test]
async fn failing_activity_fails_the_workflow() {
    init_test_tracing();
    let config = SampleConfig::default();
    let service = Arc::new(LocalWorkflowService::new().with_poll_window(Duration::from_millis(50)));

    let worker = Worker::new(
        service.clone(),
        config.domain.clone(),
        config.task_list.clone(),
        WorkerOptions::default(),
    );
    register_sample(&worker);
    worker.register_activity_with_options(
        |_ctx: conveyor_activity::ActivityContext, _value: String| async move {
            Err::<String, _>(conveyor_activity::ActivityError::non_retryable("boom"))
        },
        conveyor_worker::ActivityRegisterOptions {
            name: "FailingActivity".to_string(),
            enable_auto_heartbeat: false,
        },
    );
    worker.register_workflow_with_options(
        |ctx: conveyor_workflow::WorkflowContext, value: String| async move {
            let ctx = ctx.with_activity_options(conveyor_core::ActivityOptions {
                task_list: String::new(),
                schedule_to_start_timeout: Duration::from_secs(1),
                start_to_close_timeout: Duration::from_secs(300),
                heartbeat_timeout: Duration::from_secs(180),
            });
            let result: String = ctx.execute_activity("FailingActivity", &value).await?;
            Ok::<_, conveyor_workflow::WorkflowError>(result)
        },
        conveyor_worker::WorkflowRegisterOptions {
            name: "FailingWorkflow".to_string(),
        },
    );
    let handle = worker.start().unwrap();

    let client = WorkflowClient::new(service.clone(), config.domain, ClientOptions::default());
    let run = client
        .execute_workflow(start_options(), "FailingWorkflow", &"MyArgument")
        .await
        .unwrap();

    let err = tokio::time::timeout(RESULT_WAIT, run.get_result::<String>())
        .await
        .unwrap()
        .unwrap_err();
    assert!(conveyor_core::error::is_workflow_execution_failed_error(
        &err
    ));

    handle.shutdown().await;
}
