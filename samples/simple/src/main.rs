//! Command-line entry point for the simple sample.
//!
//! `simple -m worker` hosts the workflow and activity until interrupted;
//! `simple -m trigger` requests one execution of `SimpleWorkflow` and prints
//! the assigned run id.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use conveyor_client::{ClientOptions, StartWorkflowOptions, WorkflowClient};
use conveyor_service::{LocalWorkflowService, WorkflowService};
use conveyor_testsuite::init_tracing;
use conveyor_worker::{Worker, WorkerOptions};

use simple_sample::{register_sample, SampleConfig, SIMPLE_WORKFLOW_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Host the workflow and activity
    Worker,
    /// Request one workflow execution
    Trigger,
}

#[derive(Debug, Parser)]
#[command(name = "simple", about = "Run the simple workflow sample")]
struct Cli {
    /// Mode to run in
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = Mode::Worker)]
    mode: Mode,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = SampleConfig::default();
    let service: Arc<dyn WorkflowService> = Arc::new(LocalWorkflowService::new());

    match cli.mode {
        Mode::Worker => match run_worker(service, &config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "worker failed");
                ExitCode::from(3)
            }
        },
        Mode::Trigger => match run_trigger(service, &config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "trigger failed");
                ExitCode::from(4)
            }
        },
    }
}

/// Host the sample workflow and activity until Ctrl-C
async fn run_worker(service: Arc<dyn WorkflowService>, config: &SampleConfig) -> anyhow::Result<()> {
    let worker = Worker::new(
        service,
        config.domain.clone(),
        config.task_list.clone(),
        WorkerOptions::default(),
    );
    register_sample(&worker);
    let handle = worker.start()?;

    info!(
        domain = %config.domain,
        task_list = %config.task_list,
        "worker running, press Ctrl-C to stop"
    );
    tokio::signal::ctrl_c().await?;

    info!("shutting down");
    handle.shutdown().await;
    Ok(())
}

/// Request a single execution of the sample workflow
async fn run_trigger(
    service: Arc<dyn WorkflowService>,
    config: &SampleConfig,
) -> anyhow::Result<()> {
    let client = WorkflowClient::new(service, config.domain.clone(), ClientOptions::default());

    let execution = client
        .start_workflow(
            StartWorkflowOptions {
                id: String::new(),
                task_list: config.task_list.clone(),
                execution_start_to_close_timeout: Duration::from_secs(1),
            },
            SIMPLE_WORKFLOW_NAME,
            &"MyArgument",
        )
        .await?;

    info!(
        workflow_id = %execution.workflow_id,
        run_id = %execution.run_id,
        "workflow started"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_worker() {
        let cli = Cli::try_parse_from(["simple"]).unwrap();
        assert_eq!(cli.mode, Mode::Worker);
    }

    #[test]
    fn trigger_mode_parses() {
        let cli = Cli::try_parse_from(["simple", "-m", "trigger"]).unwrap();
        assert_eq!(cli.mode, Mode::Trigger);
        let cli = Cli::try_parse_from(["simple", "--mode", "worker"]).unwrap();
        assert_eq!(cli.mode, Mode::Worker);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["simple", "-m", "banana"]).is_err());
    }
}
