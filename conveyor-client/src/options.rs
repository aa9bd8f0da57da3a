//! Client and start-workflow options.

use conveyor_core::process_identity;
use std::time::Duration;

/// Client configuration options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub identity: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            identity: process_identity("client"),
        }
    }
}

/// Options for one start-execution request
#[derive(Debug, Clone)]
pub struct StartWorkflowOptions {
    /// Workflow id; auto-generated when left empty
    pub id: String,
    /// Task list the execution is routed through
    pub task_list: String,
    /// Execution start to close timeout, forwarded to the service
    pub execution_start_to_close_timeout: Duration,
}

impl Default for StartWorkflowOptions {
    fn default() -> Self {
        Self {
            id: String::new(),
            task_list: String::new(),
            execution_start_to_close_timeout: Duration::from_secs(0),
        }
    }
}
