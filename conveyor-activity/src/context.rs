//! Activity context and error type.

use conveyor_core::ActivityInfo;
use std::sync::Arc;

/// Error type returned by activity implementations.
///
/// The close variants map onto the failure reason reported back to the
/// service. Whether a given reason is retried is a policy question the
/// orchestration platform owns; this client only classifies.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ActivityError {
    #[error("Activity execution failed: {0}")]
    ExecutionFailed(String),
    #[error("Activity panicked: {0}")]
    Panic(String),
    #[error("Retryable activity error: {0}")]
    Retryable(String),
    #[error("Non-retryable activity error: {0}")]
    NonRetryable(String),
    #[error("Activity cancelled")]
    Cancelled,
}

impl ActivityError {
    pub fn retryable(msg: impl Into<String>) -> Self {
        Self::Retryable(msg.into())
    }

    pub fn non_retryable(msg: impl Into<String>) -> Self {
        Self::NonRetryable(msg.into())
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }

    /// Failure reason string sent over the service boundary
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ExecutionFailed(_) => "ExecutionFailed",
            Self::Panic(_) => "Panic",
            Self::Retryable(_) => "Retryable",
            Self::NonRetryable(_) => "NonRetryable",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Runtime hooks the hosting worker provides to a running activity
pub trait ActivityRuntime: Send + Sync {
    /// Record a heartbeat with optional progress details
    fn record_heartbeat(&self, details: Option<Vec<u8>>);

    /// Check whether cancellation has been requested
    fn is_cancelled(&self) -> bool;
}

/// Context handed to an activity implementation
#[derive(Clone)]
pub struct ActivityContext {
    activity_info: ActivityInfo,
    runtime: Option<Arc<dyn ActivityRuntime>>,
}

impl ActivityContext {
    pub fn new(activity_info: ActivityInfo, runtime: Option<Arc<dyn ActivityRuntime>>) -> Self {
        Self {
            activity_info,
            runtime,
        }
    }

    /// Get activity information
    pub fn info(&self) -> &ActivityInfo {
        &self.activity_info
    }

    /// Record a heartbeat with optional details.
    ///
    /// A no-op when the hosting worker did not wire a runtime, e.g. in
    /// direct unit tests of an activity function.
    pub fn record_heartbeat(&self, details: Option<&[u8]>) {
        if let Some(runtime) = &self.runtime {
            runtime.record_heartbeat(details.map(|d| d.to_vec()));
        }
    }

    /// Check whether the activity has been asked to cancel
    pub fn is_cancelled(&self) -> bool {
        self.runtime
            .as_ref()
            .map(|r| r.is_cancelled())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conveyor_core::{ActivityType, WorkflowExecution};
    use std::sync::Mutex;
    use std::time::Duration;

    fn info() -> ActivityInfo {
        ActivityInfo {
            activity_id: "0".to_string(),
            activity_type: ActivityType::new("SimpleActivity"),
            task_token: "token".to_string(),
            workflow_execution: WorkflowExecution::new("wf", "run"),
            attempt: 1,
            scheduled_time: chrono::Utc::now(),
            started_time: chrono::Utc::now(),
            heartbeat_timeout: Duration::from_secs(180),
        }
    }

    struct RecordingRuntime {
        heartbeats: Mutex<Vec<Option<Vec<u8>>>>,
    }

    impl ActivityRuntime for RecordingRuntime {
        fn record_heartbeat(&self, details: Option<Vec<u8>>) {
            self.heartbeats.lock().unwrap().push(details);
        }

        fn is_cancelled(&self) -> bool {
            false
        }
    }

    #[test]
    fn heartbeats_reach_the_runtime() {
        let runtime = Arc::new(RecordingRuntime {
            heartbeats: Mutex::new(Vec::new()),
        });
        let ctx = ActivityContext::new(info(), Some(runtime.clone()));
        ctx.record_heartbeat(Some(b"25%"));
        ctx.record_heartbeat(None);
        assert_eq!(
            *runtime.heartbeats.lock().unwrap(),
            vec![Some(b"25%".to_vec()), None]
        );
    }

    #[test]
    fn context_without_runtime_is_inert() {
        let ctx = ActivityContext::new(info(), None);
        ctx.record_heartbeat(Some(b"ignored"));
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn error_reasons_are_stable() {
        assert_eq!(ActivityError::retryable("x").reason(), "Retryable");
        assert_eq!(ActivityError::non_retryable("x").reason(), "NonRetryable");
        assert!(ActivityError::retryable("x").is_retryable());
        assert!(!ActivityError::Cancelled.is_retryable());
    }
}
