//! Error types for the Conveyor client.

use std::fmt;
use thiserror::Error;

/// Timeout classes recognized by the orchestration service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutType {
    StartToClose,
    ScheduleToStart,
    ScheduleToClose,
    Heartbeat,
}

impl fmt::Display for TimeoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutType::StartToClose => write!(f, "START_TO_CLOSE"),
            TimeoutType::ScheduleToStart => write!(f, "SCHEDULE_TO_START"),
            TimeoutType::ScheduleToClose => write!(f, "SCHEDULE_TO_CLOSE"),
            TimeoutType::Heartbeat => write!(f, "HEARTBEAT"),
        }
    }
}

/// Main error type covering every failure the client surfaces
#[derive(Debug, Error)]
pub enum ConveyorError {
    #[error("EntityNotExistsError: {message}")]
    EntityNotExists { message: String },

    #[error("BadRequestError: {message}")]
    BadRequest { message: String },

    #[error("WorkflowExecutionAlreadyStartedError: {message}")]
    WorkflowExecutionAlreadyStarted { message: String },

    #[error("Workflow execution failed: {reason}, details: {details:?}")]
    WorkflowExecutionFailed {
        reason: String,
        details: Option<Vec<u8>>,
    },

    #[error("Workflow execution timed out: {0}")]
    WorkflowExecutionTimedOut(TimeoutType),

    #[error("Activity task failed: {reason}")]
    ActivityTaskFailed {
        reason: String,
        details: Option<Vec<u8>>,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

pub type ConveyorResult<T> = Result<T, ConveyorError>;

/// Helper functions to check error types
pub fn is_entity_not_exists_error(err: &ConveyorError) -> bool {
    matches!(err, ConveyorError::EntityNotExists { .. })
}

pub fn is_workflow_execution_already_started_error(err: &ConveyorError) -> bool {
    matches!(err, ConveyorError::WorkflowExecutionAlreadyStarted { .. })
}

pub fn is_workflow_execution_failed_error(err: &ConveyorError) -> bool {
    matches!(err, ConveyorError::WorkflowExecutionFailed { .. })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_type_display_matches_wire_names() {
        assert_eq!(TimeoutType::StartToClose.to_string(), "START_TO_CLOSE");
        assert_eq!(TimeoutType::Heartbeat.to_string(), "HEARTBEAT");
    }

    #[test]
    fn error_matchers() {
        let err = ConveyorError::EntityNotExists {
            message: "no such domain".to_string(),
        };
        assert!(is_entity_not_exists_error(&err));
        assert!(!is_workflow_execution_failed_error(&err));

        let err = ConveyorError::WorkflowExecutionFailed {
            reason: "activity blew up".to_string(),
            details: None,
        };
        assert!(is_workflow_execution_failed_error(&err));
    }
}
