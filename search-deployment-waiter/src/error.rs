//! Error types for waiting on search deployment state transitions

use crate::atlas::FetchError;
use crate::types::DeploymentState;
use std::time::Duration;
use thiserror::Error;

/// Terminal failure of a wait. Transient fetch errors never surface here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WaitError {
    /// The remote reported an empty, unknown or unrecognized state
    #[error("unexpected search deployment state '{state}', expected one of {expected:?}")]
    UnexpectedState {
        state: String,
        expected: Vec<String>,
    },

    /// Fatal response or transport failure from the status fetcher
    #[error("failed to fetch search deployment: {0}")]
    Remote(FetchError),

    /// The deployment does not exist while waiting for it to become ready
    #[error("search deployment does not exist: {0}")]
    ResourceAbsent(FetchError),

    /// Deadline passed while the deployment was still transitioning
    #[error(
        "timed out after {timeout:?} waiting for search deployment ({attempts} attempts, last state: {})",
        last_state_label(.last_state)
    )]
    Timeout {
        timeout: Duration,
        attempts: u32,
        last_state: Option<String>,
    },

    /// The caller cancelled the wait
    #[error("wait for search deployment was cancelled")]
    Cancelled,

    /// Retry configuration violates its invariants
    #[error("invalid retry configuration: {0}")]
    InvalidConfig(String),
}

pub type WaitResult<T> = Result<T, WaitError>;

impl WaitError {
    /// Create an unexpected state error for the given state and the states the waiter accepts
    pub fn unexpected_state(state: &DeploymentState, expected: &[&str]) -> Self {
        Self::UnexpectedState {
            state: state.to_string(),
            expected: expected.iter().map(ToString::to_string).collect(),
        }
    }

    /// Create an invalid configuration error with the given message
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

fn last_state_label(last_state: &Option<String>) -> &str {
    match last_state.as_deref() {
        None => "none",
        Some("") => "<unknown>",
        Some(state) => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_reports_last_state() {
        let err = WaitError::Timeout {
            timeout: Duration::from_secs(5),
            attempts: 4,
            last_state: Some("UPDATING".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("5s"), "message was: {msg}");
        assert!(msg.contains("4 attempts"));
        assert!(msg.contains("last state: UPDATING"));

        let err = WaitError::Timeout {
            timeout: Duration::from_secs(5),
            attempts: 1,
            last_state: None,
        };
        assert!(err.to_string().contains("last state: none"));
    }

    #[test]
    fn test_unexpected_state_message() {
        let err = WaitError::unexpected_state(&DeploymentState::Unknown, &["IDLE", "UPDATING"]);
        match &err {
            WaitError::UnexpectedState { state, expected } => {
                assert_eq!(state, "<unknown>");
                assert_eq!(expected, &vec!["IDLE".to_string(), "UPDATING".to_string()]);
            }
            _ => panic!("Expected UnexpectedState variant"),
        }
        assert!(err.to_string().contains("<unknown>"));
    }

    #[test]
    fn test_remote_error_message_includes_fetch_error() {
        let err = WaitError::Remote(FetchError::api(500, "Internal server error"));
        assert_eq!(
            err.to_string(),
            "failed to fetch search deployment: HTTP 500: Internal server error"
        );
    }
}
