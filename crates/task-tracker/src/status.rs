//! Task status as reported by the job queue.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    Success,
    Failure,
}

impl TaskStatus {
    /// Map a raw queue state onto the four tracked statuses.
    ///
    /// Unknown states count as running so polling continues.
    pub fn from_backend(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" | "RECEIVED" => TaskStatus::Pending,
            "STARTED" | "RETRY" | "RUNNING" | "PROGRESS" => TaskStatus::Running,
            "SUCCESS" => TaskStatus::Success,
            "FAILURE" | "REVOKED" => TaskStatus::Failure,
            other => {
                debug!(status = %other, "Unrecognized task status, treating as running");
                TaskStatus::Running
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failure)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_states() {
        assert_eq!(TaskStatus::from_backend("PENDING"), TaskStatus::Pending);
        assert_eq!(TaskStatus::from_backend("RECEIVED"), TaskStatus::Pending);
        assert_eq!(TaskStatus::from_backend("STARTED"), TaskStatus::Running);
        assert_eq!(TaskStatus::from_backend("RETRY"), TaskStatus::Running);
        assert_eq!(TaskStatus::from_backend("SUCCESS"), TaskStatus::Success);
        assert_eq!(TaskStatus::from_backend("FAILURE"), TaskStatus::Failure);
        assert_eq!(TaskStatus::from_backend("REVOKED"), TaskStatus::Failure);
    }

    #[test]
    fn test_case_and_unknown() {
        assert_eq!(TaskStatus::from_backend(" success "), TaskStatus::Success);
        assert_eq!(TaskStatus::from_backend("SOMETHING_NEW"), TaskStatus::Running);
    }

    #[test]
    fn test_terminal() {
        assert!(TaskStatus::Success.is_terminal());
        assert!(TaskStatus::Failure.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
    }

    #[test]
    fn test_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Running).unwrap(),
            "\"RUNNING\""
        );
    }
}
