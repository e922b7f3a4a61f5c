//! Tracker notifications.

use crate::status::TaskStatus;
use api_client::models::{Comment, DashboardStats};
use serde::Serialize;
use serde_json::Value;

/// How a tracked task ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The backend reported SUCCESS or FAILURE.
    Finished {
        task_id: String,
        status: TaskStatus,
        result: Option<Value>,
    },
    /// The poll budget ran out first.
    Abandoned { task_id: String, polls: u32 },
    /// A poll was refused with 401 after the client gave up on the session.
    SessionLost { task_id: String, polls: u32 },
}

impl TaskOutcome {
    pub fn task_id(&self) -> &str {
        match self {
            TaskOutcome::Finished { task_id, .. }
            | TaskOutcome::Abandoned { task_id, .. }
            | TaskOutcome::SessionLost { task_id, .. } => task_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            TaskOutcome::Finished {
                status: TaskStatus::Success,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    Finished {
        integration_id: String,
        task_id: String,
        status: TaskStatus,
        result: Option<Value>,
    },
    Abandoned {
        integration_id: String,
        task_id: String,
        polls: u32,
    },
    SessionLost {
        integration_id: String,
        task_id: String,
        polls: u32,
    },
    /// Dashboard counters reloaded after a task finished.
    SummaryRefreshed(DashboardStats),
    /// Newest comments reloaded after a task finished.
    RecentCommentsRefreshed(Vec<Comment>),
}

impl TrackerEvent {
    pub(crate) fn from_outcome(integration_id: &str, outcome: &TaskOutcome) -> Self {
        match outcome.clone() {
            TaskOutcome::Finished {
                task_id,
                status,
                result,
            } => TrackerEvent::Finished {
                integration_id: integration_id.to_string(),
                task_id,
                status,
                result,
            },
            TaskOutcome::Abandoned { task_id, polls } => TrackerEvent::Abandoned {
                integration_id: integration_id.to_string(),
                task_id,
                polls,
            },
            TaskOutcome::SessionLost { task_id, polls } => TrackerEvent::SessionLost {
                integration_id: integration_id.to_string(),
                task_id,
                polls,
            },
        }
    }
}
