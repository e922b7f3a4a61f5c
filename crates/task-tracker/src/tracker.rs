//! Polling loop for background agent runs.

use crate::config::TrackerConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::events::{TaskOutcome, TrackerEvent};
use crate::status::TaskStatus;
use crate::task_fsm::{TaskMachine, TaskMachineInput};
use api_client::models::{AgentStopResponse, CommentFilter};
use api_client::ApiClient;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;
/// Comments reloaded alongside the counters when a task finishes.
const RECENT_COMMENTS: u32 = 10;

/// Snapshot of one tracked task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedTask {
    pub integration_id: String,
    pub task_id: String,
    pub status: TaskStatus,
    pub polls: u32,
}

struct Entry {
    task: TrackedTask,
    outcome: watch::Sender<Option<TaskOutcome>>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Registry {
    tasks: HashMap<String, Entry>,
    // Integrations whose run request is still in flight.
    submitting: HashSet<String>,
}

struct Inner {
    client: Arc<ApiClient>,
    config: TrackerConfig,
    registry: Mutex<Registry>,
    events: broadcast::Sender<TrackerEvent>,
}

/// Launches agent runs and polls them until they finish.
///
/// Cheap to clone; clones share the tracked set.
#[derive(Clone)]
pub struct TaskTracker {
    inner: Arc<Inner>,
}

impl TaskTracker {
    pub fn new(client: Arc<ApiClient>, config: TrackerConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                client,
                config,
                registry: Mutex::new(Registry::default()),
                events,
            }),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.inner.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.inner.events.subscribe()
    }

    /// Start the agent for an integration and track the resulting task.
    ///
    /// Returns the backend task id. The first status poll happens one
    /// interval later.
    pub async fn run(&self, integration_id: &str) -> TrackerResult<String> {
        {
            let mut registry = self.inner.registry.lock();
            if registry.tasks.contains_key(integration_id)
                || !registry.submitting.insert(integration_id.to_string())
            {
                return Err(TrackerError::AlreadyTracked(integration_id.to_string()));
            }
        }

        let submitted = self.inner.client.agents().run(integration_id).await;

        let mut registry = self.inner.registry.lock();
        registry.submitting.remove(integration_id);
        let run = submitted?;

        info!(
            integration_id = %integration_id,
            task_id = %run.task_id,
            "Agent run submitted"
        );

        let (outcome, _) = watch::channel(None);
        let handle = tokio::spawn(poll_loop(
            self.inner.clone(),
            integration_id.to_string(),
            run.task_id.clone(),
        ));
        registry.tasks.insert(
            integration_id.to_string(),
            Entry {
                task: TrackedTask {
                    integration_id: integration_id.to_string(),
                    task_id: run.task_id.clone(),
                    status: TaskStatus::Pending,
                    polls: 0,
                },
                outcome,
                handle: Some(handle),
            },
        );

        Ok(run.task_id)
    }

    /// Ask the backend to revoke the integration's running task.
    ///
    /// Tracking ends once a later poll reports the revocation.
    pub async fn stop(&self, integration_id: &str) -> TrackerResult<AgentStopResponse> {
        let task_id = self
            .task_id(integration_id)
            .ok_or_else(|| TrackerError::NotTracked(integration_id.to_string()))?;

        let response = self.inner.client.agents().stop(&task_id).await?;
        info!(integration_id = %integration_id, task_id = %task_id, "Stop requested");
        Ok(response)
    }

    /// Tracked tasks ordered by integration id.
    pub fn tracked(&self) -> Vec<TrackedTask> {
        let registry = self.inner.registry.lock();
        let mut tasks: Vec<TrackedTask> =
            registry.tasks.values().map(|e| e.task.clone()).collect();
        tasks.sort_by(|a, b| a.integration_id.cmp(&b.integration_id));
        tasks
    }

    pub fn is_tracked(&self, integration_id: &str) -> bool {
        self.inner.registry.lock().tasks.contains_key(integration_id)
    }

    pub fn status(&self, integration_id: &str) -> Option<TaskStatus> {
        self.inner
            .registry
            .lock()
            .tasks
            .get(integration_id)
            .map(|e| e.task.status)
    }

    fn task_id(&self, integration_id: &str) -> Option<String> {
        self.inner
            .registry
            .lock()
            .tasks
            .get(integration_id)
            .map(|e| e.task.task_id.clone())
    }

    /// Wait until the integration's current task ends.
    pub async fn wait_for(&self, integration_id: &str) -> TrackerResult<TaskOutcome> {
        let mut outcome = self
            .inner
            .registry
            .lock()
            .tasks
            .get(integration_id)
            .map(|e| e.outcome.subscribe())
            .ok_or_else(|| TrackerError::NotTracked(integration_id.to_string()))?;

        let done = outcome
            .wait_for(Option::is_some)
            .await
            .map_err(|_| TrackerError::NotTracked(integration_id.to_string()))?;

        (*done)
            .clone()
            .ok_or_else(|| TrackerError::NotTracked(integration_id.to_string()))
    }

    /// Abort every poll loop and forget all tasks. Backend jobs keep running.
    pub fn shutdown(&self) {
        let mut registry = self.inner.registry.lock();
        for (integration_id, mut entry) in registry.tasks.drain() {
            if let Some(handle) = entry.handle.take() {
                handle.abort();
            }
            debug!(integration_id = %integration_id, "Stopped tracking");
        }
    }
}

impl Inner {
    fn record_poll(&self, integration_id: &str, status: Option<TaskStatus>, polls: u32) {
        if let Some(entry) = self.registry.lock().tasks.get_mut(integration_id) {
            entry.task.polls = polls;
            if let Some(status) = status {
                entry.task.status = status;
            }
        }
    }

    /// Remove the task, publish its outcome and notify subscribers.
    fn complete(&self, integration_id: &str, outcome: TaskOutcome) {
        if let Some(entry) = self.registry.lock().tasks.remove(integration_id) {
            entry.outcome.send_replace(Some(outcome.clone()));
        }
        let _ = self
            .events
            .send(TrackerEvent::from_outcome(integration_id, &outcome));
    }

    async fn refresh_summary(&self) {
        let comments = self.client.comments();
        match comments.stats().await {
            Ok(stats) => {
                let _ = self.events.send(TrackerEvent::SummaryRefreshed(stats));
            }
            Err(e) => warn!(error = %e, "Failed to refresh dashboard stats"),
        }
        match comments.list(&CommentFilter::latest(RECENT_COMMENTS)).await {
            Ok(recent) => {
                let _ = self.events.send(TrackerEvent::RecentCommentsRefreshed(recent));
            }
            Err(e) => warn!(error = %e, "Failed to refresh recent comments"),
        }
    }
}

fn advance(machine: &mut TaskMachine, input: TaskMachineInput, task_id: &str) {
    if machine.consume(&input).is_err() {
        warn!(
            task_id = %task_id,
            state = ?machine.state(),
            "Ignored invalid task transition"
        );
    }
}

async fn poll_loop(inner: Arc<Inner>, integration_id: String, task_id: String) {
    let mut machine = TaskMachine::new();
    let mut polls: u32 = 0;

    loop {
        tokio::time::sleep(inner.config.poll_interval).await;
        polls += 1;
        advance(&mut machine, TaskMachineInput::Poll, &task_id);

        match inner.client.agents().status(&task_id).await {
            Ok(response) => {
                let status = TaskStatus::from_backend(&response.status);
                debug!(
                    task_id = %task_id,
                    raw_status = %response.status,
                    status = %status,
                    polls,
                    "Polled task"
                );
                inner.record_poll(&integration_id, Some(status), polls);

                if status.is_terminal() {
                    let input = if status == TaskStatus::Success {
                        TaskMachineInput::Succeed
                    } else {
                        TaskMachineInput::Fail
                    };
                    advance(&mut machine, input, &task_id);
                    info!(
                        integration_id = %integration_id,
                        task_id = %task_id,
                        status = %status,
                        polls,
                        "Task finished"
                    );
                    inner.complete(
                        &integration_id,
                        TaskOutcome::Finished {
                            task_id: task_id.clone(),
                            status,
                            result: response.result,
                        },
                    );
                    inner.refresh_summary().await;
                    return;
                }
            }
            // The client already tried a refresh and ended the session.
            Err(e) if e.is_unauthorized() => {
                advance(&mut machine, TaskMachineInput::LoseSession, &task_id);
                warn!(
                    integration_id = %integration_id,
                    task_id = %task_id,
                    polls,
                    "Session ended while polling, stopping"
                );
                inner.record_poll(&integration_id, None, polls);
                inner.complete(
                    &integration_id,
                    TaskOutcome::SessionLost {
                        task_id: task_id.clone(),
                        polls,
                    },
                );
                return;
            }
            Err(e) => {
                warn!(task_id = %task_id, polls, error = %e, "Task status poll failed");
                inner.record_poll(&integration_id, None, polls);
            }
        }

        if polls >= inner.config.max_polls {
            advance(&mut machine, TaskMachineInput::Exhaust, &task_id);
            warn!(
                integration_id = %integration_id,
                task_id = %task_id,
                polls,
                "Giving up on task"
            );
            inner.complete(
                &integration_id,
                TaskOutcome::Abandoned {
                    task_id: task_id.clone(),
                    polls,
                },
            );
            return;
        }
    }
}
