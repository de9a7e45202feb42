//! # Task Monitor
//!
//! Pulp runs imports and distributions as asynchronous tasks. This module
//! only observes them; it never changes a task's state and keeps no local
//! registry, so every query re-reads the task from the server.
//!
//! ## Lifecycle
//!
//! ```text
//! waiting ──► running ──► completed | failed | canceled
//!    │           │
//!    │           └──► canceling ──► canceled
//!    └──► skipped
//! ```
//!
//! ## Polling
//!
//! No poll loop, delay or cancellation is provided. Callers loop over
//! [`TaskClient::poll`] with their own timing. [`TaskClient::waiting_or_running`]
//! exists for simple loops that do not care about query failures.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::PulpBackend;
use crate::error::PulpError;
use crate::types::{PulpTask, TaskHref};

/// State of a Pulp task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Waiting,
    Skipped,
    Running,
    Completed,
    Failed,
    Canceled,
    Canceling,
}

impl TaskState {
    /// Every state, in lifecycle order.
    pub const ALL: [TaskState; 7] = [
        Self::Waiting,
        Self::Skipped,
        Self::Running,
        Self::Completed,
        Self::Failed,
        Self::Canceled,
        Self::Canceling,
    ];

    /// The state string used by the Pulp API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Skipped => "skipped",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Canceling => "canceling",
        }
    }

    pub fn is_waiting_or_running(&self) -> bool {
        matches!(self, Self::Waiting | Self::Running)
    }

    /// Whether the task can no longer change state.
    ///
    /// `canceling` is transient and therefore not terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Skipped | Self::Completed | Self::Failed | Self::Canceled
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown state string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task state {0:?}")]
pub struct UnknownTaskState(pub String);

impl FromStr for TaskState {
    type Err = UnknownTaskState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownTaskState(s.to_string()))
    }
}

/// Outcome of a single task query.
///
/// Unlike [`TaskClient::waiting_or_running`], a failed query is kept apart
/// from a finished task.
#[derive(Debug)]
pub enum TaskPoll {
    /// `waiting` or `running`.
    InProgress(TaskState),
    /// Any state other than `waiting`/`running`, including `canceling`.
    Finished(TaskState),
    /// The state could not be determined.
    QueryFailed(PulpError),
}

impl TaskPoll {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress(_))
    }
}

/// Client for observing Pulp tasks.
#[derive(Debug, Clone)]
pub struct TaskClient {
    backend: Arc<dyn PulpBackend>,
}

impl TaskClient {
    pub(crate) fn new(backend: Arc<dyn PulpBackend>) -> Self {
        Self { backend }
    }

    /// Fetch the full task record.
    pub async fn get(&self, task: &TaskHref) -> Result<PulpTask, PulpError> {
        self.backend
            .read_task(task)
            .await
            .map_err(|e| PulpError::remote(format!("read task {task}"), e))
    }

    /// Current state of `task`.
    ///
    /// A missing or empty state is rejected with [`PulpError::EmptyState`],
    /// an unknown one with [`PulpError::UnrecognizedState`].
    pub async fn state(&self, task: &TaskHref) -> Result<TaskState, PulpError> {
        let record = self.get(task).await?;
        let state = record.state.unwrap_or_default();
        if state.is_empty() {
            return Err(PulpError::EmptyState {
                task: task.to_string(),
            });
        }
        state.parse().map_err(|UnknownTaskState(state)| PulpError::UnrecognizedState {
            task: task.to_string(),
            state,
        })
    }

    /// Query `task` once and classify the result.
    pub async fn poll(&self, task: &TaskHref) -> TaskPoll {
        match self.state(task).await {
            Ok(state) if state.is_waiting_or_running() => TaskPoll::InProgress(state),
            Ok(state) => TaskPoll::Finished(state),
            Err(e) => TaskPoll::QueryFailed(e),
        }
    }

    /// `true` while `task` is waiting or running.
    ///
    /// Any error while querying the state is logged and reported as `false`,
    /// so a transient network failure looks exactly like a finished task.
    /// Use [`TaskClient::poll`] or [`TaskClient::state`] when that
    /// difference matters.
    pub async fn waiting_or_running(&self, task: &TaskHref) -> bool {
        match self.state(task).await {
            Ok(state) => state.is_waiting_or_running(),
            Err(e) => {
                tracing::error!(task = %task, error = %e, "failed to get task state");
                false
            }
        }
    }
}
