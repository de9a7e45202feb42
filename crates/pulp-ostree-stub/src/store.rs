//! In-memory storage backend using DashMap.
//!
//! Each resource type (artifacts, ostree repositories, ostree
//! distributions, tasks) gets its own `DashMap<Uuid, Record>`. Unique
//! fields (artifact digest, repository name, distribution name and base
//! path) are claimed through separate index maps so that concurrent
//! creations cannot both succeed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

pub const API_ROOT: &str = "/pulp/api/v3";

pub fn artifact_href(id: Uuid) -> String {
    format!("{API_ROOT}/artifacts/{id}/")
}

pub fn repository_href(id: Uuid) -> String {
    format!("{API_ROOT}/repositories/ostree/ostree/{id}/")
}

pub fn distribution_href(id: Uuid) -> String {
    format!("{API_ROOT}/distributions/ostree/ostree/{id}/")
}

pub fn task_href(id: Uuid) -> String {
    format!("{API_ROOT}/tasks/{id}/")
}

/// Extract the id from one of this server's hrefs, given the collection
/// prefix (e.g. `/pulp/api/v3/artifacts/`). Absolute URLs are accepted.
pub fn href_id(href: &str, collection: &str) -> Option<Uuid> {
    let start = href.find(collection)?;
    href[start + collection.len()..]
        .trim_end_matches('/')
        .parse()
        .ok()
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactRecord {
    pub pulp_href: String,
    pub pulp_created: DateTime<Utc>,
    pub file: String,
    pub size: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryRecord {
    pub pulp_href: String,
    pub pulp_created: DateTime<Utc>,
    pub versions_href: String,
    pub latest_version_href: String,
    pub name: String,
    pub description: Option<String>,
    pub retain_repo_versions: Option<u64>,
    pub remote: Option<String>,
    #[serde(skip)]
    pub latest_version: u64,
}

impl RepositoryRecord {
    pub fn new(id: Uuid, name: String, description: Option<String>) -> Self {
        let pulp_href = repository_href(id);
        Self {
            versions_href: format!("{pulp_href}versions/"),
            latest_version_href: format!("{pulp_href}versions/0/"),
            pulp_href,
            pulp_created: Utc::now(),
            name,
            description,
            retain_repo_versions: None,
            remote: None,
            latest_version: 0,
        }
    }

    /// Record a new repository version, as a finished import does.
    pub fn bump_version(&mut self) {
        self.latest_version += 1;
        self.latest_version_href = format!("{}{}/", self.versions_href, self.latest_version);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionRecord {
    pub pulp_href: String,
    pub pulp_created: DateTime<Utc>,
    pub base_path: String,
    pub base_url: String,
    pub name: String,
    pub repository: Option<String>,
}

/// Side effect a task applies when it completes.
#[derive(Debug, Clone)]
pub enum TaskEffect {
    Import { repository: Uuid },
    Distribute { id: Uuid, record: DistributionRecord },
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub pulp_href: String,
    pub pulp_created: DateTime<Utc>,
    pub name: String,
    pub state: &'static str,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<serde_json::Value>,
    pub created_resources: Vec<String>,
    #[serde(skip)]
    pub effect: Option<TaskEffect>,
}

impl TaskRecord {
    pub fn new(id: Uuid, name: &str, effect: TaskEffect) -> Self {
        Self {
            pulp_href: task_href(id),
            pulp_created: Utc::now(),
            name: name.to_string(),
            state: "waiting",
            started_at: None,
            finished_at: None,
            error: None,
            created_resources: Vec::new(),
            effect: Some(effect),
        }
    }
}

/// Inner storage holding all DashMaps.
struct Inner {
    artifacts: DashMap<Uuid, ArtifactRecord>,
    artifact_digests: DashMap<String, Uuid>,
    repositories: DashMap<Uuid, RepositoryRecord>,
    repository_names: DashMap<String, Uuid>,
    distributions: DashMap<Uuid, DistributionRecord>,
    distribution_names: DashMap<String, Uuid>,
    distribution_base_paths: DashMap<String, Uuid>,
    tasks: DashMap<Uuid, TaskRecord>,
    credentials: Option<(String, String)>,
}

/// Shared application state holding all in-memory stores.
///
/// Cheaply cloneable via `Arc`; all clones share the same data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State for an unauthenticated server.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// State for a server that requires HTTP basic auth on the API routes.
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::build(Some((username.into(), password.into())))
    }

    fn build(credentials: Option<(String, String)>) -> Self {
        Self {
            inner: Arc::new(Inner {
                artifacts: DashMap::new(),
                artifact_digests: DashMap::new(),
                repositories: DashMap::new(),
                repository_names: DashMap::new(),
                distributions: DashMap::new(),
                distribution_names: DashMap::new(),
                distribution_base_paths: DashMap::new(),
                tasks: DashMap::new(),
                credentials,
            }),
        }
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.inner
            .credentials
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    pub fn artifacts(&self) -> &DashMap<Uuid, ArtifactRecord> {
        &self.inner.artifacts
    }

    pub fn artifact_digests(&self) -> &DashMap<String, Uuid> {
        &self.inner.artifact_digests
    }

    pub fn repositories(&self) -> &DashMap<Uuid, RepositoryRecord> {
        &self.inner.repositories
    }

    pub fn repository_names(&self) -> &DashMap<String, Uuid> {
        &self.inner.repository_names
    }

    pub fn distributions(&self) -> &DashMap<Uuid, DistributionRecord> {
        &self.inner.distributions
    }

    pub fn distribution_names(&self) -> &DashMap<String, Uuid> {
        &self.inner.distribution_names
    }

    pub fn distribution_base_paths(&self) -> &DashMap<String, Uuid> {
        &self.inner.distribution_base_paths
    }

    pub fn tasks(&self) -> &DashMap<Uuid, TaskRecord> {
        &self.inner.tasks
    }

    /// Advance a task by one step and return its new record.
    ///
    /// `waiting → running → completed`; completion applies the task's
    /// effect. Terminal tasks are returned unchanged.
    pub fn advance_task(&self, id: Uuid) -> Option<TaskRecord> {
        let mut task = self.tasks().get_mut(&id)?;
        let now = Utc::now();
        match task.state {
            "waiting" => {
                task.state = "running";
                task.started_at = Some(now);
            }
            "running" => {
                task.state = "completed";
                task.finished_at = Some(now);
                if let Some(effect) = task.effect.take() {
                    if let Some(created) = self.apply(effect) {
                        task.created_resources.push(created);
                    }
                }
            }
            _ => {}
        }
        Some(task.clone())
    }

    fn apply(&self, effect: TaskEffect) -> Option<String> {
        match effect {
            TaskEffect::Import { repository } => {
                let mut repo = self.repositories().get_mut(&repository)?;
                repo.bump_version();
                Some(repo.latest_version_href.clone())
            }
            TaskEffect::Distribute { id, record } => {
                let href = record.pulp_href.clone();
                self.distributions().insert(id, record);
                Some(href)
            }
        }
    }
}
