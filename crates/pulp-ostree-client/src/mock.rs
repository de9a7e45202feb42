//! In-memory [`PulpBackend`] for tests.
//!
//! Behaves like a small Pulp server: uploaded artifacts, repositories,
//! distributions and tasks are kept in memory, duplicate names are
//! rejected with 400, unknown hrefs with 404. Every request is recorded so
//! tests can assert on exactly what the sub-clients sent.
//!
//! Tasks created by import/distribute step through
//! `waiting → running → completed`, one state per read; custom sequences
//! can be scripted with [`MockBackend::script_task`].

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::AsyncReadExt;

use crate::backend::PulpBackend;
use crate::error::ApiFailure;
use crate::types::{
    ArtifactHref, ArtifactResponse, ArtifactUpload, AsyncOperationResponse, OstreeDistribution,
    OstreeImportAll, OstreeRepository, OstreeRepositoryResponse, Paginated, PulpTask,
    RepositoryHref, TaskHref,
};

/// The backend calls a failure can be injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendCall {
    CreateArtifact,
    ListRepositories,
    CreateRepository,
    ImportAll,
    CreateDistribution,
    ReadTask,
}

#[derive(Debug, Default)]
struct MockState {
    next_id: u64,
    page_size: usize,
    artifacts: Vec<(ArtifactHref, Vec<u8>)>,
    repositories: Vec<OstreeRepositoryResponse>,
    created_repositories: Vec<OstreeRepository>,
    imports: Vec<(RepositoryHref, OstreeImportAll)>,
    distributions: Vec<OstreeDistribution>,
    /// Remaining states per task; the last one is sticky.
    tasks: HashMap<TaskHref, VecDeque<Option<String>>>,
    failures: HashMap<BackendCall, VecDeque<ApiFailure>>,
}

impl MockState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn take_failure(&mut self, call: BackendCall) -> Result<(), ApiFailure> {
        match self.failures.get_mut(&call).and_then(VecDeque::pop_front) {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    fn dispatch_task(&mut self) -> TaskHref {
        let href = TaskHref::new(format!("/pulp/api/v3/tasks/{}/", self.next_id()));
        self.tasks.insert(
            href.clone(),
            ["waiting", "running", "completed"]
                .into_iter()
                .map(|s| Some(s.to_string()))
                .collect(),
        );
        href
    }
}

/// In-memory Pulp double.
#[derive(Debug)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                page_size: 100,
                ..MockState::default()
            }),
        }
    }

    /// Number of repositories per list page. Clamped to at least 1.
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.state.lock().page_size = page_size.max(1);
        self
    }

    /// Add an existing repository and return its href.
    pub fn seed_repository(&self, name: &str) -> RepositoryHref {
        let mut state = self.state.lock();
        let href = RepositoryHref::new(format!(
            "/pulp/api/v3/repositories/ostree/ostree/{}/",
            state.next_id()
        ));
        state.repositories.push(OstreeRepositoryResponse {
            pulp_href: href.clone(),
            name: name.to_string(),
            description: None,
            pulp_created: None,
            latest_version_href: None,
        });
        href
    }

    /// Replace the state sequence reported for `task`. `None` entries are
    /// returned as a task without a `state` field.
    pub fn script_task(&self, task: &TaskHref, states: &[Option<&str>]) {
        self.state.lock().tasks.insert(
            task.clone(),
            states.iter().map(|s| s.map(str::to_string)).collect(),
        );
    }

    /// Make the next call of kind `call` fail with `failure`.
    pub fn fail_next(&self, call: BackendCall, failure: ApiFailure) {
        self.state
            .lock()
            .failures
            .entry(call)
            .or_default()
            .push_back(failure);
    }

    /// Uploaded artifacts with their full contents.
    pub fn uploaded_artifacts(&self) -> Vec<(ArtifactHref, Vec<u8>)> {
        self.state.lock().artifacts.clone()
    }

    /// Every repository creation request received, including rejected ones.
    pub fn created_repositories(&self) -> Vec<OstreeRepository> {
        self.state.lock().created_repositories.clone()
    }

    /// Every accepted import request.
    pub fn imports(&self) -> Vec<(RepositoryHref, OstreeImportAll)> {
        self.state.lock().imports.clone()
    }

    /// Every accepted distribution request.
    pub fn distributions(&self) -> Vec<OstreeDistribution> {
        self.state.lock().distributions.clone()
    }
}

fn not_found(href: &str) -> ApiFailure {
    ApiFailure::from_status(404, format!(r#"{{"detail":"Not found: {href}"}}"#))
}

fn bad_request(field: &str, message: &str) -> ApiFailure {
    ApiFailure::from_status(400, format!(r#"{{"{field}":["{message}"]}}"#))
}

#[async_trait]
impl PulpBackend for MockBackend {
    async fn create_artifact(&self, upload: ArtifactUpload) -> Result<ArtifactResponse, ApiFailure> {
        self.state.lock().take_failure(BackendCall::CreateArtifact)?;

        let mut file = upload.file;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .await
            .map_err(|e| ApiFailure::transport(format!("failed to stream upload: {e}")))?;

        let mut state = self.state.lock();
        let href = ArtifactHref::new(format!("/pulp/api/v3/artifacts/{}/", state.next_id()));
        let size = contents.len() as u64;
        state.artifacts.push((href.clone(), contents));
        Ok(ArtifactResponse {
            pulp_href: href,
            sha256: None,
            size: Some(size),
        })
    }

    async fn list_ostree_repositories(
        &self,
        page: Option<&str>,
    ) -> Result<Paginated<OstreeRepositoryResponse>, ApiFailure> {
        let mut state = self.state.lock();
        state.take_failure(BackendCall::ListRepositories)?;

        let offset = match page {
            None => 0,
            Some(link) => link
                .rsplit("offset=")
                .next()
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| bad_request("offset", "Invalid page link."))?,
        };
        let total = state.repositories.len();
        let end = (offset + state.page_size).min(total);
        let results = state.repositories.get(offset..end).unwrap_or_default().to_vec();
        let link = |offset: usize| {
            format!("/pulp/api/v3/repositories/ostree/ostree/?offset={offset}")
        };

        Ok(Paginated {
            count: total as u64,
            next: (end < total).then(|| link(end)),
            previous: (offset > 0).then(|| link(offset.saturating_sub(state.page_size))),
            results,
        })
    }

    async fn create_ostree_repository(
        &self,
        repository: &OstreeRepository,
    ) -> Result<OstreeRepositoryResponse, ApiFailure> {
        let mut state = self.state.lock();
        state.created_repositories.push(repository.clone());
        state.take_failure(BackendCall::CreateRepository)?;

        if repository.name.is_empty() {
            return Err(bad_request("name", "This field may not be blank."));
        }
        if state.repositories.iter().any(|r| r.name == repository.name) {
            return Err(bad_request("name", "This field must be unique."));
        }

        let href = RepositoryHref::new(format!(
            "/pulp/api/v3/repositories/ostree/ostree/{}/",
            state.next_id()
        ));
        let created = OstreeRepositoryResponse {
            pulp_href: href,
            name: repository.name.clone(),
            description: repository.description.clone(),
            pulp_created: Some(chrono::Utc::now()),
            latest_version_href: None,
        };
        state.repositories.push(created.clone());
        Ok(created)
    }

    async fn import_all(
        &self,
        repository: &RepositoryHref,
        options: &OstreeImportAll,
    ) -> Result<AsyncOperationResponse, ApiFailure> {
        let mut state = self.state.lock();
        state.take_failure(BackendCall::ImportAll)?;

        if !state.repositories.iter().any(|r| &r.pulp_href == repository) {
            return Err(not_found(repository.as_str()));
        }
        state.imports.push((repository.clone(), options.clone()));
        Ok(AsyncOperationResponse {
            task: state.dispatch_task(),
        })
    }

    async fn create_ostree_distribution(
        &self,
        distribution: &OstreeDistribution,
    ) -> Result<AsyncOperationResponse, ApiFailure> {
        let mut state = self.state.lock();
        state.take_failure(BackendCall::CreateDistribution)?;

        if state.distributions.iter().any(|d| d.name == distribution.name) {
            return Err(bad_request("name", "This field must be unique."));
        }
        if state
            .distributions
            .iter()
            .any(|d| d.base_path == distribution.base_path)
        {
            return Err(bad_request("base_path", "This field must be unique."));
        }
        state.distributions.push(distribution.clone());
        Ok(AsyncOperationResponse {
            task: state.dispatch_task(),
        })
    }

    async fn read_task(&self, task: &TaskHref) -> Result<PulpTask, ApiFailure> {
        let mut state = self.state.lock();
        state.take_failure(BackendCall::ReadTask)?;

        let states = state
            .tasks
            .get_mut(task)
            .ok_or_else(|| not_found(task.as_str()))?;
        let current = if states.len() > 1 {
            states.pop_front().flatten()
        } else {
            states.front().cloned().flatten()
        };

        Ok(PulpTask {
            pulp_href: task.clone(),
            state: current,
            name: None,
            started_at: None,
            finished_at: None,
            error: None,
            created_resources: Vec::new(),
        })
    }
}
