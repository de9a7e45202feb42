//! # pulp-ostree-client -- Typed Rust client for the Pulp ostree plugin
//!
//! Provides typed access to the handful of Pulp operations an image build
//! pipeline needs to publish ostree commits:
//! - **Artifacts**: upload a local file (commit tarball) and get its href
//! - **Repositories**: list ostree repositories, create new ones
//! - **Commits**: import an uploaded commit tarball into a repository
//! - **Distributions**: publish a repository under a base path
//! - **Tasks**: observe the state of the asynchronous tasks the above return
//!
//! ## Architecture
//!
//! Every remote call goes through the [`PulpBackend`] trait, which has exactly
//! the six calls this crate makes. [`HttpBackend`] speaks the Pulp v3 REST API
//! over `reqwest`; `MockBackend` (feature `mock`) is an in-memory double.
//! The sub-clients only sequence those calls and attach an operation name to
//! failures.
//!
//! ## Hrefs
//!
//! Pulp identifies every resource by an opaque `pulp_href`. Hrefs are carried
//! in the [`ArtifactHref`], [`RepositoryHref`] and [`TaskHref`] newtypes and
//! are only ever sent back to the server that issued them.
//!
//! ## Asynchronous tasks
//!
//! Import and distribute return a [`TaskHref`]. Nothing here waits for it:
//! callers poll [`tasks::TaskClient::poll`] (or the parity helper
//! [`tasks::TaskClient::waiting_or_running`]) with their own delay and
//! timeout policy.

pub mod artifacts;
pub mod backend;
pub mod commits;
pub mod config;
pub mod distributions;
pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod repositories;
pub mod tasks;
pub mod types;

pub use backend::PulpBackend;
pub use config::{Credentials, PulpConfig};
pub use error::{ApiFailure, PulpError};
pub use http::HttpBackend;
pub use tasks::{TaskPoll, TaskState};
pub use types::{ArtifactHref, RepositoryHref, TaskHref};

use std::sync::Arc;

/// Top-level Pulp client. Holds one sub-client per resource family, all
/// sharing the same backend.
#[derive(Debug, Clone)]
pub struct PulpClient {
    artifacts: artifacts::ArtifactClient,
    repositories: repositories::RepositoryClient,
    commits: commits::CommitClient,
    distributions: distributions::DistributionClient,
    tasks: tasks::TaskClient,
}

impl PulpClient {
    /// Create a client bound to `server_url`.
    ///
    /// Performs no network I/O. When `credentials` is `Some`, every request
    /// carries HTTP basic auth.
    pub fn new(server_url: url::Url, credentials: Option<Credentials>) -> Self {
        Self::with_backend(Arc::new(HttpBackend::new(server_url, credentials)))
    }

    /// Create a client from a full configuration (timeout, user agent).
    pub fn from_config(config: PulpConfig) -> Result<Self, PulpError> {
        Ok(Self::with_backend(Arc::new(HttpBackend::from_config(
            &config,
        )?)))
    }

    /// Create a client over an arbitrary backend, e.g. a test double.
    pub fn with_backend(backend: Arc<dyn PulpBackend>) -> Self {
        Self {
            artifacts: artifacts::ArtifactClient::new(backend.clone()),
            repositories: repositories::RepositoryClient::new(backend.clone()),
            commits: commits::CommitClient::new(backend.clone()),
            distributions: distributions::DistributionClient::new(backend.clone()),
            tasks: tasks::TaskClient::new(backend),
        }
    }

    /// Access the artifact upload client.
    pub fn artifacts(&self) -> &artifacts::ArtifactClient {
        &self.artifacts
    }

    /// Access the ostree repository client.
    pub fn repositories(&self) -> &repositories::RepositoryClient {
        &self.repositories
    }

    /// Access the ostree commit import client.
    pub fn commits(&self) -> &commits::CommitClient {
        &self.commits
    }

    /// Access the ostree distribution client.
    pub fn distributions(&self) -> &distributions::DistributionClient {
        &self.distributions
    }

    /// Access the task monitor.
    pub fn tasks(&self) -> &tasks::TaskClient {
        &self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync + Clone>() {}

    #[test]
    fn client_is_shareable_across_tasks() {
        assert_send_sync::<PulpClient>();
    }

    #[test]
    fn new_performs_no_io_for_unreachable_server() {
        // Construction must succeed even though nothing listens on port 1.
        let url: url::Url = "http://127.0.0.1:1".parse().unwrap();
        let client = PulpClient::new(url, Some(Credentials::new("admin", "password")));
        let _ = client.repositories();
    }
}
