//! Ostree commit import.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `{repository_href}import_all/` | Import a commit tarball (async) |

use std::sync::Arc;

use crate::backend::PulpBackend;
use crate::error::PulpError;
use crate::types::{ArtifactHref, OstreeImportAll, RepositoryHref, TaskHref};

/// Name of the ostree repository inside every commit tarball the build
/// pipeline produces.
pub const COMMIT_ARCHIVE_ROOT: &str = "repo";

/// Client for importing ostree commits into repositories.
#[derive(Debug, Clone)]
pub struct CommitClient {
    backend: Arc<dyn PulpBackend>,
}

impl CommitClient {
    pub(crate) fn new(backend: Arc<dyn PulpBackend>) -> Self {
        Self { backend }
    }

    /// Import an uploaded commit tarball into `repository`.
    ///
    /// `commit` must be the href of an artifact holding a commit tarball
    /// whose archive root is [`COMMIT_ARCHIVE_ROOT`]. Returns the href of the
    /// import task; the import is not done until that task leaves the
    /// waiting/running states.
    pub async fn import(
        &self,
        commit: &ArtifactHref,
        repository: &RepositoryHref,
    ) -> Result<TaskHref, PulpError> {
        let options = OstreeImportAll {
            artifact: commit.as_str().to_string(),
            repository_name: COMMIT_ARCHIVE_ROOT.to_string(),
        };

        let op = self
            .backend
            .import_all(repository, &options)
            .await
            .map_err(|e| PulpError::remote("import ostree commit", e))?;

        tracing::debug!(%commit, %repository, task = %op.task, "dispatched ostree import");
        Ok(op.task)
    }
}
