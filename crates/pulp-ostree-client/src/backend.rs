//! # Pulp Backend -- Narrow Capability Interface
//!
//! The six remote calls the sub-clients make, and nothing else. The
//! production implementation is [`crate::HttpBackend`]; tests substitute
//! `MockBackend` or any other implementation.
//!
//! Implementations must be `Send + Sync` so a single backend can be shared
//! by every sub-client behind an `Arc`. The trait is object-safe.

use async_trait::async_trait;

use crate::error::ApiFailure;
use crate::types::{
    ArtifactResponse, ArtifactUpload, AsyncOperationResponse, OstreeDistribution,
    OstreeImportAll, OstreeRepository, OstreeRepositoryResponse, Paginated, PulpTask,
    RepositoryHref, TaskHref,
};

#[async_trait]
pub trait PulpBackend: std::fmt::Debug + Send + Sync {
    /// `POST /pulp/api/v3/artifacts/` with the file as a multipart part.
    async fn create_artifact(&self, upload: ArtifactUpload) -> Result<ArtifactResponse, ApiFailure>;

    /// `GET /pulp/api/v3/repositories/ostree/ostree/`.
    ///
    /// `page` is `None` for the first page, otherwise the `next` link of
    /// the previous page, verbatim.
    async fn list_ostree_repositories(
        &self,
        page: Option<&str>,
    ) -> Result<Paginated<OstreeRepositoryResponse>, ApiFailure>;

    /// `POST /pulp/api/v3/repositories/ostree/ostree/`.
    async fn create_ostree_repository(
        &self,
        repository: &OstreeRepository,
    ) -> Result<OstreeRepositoryResponse, ApiFailure>;

    /// `POST {repository_href}import_all/`.
    async fn import_all(
        &self,
        repository: &RepositoryHref,
        options: &OstreeImportAll,
    ) -> Result<AsyncOperationResponse, ApiFailure>;

    /// `POST /pulp/api/v3/distributions/ostree/ostree/`.
    async fn create_ostree_distribution(
        &self,
        distribution: &OstreeDistribution,
    ) -> Result<AsyncOperationResponse, ApiFailure>;

    /// `GET {task_href}`.
    async fn read_task(&self, task: &TaskHref) -> Result<PulpTask, ApiFailure>;
}
