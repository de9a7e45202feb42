//! Ostree distributions.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/pulp/api/v3/distributions/ostree/ostree/` | Create (async) |

use std::sync::Arc;

use crate::backend::PulpBackend;
use crate::error::PulpError;
use crate::types::{OstreeDistribution, RepositoryHref, TaskHref};

/// Client for publishing ostree repositories.
#[derive(Debug, Clone)]
pub struct DistributionClient {
    backend: Arc<dyn PulpBackend>,
}

impl DistributionClient {
    pub(crate) fn new(backend: Arc<dyn PulpBackend>) -> Self {
        Self { backend }
    }

    /// Serve `repository` under `base_path` as a distribution called `name`.
    ///
    /// Returns the href of the creation task. Not idempotent: a second call
    /// with the same name fails with the server's conflict.
    pub async fn distribute(
        &self,
        base_path: &str,
        name: &str,
        repository: &RepositoryHref,
    ) -> Result<TaskHref, PulpError> {
        let distribution = OstreeDistribution {
            base_path: base_path.to_string(),
            name: name.to_string(),
            repository: Some(repository.as_str().to_string()),
        };

        let op = self
            .backend
            .create_ostree_distribution(&distribution)
            .await
            .map_err(|e| PulpError::remote(format!("distribute ostree repository {name:?}"), e))?;

        tracing::debug!(base_path, name, task = %op.task, "dispatched ostree distribution");
        Ok(op.task)
    }
}
