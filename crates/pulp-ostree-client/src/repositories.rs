//! Typed client for Pulp ostree repositories.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/pulp/api/v3/repositories/ostree/ostree/` | List (paginated) |
//! | POST   | `/pulp/api/v3/repositories/ostree/ostree/` | Create |

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::backend::PulpBackend;
use crate::error::PulpError;
use crate::types::{OstreeRepository, RepositoryHref};

/// Client for ostree repositories.
#[derive(Debug, Clone)]
pub struct RepositoryClient {
    backend: Arc<dyn PulpBackend>,
}

impl RepositoryClient {
    pub(crate) fn new(backend: Arc<dyn PulpBackend>) -> Self {
        Self { backend }
    }

    /// Map of repository name to href for every existing ostree repository.
    ///
    /// Follows `next` links until the listing is exhausted or a link comes
    /// round a second time. Names are unique on the server, so no entry is
    /// lost when building the map.
    pub async fn list(&self) -> Result<HashMap<String, RepositoryHref>, PulpError> {
        let mut repos = HashMap::new();
        let mut page: Option<String> = None;
        let mut visited = HashSet::new();

        loop {
            let list = self
                .backend
                .list_ostree_repositories(page.as_deref())
                .await
                .map_err(|e| PulpError::remote("list ostree repositories", e))?;

            for repo in list.results {
                repos.insert(repo.name, repo.pulp_href);
            }

            match list.next {
                Some(next) if visited.insert(next.clone()) => page = Some(next),
                Some(next) => {
                    tracing::warn!(%next, "ostree repository listing revisited a page link");
                    break;
                }
                None => break,
            }
        }

        tracing::debug!(count = repos.len(), "listed ostree repositories");
        Ok(repos)
    }

    /// Create an ostree repository and return its href.
    ///
    /// An empty `description` is left out of the request entirely, so the
    /// repository ends up exactly as if no description had been given.
    /// Name uniqueness is enforced by the server and surfaces as
    /// [`PulpError::Remote`].
    pub async fn create(&self, name: &str, description: &str) -> Result<RepositoryHref, PulpError> {
        let repository = OstreeRepository {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        };

        let created = self
            .backend
            .create_ostree_repository(&repository)
            .await
            .map_err(|e| PulpError::remote(format!("create ostree repository {name:?}"), e))?;

        tracing::debug!(name, href = %created.pulp_href, "created ostree repository");
        Ok(created.pulp_href)
    }
}
