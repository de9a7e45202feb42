//! # Hrefs and Pulp wire types
//!
//! Request and response bodies for the Pulp v3 endpoints this crate calls.
//! Response types use `#[serde(default)]` on everything except the href so
//! that schema additions on the server side never break deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! href_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(href: impl Into<String>) -> Self {
                Self(href.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(href: String) -> Self {
                Self(href)
            }
        }

        impl From<&str> for $name {
            fn from(href: &str) -> Self {
                Self(href.to_string())
            }
        }
    };
}

href_type!(
    /// Href of an uploaded artifact, e.g. a commit tarball.
    ArtifactHref
);
href_type!(
    /// Href of an ostree repository.
    RepositoryHref
);
href_type!(
    /// Href of an asynchronous Pulp task.
    TaskHref
);

// -- Artifacts ----------------------------------------------------------------

/// Artifact as returned by `POST /pulp/api/v3/artifacts/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactResponse {
    pub pulp_href: ArtifactHref,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// A file about to be streamed to the artifacts endpoint.
#[derive(Debug)]
pub struct ArtifactUpload {
    /// File name sent in the multipart `file` part.
    pub file_name: String,
    /// Length in bytes, taken from the file's metadata.
    pub size: u64,
    pub file: tokio::fs::File,
}

// -- Repositories -------------------------------------------------------------

/// Request body for creating an ostree repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OstreeRepository {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ostree repository as returned by the repositories endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OstreeRepositoryResponse {
    pub pulp_href: RepositoryHref,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pulp_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub latest_version_href: Option<String>,
}

/// One page of a Pulp list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: u64,
    /// Href or absolute URL of the next page.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

// -- Import / distribute ------------------------------------------------------

/// Request body for `POST {repository_href}import_all/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OstreeImportAll {
    /// Href of the uploaded commit tarball.
    pub artifact: String,
    /// Name of the ostree repository inside the tarball.
    pub repository_name: String,
}

/// Request body for creating an ostree distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OstreeDistribution {
    pub base_path: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

/// 202 response body of every endpoint that dispatches a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncOperationResponse {
    pub task: TaskHref,
}

// -- Tasks --------------------------------------------------------------------

/// Task record as returned by `GET {task_href}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulpTask {
    pub pulp_href: TaskHref,
    /// Raw state string. Validated by [`crate::tasks::TaskClient::state`].
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Error details for failed tasks.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    /// Hrefs of resources the task created. Pulp reports `null` for a
    /// resource it can no longer resolve.
    #[serde(default)]
    pub created_resources: Vec<Option<String>>,
}
