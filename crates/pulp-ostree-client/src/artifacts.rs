//! Artifact uploads.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/pulp/api/v3/artifacts/` | Upload a file (multipart `file`) |

use std::path::Path;
use std::sync::Arc;

use crate::backend::PulpBackend;
use crate::error::PulpError;
use crate::types::{ArtifactHref, ArtifactUpload};

/// Client for the Pulp artifacts endpoint.
#[derive(Debug, Clone)]
pub struct ArtifactClient {
    backend: Arc<dyn PulpBackend>,
}

impl ArtifactClient {
    pub(crate) fn new(backend: Arc<dyn PulpBackend>) -> Self {
        Self { backend }
    }

    /// Upload the file at `path` and return the href of the new artifact.
    ///
    /// The whole file is streamed in a single request. The file handle is
    /// owned by the request body and released when the call returns,
    /// whether it succeeded or not.
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<ArtifactHref, PulpError> {
        let path = path.as_ref();
        let io_err = |source| PulpError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = tokio::fs::File::open(path).await.map_err(io_err)?;
        let size = file.metadata().await.map_err(io_err)?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        tracing::debug!(path = %path.display(), size, "uploading file to Pulp");
        let artifact = self
            .backend
            .create_artifact(ArtifactUpload {
                file_name,
                size,
                file,
            })
            .await
            .map_err(|e| PulpError::remote(format!("upload of {}", path.display()), e))?;

        Ok(artifact.pulp_href)
    }
}
