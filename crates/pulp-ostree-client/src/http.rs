//! # HTTP backend for the Pulp v3 REST API
//!
//! Wraps a `reqwest::Client` with the server root and optional basic-auth
//! credentials. Collection endpoints are built from [`API_ROOT`]; hrefs
//! returned by the server are prefixed with the server root and sent back
//! unchanged.
//!
//! ## Error Handling
//!
//! Transport errors map to [`ApiFailure::transport`]. Non-2xx responses
//! map to [`ApiFailure::from_status`] with the response body read
//! best-effort (a failed read yields an empty body). Undecodable 2xx bodies
//! are reported with the raw body attached.
//!
//! ## Retry
//!
//! None. Each call is exactly one request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::backend::PulpBackend;
use crate::config::{Credentials, PulpConfig};
use crate::error::{ApiFailure, PulpError};
use crate::types::{
    ArtifactResponse, ArtifactUpload, AsyncOperationResponse, OstreeDistribution,
    OstreeImportAll, OstreeRepository, OstreeRepositoryResponse, Paginated, PulpTask,
    RepositoryHref, TaskHref,
};

/// Path of the Pulp v3 API below the server root.
pub const API_ROOT: &str = "/pulp/api/v3";

const ARTIFACTS_PATH: &str = "/artifacts/";
const OSTREE_REPOSITORIES_PATH: &str = "/repositories/ostree/ostree/";
const OSTREE_DISTRIBUTIONS_PATH: &str = "/distributions/ostree/ostree/";

/// Pulp backend speaking HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    /// Server root without a trailing slash.
    base_url: String,
    credentials: Option<Credentials>,
}

impl HttpBackend {
    /// Create a backend with reqwest's default client settings.
    pub fn new(server_url: Url, credentials: Option<Credentials>) -> Self {
        Self::with_http(reqwest::Client::new(), server_url, credentials)
    }

    /// Create a backend with the timeout and user agent from `config`.
    pub fn from_config(config: &PulpConfig) -> Result<Self, PulpError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("pulp-ostree-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(PulpError::ClientInit)?;
        Ok(Self::with_http(
            http,
            config.server_url.clone(),
            config.credentials.clone(),
        ))
    }

    fn with_http(http: reqwest::Client, server_url: Url, credentials: Option<Credentials>) -> Self {
        let base_url = server_url.as_str().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            credentials,
        }
    }

    /// URL of a collection endpoint below [`API_ROOT`].
    fn collection_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_ROOT, path)
    }

    /// URL for a server-issued href. Absolute URLs (pagination links) are
    /// used as-is; anything else is appended to the server root.
    fn href_url(&self, href: &str) -> String {
        if Url::parse(href).is_ok() {
            href.to_string()
        } else {
            format!("{}{}", self.base_url, href)
        }
    }

    /// Send a request and handle HTTP errors consistently.
    async fn send_request(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiFailure> {
        let request = match &self.credentials {
            Some(creds) => request.basic_auth(&creds.username, Some(creds.password.as_str())),
            None => request,
        };

        let resp = request
            .send()
            .await
            .map_err(|e| ApiFailure::transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status, "Pulp request rejected");
            return Err(ApiFailure::from_status(status, body));
        }

        Ok(resp)
    }

    /// Decode a successful response, keeping the raw body for diagnostics.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiFailure> {
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiFailure::transport(format!("failed to read response body: {e}")))?;
        serde_json::from_str(&body).map_err(|e| ApiFailure {
            status: Some(status),
            message: format!("failed to deserialize response: {e}"),
            body,
        })
    }
}

#[async_trait]
impl PulpBackend for HttpBackend {
    async fn create_artifact(&self, upload: ArtifactUpload) -> Result<ArtifactResponse, ApiFailure> {
        let url = self.collection_url(ARTIFACTS_PATH);
        tracing::debug!(%url, file = %upload.file_name, size = upload.size, "uploading artifact");

        let part = Part::stream_with_length(reqwest::Body::from(upload.file), upload.size)
            .file_name(upload.file_name);
        let form = Form::new().part("file", part);

        let resp = self.send_request(self.http.post(&url).multipart(form)).await?;
        Self::decode(resp).await
    }

    async fn list_ostree_repositories(
        &self,
        page: Option<&str>,
    ) -> Result<Paginated<OstreeRepositoryResponse>, ApiFailure> {
        let url = match page {
            Some(next) => self.href_url(next),
            None => self.collection_url(OSTREE_REPOSITORIES_PATH),
        };
        tracing::debug!(%url, "listing ostree repositories");

        let resp = self.send_request(self.http.get(&url)).await?;
        Self::decode(resp).await
    }

    async fn create_ostree_repository(
        &self,
        repository: &OstreeRepository,
    ) -> Result<OstreeRepositoryResponse, ApiFailure> {
        let url = self.collection_url(OSTREE_REPOSITORIES_PATH);
        tracing::debug!(%url, name = %repository.name, "creating ostree repository");

        let resp = self
            .send_request(self.http.post(&url).json(repository))
            .await?;
        Self::decode(resp).await
    }

    async fn import_all(
        &self,
        repository: &RepositoryHref,
        options: &OstreeImportAll,
    ) -> Result<AsyncOperationResponse, ApiFailure> {
        let url = self.href_url(&format!("{repository}import_all/"));
        tracing::debug!(%url, artifact = %options.artifact, "importing ostree commit");

        let resp = self.send_request(self.http.post(&url).json(options)).await?;
        Self::decode(resp).await
    }

    async fn create_ostree_distribution(
        &self,
        distribution: &OstreeDistribution,
    ) -> Result<AsyncOperationResponse, ApiFailure> {
        let url = self.collection_url(OSTREE_DISTRIBUTIONS_PATH);
        tracing::debug!(%url, name = %distribution.name, base_path = %distribution.base_path, "creating ostree distribution");

        let resp = self
            .send_request(self.http.post(&url).json(distribution))
            .await?;
        Self::decode(resp).await
    }

    async fn read_task(&self, task: &TaskHref) -> Result<PulpTask, ApiFailure> {
        let url = self.href_url(task.as_str());
        tracing::debug!(%url, "reading task");

        let resp = self.send_request(self.http.get(&url)).await?;
        Self::decode(resp).await
    }
}
