//! Pulp client configuration.
//!
//! Binds a single Pulp server and, optionally, basic-auth credentials.
//! Load from environment variables or construct explicitly for tests.

use url::Url;
use zeroize::Zeroizing;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Basic-auth credentials for the Pulp API.
///
/// Custom `Debug` implementation redacts the password.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Configuration for connecting to a Pulp server.
#[derive(Debug, Clone)]
pub struct PulpConfig {
    /// Server root, e.g. `https://pulp.example.com`. API paths
    /// (`/pulp/api/v3/...`) are appended to it.
    pub server_url: Url,
    /// Basic-auth credentials. `None` sends unauthenticated requests.
    pub credentials: Option<Credentials>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl PulpConfig {
    /// Unauthenticated configuration with the default timeout.
    pub fn new(server_url: Url) -> Self {
        Self {
            server_url,
            credentials: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PULP_URL` (required)
    /// - `PULP_USERNAME` / `PULP_PASSWORD` (optional, both or neither)
    /// - `PULP_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("PULP_URL").map_err(|_| ConfigError::MissingUrl)?;
        let server_url =
            Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl("PULP_URL".into(), e.to_string()))?;

        let credentials = match (
            std::env::var("PULP_USERNAME").ok(),
            std::env::var("PULP_PASSWORD").ok(),
        ) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        Ok(Self {
            server_url,
            credentials,
            timeout_secs: std::env::var("PULP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a configuration pointing to a local server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local(port: u16) -> Result<Self, ConfigError> {
        let server_url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            server_url,
            credentials: None,
            timeout_secs: 5,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PULP_URL environment variable is required")]
    MissingUrl,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("PULP_USERNAME and PULP_PASSWORD must be set together")]
    IncompleteCredentials,
}
