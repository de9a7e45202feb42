//! Pulp client error types.

use std::path::PathBuf;

/// Errors from Pulp client operations.
#[derive(Debug, thiserror::Error)]
pub enum PulpError {
    /// Local filesystem failure while preparing an upload.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Transport failure or a rejection from the Pulp server.
    #[error("{operation} failed: {message}{}", render_body(.body))]
    Remote {
        operation: String,
        /// HTTP status, when the server answered at all.
        status: Option<u16>,
        message: String,
        /// Response body, read best-effort. Empty when unavailable.
        body: String,
    },
    /// The server returned a task without a state.
    #[error("got empty task state for {task}")]
    EmptyState { task: String },
    /// The server returned a task state outside the known set.
    #[error("got unrecognized task state {state:?} for {task}")]
    UnrecognizedState { task: String, state: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),
}

impl PulpError {
    /// Attribute a backend failure to the operation that issued it.
    pub(crate) fn remote(operation: impl Into<String>, failure: ApiFailure) -> Self {
        Self::Remote {
            operation: operation.into(),
            status: failure.status,
            message: failure.message,
            body: failure.body,
        }
    }

    /// HTTP status of a [`PulpError::Remote`] failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => *status,
            _ => None,
        }
    }
}

fn render_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" ({body})")
    }
}

/// A failed call as reported by a [`crate::PulpBackend`].
///
/// Carries no operation name; [`PulpError::Remote`] adds it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiFailure {
    pub status: Option<u16>,
    pub message: String,
    pub body: String,
}

impl ApiFailure {
    /// A failure with no HTTP response (connection refused, timeout, bad href).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            body: String::new(),
        }
    }

    /// A non-2xx response.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: format!("server returned HTTP {status}"),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_display_includes_body_when_present() {
        let err = PulpError::remote(
            "create ostree repository",
            ApiFailure::from_status(400, r#"{"name":["This field must be unique."]}"#),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("create ostree repository failed: server returned HTTP 400"));
        assert!(msg.contains("must be unique"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn remote_display_omits_empty_body() {
        let err = PulpError::remote("read task", ApiFailure::transport("connection refused"));
        assert_eq!(err.to_string(), "read task failed: connection refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn empty_state_names_the_task() {
        let err = PulpError::EmptyState {
            task: "/pulp/api/v3/tasks/1/".into(),
        };
        assert!(err.to_string().contains("/pulp/api/v3/tasks/1/"));
    }
}
