//! Directus client error types.

use thiserror::Error;

/// Result type for Directus operations.
pub type DirectusResult<T> = Result<T, DirectusError>;

/// Errors that can occur talking to the remote item API.
#[derive(Debug, Error)]
pub enum DirectusError {
    /// Base URL or token missing/empty. Fatal, never retried.
    #[error("Directus configuration missing: {0}")]
    Config(String),

    /// Caller input rejected before any network call.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Remote 404 where the caller expected an item.
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Non-success response; the raw body is preserved for diagnostics.
    #[error("API error {status}: {body}")]
    Remote { status: u16, body: String },

    /// The network call itself could not complete.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DirectusError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// HTTP status carried by the error, when there is one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            DirectusError::NotFound(_) => Some(404),
            DirectusError::Remote { status, .. } => Some(*status),
            DirectusError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for failures of the request itself rather than the caller's
    /// input or configuration.
    pub fn is_remote(&self) -> bool {
        matches!(self, DirectusError::Remote { .. } | DirectusError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_preserves_status_and_body() {
        let err = DirectusError::Remote {
            status: 503,
            body: "{\"errors\":[{\"message\":\"upstream down\"}]}".to_string(),
        };
        assert_eq!(err.http_status(), Some(503));
        assert!(err.to_string().contains("upstream down"));
        assert!(err.is_remote());
    }

    #[test]
    fn config_and_validation_have_no_status() {
        assert_eq!(DirectusError::config("no url").http_status(), None);
        assert_eq!(DirectusError::validation("empty id").http_status(), None);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            DirectusError::not_found("job_postings/9").http_status(),
            Some(404)
        );
    }
}
