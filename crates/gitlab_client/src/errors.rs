//! Error types for GitLab client operations.
//!
//! This module defines the error types that can occur when interacting with the GitLab API
//! through the gitlab_client crate. Callers that need to tell "the object is gone" apart
//! from every other failure should use the [`Lookup`](crate::Lookup) returned by the
//! `get_*` operations rather than matching on [`Error::NotFound`] directly.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitLab client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use gitlab_client::Error;
///
/// match client.create_group(&payload).await {
///     Ok(group) => println!("Group created: {}", group.id),
///     Err(Error::AuthError(msg)) => eprintln!("Authentication failed: {}", msg),
///     Err(Error::Api { status: 400, message }) => eprintln!("Rejected: {}", message),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The GitLab API rejected the request with a non-success status.
    ///
    /// `message` carries the `message` (or `error`) field of the GitLab error body when one
    /// is present, otherwise the raw response text.
    #[error("GitLab API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The token was rejected (401) or lacks the permission for the call (403).
    #[error("Failed to authenticate with GitLab: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitLab.
    #[error("Failed to deserialize GitLab response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The request never produced an HTTP response (connection, TLS, body read).
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// An endpoint URL could not be built from the configured base URL.
    #[error("Invalid GitLab URL: {0}")]
    InvalidUrl(String),

    /// The requested resource was not found.
    ///
    /// This error occurs when a GitLab API request returns a 404 status code.
    #[error("Resource not found")]
    NotFound,

    /// GitLab API rate limit has been exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Http(value.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(value: url::ParseError) -> Self {
        Error::InvalidUrl(value.to_string())
    }
}
