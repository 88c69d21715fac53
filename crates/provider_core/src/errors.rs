//! Error types for provider operations.
//!
//! Two layers: [`ValidationError`] describes one local problem with a configured value,
//! [`ProviderError`] is what every lifecycle callback returns. A remote "not found" during
//! read or exists never shows up here; the controllers turn it into drift pruning.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// A single problem found while checking a configured value locally.
///
/// Several of these can be reported for one value, e.g. a path that fails the character
/// rules and also ends in `.git`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{value:?} is an invalid name: it can contain only letters, digits, '_', '.', dash and space")]
    InvalidName { value: String },

    #[error("{value:?} is an invalid path: it can contain only letters, digits, '_', '-' and '.'; it cannot start with '-' or end in '.'")]
    InvalidPath { value: String },

    #[error("{value:?} is an invalid path: it cannot end in {suffix}")]
    ReservedPathSuffix { value: String, suffix: &'static str },

    #[error("{value:?} is an invalid value for argument {attribute}: expected one of {allowed}")]
    NotAllowed {
        attribute: String,
        value: String,
        allowed: String,
    },

    #[error("Required attribute '{attribute}' is missing")]
    MissingAttribute { attribute: String },

    #[error("Attribute '{attribute}' must be a {expected}")]
    WrongType {
        attribute: String,
        expected: &'static str,
    },

    #[error("Attribute '{attribute}' is computed by GitLab and cannot be configured")]
    ReadOnlyAttribute { attribute: String },

    #[error("Unknown attribute '{attribute}'")]
    UnknownAttribute { attribute: String },
}

/// Errors returned by the resource lifecycle callbacks and provider bootstrap.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Local checks failed; GitLab was not contacted.
    #[error("Invalid configuration: {}", join_validation_errors(.0))]
    Validation(Vec<ValidationError>),

    /// The configured namespace ID matches no namespace visible to the token.
    #[error("Invalid namespace ID: {0}")]
    InvalidNamespace(u64),

    /// Listing namespaces failed while checking a namespace ID.
    #[error("Error getting list of namespaces: {0}")]
    NamespaceLookup(#[source] gitlab_client::Error),

    /// GitLab rejected or failed a request. Passed through as-is.
    #[error("GitLab request failed: {0}")]
    Remote(#[from] gitlab_client::Error),

    /// The desired configuration could not be mapped onto the resource's typed config.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Building the state record from a GitLab object failed.
    #[error("Failed to record resource state: {0}")]
    State(#[source] serde_json::Error),

    /// The stored identifier is not a GitLab numeric ID.
    #[error("Resource identifier {0:?} is not a numeric GitLab ID")]
    InvalidId(String),

    /// The operation needs an identifier but the state has none.
    #[error("Resource has no identifier")]
    MissingId,

    #[error("Unknown resource type '{0}'")]
    UnknownResourceType(String),

    /// Provider configuration (token, base URL, config file) is unusable.
    #[error("Provider configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    /// Returns `true` when the error came from local validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, ProviderError::Validation(_))
    }
}

fn join_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
