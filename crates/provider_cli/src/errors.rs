use std::{io, path::PathBuf};

use provider_core::ProviderError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the GitLab provider CLI.
///
/// This enum represents all possible error conditions that can arise during
/// CLI operations, including configuration issues, file problems and failures
/// reported by the provider itself.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while resolving the provider configuration.
    ///
    /// This error is returned when there is no token, the base URL is invalid,
    /// or the provider configuration file cannot be used.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided.
    ///
    /// This error is returned when the arguments are individually valid but do
    /// not make sense together, e.g. `create` without `--config`.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Failed to read a file from the filesystem.
    #[error("Failed to read {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a file to the filesystem.
    #[error("Failed to write {path:?}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration or state file does not contain the expected JSON.
    #[error("Failed to parse {path:?}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A lifecycle callback or local validation failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Command output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Output(#[source] serde_json::Error),
}
