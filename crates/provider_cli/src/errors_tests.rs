use super::*;
use std::error::Error as StdError;

#[test]
fn test_config_error_display() {
    let error = Error::Config("No GitLab token configured".to_string());
    assert_eq!(
        error.to_string(),
        "Configuration error: No GitLab token configured"
    );
}

#[test]
fn test_invalid_arguments_error_display() {
    let error = Error::InvalidArguments("--config is required for create".to_string());
    assert_eq!(
        error.to_string(),
        "Invalid arguments: --config is required for create"
    );
}

#[test]
fn test_read_file_error_keeps_source() {
    let error = Error::ReadFile {
        path: PathBuf::from("state.json"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };

    assert_eq!(error.to_string(), "Failed to read \"state.json\": denied");
    assert!(error.source().is_some());
}

#[test]
fn test_provider_error_is_transparent() {
    let error: Error = ProviderError::InvalidNamespace(42).into();

    assert_eq!(error.to_string(), "Invalid namespace ID: 42");
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
