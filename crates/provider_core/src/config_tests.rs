//! Tests for provider configuration resolution.

use super::*;
use secrecy::ExposeSecret;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn settings(token: Option<&str>, base_url: Option<&str>) -> ProviderSettings {
    ProviderSettings {
        token: token.map(str::to_string),
        base_url: base_url.map(str::to_string),
    }
}

fn clear_env() {
    unsafe {
        env::remove_var(TOKEN_ENV_VAR);
        env::remove_var(BASE_URL_ENV_VAR);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp config");
    file
}

#[test]
fn test_from_settings_uses_default_base_url() {
    let config = ProviderConfig::from_settings(settings(Some("glpat-abc"), None))
        .expect("token is enough");

    assert_eq!(config.token().expose_secret(), "glpat-abc");
    assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
}

#[test]
fn test_from_settings_treats_empty_base_url_as_unset() {
    let config = ProviderConfig::from_settings(settings(Some("glpat-abc"), Some("")))
        .expect("empty base url falls back to the default");

    assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
}

#[test]
fn test_from_settings_requires_token() {
    let result = ProviderConfig::from_settings(settings(Some("  "), None));

    match result {
        Err(ProviderError::Configuration(message)) => assert!(message.contains(TOKEN_ENV_VAR)),
        other => panic!("Expected a configuration error, got {other:?}"),
    }
}

#[test]
fn test_from_settings_rejects_bad_url() {
    let result = ProviderConfig::from_settings(settings(Some("glpat-abc"), Some("not a url")));

    assert!(matches!(result, Err(ProviderError::Configuration(_))));
}

#[test]
fn test_settings_or_prefers_first_non_empty_value() {
    let merged = settings(Some(""), Some("https://a.example.com/api/v4/"))
        .or(settings(Some("glpat-fallback"), Some("https://b.example.com/api/v4/")));

    assert_eq!(merged.token.as_deref(), Some("glpat-fallback"));
    assert_eq!(
        merged.base_url.as_deref(),
        Some("https://a.example.com/api/v4/")
    );
}

#[test]
fn test_settings_debug_hides_token() {
    let output = format!("{:?}", settings(Some("glpat-secret"), None));

    assert!(!output.contains("glpat-secret"));
    assert!(output.contains("REDACTED"));
}

#[test]
#[serial]
fn test_from_env_reads_variables() {
    clear_env();
    unsafe {
        env::set_var(TOKEN_ENV_VAR, "glpat-env");
        env::set_var(BASE_URL_ENV_VAR, "https://gitlab.example.com/api/v4/");
    }

    let config = ProviderConfig::from_env();
    clear_env();

    let config = config.expect("environment should configure the provider");
    assert_eq!(config.token().expose_secret(), "glpat-env");
    assert_eq!(
        config.base_url().as_str(),
        "https://gitlab.example.com/api/v4/"
    );
}

#[test]
#[serial]
fn test_from_env_without_token_fails() {
    clear_env();

    let result = ProviderConfig::from_env();

    assert!(matches!(result, Err(ProviderError::Configuration(_))));
}

#[test]
#[serial]
fn test_explicit_settings_override_environment() {
    clear_env();
    unsafe {
        env::set_var(TOKEN_ENV_VAR, "glpat-env");
    }

    let config = ProviderConfig::resolve(settings(Some("glpat-flag"), None));
    clear_env();

    assert_eq!(
        config.expect("explicit token").token().expose_secret(),
        "glpat-flag"
    );
}

#[test]
#[serial]
fn test_load_layers_file_between_explicit_and_environment() {
    clear_env();
    unsafe {
        env::set_var(TOKEN_ENV_VAR, "glpat-env");
        env::set_var(BASE_URL_ENV_VAR, "https://env.example.com/api/v4/");
    }
    let file = write_config(r#"base_url = "https://file.example.com/api/v4/""#);

    let config = ProviderConfig::load(ProviderSettings::default(), file.path());
    clear_env();

    let config = config.expect("file plus environment should configure the provider");
    assert_eq!(config.token().expose_secret(), "glpat-env");
    assert_eq!(
        config.base_url().as_str(),
        "https://file.example.com/api/v4/"
    );
}

#[test]
fn test_load_settings_rejects_unknown_keys() {
    let file = write_config("token = \"glpat-abc\"\norganisation = \"acme\"\n");

    let result = ProviderSettings::load(file.path());

    assert!(matches!(result, Err(ProviderError::Configuration(_))));
}

#[test]
fn test_load_settings_missing_file() {
    let result = ProviderSettings::load(Path::new("/definitely/not/here/gitlab.toml"));

    match result {
        Err(ProviderError::Configuration(message)) => assert!(message.contains("not found")),
        other => panic!("Expected a configuration error, got {other:?}"),
    }
}
