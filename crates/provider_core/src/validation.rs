//! Local checks for group and project names and paths.
//!
//! These mirror GitLab's own naming rules so that a bad value is rejected before any
//! request is made. GitLab re-validates on its side; passing here is no guarantee.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::ValidationError;

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;

static VALID_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\.\- ]+$").expect("name pattern is valid"));

static VALID_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_\.][a-zA-Z0-9_\.\-]*[a-zA-Z0-9_\-]+$").expect("path pattern is valid")
});

/// Path suffixes GitLab reserves for its own routes.
const RESERVED_PATH_SUFFIXES: [&str; 2] = [".atom", ".git"];

/// Checks a group or project name.
///
/// A name can contain only letters, digits, `_`, `.`, dash and space.
///
/// # Examples
///
/// ```rust
/// use provider_core::validation::validate_name;
///
/// assert!(validate_name("My New App - 02.").is_empty());
/// assert_eq!(validate_name("My New App 02#").len(), 1);
/// ```
pub fn validate_name(value: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !VALID_NAME.is_match(value) {
        errors.push(ValidationError::InvalidName {
            value: value.to_string(),
        });
    }
    errors
}

/// Checks a group or project path.
///
/// A path can contain only letters, digits, `_`, `-` and `.`; it cannot start with `-`,
/// end in `.`, or end in `.git` / `.atom`. Each broken rule adds its own error, so a value
/// like `-repo.git` yields two.
///
/// # Examples
///
/// ```rust
/// use provider_core::validation::validate_path;
///
/// assert!(validate_path("my-project_01").is_empty());
/// assert_eq!(validate_path("-my-project.git").len(), 2);
/// ```
pub fn validate_path(value: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !VALID_PATH.is_match(value) {
        errors.push(ValidationError::InvalidPath {
            value: value.to_string(),
        });
    }
    for suffix in RESERVED_PATH_SUFFIXES {
        if value.ends_with(suffix) {
            errors.push(ValidationError::ReservedPathSuffix {
                value: value.to_string(),
                suffix,
            });
        }
    }
    errors
}

/// Checks that `value` is one of `allowed`, ignoring ASCII case.
pub fn validate_one_of(attribute: &str, value: &str, allowed: &[&str]) -> Vec<ValidationError> {
    if allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
        return Vec::new();
    }
    vec![ValidationError::NotAllowed {
        attribute: attribute.to_string(),
        value: value.to_string(),
        allowed: allowed.join(", "),
    }]
}
