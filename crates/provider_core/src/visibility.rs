//! Conversion between the configured visibility names and GitLab's numeric levels.
//!
//! Configuration uses `private`, `internal` and `public`; the API uses
//! [`VisibilityLevel`] values 0, 10 and 20. Both directions return `None` for anything
//! outside those three, and callers treat `None` as "leave the field unset".

use gitlab_client::VisibilityLevel;

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;

/// Visibility names accepted in configuration.
pub const VISIBILITY_VALUES: [&str; 3] = ["private", "internal", "public"];

/// Maps a configured visibility name to GitLab's level.
///
/// The match is exact; unrecognised input returns `None`, never an error or a default.
/// Validation accepts any casing (`"Internal"` passes), so a mis-cased value validates
/// and is then left unset.
///
/// # Examples
///
/// ```rust
/// use gitlab_client::VisibilityLevel;
/// use provider_core::visibility::string_to_visibility;
///
/// assert_eq!(string_to_visibility("internal"), Some(VisibilityLevel::INTERNAL));
/// assert_eq!(string_to_visibility("unknown"), None);
/// ```
pub fn string_to_visibility(value: &str) -> Option<VisibilityLevel> {
    VisibilityLevel::from_name(value)
}

/// Maps a GitLab level back to its configuration name.
pub fn visibility_to_string(level: VisibilityLevel) -> Option<&'static str> {
    level.name()
}
