//! # Models
//!
//! Data models returned by the GitLab REST API for the objects this provider manages:
//! groups, projects and namespaces. Only the fields the provider reads are modelled;
//! everything else in the response body is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// GitLab's visibility level.
///
/// API v4 names the level (`"visibility": "internal"`); older servers sent the number
/// (`"visibility_level": 10`). Both forms deserialize. A known level serializes as its
/// name, so payloads carry the v4 form. Only three values are defined, but the type is
/// open so a level this client does not know about is kept as its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibilityLevel(pub u32);

impl VisibilityLevel {
    /// Access must be granted explicitly to each user.
    pub const PRIVATE: VisibilityLevel = VisibilityLevel(0);

    /// Visible to any authenticated user.
    pub const INTERNAL: VisibilityLevel = VisibilityLevel(10);

    /// Visible without authentication.
    pub const PUBLIC: VisibilityLevel = VisibilityLevel(20);

    /// Returns the raw numeric level.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Looks up a level by its v4 name. The match is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "private" => Some(Self::PRIVATE),
            "internal" => Some(Self::INTERNAL),
            "public" => Some(Self::PUBLIC),
            _ => None,
        }
    }

    /// Returns the v4 name, or `None` for a level without one.
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Self::PRIVATE => Some("private"),
            Self::INTERNAL => Some("internal"),
            Self::PUBLIC => Some("public"),
            _ => None,
        }
    }
}

/// The two wire encodings of a visibility level.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawVisibility {
    Level(u32),
    Name(String),
}

impl Serialize for VisibilityLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.name() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_u32(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for VisibilityLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawVisibility::deserialize(deserializer)? {
            RawVisibility::Level(level) => Ok(VisibilityLevel(level)),
            RawVisibility::Name(name) => VisibilityLevel::from_name(&name).ok_or_else(|| {
                de::Error::unknown_variant(&name, &["private", "internal", "public"])
            }),
        }
    }
}

/// Reads the visibility of a group or project. An unknown name is recorded as no
/// visibility rather than failing the whole object.
fn deserialize_visibility<'de, D>(deserializer: D) -> Result<Option<VisibilityLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawVisibility>::deserialize(deserializer)? {
        Some(RawVisibility::Level(level)) => Some(VisibilityLevel(level)),
        Some(RawVisibility::Name(name)) => VisibilityLevel::from_name(&name),
        None => None,
    })
}

/// Represents a GitLab group.
///
/// # Examples
///
/// ```rust
/// use gitlab_client::models::{Group, VisibilityLevel};
///
/// let group: Group = serde_json::from_str(
///     r#"{"id": 7, "name": "infra", "path": "infra", "visibility": "public"}"#,
/// ).unwrap();
///
/// assert_eq!(group.id, 7);
/// assert_eq!(group.visibility_level, Some(VisibilityLevel::PUBLIC));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Group {
    /// The unique numeric ID of the group
    pub id: u64,
    /// Display name
    pub name: String,
    /// URL path segment
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "visibility",
        alias = "visibility_level",
        deserialize_with = "deserialize_visibility"
    )]
    pub visibility_level: Option<VisibilityLevel>,
    #[serde(default)]
    pub lfs_enabled: Option<bool>,
    #[serde(default)]
    pub request_access_enabled: Option<bool>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub full_path: Option<String>,
}

/// The kind of a GitLab namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceKind {
    /// A user's personal namespace
    User,
    /// A group (or subgroup) namespace
    Group,
    /// Any kind this client does not recognise
    #[serde(other)]
    Unknown,
}

impl NamespaceKind {
    /// Returns the kind tag as GitLab spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a GitLab namespace, either a user account or a group.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Namespace {
    /// The unique numeric ID of the namespace
    pub id: u64,
    pub name: String,
    pub path: String,
    pub kind: NamespaceKind,
    #[serde(default)]
    pub full_path: Option<String>,
}

/// Minimal reference to another GitLab object, used for nested `owner` and
/// `forked_from_project` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ObjectRef {
    pub id: u64,
}

/// Represents a GitLab project.
///
/// Feature flags are optional because GitLab returns `null` for features that are not
/// available on the instance. Newer API field names (`jobs_enabled`, `public_jobs`,
/// `only_allow_merge_if_pipeline_succeeds`, `star_count`) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Project {
    /// The unique numeric ID of the project
    pub id: u64,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub namespace: Option<Namespace>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub issues_enabled: Option<bool>,
    #[serde(default)]
    pub merge_requests_enabled: Option<bool>,
    #[serde(default, alias = "jobs_enabled")]
    pub builds_enabled: Option<bool>,
    #[serde(default)]
    pub wiki_enabled: Option<bool>,
    #[serde(default)]
    pub snippets_enabled: Option<bool>,
    #[serde(default)]
    pub container_registry_enabled: Option<bool>,
    #[serde(default)]
    pub shared_runners_enabled: Option<bool>,
    #[serde(
        default,
        rename = "visibility",
        alias = "visibility_level",
        deserialize_with = "deserialize_visibility"
    )]
    pub visibility_level: Option<VisibilityLevel>,
    #[serde(default, alias = "public_jobs")]
    pub public_builds: Option<bool>,
    #[serde(default, alias = "only_allow_merge_if_pipeline_succeeds")]
    pub only_allow_merge_if_build_succeeds: Option<bool>,
    #[serde(default)]
    pub only_allow_merge_if_all_discussions_are_resolved: Option<bool>,
    #[serde(default)]
    pub lfs_enabled: Option<bool>,
    #[serde(default)]
    pub request_access_enabled: Option<bool>,

    // Read-only, assigned by GitLab.
    #[serde(default)]
    pub ssh_url_to_repo: Option<String>,
    #[serde(default)]
    pub http_url_to_repo: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub owner: Option<ObjectRef>,
    #[serde(default)]
    pub name_with_namespace: Option<String>,
    #[serde(default)]
    pub path_with_namespace: Option<String>,
    #[serde(default)]
    pub open_issues_count: Option<u64>,
    #[serde(default)]
    pub approvals_before_merge: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creator_id: Option<u64>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default, alias = "star_count")]
    pub stars_count: Option<u64>,
    #[serde(default)]
    pub runners_token: Option<String>,
    #[serde(default)]
    pub forked_from_project: Option<ObjectRef>,
}
