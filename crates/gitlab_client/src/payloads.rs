//! Request bodies for the GitLab create, edit and transfer endpoints.
//!
//! Every optional field is skipped when `None`, so a payload only carries what the caller
//! set. For the create payloads that means GitLab's defaults apply to everything left
//! out; for the update payloads it means untouched attributes stay as they are remotely.

use serde::Serialize;

use crate::models::VisibilityLevel;

#[cfg(test)]
#[path = "payloads_tests.rs"]
mod tests;

/// Represents the payload for creating a new group via the REST API.
/// Use `Default::default()` and modify fields as needed.
#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct GroupCreatePayload {
    pub name: String,

    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfs_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_access_enabled: Option<bool>,

    /// Sent as the v4 `visibility` name
    #[serde(rename = "visibility", skip_serializing_if = "Option::is_none")]
    pub visibility_level: Option<VisibilityLevel>,
}

/// Represents the group settings that can be updated.
/// Fields left as `None` are not sent and remain unchanged on GitLab.
#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct GroupUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfs_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_access_enabled: Option<bool>,

    /// Sent as the v4 `visibility` name
    #[serde(rename = "visibility", skip_serializing_if = "Option::is_none")]
    pub visibility_level: Option<VisibilityLevel>,
}

impl GroupUpdatePayload {
    /// Returns `true` when no field is set, i.e. sending the payload would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Represents the payload for creating a new project via the REST API.
#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct ProjectCreatePayload {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_requests_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub builds_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippets_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_registry_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_runners_enabled: Option<bool>,

    /// Sent as the v4 `visibility` name
    #[serde(rename = "visibility", skip_serializing_if = "Option::is_none")]
    pub visibility_level: Option<VisibilityLevel>,

    /// Repository to import from. Only honoured by GitLab at creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_builds: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_allow_merge_if_build_succeeds: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_allow_merge_if_all_discussions_are_resolved: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfs_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_access_enabled: Option<bool>,
}

/// Represents the project settings that can be edited.
///
/// There is deliberately no `import_url` or `namespace_id` here: imports only happen at
/// creation and moving a project goes through [`ProjectTransferPayload`].
#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct ProjectUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_requests_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub builds_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippets_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_registry_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_runners_enabled: Option<bool>,

    /// Sent as the v4 `visibility` name
    #[serde(rename = "visibility", skip_serializing_if = "Option::is_none")]
    pub visibility_level: Option<VisibilityLevel>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_builds: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_allow_merge_if_build_succeeds: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_allow_merge_if_all_discussions_are_resolved: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfs_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_access_enabled: Option<bool>,
}

impl ProjectUpdatePayload {
    /// Returns `true` when no field is set, i.e. sending the payload would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `PUT /projects/:id/transfer`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProjectTransferPayload {
    /// ID of the namespace the project moves into
    pub namespace: u64,
}
