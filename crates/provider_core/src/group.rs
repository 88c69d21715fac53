//! The `gitlab_group` resource.

use async_trait::async_trait;
use gitlab_client::{GitLabApi, Group, GroupCreatePayload, GroupUpdatePayload, Lookup};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::errors::ProviderResult;
use crate::mapping::{apply_changes, apply_create, FieldMapping};
use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, AttributeType, Presence, ResourceSchema, Validator};
use crate::visibility::{string_to_visibility, visibility_to_string};

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;

pub const GROUP_TYPE_NAME: &str = "gitlab_group";

static GROUP_ATTRIBUTES: [Attribute; 9] = [
    Attribute::new(
        "name",
        AttributeType::String,
        Presence::Required,
        "The name of the group.",
    )
    .validated_by(Validator::Name),
    Attribute::new(
        "path",
        AttributeType::String,
        Presence::Required,
        "The path of the group, used in its URL.",
    )
    .validated_by(Validator::Path),
    Attribute::new(
        "description",
        AttributeType::String,
        Presence::Optional,
        "The description of the group.",
    ),
    Attribute::new(
        "visibility_level",
        AttributeType::String,
        Presence::OptionalComputed,
        "One of private, internal or public.",
    )
    .validated_by(Validator::Visibility),
    Attribute::new(
        "lfs_enabled",
        AttributeType::Bool,
        Presence::OptionalComputed,
        "Enable Large File Storage for projects in this group.",
    ),
    Attribute::new(
        "request_access_enabled",
        AttributeType::Bool,
        Presence::Optional,
        "Allow users to request member access.",
    ),
    Attribute::new(
        "web_url",
        AttributeType::String,
        Presence::Computed,
        "URL of the group page.",
    ),
    Attribute::new(
        "full_path",
        AttributeType::String,
        Presence::Computed,
        "Path including parent groups.",
    ),
    Attribute::new(
        "full_name",
        AttributeType::String,
        Presence::Computed,
        "Name including parent groups.",
    ),
];

pub static GROUP_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: GROUP_TYPE_NAME,
    description: "A GitLab group.",
    attributes: &GROUP_ATTRIBUTES,
};

/// Desired configuration of a group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility_level: Option<String>,
    #[serde(default)]
    pub lfs_enabled: Option<bool>,
    #[serde(default)]
    pub request_access_enabled: Option<bool>,
}

/// What `read` records for a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupState {
    pub name: String,
    pub path: String,
    pub description: Option<String>,
    pub visibility_level: Option<&'static str>,
    pub lfs_enabled: Option<bool>,
    pub request_access_enabled: Option<bool>,
    pub web_url: Option<String>,
    pub full_path: Option<String>,
    pub full_name: Option<String>,
}

impl From<&Group> for GroupState {
    fn from(group: &Group) -> Self {
        Self {
            name: group.name.clone(),
            path: group.path.clone(),
            description: group.description.clone(),
            visibility_level: group.visibility_level.and_then(visibility_to_string),
            lfs_enabled: group.lfs_enabled,
            request_access_enabled: group.request_access_enabled,
            web_url: group.web_url.clone(),
            full_path: group.full_path.clone(),
            full_name: group.full_name.clone(),
        }
    }
}

type GroupField = FieldMapping<GroupConfig, GroupCreatePayload, GroupUpdatePayload>;

static GROUP_FIELDS: [GroupField; 6] = [
    FieldMapping {
        name: "name",
        create: |c, p| p.name = c.name.clone(),
        update: Some(|c, u| u.name = Some(c.name.clone())),
    },
    FieldMapping {
        name: "path",
        create: |c, p| p.path = c.path.clone(),
        update: Some(|c, u| u.path = Some(c.path.clone())),
    },
    FieldMapping {
        name: "description",
        create: |c, p| p.description = c.description.clone(),
        update: Some(|c, u| u.description = Some(c.description.clone().unwrap_or_default())),
    },
    FieldMapping {
        name: "visibility_level",
        create: |c, p| {
            p.visibility_level = c.visibility_level.as_deref().and_then(string_to_visibility)
        },
        update: Some(|c, u| {
            u.visibility_level = c.visibility_level.as_deref().and_then(string_to_visibility)
        }),
    },
    FieldMapping {
        name: "lfs_enabled",
        create: |c, p| p.lfs_enabled = c.lfs_enabled,
        update: Some(|c, u| u.lfs_enabled = Some(c.lfs_enabled.unwrap_or_default())),
    },
    FieldMapping {
        name: "request_access_enabled",
        create: |c, p| p.request_access_enabled = c.request_access_enabled,
        update: Some(|c, u| {
            u.request_access_enabled = Some(c.request_access_enabled.unwrap_or_default())
        }),
    },
];

/// Lifecycle callbacks for GitLab groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupResource;

#[async_trait]
impl Resource for GroupResource {
    fn schema(&self) -> &'static ResourceSchema {
        &GROUP_SCHEMA
    }

    #[instrument(skip_all, fields(group_id = data.id()))]
    async fn exists(&self, client: &dyn GitLabApi, data: &ResourceData) -> ProviderResult<bool> {
        if data.id().is_none() {
            return Ok(false);
        }
        let id = data.parse_id()?;

        match client.get_group(id).await {
            Lookup::Found(_) => Ok(true),
            Lookup::NotFound => Ok(false),
            Lookup::Error(e) => Err(e.into()),
        }
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &dyn GitLabApi, data: &mut ResourceData) -> ProviderResult<()> {
        GROUP_SCHEMA.validate(data.config())?;
        let config: GroupConfig = data.typed_config()?;

        let mut payload = GroupCreatePayload::default();
        apply_create(&GROUP_FIELDS, &config, &mut payload);

        debug!(name = %payload.name, path = %payload.path, "Creating group");
        let group = client.create_group(&payload).await?;
        data.set_id(group.id.to_string());

        self.read(client, data).await
    }

    #[instrument(skip_all, fields(group_id = data.id()))]
    async fn read(&self, client: &dyn GitLabApi, data: &mut ResourceData) -> ProviderResult<()> {
        let id = data.parse_id()?;
        debug!("Reading group");

        match client.get_group(id).await {
            Lookup::Found(group) => data.set_all(&GroupState::from(&group)),
            Lookup::NotFound => {
                warn!("removing group {id} from state because it no longer exists in gitlab");
                data.clear_id();
                Ok(())
            }
            Lookup::Error(e) => Err(e.into()),
        }
    }

    #[instrument(skip_all, fields(group_id = data.id()))]
    async fn update(&self, client: &dyn GitLabApi, data: &mut ResourceData) -> ProviderResult<()> {
        GROUP_SCHEMA.validate(data.config())?;
        let id = data.parse_id()?;
        let config: GroupConfig = data.typed_config()?;

        let mut payload = GroupUpdatePayload::default();
        let changed = apply_changes(&GROUP_FIELDS, &GROUP_SCHEMA, data, &config, &mut payload);

        if payload.is_empty() {
            debug!("No group attributes changed");
        } else {
            debug!(?changed, "Updating group");
            client.update_group(id, &payload).await?;
        }

        self.read(client, data).await
    }

    #[instrument(skip_all, fields(group_id = data.id()))]
    async fn delete(&self, client: &dyn GitLabApi, data: &mut ResourceData) -> ProviderResult<()> {
        let id = data.parse_id()?;
        debug!("Deleting group");

        client.delete_group(id).await?;
        data.clear_id();
        Ok(())
    }
}
