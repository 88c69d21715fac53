//! The `gitlab_project` resource.
//!
//! Projects follow the same lifecycle as groups with three additions: a configured
//! `namespace_id` is checked against the namespaces visible to the token before anything
//! is created, a changed `namespace_id` moves the project with a transfer call, and
//! `import_url` is only ever sent at creation.

use async_trait::async_trait;
use gitlab_client::{
    GitLabApi, Lookup, Project, ProjectCreatePayload, ProjectTransferPayload,
    ProjectUpdatePayload,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::errors::ProviderResult;
use crate::mapping::{apply_changes, apply_create, FieldMapping};
use crate::namespace::resolve_namespace;
use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, AttributeType, Presence, ResourceSchema, Validator};
use crate::visibility::{string_to_visibility, visibility_to_string};

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;

pub const PROJECT_TYPE_NAME: &str = "gitlab_project";

const NAMESPACE_ID: Attribute = Attribute::new(
    "namespace_id",
    AttributeType::Int,
    Presence::OptionalComputed,
    "Namespace for the project; the current user's namespace by default, or the ID of a group.",
);

const fn flag(name: &'static str, presence: Presence, description: &'static str) -> Attribute {
    Attribute::new(name, AttributeType::Bool, presence, description)
}

const fn computed(name: &'static str, kind: AttributeType, description: &'static str) -> Attribute {
    Attribute::new(name, kind, Presence::Computed, description)
}

static PROJECT_ATTRIBUTES: [Attribute; 36] = [
    Attribute::new(
        "name",
        AttributeType::String,
        Presence::Required,
        "The name of the project.",
    )
    .validated_by(Validator::Name),
    Attribute::new(
        "path",
        AttributeType::String,
        Presence::OptionalComputed,
        "Repository path; generated from the name by default.",
    )
    .validated_by(Validator::Path),
    Attribute::new(
        "default_branch",
        AttributeType::String,
        Presence::OptionalComputed,
        "The default branch of the repository.",
    ),
    NAMESPACE_ID,
    Attribute::new(
        "description",
        AttributeType::String,
        Presence::Optional,
        "Short project description.",
    ),
    flag(
        "issues_enabled",
        Presence::OptionalComputed,
        "Enable issues for this project.",
    ),
    flag(
        "merge_requests_enabled",
        Presence::OptionalComputed,
        "Enable merge requests for this project.",
    ),
    flag(
        "builds_enabled",
        Presence::OptionalComputed,
        "Enable builds for this project.",
    ),
    flag(
        "wiki_enabled",
        Presence::OptionalComputed,
        "Enable the wiki for this project.",
    ),
    flag(
        "snippets_enabled",
        Presence::OptionalComputed,
        "Enable snippets for this project.",
    ),
    flag(
        "container_registry_enabled",
        Presence::OptionalComputed,
        "Enable the container registry for this project.",
    ),
    flag(
        "shared_runners_enabled",
        Presence::OptionalComputed,
        "Enable shared runners for this project.",
    ),
    Attribute::new(
        "visibility_level",
        AttributeType::String,
        Presence::OptionalComputed,
        "One of private, internal or public.",
    )
    .validated_by(Validator::Visibility),
    Attribute::new(
        "import_url",
        AttributeType::String,
        Presence::Optional,
        "URL to import the repository from. Only used at creation.",
    ),
    flag(
        "public_builds",
        Presence::OptionalComputed,
        "If true, builds can be viewed by non-project-members.",
    ),
    flag(
        "only_allow_merge_if_build_succeeds",
        Presence::Optional,
        "Merge requests can only be merged with successful builds.",
    ),
    flag(
        "only_allow_merge_if_all_discussions_are_resolved",
        Presence::Optional,
        "Merge requests can only be merged when all discussions are resolved.",
    ),
    flag(
        "lfs_enabled",
        Presence::OptionalComputed,
        "Enable Large File Storage.",
    ),
    flag(
        "request_access_enabled",
        Presence::OptionalComputed,
        "Allow users to request member access.",
    ),
    computed(
        "ssh_url_to_repo",
        AttributeType::String,
        "URL to clone the repository over SSH.",
    ),
    computed(
        "http_url_to_repo",
        AttributeType::String,
        "URL to clone the repository over HTTPS.",
    ),
    computed("web_url", AttributeType::String, "URL of the project page."),
    computed(
        "owner_id",
        AttributeType::Int,
        "ID of the owning user, for projects in a personal namespace.",
    ),
    computed(
        "name_with_namespace",
        AttributeType::String,
        "Name prefixed with the namespace name.",
    ),
    computed(
        "path_with_namespace",
        AttributeType::String,
        "Path prefixed with the namespace path.",
    ),
    computed(
        "open_issues_count",
        AttributeType::Int,
        "Number of open issues.",
    ),
    computed(
        "approvals_before_merge",
        AttributeType::Int,
        "Approvals required before merging.",
    ),
    computed(
        "created_at",
        AttributeType::String,
        "Creation time (RFC 3339).",
    ),
    computed(
        "last_activity_at",
        AttributeType::String,
        "Time of the last activity (RFC 3339).",
    ),
    computed(
        "creator_id",
        AttributeType::Int,
        "ID of the user who created the project.",
    ),
    computed("archived", AttributeType::Bool, "Whether the project is archived."),
    computed("avatar_url", AttributeType::String, "URL of the project avatar."),
    computed("forks_count", AttributeType::Int, "Number of forks."),
    computed("stars_count", AttributeType::Int, "Number of stars."),
    computed(
        "runners_token",
        AttributeType::String,
        "Token for registering project runners.",
    ),
    computed(
        "forked_from_project_id",
        AttributeType::Int,
        "ID of the project this one was forked from.",
    ),
];

pub static PROJECT_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: PROJECT_TYPE_NAME,
    description: "A GitLab project.",
    attributes: &PROJECT_ATTRIBUTES,
};

/// Desired configuration of a project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub path: Option<String>,
    pub default_branch: Option<String>,
    pub namespace_id: Option<u64>,
    pub description: Option<String>,
    pub issues_enabled: Option<bool>,
    pub merge_requests_enabled: Option<bool>,
    pub builds_enabled: Option<bool>,
    pub wiki_enabled: Option<bool>,
    pub snippets_enabled: Option<bool>,
    pub container_registry_enabled: Option<bool>,
    pub shared_runners_enabled: Option<bool>,
    pub visibility_level: Option<String>,
    pub import_url: Option<String>,
    pub public_builds: Option<bool>,
    pub only_allow_merge_if_build_succeeds: Option<bool>,
    pub only_allow_merge_if_all_discussions_are_resolved: Option<bool>,
    pub lfs_enabled: Option<bool>,
    pub request_access_enabled: Option<bool>,
}

/// What `read` records for a project.
///
/// `import_url` is missing on purpose: GitLab does not report it back, so the value
/// recorded at creation is left alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectState {
    pub name: String,
    pub path: String,
    pub default_branch: Option<String>,
    pub namespace_id: Option<u64>,
    pub description: Option<String>,
    pub issues_enabled: Option<bool>,
    pub merge_requests_enabled: Option<bool>,
    pub builds_enabled: Option<bool>,
    pub wiki_enabled: Option<bool>,
    pub snippets_enabled: Option<bool>,
    pub container_registry_enabled: Option<bool>,
    pub shared_runners_enabled: Option<bool>,
    pub visibility_level: Option<&'static str>,
    pub public_builds: Option<bool>,
    pub only_allow_merge_if_build_succeeds: Option<bool>,
    pub only_allow_merge_if_all_discussions_are_resolved: Option<bool>,
    pub lfs_enabled: Option<bool>,
    pub request_access_enabled: Option<bool>,

    pub ssh_url_to_repo: Option<String>,
    pub http_url_to_repo: Option<String>,
    pub web_url: Option<String>,
    pub owner_id: Option<u64>,
    pub name_with_namespace: Option<String>,
    pub path_with_namespace: Option<String>,
    pub open_issues_count: Option<u64>,
    pub approvals_before_merge: Option<u64>,
    pub created_at: Option<String>,
    pub last_activity_at: Option<String>,
    pub creator_id: Option<u64>,
    pub archived: Option<bool>,
    pub avatar_url: Option<String>,
    pub forks_count: Option<u64>,
    pub stars_count: Option<u64>,
    pub runners_token: Option<String>,
    pub forked_from_project_id: Option<u64>,
}

impl From<&Project> for ProjectState {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            path: project.path.clone(),
            default_branch: project.default_branch.clone(),
            namespace_id: project.namespace.as_ref().map(|n| n.id),
            description: project.description.clone(),
            issues_enabled: project.issues_enabled,
            merge_requests_enabled: project.merge_requests_enabled,
            builds_enabled: project.builds_enabled,
            wiki_enabled: project.wiki_enabled,
            snippets_enabled: project.snippets_enabled,
            container_registry_enabled: project.container_registry_enabled,
            shared_runners_enabled: project.shared_runners_enabled,
            visibility_level: project.visibility_level.and_then(visibility_to_string),
            public_builds: project.public_builds,
            only_allow_merge_if_build_succeeds: project.only_allow_merge_if_build_succeeds,
            only_allow_merge_if_all_discussions_are_resolved: project
                .only_allow_merge_if_all_discussions_are_resolved,
            lfs_enabled: project.lfs_enabled,
            request_access_enabled: project.request_access_enabled,
            ssh_url_to_repo: project.ssh_url_to_repo.clone(),
            http_url_to_repo: project.http_url_to_repo.clone(),
            web_url: project.web_url.clone(),
            owner_id: project.owner.map(|o| o.id),
            name_with_namespace: project.name_with_namespace.clone(),
            path_with_namespace: project.path_with_namespace.clone(),
            open_issues_count: project.open_issues_count,
            approvals_before_merge: project.approvals_before_merge,
            created_at: project.created_at.map(|t| t.to_rfc3339()),
            last_activity_at: project.last_activity_at.map(|t| t.to_rfc3339()),
            creator_id: project.creator_id,
            archived: project.archived,
            avatar_url: project.avatar_url.clone(),
            forks_count: project.forks_count,
            stars_count: project.stars_count,
            runners_token: project.runners_token.clone(),
            forked_from_project_id: project.forked_from_project.map(|p| p.id),
        }
    }
}

type ProjectField = FieldMapping<ProjectConfig, ProjectCreatePayload, ProjectUpdatePayload>;

/// Mapping for a boolean feature flag; a flag removed from the configuration is sent as
/// `false`.
macro_rules! flag_field {
    ($name:ident) => {
        FieldMapping {
            name: stringify!($name),
            create: |c, p| p.$name = c.$name,
            update: Some(|c, u| u.$name = Some(c.$name.unwrap_or_default())),
        }
    };
}

static PROJECT_FIELDS: [ProjectField; 19] = [
    FieldMapping {
        name: "name",
        create: |c, p| p.name = c.name.clone(),
        update: Some(|c, u| u.name = Some(c.name.clone()).filter(|n| !n.is_empty())),
    },
    FieldMapping {
        name: "path",
        create: |c, p| p.path = c.path.clone(),
        update: Some(|c, u| u.path = c.path.clone().filter(|p| !p.is_empty())),
    },
    FieldMapping {
        name: "default_branch",
        create: |c, p| p.default_branch = c.default_branch.clone(),
        update: Some(|c, u| u.default_branch = c.default_branch.clone()),
    },
    // Moving a project is a transfer, not an edit.
    FieldMapping {
        name: "namespace_id",
        create: |c, p| p.namespace_id = c.namespace_id,
        update: None,
    },
    FieldMapping {
        name: "description",
        create: |c, p| p.description = c.description.clone(),
        update: Some(|c, u| u.description = Some(c.description.clone().unwrap_or_default())),
    },
    flag_field!(issues_enabled),
    flag_field!(merge_requests_enabled),
    flag_field!(builds_enabled),
    flag_field!(wiki_enabled),
    flag_field!(snippets_enabled),
    flag_field!(container_registry_enabled),
    flag_field!(shared_runners_enabled),
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
        name: "import_url",
        create: |c, p| p.import_url = c.import_url.clone(),
        update: None,
    },
    flag_field!(public_builds),
    flag_field!(only_allow_merge_if_build_succeeds),
    flag_field!(only_allow_merge_if_all_discussions_are_resolved),
    flag_field!(lfs_enabled),
    flag_field!(request_access_enabled),
];

/// Lifecycle callbacks for GitLab projects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectResource;

#[async_trait]
impl Resource for ProjectResource {
    fn schema(&self) -> &'static ResourceSchema {
        &PROJECT_SCHEMA
    }

    #[instrument(skip_all, fields(project_id = data.id()))]
    async fn exists(&self, client: &dyn GitLabApi, data: &ResourceData) -> ProviderResult<bool> {
        if data.id().is_none() {
            return Ok(false);
        }
        let id = data.parse_id()?;

        match client.get_project(id).await {
            Lookup::Found(_) => Ok(true),
            Lookup::NotFound => Ok(false),
            Lookup::Error(e) => Err(e.into()),
        }
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &dyn GitLabApi, data: &mut ResourceData) -> ProviderResult<()> {
        PROJECT_SCHEMA.validate(data.config())?;
        let config: ProjectConfig = data.typed_config()?;

        if let Some(namespace_id) = config.namespace_id {
            let kind = resolve_namespace(client, namespace_id).await?;
            debug!(namespace_id, %kind, "Creating project in namespace");
        }

        let mut payload = ProjectCreatePayload::default();
        apply_create(&PROJECT_FIELDS, &config, &mut payload);

        debug!(name = %payload.name, "Creating project");
        let project = client.create_project(&payload).await?;
        data.set_id(project.id.to_string());
        if let Some(import_url) = &config.import_url {
            data.set("import_url", import_url.as_str());
        }

        self.read(client, data).await
    }

    #[instrument(skip_all, fields(project_id = data.id()))]
    async fn read(&self, client: &dyn GitLabApi, data: &mut ResourceData) -> ProviderResult<()> {
        let id = data.parse_id()?;
        debug!("Reading project");

        match client.get_project(id).await {
            Lookup::Found(project) => data.set_all(&ProjectState::from(&project)),
            Lookup::NotFound => {
                warn!("removing project {id} from state because it no longer exists in gitlab");
                data.clear_id();
                Ok(())
            }
            Lookup::Error(e) => Err(e.into()),
        }
    }

    #[instrument(skip_all, fields(project_id = data.id()))]
    async fn update(&self, client: &dyn GitLabApi, data: &mut ResourceData) -> ProviderResult<()> {
        PROJECT_SCHEMA.validate(data.config())?;
        let id = data.parse_id()?;
        let config: ProjectConfig = data.typed_config()?;

        if let Some(namespace_id) = config.namespace_id.filter(|_| data.has_change(&NAMESPACE_ID))
        {
            let kind = resolve_namespace(client, namespace_id).await?;
            debug!(namespace_id, %kind, "Transferring project");
            client
                .transfer_project(
                    id,
                    &ProjectTransferPayload {
                        namespace: namespace_id,
                    },
                )
                .await?;
        }

        let mut payload = ProjectUpdatePayload::default();
        let changed = apply_changes(&PROJECT_FIELDS, &PROJECT_SCHEMA, data, &config, &mut payload);

        if payload.is_empty() {
            debug!("No project attributes changed");
        } else {
            debug!(?changed, "Updating project");
            client.update_project(id, &payload).await?;
        }

        self.read(client, data).await
    }

    #[instrument(skip_all, fields(project_id = data.id()))]
    async fn delete(&self, client: &dyn GitLabApi, data: &mut ResourceData) -> ProviderResult<()> {
        let id = data.parse_id()?;
        debug!("Deleting project");

        client.delete_project(id).await?;
        data.clear_id();
        Ok(())
    }
}
