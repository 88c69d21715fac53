//! Provider bootstrap and dispatch by resource type name.

use std::sync::Arc;

use gitlab_client::{GitLabApi, GitLabClient};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::config::ProviderConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::group::{GroupResource, GROUP_SCHEMA, GROUP_TYPE_NAME};
use crate::project::{ProjectResource, PROJECT_SCHEMA, PROJECT_TYPE_NAME};
use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::ResourceSchema;

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;

/// Every resource type the provider manages.
pub const RESOURCE_TYPES: [&str; 2] = [GROUP_TYPE_NAME, PROJECT_TYPE_NAME];

/// Looks up the lifecycle callbacks for a resource type.
///
/// # Errors
/// `ProviderError::UnknownResourceType` for anything but `gitlab_group` and `gitlab_project`.
pub fn resource_for(type_name: &str) -> ProviderResult<&'static dyn Resource> {
    match type_name {
        GROUP_TYPE_NAME => Ok(&GroupResource),
        PROJECT_TYPE_NAME => Ok(&ProjectResource),
        other => Err(ProviderError::UnknownResourceType(other.to_string())),
    }
}

/// Returns the attribute tables of every resource type.
pub fn schemas() -> [&'static ResourceSchema; 2] {
    [&GROUP_SCHEMA, &PROJECT_SCHEMA]
}

/// Checks a desired configuration for a resource type without contacting GitLab.
///
/// # Examples
///
/// ```rust
/// use provider_core::validate_resource_config;
/// use serde_json::json;
///
/// let config = json!({"name": "My App#", "path": "my-app.git"});
/// let err = validate_resource_config("gitlab_group", config.as_object().unwrap()).unwrap_err();
/// assert!(err.is_validation());
/// ```
pub fn validate_resource_config(type_name: &str, config: &Map<String, Value>) -> ProviderResult<()> {
    resource_for(type_name)?.schema().validate(config)
}

/// Entry point for a host: owns the GitLab client shared by every callback.
///
/// Cloning is cheap; clones share the same client.
#[derive(Clone)]
pub struct Provider {
    client: Arc<dyn GitLabApi>,
}

impl Provider {
    /// Wraps an existing client, e.g. an in-memory fake in tests.
    pub fn new(client: Arc<dyn GitLabApi>) -> Self {
        Self { client }
    }

    /// Builds the HTTP client from a resolved configuration.
    ///
    /// # Errors
    /// `ProviderError::Remote` if the HTTP client cannot be constructed.
    #[instrument(skip(config), fields(base_url = %config.base_url()))]
    pub fn configure(config: &ProviderConfig) -> ProviderResult<Self> {
        let client = GitLabClient::new(config.base_url().clone(), config.token().clone())?;
        info!("Configured GitLab provider");
        Ok(Self::new(Arc::new(client)))
    }

    pub fn client(&self) -> &dyn GitLabApi {
        self.client.as_ref()
    }

    /// See [`resource_for`].
    pub fn resource(&self, type_name: &str) -> ProviderResult<&'static dyn Resource> {
        resource_for(type_name)
    }

    /// See [`validate_resource_config`].
    pub fn validate_resource_config(
        &self,
        type_name: &str,
        config: &Map<String, Value>,
    ) -> ProviderResult<()> {
        validate_resource_config(type_name, config)
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    pub async fn exists(&self, type_name: &str, data: &ResourceData) -> ProviderResult<bool> {
        self.resource(type_name)?.exists(self.client(), data).await
    }

    #[instrument(skip(self, data))]
    pub async fn create(&self, type_name: &str, data: &mut ResourceData) -> ProviderResult<()> {
        self.resource(type_name)?.create(self.client(), data).await?;
        debug!(id = data.id(), "Created resource");
        Ok(())
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    pub async fn read(&self, type_name: &str, data: &mut ResourceData) -> ProviderResult<()> {
        self.resource(type_name)?.read(self.client(), data).await
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    pub async fn update(&self, type_name: &str, data: &mut ResourceData) -> ProviderResult<()> {
        self.resource(type_name)?.update(self.client(), data).await
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    pub async fn delete(&self, type_name: &str, data: &mut ResourceData) -> ProviderResult<()> {
        self.resource(type_name)?.delete(self.client(), data).await
    }
}
