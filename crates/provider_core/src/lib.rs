//! # GitLab Provider Core
//!
//! This crate exposes GitLab groups and projects as declarative resources. A host hands
//! each lifecycle callback the desired configuration of one resource instance together
//! with its recorded state, and the callback issues the GitLab API calls needed to make
//! the remote object match.
//!
//! ## Overview
//!
//! Each resource type implements [`Resource`]:
//! 1. `exists` asks GitLab whether the recorded object is still there
//! 2. `create` validates the configuration locally, creates the object and reads it back
//! 3. `read` refreshes the recorded state; a 404 clears the identifier instead of failing
//! 4. `update` sends only the attributes that changed, then reads back
//! 5. `delete` removes the object and forgets it
//!
//! ## Main Types
//!
//! - [`Provider`] - owns the shared GitLab client and dispatches by resource type name
//! - [`ProviderConfig`] - token and base URL, resolved from flags, a file or the environment
//! - [`ResourceData`] - identifier, desired configuration and recorded state of one instance
//! - [`GroupResource`] / [`ProjectResource`] - the `gitlab_group` and `gitlab_project` callbacks
//!
//! ## Examples
//!
//! ```no_run
//! use provider_core::{Provider, ProviderConfig, ProviderSettings, ResourceData};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProviderConfig::resolve(ProviderSettings::default())?;
//! let provider = Provider::configure(&config)?;
//!
//! let desired = json!({"name": "Platform", "path": "platform", "visibility_level": "internal"});
//! let mut data = ResourceData::new(desired.as_object().cloned().unwrap_or_default());
//!
//! provider.create("gitlab_group", &mut data).await?;
//! println!("Created group {:?}", data.id());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every callback returns [`ProviderResult`]. Local validation failures are reported all
//! at once in [`ProviderError::Validation`] before any request is made; GitLab failures
//! are passed through in [`ProviderError::Remote`] and never retried.

pub mod config;
pub mod errors;
pub mod group;
pub mod mapping;
pub mod namespace;
pub mod project;
pub mod provider;
pub mod resource;
pub mod resource_data;
pub mod schema;
pub mod validation;
pub mod visibility;

pub use config::{ProviderConfig, ProviderSettings, BASE_URL_ENV_VAR, TOKEN_ENV_VAR};
pub use errors::{ProviderError, ProviderResult, ValidationError};
pub use group::{GroupConfig, GroupResource, GroupState, GROUP_SCHEMA, GROUP_TYPE_NAME};
pub use namespace::resolve_namespace;
pub use project::{
    ProjectConfig, ProjectResource, ProjectState, PROJECT_SCHEMA, PROJECT_TYPE_NAME,
};
pub use provider::{resource_for, schemas, validate_resource_config, Provider, RESOURCE_TYPES};
pub use resource::Resource;
pub use resource_data::ResourceData;
pub use schema::{Attribute, AttributeType, Presence, ResourceSchema, Validator};
