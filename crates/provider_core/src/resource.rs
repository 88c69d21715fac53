//! The lifecycle contract every managed resource type implements.

use async_trait::async_trait;
use gitlab_client::GitLabApi;

use crate::errors::ProviderResult;
use crate::resource_data::ResourceData;
use crate::schema::ResourceSchema;

/// Lifecycle callbacks for one resource type.
///
/// A host calls these one at a time per resource instance. Callbacks for different
/// instances may run concurrently against the same client.
///
/// `read` is authoritative: it overwrites the recorded state with what GitLab reports, and
/// clears the identifier when the object no longer exists. `create` and `update` finish
/// with a `read`.
#[async_trait]
pub trait Resource: Send + Sync {
    /// The attribute table for this resource type.
    fn schema(&self) -> &'static ResourceSchema;

    /// Name hosts use to refer to this resource type, e.g. `gitlab_group`.
    fn type_name(&self) -> &'static str {
        self.schema().type_name
    }

    /// Reports whether the object behind the recorded identifier still exists.
    async fn exists(&self, client: &dyn GitLabApi, data: &ResourceData) -> ProviderResult<bool>;

    /// Creates the object from the configuration and records its state.
    async fn create(&self, client: &dyn GitLabApi, data: &mut ResourceData)
        -> ProviderResult<()>;

    /// Refreshes the recorded state from GitLab.
    async fn read(&self, client: &dyn GitLabApi, data: &mut ResourceData) -> ProviderResult<()>;

    /// Sends the attributes that differ from the recorded state, then refreshes it.
    async fn update(&self, client: &dyn GitLabApi, data: &mut ResourceData)
        -> ProviderResult<()>;

    /// Deletes the object and forgets it.
    async fn delete(&self, client: &dyn GitLabApi, data: &mut ResourceData)
        -> ProviderResult<()>;
}
