//! Checks that a namespace ID exists before a project is placed into it.

use gitlab_client::{GitLabApi, NamespaceKind};
use tracing::{debug, instrument};

use crate::errors::{ProviderError, ProviderResult};

#[cfg(test)]
#[path = "namespace_tests.rs"]
mod tests;

/// Finds the namespace with the given ID among those visible to the token and returns its
/// kind.
///
/// The full namespace list is fetched on every call; nothing is cached.
///
/// # Errors
/// - `ProviderError::NamespaceLookup` if listing namespaces fails
/// - `ProviderError::InvalidNamespace` if no namespace has that ID
#[instrument(skip_all, fields(namespace_id = id))]
pub async fn resolve_namespace(client: &dyn GitLabApi, id: u64) -> ProviderResult<NamespaceKind> {
    let namespaces = client
        .list_namespaces()
        .await
        .map_err(ProviderError::NamespaceLookup)?;

    match namespaces.iter().find(|n| n.id == id) {
        Some(namespace) => {
            debug!(kind = %namespace.kind, "Namespace with ID found");
            Ok(namespace.kind)
        }
        None => Err(ProviderError::InvalidNamespace(id)),
    }
}
