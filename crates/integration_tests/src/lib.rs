//! Integration testing library for the GitLab provider.
//!
//! Tests in `tests/` run the provider against a [`wiremock`] server that speaks the
//! GitLab REST API, so the whole stack is exercised: resource callbacks, payload
//! serialization, the HTTP client and status code mapping.

use std::sync::{Arc, Once};

use gitlab_client::{create_token_client, Group, Project};
use provider_core::{GroupState, ProjectState, Provider, ResourceData};
use serde_json::{json, Map, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wiremock::MockServer;

/// Prefix every mocked GitLab endpoint lives under.
pub const API_PREFIX: &str = "/api/v4";

/// Token the provider under test sends.
pub const TEST_TOKEN: &str = "glpat-integration-test";

static INIT_LOGGING: Once = Once::new();

/// Enables log output for a test run, filtered by `RUST_LOG`.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A mock GitLab server and a provider pointed at it.
pub struct TestGitLab {
    pub server: MockServer,
    pub provider: Provider,
}

impl TestGitLab {
    pub async fn start() -> Self {
        init_logging();
        let server = MockServer::start().await;
        let base_url = format!("{}{}", server.uri(), API_PREFIX);
        debug!(%base_url, "Started mock GitLab server");

        let client = create_token_client(&base_url, TEST_TOKEN)
            .expect("mock server URI should be a valid base URL");
        Self {
            server,
            provider: Provider::new(Arc::new(client)),
        }
    }
}

/// Returns the mocked path for an API endpoint, e.g. `api_path("groups/7")`.
pub fn api_path(endpoint: &str) -> String {
    format!("{API_PREFIX}/{endpoint}")
}

/// Builds resource data for a first `create` from a JSON object literal.
pub fn new_resource(config: Value) -> ResourceData {
    ResourceData::new(object(config))
}

/// Builds resource data for an existing object: its ID, recorded state and new config.
pub fn existing_resource(id: u64, state: Value, config: Value) -> ResourceData {
    ResourceData::with_state(Some(id.to_string()), object(state), object(config))
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got {other}"),
    }
}

/// A group as returned by `GET /groups/:id`.
pub fn group_body(id: u64, name: &str, path: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "path": path,
        "description": "",
        "visibility": "private",
        "lfs_enabled": true,
        "request_access_enabled": false,
        "web_url": format!("https://gitlab.example.com/groups/{path}"),
        "full_name": name,
        "full_path": path,
    })
}

/// A project as returned by `GET /projects/:id`, living in `namespace`.
///
/// Uses the newer field names (`jobs_enabled`, `public_jobs`, ...) so the aliases in the
/// client models are exercised too.
pub fn project_body(id: u64, name: &str, namespace: Value) -> Value {
    let path = name.to_lowercase().replace(' ', "-");
    let full_path = format!(
        "{}/{}",
        namespace["full_path"].as_str().unwrap_or("root"),
        path
    );
    json!({
        "id": id,
        "name": name,
        "path": path,
        "default_branch": "main",
        "namespace": namespace,
        "description": "",
        "issues_enabled": true,
        "merge_requests_enabled": true,
        "jobs_enabled": true,
        "wiki_enabled": true,
        "snippets_enabled": true,
        "container_registry_enabled": true,
        "shared_runners_enabled": true,
        "visibility": "private",
        "public_jobs": true,
        "only_allow_merge_if_pipeline_succeeds": false,
        "only_allow_merge_if_all_discussions_are_resolved": false,
        "lfs_enabled": true,
        "request_access_enabled": false,
        "ssh_url_to_repo": format!("git@gitlab.example.com:{full_path}.git"),
        "http_url_to_repo": format!("https://gitlab.example.com/{full_path}.git"),
        "web_url": format!("https://gitlab.example.com/{full_path}"),
        "name_with_namespace": format!("Root / {name}"),
        "path_with_namespace": full_path,
        "open_issues_count": 0,
        "created_at": "2024-03-01T09:30:00.000Z",
        "last_activity_at": "2024-03-02T10:00:00.000Z",
        "creator_id": 1,
        "archived": false,
        "forks_count": 0,
        "star_count": 0,
    })
}

/// A namespace entry as returned by `GET /namespaces`.
pub fn namespace_body(id: u64, path: &str, kind: &str) -> Value {
    json!({
        "id": id,
        "name": path,
        "path": path,
        "kind": kind,
        "full_path": path,
    })
}

/// The state the provider records after reading `body` from `GET /groups/:id`.
pub fn recorded_group_state(body: Value) -> Value {
    let group: Group = serde_json::from_value(body).expect("group body should deserialize");
    serde_json::to_value(GroupState::from(&group)).expect("group state should serialize")
}

/// The state the provider records after reading `body` from `GET /projects/:id`.
pub fn recorded_project_state(body: Value) -> Value {
    let project: Project = serde_json::from_value(body).expect("project body should deserialize");
    serde_json::to_value(ProjectState::from(&project)).expect("project state should serialize")
}
