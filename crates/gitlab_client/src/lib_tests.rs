//! Unit tests for the gitlab_client crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate}; // For constructing mock bodies

// --- Test Constants ---
const TEST_TOKEN: &str = "glpat-test-token";

fn create_test_client(mock_server: &MockServer) -> GitLabClient {
    create_token_client(&format!("{}/api/v4", mock_server.uri()), TEST_TOKEN).unwrap()
}

fn group_body(id: u64, name: &str, path: &str) -> serde_json::Value {
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
        "full_path": path
    })
}

#[test]
fn test_normalize_base_url_appends_slash() {
    let url = normalize_base_url(Url::parse("https://gitlab.example.com/api/v4").unwrap());
    assert_eq!(url.as_str(), "https://gitlab.example.com/api/v4/");

    let url = normalize_base_url(Url::parse("https://gitlab.example.com/api/v4/").unwrap());
    assert_eq!(url.as_str(), "https://gitlab.example.com/api/v4/");
}

#[test]
fn test_create_token_client_rejects_invalid_url() {
    let result = create_token_client("not a url", TEST_TOKEN);

    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[test]
fn test_error_for_status_mapping() {
    assert!(matches!(
        error_for_status(StatusCode::NOT_FOUND, ""),
        Error::NotFound
    ));
    assert!(matches!(
        error_for_status(StatusCode::UNAUTHORIZED, r#"{"message":"401 Unauthorized"}"#),
        Error::AuthError(_)
    ));
    assert!(matches!(
        error_for_status(StatusCode::TOO_MANY_REQUESTS, ""),
        Error::RateLimitExceeded
    ));

    match error_for_status(
        StatusCode::BAD_REQUEST,
        r#"{"message":{"path":["has already been taken"]}}"#,
    ) {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("has already been taken"));
        }
        other => panic!("Expected Error::Api, got {other:?}"),
    }
}

#[test]
fn test_error_message_falls_back_to_body_and_reason() {
    assert_eq!(
        error_message(StatusCode::BAD_GATEWAY, "upstream down"),
        "upstream down"
    );
    assert_eq!(
        error_message(StatusCode::BAD_GATEWAY, "  "),
        "Bad Gateway"
    );
    assert_eq!(
        error_message(StatusCode::CONFLICT, r#"{"error":"conflict"}"#),
        "conflict"
    );
}

#[tokio::test]
async fn test_get_group_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/groups/42"))
        .and(header("PRIVATE-TOKEN", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_body(42, "foo", "bar")))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    match client.get_group(42).await {
        Lookup::Found(group) => {
            assert_eq!(group.id, 42);
            assert_eq!(group.name, "foo");
            assert_eq!(group.path, "bar");
            assert_eq!(group.visibility_level, Some(VisibilityLevel::PRIVATE));
        }
        other => panic!("Expected group to be found, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_group_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/groups/7"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "404 Group Not Found"})),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    assert!(matches!(client.get_group(7).await, Lookup::NotFound));
}

#[tokio::test]
async fn test_get_group_server_error_is_not_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/groups/7"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    match client.get_group(7).await {
        Lookup::Error(Error::Api { status, .. }) => assert_eq!(status, 500),
        other => panic!("Expected Lookup::Error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_group_sends_only_set_fields() {
    let mock_server = MockServer::start().await;
    let payload = GroupCreatePayload {
        name: "foo-1".to_string(),
        path: "bar-1".to_string(),
        description: Some("hello".to_string()),
        ..Default::default()
    };

    Mock::given(method("POST"))
        .and(path("/api/v4/groups"))
        .and(body_json(json!({
            "name": "foo-1",
            "path": "bar-1",
            "description": "hello"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(group_body(11, "foo-1", "bar-1")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.create_group(&payload).await;

    if let Err(e) = &result {
        eprintln!("create_group error: {e:?}");
    }
    assert_eq!(result.unwrap().id, 11);
}

#[tokio::test]
async fn test_create_group_conflict_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/groups"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Failed to save group {:path=>[\"has already been taken\"]}"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let payload = GroupCreatePayload {
        name: "foo".to_string(),
        path: "taken".to_string(),
        ..Default::default()
    };

    match client.create_group(&payload).await {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("has already been taken"));
        }
        other => panic!("Expected Error::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_group_uses_put() {
    let mock_server = MockServer::start().await;
    let payload = GroupUpdatePayload {
        description: Some("changed".to_string()),
        ..Default::default()
    };

    Mock::given(method("PUT"))
        .and(path("/api/v4/groups/42"))
        .and(body_json(json!({ "description": "changed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_body(42, "foo", "bar")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    assert!(client.update_group(42, &payload).await.is_ok());
}

#[tokio::test]
async fn test_update_group_visibility_uses_v4_name() {
    let mock_server = MockServer::start().await;
    let payload = GroupUpdatePayload {
        visibility_level: Some(VisibilityLevel::PUBLIC),
        ..Default::default()
    };
    let mut updated = group_body(42, "foo", "bar");
    updated["visibility"] = json!("public");

    Mock::given(method("PUT"))
        .and(path("/api/v4/groups/42"))
        .and(body_json(json!({ "visibility": "public" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let group = client.update_group(42, &payload).await.unwrap();
    assert_eq!(group.visibility_level, Some(VisibilityLevel::PUBLIC));
}

#[tokio::test]
async fn test_delete_group_accepts_202() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v4/groups/42"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"message": "202 Accepted"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    assert!(client.delete_group(42).await.is_ok());
}

#[tokio::test]
async fn test_delete_project_not_found_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v4/projects/5"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    assert!(matches!(
        client.delete_project(5).await,
        Err(Error::NotFound)
    ));
}

#[tokio::test]
async fn test_get_project_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/5"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "401 Unauthorized"})),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    match client.get_project(5).await {
        Lookup::Error(Error::AuthError(msg)) => assert!(msg.contains("401 Unauthorized")),
        other => panic!("Expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transfer_project() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v4/projects/5/transfer"))
        .and(body_json(json!({ "namespace": 9 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "name": "svc",
            "path": "svc",
            "namespace": {"id": 9, "name": "infra", "path": "infra", "kind": "group"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let project = client
        .transfer_project(5, &ProjectTransferPayload { namespace: 9 })
        .await
        .unwrap();

    assert_eq!(project.namespace.map(|n| n.id), Some(9));
}

#[tokio::test]
async fn test_list_namespaces_follows_pagination() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/namespaces"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Next-Page", "2")
                .set_body_json(json!([
                    {"id": 1, "name": "jdoe", "path": "jdoe", "kind": "user"}
                ])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/namespaces"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Next-Page", "")
                .set_body_json(json!([
                    {"id": 7, "name": "infra", "path": "infra", "kind": "group"}
                ])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let namespaces = client.list_namespaces().await.unwrap();

    let ids: Vec<u64> = namespaces.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 7]);
    assert_eq!(namespaces[1].kind, NamespaceKind::Group);
}
