use super::*;
use serde_json::from_str;

#[test]
fn test_group_deserialization_ignores_unknown_fields() {
    let json_str = r#"{
        "id": 42,
        "name": "foo-1",
        "path": "bar-1",
        "description": "hello",
        "visibility_level": 0,
        "lfs_enabled": true,
        "request_access_enabled": false,
        "web_url": "https://gitlab.example.com/groups/bar-1",
        "full_path": "bar-1",
        "parent_id": null,
        "projects": []
    }"#;

    let group: Group = from_str(json_str).expect("Failed to deserialize Group");

    assert_eq!(group.id, 42);
    assert_eq!(group.name, "foo-1");
    assert_eq!(group.description.as_deref(), Some("hello"));
    assert_eq!(group.visibility_level, Some(VisibilityLevel::PRIVATE));
    assert_eq!(group.lfs_enabled, Some(true));
    assert_eq!(group.full_name, None);
}

#[test]
fn test_group_reads_v4_visibility_name() {
    let group: Group =
        from_str(r#"{"id": 7, "name": "infra", "path": "infra", "visibility": "public"}"#)
            .unwrap();

    assert_eq!(group.visibility_level, Some(VisibilityLevel::PUBLIC));
}

#[test]
fn test_project_reads_v4_visibility_name() {
    let project: Project =
        from_str(r#"{"id": 1, "name": "a", "path": "a", "visibility": "internal"}"#).unwrap();

    assert_eq!(project.visibility_level, Some(VisibilityLevel::INTERNAL));
}

#[test]
fn test_unknown_visibility_name_reads_as_none() {
    let group: Group =
        from_str(r#"{"id": 7, "name": "infra", "path": "infra", "visibility": "hidden"}"#)
            .unwrap();

    assert_eq!(group.visibility_level, None);
}

#[test]
fn test_visibility_level_serializes_as_name() {
    assert_eq!(
        serde_json::to_value(VisibilityLevel::INTERNAL).unwrap(),
        serde_json::json!("internal")
    );
    assert_eq!(
        serde_json::to_value(VisibilityLevel(30)).unwrap(),
        serde_json::json!(30)
    );
}

#[test]
fn test_visibility_level_rejects_unknown_name() {
    assert!(from_str::<VisibilityLevel>(r#""hidden""#).is_err());
    assert_eq!(
        from_str::<VisibilityLevel>(r#""private""#).unwrap(),
        VisibilityLevel::PRIVATE
    );
}

#[test]
fn test_visibility_level_accepts_unknown_values() {
    let level: VisibilityLevel = from_str("5").unwrap();

    assert_eq!(level.value(), 5);
    assert_ne!(level, VisibilityLevel::PRIVATE);
}

#[test]
fn test_namespace_kind_deserialization() {
    let user: Namespace =
        from_str(r#"{"id": 1, "name": "jdoe", "path": "jdoe", "kind": "user"}"#).unwrap();
    let group: Namespace =
        from_str(r#"{"id": 2, "name": "Infra", "path": "infra", "kind": "group"}"#).unwrap();
    let other: Namespace =
        from_str(r#"{"id": 3, "name": "x", "path": "x", "kind": "enterprise"}"#).unwrap();

    assert_eq!(user.kind, NamespaceKind::User);
    assert_eq!(group.kind, NamespaceKind::Group);
    assert_eq!(other.kind, NamespaceKind::Unknown);
    assert_eq!(group.kind.to_string(), "group");
}

#[test]
fn test_project_deserialization_with_nested_objects() {
    let json_str = r#"{
        "id": 99,
        "name": "svc",
        "path": "svc",
        "default_branch": "main",
        "namespace": {"id": 7, "name": "infra", "path": "infra", "kind": "group"},
        "issues_enabled": true,
        "jobs_enabled": false,
        "visibility_level": 20,
        "owner": {"id": 3, "username": "jdoe"},
        "created_at": "2017-03-01T10:00:00Z",
        "star_count": 4,
        "forked_from_project": {"id": 12, "name": "upstream"}
    }"#;

    let project: Project = from_str(json_str).expect("Failed to deserialize Project");

    assert_eq!(project.namespace.as_ref().map(|n| n.id), Some(7));
    assert_eq!(project.issues_enabled, Some(true));
    assert_eq!(project.builds_enabled, Some(false));
    assert_eq!(project.visibility_level, Some(VisibilityLevel::PUBLIC));
    assert_eq!(project.owner, Some(ObjectRef { id: 3 }));
    assert_eq!(project.stars_count, Some(4));
    assert_eq!(project.forked_from_project.map(|p| p.id), Some(12));
    assert!(project.created_at.is_some());
    assert_eq!(project.wiki_enabled, None);
}

#[test]
fn test_project_deserialization_accepts_null_flags() {
    let project: Project = from_str(
        r#"{"id": 1, "name": "a", "path": "a", "container_registry_enabled": null}"#,
    )
    .unwrap();

    assert_eq!(project.container_registry_enabled, None);
}
