use super::*;
use serde_json::json;

static TEST_ATTRIBUTES: [Attribute; 5] = [
    Attribute::new("name", AttributeType::String, Presence::Required, "Name")
        .validated_by(Validator::Name),
    Attribute::new("path", AttributeType::String, Presence::Required, "Path")
        .validated_by(Validator::Path),
    Attribute::new(
        "visibility_level",
        AttributeType::String,
        Presence::Optional,
        "Visibility",
    )
    .validated_by(Validator::Visibility),
    Attribute::new("namespace_id", AttributeType::Int, Presence::Optional, "Namespace"),
    Attribute::new("web_url", AttributeType::String, Presence::Computed, "URL"),
];

static TEST_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "test_resource",
    description: "A resource used in tests",
    attributes: &TEST_ATTRIBUTES,
};

fn config(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got {other}"),
    }
}

fn validation_errors(result: ProviderResult<()>) -> Vec<ValidationError> {
    match result {
        Err(ProviderError::Validation(errors)) => errors,
        other => panic!("Expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_validate_accepts_valid_config() {
    let result = TEST_SCHEMA.validate(&config(json!({
        "name": "foo-1",
        "path": "bar-1",
        "visibility_level": "PUBLIC",
        "namespace_id": 12,
    })));

    assert!(result.is_ok(), "Expected valid config, got {result:?}");
}

#[test]
fn test_validate_treats_null_as_absent() {
    let errors = validation_errors(TEST_SCHEMA.validate(&config(json!({
        "name": null,
        "path": "bar-1",
        "namespace_id": null,
    }))));

    assert_eq!(
        errors,
        vec![ValidationError::MissingAttribute {
            attribute: "name".to_string()
        }]
    );
}

#[test]
fn test_validate_collects_every_problem() {
    let errors = validation_errors(TEST_SCHEMA.validate(&config(json!({
        "name": "bad#name",
        "path": "-repo.git",
        "namespace_id": "12",
        "web_url": "https://example.com",
        "colour": "blue",
    }))));

    assert_eq!(errors.len(), 6, "{errors:?}");
    assert!(errors.contains(&ValidationError::UnknownAttribute {
        attribute: "colour".to_string()
    }));
    assert!(errors.contains(&ValidationError::ReadOnlyAttribute {
        attribute: "web_url".to_string()
    }));
    assert!(errors.contains(&ValidationError::WrongType {
        attribute: "namespace_id".to_string(),
        expected: "integer",
    }));
}

#[test]
fn test_validate_rejects_unknown_visibility() {
    let errors = validation_errors(TEST_SCHEMA.validate(&config(json!({
        "name": "foo",
        "path": "foo",
        "visibility_level": "secret",
    }))));

    assert!(matches!(errors[..], [ValidationError::NotAllowed { .. }]));
}

#[test]
fn test_attribute_presence_helpers() {
    let web_url = TEST_SCHEMA.attribute("web_url").expect("web_url exists");
    assert!(web_url.is_computed());
    assert!(web_url.is_read_only());

    let name = TEST_SCHEMA.attribute("name").expect("name exists");
    assert!(!name.is_computed());
    assert!(!name.is_read_only());

    assert!(TEST_SCHEMA.attribute("missing").is_none());
}

#[test]
fn test_schema_serializes_for_cli_output() {
    let value = serde_json::to_value(&TEST_SCHEMA).expect("schema serializes");

    assert_eq!(value["type_name"], "test_resource");
    assert_eq!(value["attributes"][0]["type"], "string");
    assert_eq!(value["attributes"][0]["presence"], "required");
    assert_eq!(value["attributes"][0]["validator"], "name");
    assert!(value["attributes"][3].get("validator").is_none());
}
