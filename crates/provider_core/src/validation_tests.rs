use super::*;

#[test]
fn test_validate_name() {
    let cases = [
        ("My New App 02", 0),
        ("My New App 02#", 1),
        ("My New App - 02.", 0),
        ("My New App - 02;", 1),
        ("foo-1", 0),
        ("under_score.dot", 0),
        ("", 1),
        ("tab\there", 1),
        ("ünïcode", 1),
    ];

    for (value, expected) in cases {
        let errors = validate_name(value);
        assert_eq!(
            errors.len(),
            expected,
            "{value:?} - got {} errors expected {expected}",
            errors.len()
        );
    }
}

#[test]
fn test_validate_path() {
    let cases = [
        ("My New App 02", 1),
        ("My New App 02#", 1),
        ("My-New-App-02#", 1),
        ("My New App - 02.", 1),
        ("My New-App-02.", 1),
        ("My New-App-02.atom", 2),
        ("My New-App-02.git", 2),
        ("bar-1", 0),
        ("_private.group-1", 0),
        (".hidden", 0),
        ("-leading-dash", 1),
        ("trailing-dot.", 1),
        ("a", 1),
        ("ab", 0),
    ];

    for (value, expected) in cases {
        let errors = validate_path(value);
        assert_eq!(
            errors.len(),
            expected,
            "{value:?} - got {} errors expected {expected}",
            errors.len()
        );
    }
}

#[test]
fn test_validate_path_reserved_suffix_on_otherwise_valid_path() {
    let errors = validate_path("project.git");

    assert_eq!(
        errors,
        vec![ValidationError::ReservedPathSuffix {
            value: "project.git".to_string(),
            suffix: ".git",
        }]
    );
}

#[test]
fn test_validate_path_accumulates_pattern_and_suffix_errors() {
    let errors = validate_path("-project.atom");

    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], ValidationError::InvalidPath { .. }));
    assert!(matches!(
        errors[1],
        ValidationError::ReservedPathSuffix { suffix: ".atom", .. }
    ));
}

#[test]
fn test_validate_one_of_ignores_case() {
    let allowed = ["private", "internal", "public"];

    assert!(validate_one_of("visibility_level", "Public", &allowed).is_empty());
    assert!(validate_one_of("visibility_level", "internal", &allowed).is_empty());

    let errors = validate_one_of("visibility_level", "secret", &allowed);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "\"secret\" is an invalid value for argument visibility_level: expected one of private, internal, public"
    );
}
