// crates/modula-core/src/specification/tests/parser_tests.rs
#![cfg(test)]

use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use crate::artifact::Scope;
use crate::specification::{
    ClasspathEntry, ComponentDependency, DescriptorFormat, SpecificationError, SpecificationParser,
};

const BILLING_JSON: &str = r#"{
    "id": "billing",
    "activator": "org.billing.Activator",
    "classpath": [
        { "location": "lib" },
        { "coordinate": "org.json:json:1.0.0", "scope": "share" },
        { "coordinate": "org.util:util:2.1.0" }
    ],
    "dependencies": [
        { "component": "db" },
        { "component": "audit", "managed": false }
    ],
    "exports": ["org.billing.api"]
}"#;

fn assert_violation(result: Result<impl std::fmt::Debug, SpecificationError>, fragment: &str) {
    match result {
        Err(SpecificationError::Parse { violation, .. }) => {
            assert!(
                violation.contains(fragment),
                "Expected violation containing '{}', got '{}'",
                fragment,
                violation
            );
        }
        other => panic!("Expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_parse_json_descriptor() {
    let spec = SpecificationParser::parse_str("billing.component.json", BILLING_JSON, DescriptorFormat::Json)
        .expect("descriptor should parse");

    assert_eq!(spec.id().as_str(), "billing");
    assert_eq!(spec.activator(), "org.billing.Activator");
    assert_eq!(spec.classpath().len(), 3);
    assert_eq!(spec.classpath()[0], ClasspathEntry::Location(PathBuf::from("lib")));
    match (&spec.classpath()[1], &spec.classpath()[2]) {
        (ClasspathEntry::Coordinate(shared), ClasspathEntry::Coordinate(private)) => {
            assert_eq!(shared.to_string(), "org.json:json:1.0.0");
            assert_eq!(shared.scope, Scope::Share);
            assert_eq!(private.scope, Scope::Private);
        }
        other => panic!("Expected coordinate entries, got {:?}", other),
    }
    // Dependencies are managed unless they say otherwise
    assert_eq!(
        spec.dependencies(),
        &[ComponentDependency::managed("db"), ComponentDependency::unmanaged("audit")]
    );
    assert_eq!(spec.exports(), &["org.billing.api".to_string()]);
    assert!(!spec.is_managed());
}

#[cfg(feature = "toml-config")]
#[test]
fn test_parse_toml_descriptor() {
    let content = r#"
id = "db"
activator = "org.db.Activator"
managed = true

[[classpath]]
coordinate = "org.h2:h2:1.4.0"
"#;
    let spec = SpecificationParser::parse_str("db.component.toml", content, DescriptorFormat::Toml)
        .expect("descriptor should parse");
    assert_eq!(spec.id().as_str(), "db");
    assert!(spec.is_managed());
    assert_eq!(spec.classpath().len(), 1);
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_parse_yaml_descriptor() {
    let content = "
activator: org.audit.Activator
dependencies:
  - component: db
    managed: false
";
    let spec = SpecificationParser::parse_str("audit.component.yaml", content, DescriptorFormat::Yaml)
        .expect("descriptor should parse");
    // id derived from the resource name
    assert_eq!(spec.id().as_str(), "audit");
    assert_eq!(spec.dependencies(), &[ComponentDependency::unmanaged("db")]);
}

#[test]
fn test_malformed_content_is_parse_error() {
    let result = SpecificationParser::parse_str("broken.component.json", "{ not json", DescriptorFormat::Json);
    assert!(matches!(result, Err(SpecificationError::Parse { ref resource, .. }) if resource == "broken.component.json"));
}

#[test]
fn test_missing_activator_is_rejected() {
    let result = SpecificationParser::parse_str("x.component.json", r#"{ "id": "x" }"#, DescriptorFormat::Json);
    assert_violation(result, "activator");
}

#[test]
fn test_unknown_field_is_rejected() {
    let result = SpecificationParser::parse_str(
        "x.component.json",
        r#"{ "activator": "org.x.X", "extra": 1 }"#,
        DescriptorFormat::Json,
    );
    assert_violation(result, "extra");
}

#[test]
fn test_activator_must_be_qualified_type_name() {
    for activator in ["", "org..X", "org.1x.X", "org x.X"] {
        let content = format!(r#"{{ "activator": "{}" }}"#, activator);
        let result = SpecificationParser::parse_str("x.component.json", &content, DescriptorFormat::Json);
        assert_violation(result, "activator");
    }
}

#[test]
fn test_invalid_component_id_is_rejected() {
    let result = SpecificationParser::parse_str(
        "x.component.json",
        r#"{ "id": "bad id", "activator": "org.x.X" }"#,
        DescriptorFormat::Json,
    );
    assert_violation(result, "component id");
}

#[test]
fn test_shared_context_id_is_reserved() {
    let explicit = SpecificationParser::parse_str(
        "x.component.json",
        r#"{ "id": "shared", "activator": "org.x.X" }"#,
        DescriptorFormat::Json,
    );
    assert_violation(explicit, "reserved");

    let derived = SpecificationParser::parse_str("shared.component.json", r#"{ "activator": "org.x.X" }"#, DescriptorFormat::Json);
    assert_violation(derived, "reserved");
}

#[test]
fn test_dependency_target_must_be_valid_id() {
    let content = r#"{ "activator": "org.x.X", "dependencies": [ { "component": "a b" } ] }"#;
    assert_violation(
        SpecificationParser::parse_str("x.component.json", content, DescriptorFormat::Json),
        "not a valid component id",
    );
}

#[test]
fn test_classpath_entry_needs_exactly_one_source() {
    let both = r#"{ "activator": "org.x.X", "classpath": [ { "location": "lib", "coordinate": "a:b:1.0.0" } ] }"#;
    assert_violation(
        SpecificationParser::parse_str("x.component.json", both, DescriptorFormat::Json),
        "exactly one",
    );

    let neither = r#"{ "activator": "org.x.X", "classpath": [ {} ] }"#;
    assert_violation(
        SpecificationParser::parse_str("x.component.json", neither, DescriptorFormat::Json),
        "exactly one",
    );
}

#[test]
fn test_scope_requires_coordinate() {
    let content = r#"{ "activator": "org.x.X", "classpath": [ { "location": "lib", "scope": "share" } ] }"#;
    assert_violation(
        SpecificationParser::parse_str("x.component.json", content, DescriptorFormat::Json),
        "scope",
    );
}

#[test]
fn test_bad_coordinate_and_scope_are_rejected() {
    let coordinate = r#"{ "activator": "org.x.X", "classpath": [ { "coordinate": "only:two" } ] }"#;
    assert_violation(
        SpecificationParser::parse_str("x.component.json", coordinate, DescriptorFormat::Json),
        "classpath[0]",
    );

    let scope = r#"{ "activator": "org.x.X", "classpath": [ { "coordinate": "a:b:1.0.0", "scope": "global" } ] }"#;
    assert_violation(
        SpecificationParser::parse_str("x.component.json", scope, DescriptorFormat::Json),
        "classpath[0]",
    );
}

#[test]
fn test_dependency_rules() {
    let on_self = r#"{ "id": "x", "activator": "org.x.X", "dependencies": [ { "component": "x" } ] }"#;
    assert_violation(
        SpecificationParser::parse_str("x.component.json", on_self, DescriptorFormat::Json),
        "itself",
    );

    let twice = r#"{ "activator": "org.x.X", "dependencies": [ { "component": "y" }, { "component": "y", "managed": false } ] }"#;
    assert_violation(
        SpecificationParser::parse_str("x.component.json", twice, DescriptorFormat::Json),
        "duplicate",
    );

    let empty = r#"{ "activator": "org.x.X", "dependencies": [ { "component": " " } ] }"#;
    assert_violation(
        SpecificationParser::parse_str("x.component.json", empty, DescriptorFormat::Json),
        "empty",
    );
}

#[test]
fn test_invalid_export_is_rejected() {
    let content = r#"{ "activator": "org.x.X", "exports": ["org..api"] }"#;
    assert_violation(
        SpecificationParser::parse_str("x.component.json", content, DescriptorFormat::Json),
        "exports[0]",
    );
}

#[test]
fn test_parse_file_records_resource_and_directory_id() {
    let temp_dir = tempdir().unwrap();
    let component_dir = temp_dir.path().join("billing");
    fs::create_dir_all(&component_dir).unwrap();
    let path = component_dir.join("component.json");
    fs::write(&path, r#"{ "activator": "org.billing.Activator", "classpath": [ { "location": "lib" } ] }"#).unwrap();

    let spec = SpecificationParser::parse_file(&path).unwrap();
    assert_eq!(spec.id().as_str(), "billing");
    assert_eq!(spec.resource(), Some(path.as_path()));
    assert_eq!(spec.resolve_location(std::path::Path::new("lib")), component_dir.join("lib"));
}

#[test]
fn test_parse_file_errors() {
    let temp_dir = tempdir().unwrap();

    let unsupported = temp_dir.path().join("component.ini");
    fs::write(&unsupported, "activator=org.x.X").unwrap();
    assert!(matches!(
        SpecificationParser::parse_file(&unsupported),
        Err(SpecificationError::UnsupportedFormat { .. })
    ));

    let missing = temp_dir.path().join("missing.component.json");
    assert!(matches!(
        SpecificationParser::parse_file(&missing),
        Err(SpecificationError::Read { .. })
    ));
}

#[test]
fn test_load_directory_finds_descriptors_in_path_order() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("billing")).unwrap();
    fs::create_dir_all(root.join("nested/deeper")).unwrap();
    fs::write(root.join("billing/component.json"), r#"{ "activator": "org.billing.A" }"#).unwrap();
    fs::write(root.join("audit.component.json"), r#"{ "activator": "org.audit.A" }"#).unwrap();
    fs::write(root.join("nested/deeper/db.component.json"), r#"{ "activator": "org.db.A" }"#).unwrap();
    // Not descriptors
    fs::write(root.join("notes.json"), "{}").unwrap();
    fs::write(root.join("billing/readme.txt"), "hello").unwrap();

    let specs = SpecificationParser::load_directory(root).unwrap();
    let ids: Vec<&str> = specs.iter().map(|s| s.id().as_str()).collect();
    assert_eq!(ids, vec!["audit", "billing", "db"]);
}

#[test]
fn test_load_directory_rejects_duplicate_ids() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("db")).unwrap();
    fs::write(root.join("db/component.json"), r#"{ "activator": "org.db.A" }"#).unwrap();
    fs::write(root.join("db.component.json"), r#"{ "activator": "org.db.B" }"#).unwrap();

    match SpecificationParser::load_directory(root) {
        Err(SpecificationError::DuplicateComponent { id, .. }) => assert_eq!(id, "db"),
        other => panic!("Expected DuplicateComponent, got {:?}", other),
    }
}

#[test]
fn test_load_directory_stops_at_first_invalid_descriptor() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("bad.component.json"), r#"{ "id": "bad" }"#).unwrap();
    assert!(matches!(
        SpecificationParser::load_directory(temp_dir.path()),
        Err(SpecificationError::Parse { .. })
    ));
}

#[test]
fn test_load_directory_requires_existing_directory() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("typo");
    match SpecificationParser::load_directory(&missing) {
        Err(SpecificationError::Read { path, .. }) => assert_eq!(path, missing),
        other => panic!("Expected Read error, got {:?}", other),
    }
}
