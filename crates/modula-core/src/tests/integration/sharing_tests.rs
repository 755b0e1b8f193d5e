#![cfg(test)]

use crate::component::ComponentError;
use crate::loading::{LoadingContext, LoadingError, SymbolProvider};
use crate::artifact::ArtifactError;

use super::common::Workspace;

#[test]
fn test_private_libraries_stay_isolated() {
    let mut workspace = Workspace::new();
    workspace.install("org.util:util:1.0.0", &[("org.util.Strings", "util 1")]);
    workspace.install("org.util:util:2.0.0", &[("org.util.Strings", "util 2")]);
    workspace.component(
        "old",
        r#"{ "activator": "org.old.Activator",
             "classpath": [ { "location": "lib" }, { "coordinate": "org.util:util:1.0.0" } ] }"#,
        &[],
    );
    workspace.component(
        "new",
        r#"{ "activator": "org.new.Activator",
             "classpath": [ { "location": "lib" }, { "coordinate": "org.util:util:2.0.0" } ] }"#,
        &[],
    );

    let mut runtime = workspace.runtime();
    runtime.start_all().unwrap();

    let old = runtime.manager().context_of("old").unwrap();
    let new = runtime.manager().context_of("new").unwrap();
    assert_eq!(old.resolve("org.util.Strings").unwrap().content(), b"util 1");
    assert_eq!(new.resolve("org.util.Strings").unwrap().content(), b"util 2");
    assert!(runtime.shared_context().classpath().is_empty());
}

#[test]
fn test_shared_library_is_added_once_and_visible_through_exports() {
    let mut workspace = Workspace::new();
    workspace.install("org.modula:logging-api:1.2.0", &[("modula.api.logging.Logger", "logger")]);
    for id in ["first", "second"] {
        workspace.component(
            id,
            &format!(
                r#"{{ "activator": "org.{}.Activator",
                     "classpath": [ {{ "location": "lib" }},
                                    {{ "coordinate": "org.modula:logging-api:1.2.0", "scope": "share" }} ] }}"#,
                id
            ),
            &[],
        );
    }

    let mut runtime = workspace.runtime();
    runtime.start_all().unwrap();

    assert_eq!(runtime.shared_context().classpath().len(), 1);
    let first = runtime.manager().context_of("first").unwrap();
    let symbol = first.resolve("modula.api.logging.Logger").unwrap();
    assert_eq!(symbol.defined_by().as_str(), "shared");
    // Another component's private classes stay invisible
    assert!(matches!(
        first.resolve("org.second.Activator"),
        Err(LoadingError::SymbolNotFound { .. })
    ));
    assert_eq!(first.context_id().as_str(), "first");
}

#[test]
fn test_shared_library_outside_core_api_reaches_every_component() {
    let mut workspace = Workspace::new();
    workspace.install("org.json:json:1.0.0", &[("org.json.Parser", "json 1")]);
    workspace.component(
        "one",
        r#"{ "activator": "org.one.Activator",
             "classpath": [ { "location": "lib" }, { "coordinate": "org.json:json:1.0.0", "scope": "share" } ] }"#,
        &[],
    );
    workspace.component(
        "two",
        r#"{ "activator": "org.two.Activator", "classpath": [ { "location": "lib" } ],
             "dependencies": [ { "component": "one" } ] }"#,
        &[],
    );

    let mut runtime = workspace.runtime();
    runtime.start_all().unwrap();

    assert_eq!(runtime.shared_context().classpath().len(), 1);
    for id in ["one", "two"] {
        let context = runtime.manager().context_of(id).unwrap();
        let parser = context.resolve("org.json.Parser").unwrap();
        assert_eq!(parser.content(), b"json 1");
        assert_eq!(parser.defined_by().as_str(), "shared");
    }
    // Still answered by the shared context after the requester stops
    runtime.shutdown().unwrap();
    let exporter = runtime.exports().find_capability("org.json.Parser").unwrap();
    assert_eq!(exporter.context_id().as_str(), "shared");
}

#[test]
fn test_exported_namespace_overrides_private_copy() {
    let mut workspace = Workspace::new();
    workspace.component(
        "api",
        r#"{ "activator": "org.api.Activator", "classpath": [ { "location": "lib" } ],
             "exports": [ "org.contract" ] }"#,
        &[("org.contract.Service", "authoritative")],
    );
    workspace.component(
        "client",
        r#"{ "activator": "org.client.Activator", "classpath": [ { "location": "lib" } ],
             "dependencies": [ { "component": "api" } ] }"#,
        &[("org.contract.Service", "stale copy")],
    );

    let mut runtime = workspace.runtime();
    runtime.start_all().unwrap();

    let client = runtime.manager().context_of("client").unwrap();
    let symbol = client.resolve("org.contract.Service").unwrap();
    assert_eq!(symbol.content(), b"authoritative");
    assert_eq!(symbol.defined_by().as_str(), "api");

    runtime.shutdown().unwrap();
    assert!(runtime.exports().find_capability("org.contract.Service").is_none());
}

#[test]
fn test_incompatible_shared_versions_conflict() {
    let mut workspace = Workspace::new();
    workspace.install("org.json:json:1.0.0", &[("org.json.Parser", "v1")]);
    workspace.install("org.json:json:2.0.0", &[("org.json.Parser", "v2")]);
    workspace.component(
        "one",
        r#"{ "activator": "org.one.Activator",
             "classpath": [ { "location": "lib" }, { "coordinate": "org.json:json:1.0.0", "scope": "share" } ] }"#,
        &[],
    );
    workspace.component(
        "two",
        r#"{ "activator": "org.two.Activator",
             "classpath": [ { "location": "lib" }, { "coordinate": "org.json:json:2.0.0", "scope": "share" } ] }"#,
        &[],
    );

    let mut runtime = workspace.runtime();
    runtime.manager_mut().start_component("one").unwrap();
    match runtime.manager_mut().start_component("two") {
        Err(ComponentError::Activation { source: Some(source), .. }) => {
            let loading = source.downcast_ref::<LoadingError>().expect("loading error");
            assert!(matches!(
                loading,
                LoadingError::Artifact(ArtifactError::VersionConflict { .. })
            ));
        }
        other => panic!("Expected a version conflict, got {:?}", other),
    }
}

#[test]
fn test_missing_coordinate_fails_activation() {
    let mut workspace = Workspace::new();
    workspace.component(
        "needy",
        r#"{ "activator": "org.needy.Activator",
             "classpath": [ { "location": "lib" }, { "coordinate": "org.absent:absent:1.0.0" } ] }"#,
        &[],
    );

    let mut runtime = workspace.runtime();
    match runtime.manager_mut().start_component("needy") {
        Err(ComponentError::Activation { source: Some(source), .. }) => {
            assert!(matches!(
                source.downcast_ref::<LoadingError>(),
                Some(LoadingError::Artifact(ArtifactError::NotFound { .. }))
            ));
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
}
