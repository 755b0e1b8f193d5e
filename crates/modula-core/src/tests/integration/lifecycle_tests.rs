#![cfg(test)]

use crate::component::ComponentError;
use crate::kernel::error::Error;

use super::common::Workspace;

#[test]
fn test_descriptor_chain_starts_and_stops_in_dependency_order() {
    let mut workspace = Workspace::new();
    workspace.component(
        "A",
        r#"{ "activator": "org.A.Activator", "classpath": [ { "location": "lib" } ],
             "dependencies": [ { "component": "B" } ] }"#,
        &[],
    );
    workspace.component(
        "B",
        r#"{ "activator": "org.B.Activator", "managed": true, "classpath": [ { "location": "lib" } ],
             "dependencies": [ { "component": "C" } ] }"#,
        &[],
    );
    workspace.component(
        "C",
        r#"{ "activator": "org.C.Activator", "managed": true, "classpath": [ { "location": "lib" } ] }"#,
        &[],
    );

    let mut runtime = workspace.runtime();
    runtime.manager_mut().start_component("A").unwrap();
    assert_eq!(workspace.events(), vec!["activate C", "activate B", "activate A"]);

    runtime.manager_mut().stop_component("A").unwrap();
    assert_eq!(
        &workspace.events()[3..],
        &["deactivate A", "deactivate B", "deactivate C"]
    );
}

#[test]
fn test_start_all_then_shutdown() {
    let mut workspace = Workspace::new();
    workspace.component(
        "web",
        r#"{ "activator": "org.web.Activator", "classpath": [ { "location": "lib" } ],
             "dependencies": [ { "component": "db" } ] }"#,
        &[],
    );
    workspace.component(
        "db",
        r#"{ "activator": "org.db.Activator", "managed": true, "classpath": [ { "location": "lib" } ] }"#,
        &[],
    );

    let mut runtime = workspace.runtime();
    runtime.start_all().unwrap();
    let running: Vec<String> = runtime
        .manager()
        .running_components()
        .iter()
        .map(|id| id.to_string())
        .collect();
    assert_eq!(running, vec!["db", "web"]);

    runtime.shutdown().unwrap();
    assert_eq!(
        workspace.events(),
        vec!["activate db", "activate web", "deactivate web", "deactivate db"]
    );
}

#[test]
fn test_cyclic_descriptors_are_reported_with_path() {
    let mut workspace = Workspace::new();
    workspace.component(
        "x",
        r#"{ "activator": "org.x.Activator", "classpath": [ { "location": "lib" } ],
             "dependencies": [ { "component": "y" } ] }"#,
        &[],
    );
    workspace.component(
        "y",
        r#"{ "activator": "org.y.Activator", "classpath": [ { "location": "lib" } ],
             "dependencies": [ { "component": "x" } ] }"#,
        &[],
    );

    let mut runtime = workspace.runtime();
    match runtime.start_all() {
        Err(Error::Component(ComponentError::CyclicDependency(path))) => {
            assert_eq!(path, vec!["x", "y", "x"]);
        }
        other => panic!("Expected a cycle, got {:?}", other),
    }
    assert!(workspace.events().is_empty());
}

#[test]
fn test_missing_location_fails_activation() {
    let mut workspace = Workspace::new();
    workspace.component(
        "broken",
        r#"{ "activator": "org.broken.Activator", "classpath": [ { "location": "does-not-exist" } ] }"#,
        &[],
    );

    let mut runtime = workspace.runtime();
    let result = runtime.manager_mut().start_component("broken");
    assert!(matches!(result, Err(ComponentError::Activation { .. })));
}
