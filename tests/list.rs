//! End-to-end tests for `pdfx list` and registry failure reporting.

mod common;

use common::{refused_url, silent_registry, Project, RegistryFixture};
use pretty_assertions::assert_eq;

#[test]
fn list_marks_locally_installed_components() {
    let registry = RegistryFixture::new()
        .component("table", &[], "export {};\n")
        .component("text", &[], "export {};\n")
        .serve();
    let project = Project::with_config(&registry.url());
    project.write_component_file("text", "export {};\n");

    let out = project.run(&["list", "--json"]);

    assert!(out.success, "stderr: {}", out.stderr);
    assert_eq!(
        out.json(),
        serde_json::json!([
            {"name": "table", "description": "The table component", "installed": false},
            {"name": "text", "description": "The text component", "installed": true},
        ])
    );
}

#[test]
fn list_works_without_a_config() {
    let registry = RegistryFixture::new()
        .component("heading", &[], "export {};\n")
        .serve();
    let project = Project::bare();

    let out = project.run(&["--registry", &registry.url(), "list"]);

    assert!(out.success, "stderr: {}", out.stderr);
    assert!(out.stdout.contains("heading"), "{}", out.stdout);
    assert!(out.stdout.contains("1 components, 0 installed"), "{}", out.stdout);
}

#[test]
fn connection_refused_is_a_network_error_not_a_timeout() {
    let project = Project::with_config(&refused_url());

    let out = project.run(&["list"]);

    assert!(!out.success);
    assert!(out.stderr.contains("NetworkError"), "{}", out.stderr);
    assert!(!out.stderr.contains("timed out"), "{}", out.stderr);
}

#[test]
fn unresponsive_registry_times_out() {
    let (_listener, url) = silent_registry();
    let project = Project::with_config(&url);

    let out = project.run(&["--timeout", "1", "add", "table"]);

    assert!(!out.success);
    assert!(out.stderr.contains("NetworkError"), "{}", out.stderr);
    assert!(out.stderr.contains("timed out after 1s"), "{}", out.stderr);
}

#[test]
fn server_errors_are_registry_errors() {
    let registry = RegistryFixture::new()
        .route("index.json", 500, "oops")
        .serve();
    let project = Project::with_config(&registry.url());

    let out = project.run(&["list"]);

    assert!(!out.success);
    assert!(out.stderr.contains("RegistryError"), "{}", out.stderr);
    assert!(out.stderr.contains("HTTP 500"), "{}", out.stderr);
}

#[test]
fn invalid_index_is_a_registry_error() {
    let registry = RegistryFixture::new()
        .route("index.json", 200, r#"{"components": []}"#)
        .serve();
    let project = Project::with_config(&registry.url());

    let out = project.run(&["list"]);

    assert!(!out.success);
    assert!(out.stderr.contains("RegistryError"), "{}", out.stderr);
}
