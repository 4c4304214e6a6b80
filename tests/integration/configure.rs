use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_configure_without_path_warns() {
    let project = TestProject::new().unwrap();
    project
        .run(&["configure"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("ngx module path not configured.");
}

#[test]
fn test_configure_stores_project_root() {
    let project = TestProject::new().unwrap();
    let inner = project.module().join("projects").join("ngx-lib");
    std::fs::create_dir_all(&inner).unwrap();

    project
        .run(&["configure", inner.to_str().unwrap()])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("Using ngx-module at");

    let settings = project.read_settings().unwrap();
    let stored = settings.ngx_module_path.unwrap();
    assert_eq!(stored.canonicalize().unwrap(), project.module().canonicalize().unwrap());

    project.run(&["configure"]).unwrap().assert_success().assert_stdout_contains("Using ngx-module at");
}

#[test]
fn test_configure_missing_path() {
    let project = TestProject::new().unwrap();
    let missing = project.fixture.root().join("nowhere");

    project
        .run(&["configure", missing.to_str().unwrap()])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Selected path does not exist.");
    assert!(!project.config_path().exists());
}

#[test]
fn test_configure_wrong_package() {
    let project = TestProject::new().unwrap();

    let output = project.run(&["configure", project.host().to_str().unwrap()]).unwrap();
    output.assert_failure();
    assert!(
        predicate::str::contains("package.json name is \"account\"").eval(&output.stderr),
        "{}",
        output.stderr
    );
}

#[test]
fn test_configure_parent_of_host_does_not_pick_host() {
    let project = TestProject::new().unwrap();

    let output = project.run(&["configure", ".."]).unwrap();
    output.assert_failure();
    assert!(!output.stderr.contains("name is \"account\""), "{}", output.stderr);
    assert!(!project.config_path().exists());
}

#[test]
fn test_configure_relative_path_through_parent() {
    let project = TestProject::new().unwrap();

    project
        .run(&["configure", "../ngx-lib/projects/.."])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("Using ngx-module at");

    let stored = project.read_settings().unwrap().ngx_module_path.unwrap();
    assert_eq!(stored.canonicalize().unwrap(), project.module().canonicalize().unwrap());
    assert!(!stored.components().any(|c| c == std::path::Component::ParentDir));
}
