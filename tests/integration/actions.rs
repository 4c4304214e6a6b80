//! npm actions through a shell-script npm (unix only)

#![cfg(unix)]

use std::fs;

use crate::common::TestProject;

#[test]
fn test_build_and_link_end_to_end() {
    let project = TestProject::new().unwrap();
    let calls = project.install_fake_npm().unwrap();

    project
        .run(&["build-and-link"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("Build & Link finished.")
        .assert_stdout_contains("[Linked]");

    let log = fs::read_to_string(calls).unwrap();
    let steps: Vec<&str> = log.lines().map(|l| l.split('|').nth(1).unwrap_or_default()).collect();
    assert_eq!(steps, vec!["run build:lib", "link", "link @vfde-care/ngx-lib"]);
    assert!(project.fixture.dependency_path().exists());
}

#[test]
fn test_link_without_build_fails() {
    let project = TestProject::new().unwrap();
    project.install_fake_npm().unwrap();

    project
        .run(&["link"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Directory does not exist");
    project.run(&["status"]).unwrap().assert_stdout_contains("[Not Linked]");
}

#[test]
fn test_build_then_link_with_watch() {
    let project = TestProject::new().unwrap();
    project.install_fake_npm().unwrap();

    project.run(&["build"]).unwrap().assert_success().assert_stdout_contains("Build finished.");
    project
        .run(&["link", "--watch"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("[Linked]");
    assert!(project.fixture.root().join("settings").join("actions.log").exists());
}

#[test]
fn test_linking_refused_inside_ngx_project() {
    let project = TestProject::new().unwrap();
    project.install_fake_npm().unwrap();

    project
        .run_in(project.module(), &["link"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("disabled inside the @vfde-care/ngx-lib project");
}

#[test]
fn test_install_runs_in_module() {
    let project = TestProject::new().unwrap();
    let calls = project.install_fake_npm().unwrap();
    let deps = project.module().join("node_modules");
    fs::create_dir_all(deps.join("left-pad")).unwrap();

    project
        .run(&["install", "--clean", "--legacy-peer-deps", "--yes"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("Clean Install finished.");

    assert!(!deps.join("left-pad").exists());
    let log = fs::read_to_string(calls).unwrap();
    let (cwd, args) = log.trim().split_once('|').unwrap();
    assert_eq!(args, "install --legacy-peer-deps");
    assert_eq!(
        fs::canonicalize(cwd).unwrap(),
        fs::canonicalize(project.module()).unwrap()
    );
}
