use assert_cmd::Command;
use ngx_linker::constants::REPO_OWNER;
use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_config_path_works_outside_projects() {
    let project = TestProject::new().unwrap();
    let config = project.config_path().to_str().unwrap().to_string();

    Command::cargo_bin("ngx-link")
        .unwrap()
        .args(["--config", &config, "config", "path"])
        .current_dir(project.fixture.root())
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_allow_and_disallow() {
    let project = TestProject::new().unwrap();

    project.run(&["config", "allow", "new-portal"]).unwrap().assert_success();
    assert!(project.read_settings().unwrap().is_allowed("new-portal"));

    project
        .run(&["config", "allow", "new-portal"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("already allowed");

    project
        .run(&["config", "show"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("- new-portal")
        .assert_stdout_contains("not configured");

    project.run(&["config", "disallow", "new-portal"]).unwrap().assert_success();
    assert!(!project.read_settings().unwrap().is_allowed("new-portal"));
}

#[test]
fn test_allow_makes_project_eligible() {
    let project = TestProject::new().unwrap();
    let shop = project.fixture.root().join("shop");
    ngx_linker::test_utils::write_package_json(&shop, "shop", REPO_OWNER).unwrap();

    project.run_in(&shop, &["status"]).unwrap().assert_failure();
    project.run(&["config", "allow", "shop"]).unwrap().assert_success();
    project.run_in(&shop, &["status"]).unwrap().assert_success();
}

#[test]
fn test_config_set_and_clear_path() {
    let project = TestProject::new().unwrap();
    let module = project.module().to_str().unwrap().to_string();

    project
        .run(&["config", "set-path", &module])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("ngx module path set to");
    assert!(project.read_settings().unwrap().ngx_module_path.is_some());

    project.run(&["config", "clear-path"]).unwrap().assert_success();
    assert!(project.read_settings().unwrap().ngx_module_path.is_none());
}
