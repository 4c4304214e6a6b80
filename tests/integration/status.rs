use crate::common::TestProject;

#[test]
fn test_status_not_configured() {
    let project = TestProject::new().unwrap();
    project.run(&["status"]).unwrap().assert_success().assert_stdout_contains("NGX: Not Configured");
}

#[test]
fn test_status_from_nested_directory() {
    let project = TestProject::new().unwrap();
    project.configure_module().unwrap();
    let nested = project.host().join("src").join("app");
    std::fs::create_dir_all(&nested).unwrap();

    project.run_in(&nested, &["status"]).unwrap().assert_success().assert_stdout_contains("[Not Linked]");
}

#[cfg(unix)]
#[test]
fn test_status_reports_linked() {
    let project = TestProject::new().unwrap();
    project.configure_module().unwrap();
    project.fixture.link_via_global().unwrap();

    project.run(&["status"]).unwrap().assert_success().assert_stdout_contains("[Linked]");
}

#[test]
fn test_status_json() {
    let project = TestProject::new().unwrap();
    project.configure_module().unwrap();

    let output = project.run(&["status", "--json"]).unwrap();
    output.assert_success();
    let json: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(json["linked"], serde_json::Value::Bool(false));
    assert_eq!(json["is_ngx_project"], serde_json::Value::Bool(false));
    assert!(json["module_path"].is_string());
    assert!(json["refreshed_at"].is_string());
}

#[test]
fn test_ineligible_project_is_rejected() {
    let project = TestProject::new().unwrap();
    let other = project.fixture.root().join("other");
    ngx_linker::test_utils::write_package_json(&other, "shop", "someone-else").unwrap();

    project
        .run_in(&other, &["status"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("not eligible");
}

#[test]
fn test_no_project_root() {
    let project = TestProject::new().unwrap();
    let empty = project.fixture.root().join("empty");
    std::fs::create_dir_all(&empty).unwrap();

    let output = project.run(&["--project", empty.to_str().unwrap(), "status"]).unwrap();
    output.assert_failure().assert_stderr_contains("No workspace folder detected.");
}

#[test]
fn test_project_flag_with_parent_segment() {
    let project = TestProject::new().unwrap();
    let src = project.host().join("src");
    std::fs::create_dir_all(src.join("app")).unwrap();

    let target = src.join("app").join("..").join("..");
    project
        .run_in(project.fixture.root(), &["--project", target.to_str().unwrap(), "status"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("NGX: Not Configured");
}
