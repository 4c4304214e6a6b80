use ngx_linker::test_utils::TestGit;

use crate::common::TestProject;

fn project_with_repo() -> TestProject {
    let project = TestProject::new().unwrap();
    let git = TestGit::new(project.module());
    git.init().unwrap();
    git.config_user().unwrap();
    git.commit_all("Initial commit").unwrap();
    git.branch("feature/x").unwrap();
    project.configure_module().unwrap();
    project
}

#[test]
fn test_branches_lists_local_branches() {
    let project = project_with_repo();

    project
        .run(&["branches", "--no-fetch"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("* main")
        .assert_stdout_contains("feature/x");
}

#[test]
fn test_switch_branch_updates_status() {
    let project = project_with_repo();

    project
        .run(&["switch-branch", "feature/x", "--no-fetch"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("Switched ngx-module to branch feature/x.");

    project
        .run(&["status"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("NGX: feature/x [Not Linked]");
}

#[test]
fn test_switch_to_unknown_branch_fails() {
    let project = project_with_repo();

    project
        .run(&["switch-branch", "does-not-exist", "--no-fetch"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("does-not-exist");
    assert_eq!(TestGit::new(project.module()).current_branch().unwrap(), "main");
}

#[test]
fn test_switch_branch_rejects_option_like_name() {
    let project = project_with_repo();

    project
        .run(&["switch-branch", "--no-fetch", "--", "-b"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Failed to checkout branch -b")
        .assert_stderr_contains("cannot start with '-'");
    assert_eq!(TestGit::new(project.module()).current_branch().unwrap(), "main");
}
