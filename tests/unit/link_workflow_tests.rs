//! Manifest validation, link detection, and the polling window working
//! together on a fixture checkout.

use std::time::{Duration, Instant};

use ngx_linker::link::is_linked;
use ngx_linker::manifest::{ManifestError, is_eligible_project, is_ngx_project, validate_ngx_path};
use ngx_linker::npm::{InstallOptions, build_and_link_plan, install_plan};
use ngx_linker::refresh::{PollOutcome, RefreshController};
use ngx_linker::test_utils::LinkFixture;
use ngx_linker::ui::{PanelAction, PanelState, render};

#[tokio::test]
async fn module_path_resolves_to_checkout_root() {
    let fixture = LinkFixture::new().unwrap();
    let nested = fixture.module.join("projects").join("ngx-lib").join("src");
    std::fs::create_dir_all(&nested).unwrap();

    let root = validate_ngx_path(&nested).await.unwrap();
    assert_eq!(root.canonicalize().unwrap(), fixture.module.canonicalize().unwrap());
    assert!(is_ngx_project(&fixture.module).await);
    assert!(!is_ngx_project(&fixture.host).await);
}

#[tokio::test]
async fn host_is_not_a_valid_module_path() {
    let fixture = LinkFixture::new().unwrap();
    let err = validate_ngx_path(&fixture.host).await.unwrap_err();
    assert!(matches!(err, ManifestError::NameMismatch { .. }), "{err:?}");
}

#[tokio::test]
async fn fixture_host_is_eligible_by_default() {
    let fixture = LinkFixture::new().unwrap();
    let allowed: Vec<String> = vec!["account".to_string()];
    assert!(is_eligible_project(&fixture.host, &allowed).await);
    assert!(!is_eligible_project(&fixture.host, &[]).await);
}

#[cfg(unix)]
#[test]
fn polling_window_sees_the_link_appear() {
    let fixture = LinkFixture::new().unwrap();
    let mut controller = RefreshController::new();
    let start = Instant::now();

    let initial = is_linked(&fixture.host, &fixture.module);
    assert!(!initial);
    controller.start(initial, start);

    let tick = start + Duration::from_secs(3);
    assert_eq!(
        controller.observe(is_linked(&fixture.host, &fixture.module), tick),
        PollOutcome::Continue
    );

    fixture.link_via_global().unwrap();
    let tick = tick + Duration::from_secs(3);
    assert_eq!(
        controller.observe(is_linked(&fixture.host, &fixture.module), tick),
        PollOutcome::Changed { linked: true }
    );
    assert!(!controller.is_polling());
}

#[test]
fn plans_target_the_fixture_directories() {
    let fixture = LinkFixture::new().unwrap();
    let plan = build_and_link_plan("npm", &fixture.module, &fixture.host);
    assert_eq!(plan.name, "Build & Link");
    assert_eq!(plan.steps.len(), 3);
    assert_eq!(plan.steps[2].cwd, fixture.host);
    assert!(plan.describe().iter().all(|line| line.starts_with("npm ")));

    let install = install_plan(
        "npm",
        &fixture.module,
        InstallOptions {
            legacy_peer_deps: false,
            clean: true,
        },
    );
    assert_eq!(install.name, "Clean Install");
    assert_eq!(install.clean_dir, Some(fixture.module.join("node_modules")));
}

#[test]
fn panel_hides_linking_actions_inside_module() {
    let state = PanelState {
        module_path: Some("/work/ngx-lib".into()),
        branch: Some("develop".to_string()),
        linked: false,
        is_ngx_project: true,
        refreshed_at: chrono::Local::now(),
    };
    assert!(!PanelAction::Link.is_enabled(&state));
    assert!(PanelAction::Build.is_enabled(&state));

    let lines = render(&state, false).join("\n");
    assert!(lines.contains("develop"));
}
