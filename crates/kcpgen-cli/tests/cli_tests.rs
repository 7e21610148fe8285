//! End-to-end tests for the `kcpgen` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

/// A `kcpgen` invocation isolated from the user's config and environment.
fn kcpgen(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("kcpgen");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("NO_COLOR");
    cmd
}

fn init_widgets(temp: &TempDir) -> std::path::PathBuf {
    let dir = temp.path().join("widgets");
    kcpgen(temp.path())
        .args(["init", "--domain", "example.com", "--repo", "github.com/acme/widgets"])
        .arg("--project-dir")
        .arg(&dir)
        .assert()
        .success();
    dir
}

fn create_widget(temp: &TempDir, dir: &Path) -> assert_cmd::assert::Assert {
    kcpgen(temp.path())
        .args(["create", "api", "--group", "apps", "--version", "v1", "--kind", "Widget"])
        .arg("--project-dir")
        .arg(dir)
        .assert()
}

// ============================================================================
// Basics
// ============================================================================

#[test]
fn help_mentions_kcp() {
    let temp = TempDir::new().unwrap();
    kcpgen(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("kcp"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("create"));
}

#[test]
fn version_flag() {
    let temp = TempDir::new().unwrap();
    kcpgen(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_is_usage_error() {
    let temp = TempDir::new().unwrap();
    kcpgen(temp.path())
        .args(["init", "--lang", "rust"])
        .assert()
        .code(2);
}

#[test]
fn completions_for_bash() {
    let temp = TempDir::new().unwrap();
    kcpgen(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kcpgen"));
}

#[test]
fn config_get_default_license() {
    let temp = TempDir::new().unwrap();
    kcpgen(temp.path())
        .args(["config", "get", "defaults.license"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apache2"));
}

#[test]
fn config_reads_environment() {
    let temp = TempDir::new().unwrap();
    kcpgen(temp.path())
        .env("KCPGEN__DEFAULTS__DOMAIN", "env.example.com")
        .args(["config", "get", "defaults.domain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("env.example.com"));
}

#[test]
fn missing_config_file_exits_four() {
    let temp = TempDir::new().unwrap();
    kcpgen(temp.path())
        .args(["--config", "absent.toml", "config", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

// ============================================================================
// init
// ============================================================================

#[test]
fn init_writes_project_and_files() {
    let temp = TempDir::new().unwrap();
    let dir = init_widgets(&temp);

    let project = fs::read_to_string(dir.join("PROJECT")).unwrap();
    assert!(project.contains("projectName: widgets"));
    assert!(project.contains("repo: github.com/acme/widgets"));
    assert!(project.contains("manifests.kcp.dev/v1"));

    let go_mod = fs::read_to_string(dir.join("go.mod")).unwrap();
    assert!(go_mod.starts_with("module github.com/acme/widgets"));
    assert!(dir.join("main.go").is_file());
    assert!(dir.join("hack/boilerplate.go.txt").is_file());
    assert!(dir.join("config/kcp/kustomization.yaml").is_file());
}

#[test]
fn init_requires_domain() {
    let temp = TempDir::new().unwrap();
    kcpgen(temp.path())
        .args(["init", "--project-name", "widgets"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--domain"));
    assert!(!temp.path().join("PROJECT").exists());
}

#[test]
fn init_twice_is_refused() {
    let temp = TempDir::new().unwrap();
    let dir = init_widgets(&temp);

    kcpgen(temp.path())
        .args(["init", "--domain", "example.com"])
        .arg("--project-dir")
        .arg(&dir)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already initialised"));
}

#[test]
fn init_json_report() {
    let temp = TempDir::new().unwrap();
    let output = kcpgen(temp.path())
        .args(["--output-format", "json", "init", "--domain", "example.com"])
        .args(["--project-name", "widgets"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["summary"]["created"].as_u64().unwrap() > 5);
    assert_eq!(report["summary"]["failed"], 0);
    assert_eq!(report["files"][0]["path"], "hack/boilerplate.go.txt");
}

// ============================================================================
// create api
// ============================================================================

#[test]
fn create_api_wires_main_and_records_resource() {
    let temp = TempDir::new().unwrap();
    let dir = init_widgets(&temp);
    let go_mod = fs::read_to_string(dir.join("go.mod")).unwrap();

    create_widget(&temp, &dir).success();

    let main = fs::read_to_string(dir.join("main.go")).unwrap();
    assert!(main.contains("appsv1 \"github.com/acme/widgets/api/v1\""));
    assert!(main.contains("WidgetReconciler"));
    assert!(dir.join("api/v1/widget_types.go").is_file());
    assert!(dir.join("controllers/widget_controller.go").is_file());
    assert_eq!(fs::read_to_string(dir.join("go.mod")).unwrap(), go_mod);

    let project = fs::read_to_string(dir.join("PROJECT")).unwrap();
    assert!(project.contains("kind: Widget"));
    assert!(project.contains("path: github.com/acme/widgets/api/v1"));
}

#[test]
fn create_api_twice_is_refused() {
    let temp = TempDir::new().unwrap();
    let dir = init_widgets(&temp);
    create_widget(&temp, &dir).success();

    create_widget(&temp, &dir)
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn create_api_outside_project_exits_three() {
    let temp = TempDir::new().unwrap();
    kcpgen(temp.path())
        .args(["create", "api", "--version", "v1", "--kind", "Widget"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("kcpgen init"));
}

#[test]
fn create_api_rejects_bad_kind() {
    let temp = TempDir::new().unwrap();
    let dir = init_widgets(&temp);

    kcpgen(temp.path())
        .args(["create", "api", "--group", "apps", "--version", "v1", "--kind", "widget"])
        .arg("--project-dir")
        .arg(&dir)
        .assert()
        .code(2);
    assert!(!dir.join("api").exists());
}
