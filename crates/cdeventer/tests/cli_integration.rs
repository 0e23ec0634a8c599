//! CLI integration tests for the cdeventer command-line interface.
//!
//! These tests verify argument parsing, config handling and the offline
//! paths of `render` and `reconcile`. None of them needs a reachable sink.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const QUEUED_RUN: &str = r#"
apiVersion: tekton.dev/v1alpha1
kind: Run
metadata:
  name: queued
  namespace: ci
spec:
  ref:
    apiVersion: custom.tekton.dev/v0
    kind: CDEvent
  params:
    - name: context
      value:
        type: dev.cdevents.pipelinerun.queued.0.1.0
        source: test
    - name: subject
      value:
        id: pr1
        pipelineName: build
"#;

/// Get a command for the cdeventer binary, isolated from the user's config.
fn cdeventer(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cdeventer").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("CDEVENTER_SINK_URL")
        .arg("--config-dir")
        .arg(dir.path().join("user"));
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    cdeventer(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reconcile"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    cdeventer(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cdeventer"));
}

#[test]
fn test_reconcile_requires_files() {
    let dir = TempDir::new().unwrap();
    cdeventer(&dir).arg("reconcile").assert().failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Render
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_render_binary() {
    let dir = TempDir::new().unwrap();
    let run = write(&dir, "run.yaml", QUEUED_RUN);

    cdeventer(&dir)
        .arg("render")
        .arg(&run)
        .assert()
        .success()
        .stdout(predicate::str::contains("ce-specversion: 1.0"))
        .stdout(predicate::str::contains(
            "ce-type: dev.cdevents.pipelinerun.queued.0.1.0",
        ))
        .stdout(predicate::str::contains("\"pipelineName\": \"build\""));
}

#[test]
fn test_render_structured() {
    let dir = TempDir::new().unwrap();
    let run = write(&dir, "run.yaml", QUEUED_RUN);

    cdeventer(&dir)
        .args(["render", "--mode", "structured"])
        .arg(&run)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"specversion\": \"1.0\""))
        .stdout(predicate::str::contains("\"datacontenttype\": \"application/json\""));
}

#[test]
fn test_render_from_stdin() {
    let dir = TempDir::new().unwrap();
    cdeventer(&dir)
        .args(["render", "-"])
        .write_stdin(QUEUED_RUN)
        .assert()
        .success()
        .stdout(predicate::str::contains("ce-source: test"));
}

#[test]
fn test_render_escapes_header_values() {
    let dir = TempDir::new().unwrap();
    let run = write(
        &dir,
        "run.yaml",
        &QUEUED_RUN.replace("source: test", "source: \"ci/café 100%\""),
    );

    cdeventer(&dir)
        .arg("render")
        .arg(&run)
        .assert()
        .success()
        .stdout(predicate::str::contains("ce-source: ci/caf%C3%A9%20100%25"));

    cdeventer(&dir)
        .args(["--json", "render"])
        .arg(&run)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source\": \"ci/café 100%\""));
}

#[test]
fn test_render_illegal_field_fails() {
    let dir = TempDir::new().unwrap();
    let run = write(
        &dir,
        "run.yaml",
        &QUEUED_RUN.replace("pipelinerun.queued", "taskrun.started"),
    );

    cdeventer(&dir)
        .arg("render")
        .arg(&run)
        .assert()
        .failure()
        .stderr(predicate::str::contains("pipelineName"));
}

#[test]
fn test_render_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    cdeventer(&dir)
        .args(["render", "does-not-exist.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Reconcile (no delivery)
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_reconcile_foreign_run_is_untouched() {
    let dir = TempDir::new().unwrap();
    let run = write(
        &dir,
        "run.yaml",
        &QUEUED_RUN.replace("kind: CDEvent", "kind: Wait"),
    );

    cdeventer(&dir)
        .arg("reconcile")
        .arg(&run)
        .assert()
        .success()
        .stdout(predicate::str::contains("name: queued"))
        .stdout(predicate::str::contains("conditions").not());
}

#[test]
fn test_reconcile_named_ref_fails() {
    let dir = TempDir::new().unwrap();
    let run = write(
        &dir,
        "run.yaml",
        &QUEUED_RUN.replace("kind: CDEvent", "kind: CDEvent\n    name: my-event"),
    );

    cdeventer(&dir)
        .args(["--json", "reconcile"])
        .arg(&run)
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"reason\": \"UnexpectedName\""))
        .stderr(predicate::str::contains("1 of 1 Runs failed"));
}

#[test]
fn test_reconcile_invalid_sink_url() {
    let dir = TempDir::new().unwrap();
    let run = write(&dir, "run.yaml", QUEUED_RUN);

    cdeventer(&dir)
        .args(["--sink", "ftp://example.com/events", "reconcile"])
        .arg(&run)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported scheme"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_show_defaults() {
    let dir = TempDir::new().unwrap();
    cdeventer(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No config files loaded"))
        .stdout(predicate::str::contains("broker-ingress.knative-eventing"));
}

#[test]
fn test_config_show_project_file() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "cdeventer.toml",
        "[sink]\nurl = \"http://localhost:9000/events\"\nmode = \"structured\"\n",
    );

    cdeventer(&dir)
        .args(["--json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:9000/events"))
        .stdout(predicate::str::contains("\"mode\": \"structured\""));
}

#[test]
fn test_config_show_sink_flag_wins() {
    let dir = TempDir::new().unwrap();
    write(&dir, "cdeventer.toml", "[sink]\nurl = \"http://from-file/\"\n");

    cdeventer(&dir)
        .args(["--sink", "http://from-flag/", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://from-flag/"));
}

#[test]
fn test_config_init_and_path() {
    let dir = TempDir::new().unwrap();

    cdeventer(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
    assert!(Path::new(&dir.path().join("user").join("config.toml")).is_file());

    cdeventer(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cdeventer(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ loaded"))
        .stdout(predicate::str::contains("user"));
}
