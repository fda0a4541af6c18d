//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SERVICE_DOC: &str = "\
defaults:
  port: 8080
  name: ~
cli:
  - cli_key: --name NAME
    keys: [name]
    desc: Service name
";

fn write_doc(dir: &Path, file: &str, content: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, content).expect("write document");
    path
}

fn layerconf() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("layerconf"))
}

#[test]
fn test_cli_version() {
    let mut cmd = layerconf();
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("layerconf"));
}

#[test]
fn test_cli_help() {
    let mut cmd = layerconf();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Merge a document's defaults"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("<DOCUMENT>"));
}

#[test]
fn test_supplied_flag_is_merged_over_defaults() {
    let tmp = TempDir::new().expect("tmp");
    let doc = write_doc(tmp.path(), "service.yml", SERVICE_DOC);

    let mut cmd = layerconf();
    cmd.args(["--format", "json"]).arg(&doc).args(["--name", "foo"]);
    cmd.assert().success().stdout(predicate::str::diff("{\"port\":8080,\"name\":\"foo\"}\n"));
}

#[test]
fn test_yaml_is_the_default_output() {
    let tmp = TempDir::new().expect("tmp");
    let doc = write_doc(tmp.path(), "service.yml", SERVICE_DOC);

    let mut cmd = layerconf();
    cmd.arg(&doc).args(["--name", "foo"]);
    cmd.assert().success().stdout(predicate::str::diff("port: 8080\nname: foo\n"));
}

#[test]
fn test_missing_required_value_exits_with_usage() {
    let tmp = TempDir::new().expect("tmp");
    let doc = write_doc(tmp.path(), "service.yml", SERVICE_DOC);

    let mut cmd = layerconf();
    cmd.arg(&doc);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("required variable not set: name"))
        .stderr(predicate::str::contains("Usage:"))
        .stderr(predicate::str::contains("--name <NAME>"))
        .stderr(predicate::str::contains("Service name"));
}

#[test]
fn test_nested_missing_value_is_reported_by_path() {
    let tmp = TempDir::new().expect("tmp");
    let doc = write_doc(
        tmp.path(),
        "service.yml",
        "defaults:\n  tuning:\n    rate: ~\n    enabled: false\ncli: []\n",
    );

    let mut cmd = layerconf();
    cmd.arg(&doc);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("required variable not set: tuning.enabled"))
        .stderr(predicate::str::contains("required variable not set: tuning.rate"));
}

#[test]
fn test_float_option() {
    let tmp = TempDir::new().expect("tmp");
    let doc = write_doc(
        tmp.path(),
        "tuning.yml",
        "defaults:\n  tuning:\n    rate: ~\ncli:\n  - cli_key: --rate RATE\n    keys: [tuning, rate]\n    type: float\n",
    );

    let mut cmd = layerconf();
    cmd.args(["--format", "json"]).arg(&doc).args(["--rate", "2.5"]);
    cmd.assert().success().stdout(predicate::str::diff("{\"tuning\":{\"rate\":2.5}}\n"));
}

#[test]
fn test_negative_float_and_abbreviated_flag() {
    let tmp = TempDir::new().expect("tmp");
    let doc = write_doc(
        tmp.path(),
        "tuning.yml",
        "defaults:\n  tuning:\n    rate: ~\n    label: ~\ncli:\n  - cli_key: --rate RATE\n    keys: [tuning, rate]\n    type: float\n  - cli_key: --label LABEL\n    keys: [tuning, label]\n",
    );

    let mut cmd = layerconf();
    cmd.args(["--format", "json"]).arg(&doc).args(["--rate", "-2.5", "--lab", "-x"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("{\"tuning\":{\"rate\":-2.5,\"label\":\"-x\"}}\n"));
}

#[test]
fn test_file_contents_option() {
    let tmp = TempDir::new().expect("tmp");
    let cert = tmp.path().join("cert.pem");
    fs::write(&cert, "ABC").expect("write cert");
    let doc = write_doc(
        tmp.path(),
        "tls.yml",
        "defaults:\n  cert: ~\ncli:\n  - cli_key: --cert FILE\n    keys: [cert]\n    type: file-contents\n",
    );

    let mut cmd = layerconf();
    cmd.args(["--format", "json"]).arg(&doc).arg("--cert").arg(&cert);
    cmd.assert().success().stdout(predicate::str::diff("{\"cert\":\"ABC\"}\n"));
}

#[test]
fn test_missing_cli_section_is_rejected() {
    let tmp = TempDir::new().expect("tmp");
    let doc = write_doc(tmp.path(), "service.yml", "defaults:\n  port: 8080\n");

    let mut cmd = layerconf();
    cmd.arg(&doc);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("config file syntax error"))
        .stderr(predicate::str::contains("'cli'"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    let tmp = TempDir::new().expect("tmp");
    let doc = write_doc(tmp.path(), "service.yml", SERVICE_DOC);

    let mut cmd = layerconf();
    cmd.arg(&doc).args(["--nmae", "foo"]);
    cmd.assert().failure().stderr(predicate::str::contains("--nmae"));
}

#[test]
fn test_document_flag_help() {
    let tmp = TempDir::new().expect("tmp");
    let doc = write_doc(tmp.path(), "service.yml", SERVICE_DOC);

    let mut cmd = layerconf();
    cmd.arg(&doc).args(["--", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--name <NAME>"))
        .stdout(predicate::str::contains("Service name"));
}

#[test]
fn test_pretty_json_and_toml_document() {
    let tmp = TempDir::new().expect("tmp");
    let doc = write_doc(
        tmp.path(),
        "service.toml",
        "[defaults]\nport = 8080\nname = \"\"\n\n[[cli]]\ncli_key = \"-n, --name NAME\"\nkeys = [\"name\"]\n",
    );

    let mut cmd = layerconf();
    cmd.args(["--format", "json", "--pretty"]).arg(&doc).args(["-n", "foo"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("{\n  \"port\": 8080,\n  \"name\": \"foo\"\n}\n"));
}

#[test]
fn test_missing_document_fails() {
    let tmp = TempDir::new().expect("tmp");

    let mut cmd = layerconf();
    cmd.arg(tmp.path().join("absent.yml"));
    cmd.assert().code(1).stderr(predicate::str::contains("failed reading"));
}

#[test]
fn test_forwarded_args_may_follow_separator() {
    let tmp = TempDir::new().expect("tmp");
    let doc = write_doc(tmp.path(), "service.yml", SERVICE_DOC);

    let mut cmd = layerconf();
    cmd.args(["-f", "json"]).arg(&doc).args(["--", "--name", "foo"]);
    cmd.assert().success().stdout(predicate::str::diff("{\"port\":8080,\"name\":\"foo\"}\n"));
}
