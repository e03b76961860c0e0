//! Integration tests for the `jwrap` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the get, at, ls
//! and convert subcommands through the actual binary, including stdin
//! piping, file I/O, YAML input and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

/// Helper: path to the records.json fixture.
fn records_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/records.json")
}

/// Helper: path to the service.yaml fixture.
fn service_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/service.yaml")
}

/// Helper: path to the tab-indented YAML fixture.
fn tabbed_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/tabbed.yaml")
}

fn jwrap() -> Command {
    Command::cargo_bin("jwrap").unwrap()
}

/// Run the command and parse its stdout as JSON.
fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command should run");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// get
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn get_nested_value_from_file() {
    let value = stdout_json(jwrap().args(["get", "-i", records_path(), "0", "address", "city"]));
    assert_eq!(value, json!("Oslo"));
}

#[test]
fn get_from_stdin() {
    let value = stdout_json(
        jwrap()
            .args(["get", "servers", "0"])
            .write_stdin(r#"{"servers":[{"name":"alpha"}]}"#),
    );
    assert_eq!(value, json!({"name": "alpha"}));
}

#[test]
fn get_missing_path_prints_null() {
    jwrap()
        .args(["get", "-i", records_path(), "7", "name"])
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn get_negative_index() {
    let value = stdout_json(jwrap().args(["get", "-i", records_path(), "-1", "name"]));
    assert_eq!(value, json!("Bob"));
}

#[test]
fn get_numeric_mapping_key_stays_a_name() {
    let value = stdout_json(jwrap().args(["get", "-i", service_path(), "2024"]));
    assert_eq!(value, json!("leap"));
}

#[test]
fn get_without_path_prints_whole_document() {
    let value = stdout_json(jwrap().args(["get", "-i", service_path()]));
    assert_eq!(value["limits"], json!({"rps": 100, "burst": 20}));
}

#[test]
fn get_with_custom_yaml_indent() {
    let value = stdout_json(jwrap().args([
        "get",
        "-i",
        tabbed_path(),
        "--yaml-indent",
        "\t",
        "root",
        "child",
        "leaf",
    ]));
    assert_eq!(value, json!(1));
}

// ─────────────────────────────────────────────────────────────────────────────
// at
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn at_many_selectors_with_null_hole() {
    let value = stdout_json(jwrap().args([
        "at",
        "-i",
        service_path(),
        "name",
        "servers.1.port",
        "missing",
    ]));
    assert_eq!(value, json!(["gateway", 8081, null]));
}

#[test]
fn at_one_prints_bare_value() {
    let value = stdout_json(jwrap().args(["at", "-i", records_path(), "--one", "0.tags.0"]));
    assert_eq!(value, json!("admin"));
}

#[test]
fn at_one_with_two_selectors_fails() {
    jwrap()
        .args(["at", "-i", records_path(), "--one", "0", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--one requires exactly one selector"));
}

// ─────────────────────────────────────────────────────────────────────────────
// ls
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn ls_mapping_children_sorted() {
    jwrap()
        .args(["ls", "-i", records_path(), "0", "address"])
        .assert()
        .success()
        .stdout("city\t\"Oslo\"\nzip\t\"0150\"\n");
}

#[test]
fn ls_sequence_children_indexed() {
    jwrap()
        .args(["ls", "-i", records_path(), "0", "tags"])
        .assert()
        .success()
        .stdout("0\t\"admin\"\n1\t\"ops\"\n");
}

#[test]
fn ls_scalar_yields_single_keyless_entry() {
    jwrap()
        .args(["ls", "-i", records_path(), "1", "name"])
        .assert()
        .success()
        .stdout("-\t\"Bob\"\n");
}

#[test]
fn ls_json_output() {
    let value = stdout_json(jwrap().args(["ls", "--json", "-i", service_path(), "limits"]));
    assert_eq!(
        value,
        json!([
            {"key": "burst", "value": 20},
            {"key": "rps", "value": 100}
        ])
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// convert
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn convert_json_to_yaml_by_default() {
    jwrap()
        .arg("convert")
        .write_stdin(r#"{"b":1,"a":[true]}"#)
        .assert()
        .success()
        .stdout("b: 1\na:\n- true\n");
}

#[test]
fn convert_yaml_to_sorted_compact_json() {
    jwrap()
        .args(["convert", "-i", service_path(), "--to", "json", "--compact", "--sort"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(r#"{"2024": "leap", "limits": {"burst": 20, "rps": 100}"#));
}

#[test]
fn convert_yaml_flow_style() {
    jwrap()
        .args(["convert", "--to", "yaml", "--flow"])
        .write_stdin("a: [1, 2]\n")
        .assert()
        .success()
        .stdout("{\"a\": [1, 2]}\n");
}

#[test]
fn convert_to_file_derives_format_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("service.json");

    jwrap()
        .args(["convert", "-i", service_path(), "-o", out.to_str().unwrap()])
        .assert()
        .success();

    let content = std::fs::read_to_string(&out).expect("output file must exist");
    let value: Value = serde_json::from_str(&content).expect("output should be JSON");
    assert_eq!(value["servers"][0]["host"], json!("alpha"));
}

#[test]
fn convert_to_unknown_extension_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("service.toml");

    jwrap()
        .args(["convert", "-i", service_path(), "-o", out.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported format"));
    assert!(!out.exists());
}

#[test]
fn convert_unknown_target_format_fails() {
    jwrap()
        .args(["convert", "--to", "xml"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported format: 'xml'"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn malformed_input_fails() {
    jwrap()
        .arg("get")
        .write_stdin("{not valid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parsing errors"));
}

#[test]
fn missing_input_file_fails() {
    jwrap()
        .args(["get", "-i", "/nonexistent/path/data.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}
