// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use assert_cmd::Command;
use std::fs;
use std::path::Path;

const SUBROUTINE: &str = r#"{
    "file_name": "s.f90",
    "language": "fortran",
    "body": [
        {"procedure": {
            "name": "s",
            "kind": "subroutine",
            "params": [{"name": "x", "ty": {"integer": {}}}, {"name": "y", "ty": {"integer": {}}}],
            "body": [
                {"variable_declaration": {"intent": "in", "variables": [{"name": "x", "ty": {"integer": {}}}]}},
                {"variable_declaration": {"intent": "out", "variables": [{"name": "y", "ty": {"integer": {}}}]}},
                {"expr_statement": {"binary": {"op": "assign", "lhs": {"var": "y"}, "rhs": {"var": "x"}}}}
            ]
        }}
    ]
}"#;

const BROKEN: &str = r#"{
    "file_name": "broken.f90",
    "language": "fortran",
    "body": [{"unknown": {"kind": "SgArithmeticIfStatement"}}]
}"#;

fn ftc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ftc").unwrap();
    cmd.current_dir(dir).arg("--runtime-root").arg("/opt/ftc");
    cmd
}

#[test]
fn test_writes_unit_and_header() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("s.json"), SUBROUTINE).unwrap();

    ftc(dir.path())
        .args(["s.json", "--output-dir", "out"])
        .assert()
        .success();

    let unit: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out/s.c.json")).unwrap()).unwrap();
    assert_eq!(unit["file_name"], "s.c");
    assert_eq!(unit["template"], "/opt/ftc/dummy.f90");

    let header: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out/s.h.json")).unwrap()).unwrap();
    assert_eq!(header["pragma_once"], true);
}

#[test]
fn test_failed_unit_sets_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("s.json"), SUBROUTINE).unwrap();
    fs::write(dir.path().join("broken.json"), BROKEN).unwrap();

    let assert = ftc(dir.path()).args(["s.json", "broken.json"]).assert().failure();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("broken.f90"));
    assert!(stdout.contains("SgArithmeticIfStatement"));

    // the healthy unit is still written
    assert!(dir.path().join("s.c.json").exists());
    assert!(!dir.path().join("broken.c.json").exists());
}

#[test]
fn test_config_file_changes_extensions() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("s.json"), SUBROUTINE).unwrap();
    fs::write(dir.path().join("ftc.toml"), "target_extension = \"cc\"\nheader_extension = \"hh\"\n").unwrap();

    ftc(dir.path())
        .args(["s.json", "--config", "ftc.toml"])
        .assert()
        .success();

    assert!(dir.path().join("s.cc.json").exists());
    assert!(dir.path().join("s.hh.json").exists());
}

#[test]
fn test_unreadable_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.json"), "{ not json").unwrap();

    ftc(dir.path()).arg("bad.json").assert().failure();
    ftc(dir.path()).arg("missing.json").assert().failure();
}
