//! Runs the `arxml-check` binary

use std::path::Path;
use std::process::{Command, Output};

use crate::common::test_helpers::*;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_arxml-check"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("run arxml-check")
}

#[test]
fn test_clean_directory_exits_zero() {
    let dir = ModelDir::new();
    dir.write("model.arxml", &sample_model());

    let output = run(dir.path(), &[".", "--roundtrip", "--format", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_files"], 1);
    assert_eq!(report["clean_files"], 1);
    assert_eq!(report["file_results"][0]["roundtrip"], true);
}

#[test]
fn test_errors_give_exit_code_one() {
    let dir = ModelDir::new();
    dir.write(
        "units.arxml",
        &document(&package("Units", &format!("{}{}", unit("m", "m"), unit("m", "m")))),
    );

    let output = run(dir.path(), &["units.arxml"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("units.arxml"));
    assert!(stdout.contains("1 error"));
}

#[test]
fn test_missing_path_is_usage_error() {
    let dir = ModelDir::new();
    let output = run(dir.path(), &["does-not-exist"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Path does not exist"));
}
