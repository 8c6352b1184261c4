//! Integration tests for the sharpsyn CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("sharpsyn").unwrap();
    cmd.env_remove("RUST_LOG").arg("--no-color");
    cmd
}

/// Temporary project with one file per `(relative path, contents)` pair
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, contents) in files {
        let path = dir.path().join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
    dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "sharpsyn parses C# source into a full-fidelity syntax tree",
        ))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_parse_clean_project() {
    let dir = project(&[("src/A.cs", "namespace N { class A { } }\n")]);
    cli()
        .arg("parse")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 errors, 0 warnings in 1 file"));
}

#[test]
fn test_parse_reports_errors_and_fails() {
    let dir = project(&[("Broken.cs", "class C {\n")]);
    cli()
        .args(["parse", "Broken.cs"])
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("error[SS1100]: '}' expected"))
        .stdout(predicate::str::contains("--> Broken.cs:2:1"))
        .stdout(predicate::str::contains("1 error, 0 warnings in 1 file"));
}

#[test]
fn test_parse_warnings_do_not_fail() {
    let dir = project(&[("W.cs", "class C { void M() { while (x); } }\n")]);
    cli()
        .args(["parse", "W.cs"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("warning[SS2001]"));
}

#[test]
fn test_parse_json_output() {
    let dir = project(&[("Broken.cs", "class C { int x }")]);
    let output = cli()
        .args(["parse", "--format", "json", "Broken.cs"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["code"], "SS1100");
    assert_eq!(value[0]["file"], "Broken.cs");
    assert_eq!(value[0]["line"], 1);
}

#[test]
fn test_language_version_flag() {
    let dir = project(&[("R.cs", "record C(int X, int Y);\n")]);
    cli()
        .args(["parse", "R.cs"])
        .current_dir(dir.path())
        .assert()
        .success();
    cli()
        .args(["parse", "--lang-version", "1", "--format", "compact", "R.cs"])
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("R.cs:1:"))
        .stdout(predicate::str::contains(": error[SS1200]: "));
}

#[test]
fn test_config_file_is_discovered() {
    let dir = project(&[
        ("sharpsyn.toml", "[parse]\nlanguage-version = \"1\"\n"),
        ("R.cs", "record C(int X, int Y);\n"),
    ]);
    cli()
        .arg("parse")
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("SS1200"));
}

#[test]
fn test_default_excludes_skip_build_output() {
    let dir = project(&[("src/A.cs", "class A { }"), ("obj/Gen.cs", "class {")]);
    cli()
        .arg("parse")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("in 1 file"));
}

#[test]
fn test_invalid_config_is_fatal() {
    let dir = project(&[("sharpsyn.toml", "[parse]\nlanguage-version = \"99\"\n")]);
    cli()
        .arg("parse")
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_missing_path_is_fatal() {
    let dir = project(&[]);
    cli()
        .args(["parse", "nope.cs"])
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("path not found"));
}

#[test]
fn test_tree_command() {
    let dir = project(&[("A.cs", "class C { }")]);
    cli()
        .args(["tree", "A.cs"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ClassDeclaration@0..11"))
        .stdout(predicate::str::contains("Whitespace@5..6"));
    cli()
        .args(["tree", "--no-trivia", "A.cs"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Whitespace").not());
}

#[test]
fn test_tree_expression_entry() {
    let dir = project(&[("e.txt", "a + b")]);
    cli()
        .args(["tree", "--entry", "expression", "e.txt"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ExpressionRoot@0..5"));
}

#[test]
fn test_check_command() {
    let dir = project(&[
        ("A.cs", "class A { void M() { if (x) } "),
        ("B.cs", "\u{feff}// only a comment\r\n"),
    ]);
    cli()
        .arg("check")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2 files checked, 0 round-trip mismatches",
        ));
}

#[test]
fn test_config_init() {
    let dir = project(&[]);
    cli()
        .args(["config", "init"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let written = fs::read_to_string(dir.path().join("sharpsyn.toml")).unwrap();
    assert!(written.contains("language-version"));

    cli()
        .args(["config", "init"])
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    cli()
        .args(["config", "init", "--force"])
        .current_dir(dir.path())
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_does_not_stop_the_run() {
    let dir = project(&[("A.cs", "class A { }"), ("B.cs", "class B { int x }")]);
    std::os::unix::fs::symlink(dir.path().join("missing.cs"), dir.path().join("Gone.cs")).unwrap();

    cli()
        .arg("parse")
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--> ./B.cs:1:17"))
        .stdout(predicate::str::contains("1 error, 0 warnings in 2 files"))
        .stderr(predicate::str::contains("1 of 3 files could not be read"));

    cli()
        .arg("check")
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("2 files checked, 0 round-trip mismatches"))
        .stderr(predicate::str::contains("1 of 3 files could not be read"));
}
