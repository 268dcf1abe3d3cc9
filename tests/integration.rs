use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_jsdoc-extract")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

// -- stdin mode --

#[test]
fn stdin_mode_defaults_to_json() {
    let input = std::fs::read_to_string(fixture_path("js-1-function.js")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&assert)).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "bytesToText");
    assert_eq!(records[0]["returns"]["type"], "String");
}

#[test]
fn stdin_markdown_format() {
    let input = std::fs::read_to_string(fixture_path("js-2-functions.js")).unwrap();

    let assert = cmd()
        .args(["-f", "markdown"])
        .write_stdin(input)
        .assert()
        .success();

    let output = stdout_of(&assert);
    assert!(output.starts_with("## Index\n\n* [random](#random)\n* [random.float](#randomfloat)\n"));
    assert!(output.contains("### random.float\n"));
}

#[test]
fn stdin_docgen_format() {
    let input = std::fs::read_to_string(fixture_path("js-param-defaults.js")).unwrap();

    let assert = cmd()
        .args(["-f", "docgen"])
        .write_stdin(input)
        .assert()
        .success();

    let output = stdout_of(&assert);
    assert!(output.contains("visitUrl.__docgenInfo = {"));
    // @ignore'd blocks never get attached
    assert!(!output.contains("ignoreMe.__docgenInfo"));
}

#[test]
fn stdin_without_doc_blocks() {
    cmd()
        .write_stdin("function plain() {}\n")
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn hide_ignored_flag() {
    let input = std::fs::read_to_string(fixture_path("js-param-defaults.js")).unwrap();

    let assert = cmd()
        .arg("--hide-ignored")
        .write_stdin(input)
        .assert()
        .success();

    let output = stdout_of(&assert);
    assert!(output.contains("\"visitUrl\""));
    assert!(!output.contains("\"ignoreMe\""));
}

#[test]
fn filter_flag() {
    let input = "/** Widget */\nclass Widget {\n/** Render */\nexports.render = function() {}\n";

    let assert = cmd()
        .args(["--filter", "class"])
        .write_stdin(input)
        .assert()
        .success();
    let output = stdout_of(&assert);
    assert!(output.contains("\"Widget\""));
    assert!(!output.contains("exports.render"));

    let assert = cmd()
        .args(["--filter", "!class"])
        .write_stdin(input)
        .assert()
        .success();
    let output = stdout_of(&assert);
    assert!(!output.contains("\"Widget\""));
    assert!(output.contains("exports.render"));
}

// -- file mode --

#[test]
fn file_mode_creates_output() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("js-1-function.js"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("js-1-function.json")).unwrap();
    assert!(output.contains("\"bytesToText\""));
}

#[test]
fn file_mode_directory_input() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "md"])
        .arg(fixture_path(""))
        .assert()
        .success();

    assert!(dir.path().join("js-1-function.md").exists());
    assert!(dir.path().join("js-2-functions.md").exists());
    assert!(dir.path().join("js-param-defaults.md").exists());
}

#[test]
fn file_mode_docgen_extension() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "docgen"])
        .arg(fixture_path("js-2-functions.js"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("js-2-functions.docgen.js")).unwrap();
    assert!(output.contains("random.__docgenInfo"));
    assert!(output.contains("random.float.__docgenInfo"));
}

#[test]
fn file_mode_skips_files_without_records() {
    let dir = TempDir::new().unwrap();
    let mut input = NamedTempFile::with_suffix(".js").unwrap();
    input.write_all(b"// nothing documented\nfunction a() {}\n").unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(input.path().to_str().unwrap())
        .assert()
        .success();

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn file_mode_requires_output() {
    cmd()
        .arg(fixture_path("js-1-function.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn invalid_format_fails() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "xml"])
        .arg(fixture_path("js-1-function.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}
