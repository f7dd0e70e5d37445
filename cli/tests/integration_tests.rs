use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

const FILES_PACKAGE: &str = r#"
version: "1.0"
name: files
schemas:
  - name: copy
    options:
      - name: mode
        allowed_values: [fast, safe]
    flags:
      - name: f
    arguments:
      - name: from
        mandatory: true
      - name: to
        mandatory: true
  - name: head
    arguments:
      - name: lines
        value_type: i32
        mandatory: true
"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

fn shellkit(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_shellkit"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run shellkit")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// validate / bundle
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_well_formed_package() {
    let dir = tempfile::tempdir().unwrap();
    let package = write(dir.path(), "files.yaml", FILES_PACKAGE);

    let out = shellkit(&["validate", package.to_str().unwrap()]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Validated 1 source(s) with 2 command(s)."), "{stdout}");
}

#[test]
fn validate_rejects_bad_option_name() {
    let dir = tempfile::tempdir().unwrap();
    let package = write(
        dir.path(),
        "bad.yaml",
        "version: '1'\nschemas:\n  - name: cmd\n    options:\n      - name: bad-name\n",
    );

    let out = shellkit(&["validate", package.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error: invalid schema"), "{stderr}");
    assert!(stderr.contains("bad-name"), "{stderr}");
}

#[test]
fn bundle_merges_sources_into_json() {
    let dir = tempfile::tempdir().unwrap();
    let files = write(dir.path(), "files.yaml", FILES_PACKAGE);
    let extra = write(
        dir.path(),
        "extra.json",
        r#"{"version": "1", "schemas": [{"name": "ping"}]}"#,
    );
    let output = dir.path().join("out/bundle.json");

    let out = shellkit(&[
        "bundle",
        files.to_str().unwrap(),
        extra.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--name",
        "all",
    ]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let bundle: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(bundle["name"], "all");
    let names: Vec<&str> = bundle["schemas"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["copy", "head", "ping"]);
}

// ---------------------------------------------------------------------------
// tokenize
// ---------------------------------------------------------------------------

#[test]
fn tokenize_keeps_quoted_regions() {
    let out = shellkit(&["tokenize", r#"-t --opt="a b"  plain"#]);

    assert!(out.status.success());
    assert_eq!(
        stdout_json(&out),
        serde_json::json!(["-t", "--opt=\"a b\"", "plain"])
    );
}

#[test]
fn tokenize_reports_unbalanced_quotes() {
    let out = shellkit(&["tokenize", r#"say "hi"#]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("error: Invalid command. Couldn't identify sequence at position 4"),
        "{stderr}"
    );
}

// ---------------------------------------------------------------------------
// bind
// ---------------------------------------------------------------------------

#[test]
fn bind_prints_typed_values() {
    let dir = tempfile::tempdir().unwrap();
    let package = write(dir.path(), "files.yaml", FILES_PACKAGE);

    let out = shellkit(&[
        "bind",
        "--schemas",
        package.to_str().unwrap(),
        r#"COPY -f "my file" dest"#,
    ]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        stdout_json(&out),
        serde_json::json!({
            "command": "copy",
            "arguments": {
                "--mode": "fast",
                "-f": true,
                "from": "my file",
                "to": "dest",
            }
        })
    );
}

#[test]
fn bind_coerces_integers() {
    let dir = tempfile::tempdir().unwrap();
    let package = write(dir.path(), "files.yaml", FILES_PACKAGE);

    let out = shellkit(&["bind", "--schemas", package.to_str().unwrap(), "head 20"]);

    assert!(out.status.success());
    assert_eq!(stdout_json(&out)["arguments"]["lines"], 20);
}

#[test]
fn bind_prints_every_rejection_message() {
    let dir = tempfile::tempdir().unwrap();
    let package = write(dir.path(), "files.yaml", FILES_PACKAGE);

    let out = shellkit(&["bind", "--schemas", package.to_str().unwrap(), "copy -fx a b"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Error: Option Flags not recognized: [x]"), "{stderr}");
    assert!(stderr.contains("error: rejected with 1 error(s)"), "{stderr}");
}

#[test]
fn bind_unknown_command() {
    let dir = tempfile::tempdir().unwrap();
    let package = write(dir.path(), "files.yaml", FILES_PACKAGE);

    let out = shellkit(&["bind", "--schemas", package.to_str().unwrap(), "move a b"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Error: No command found : move"), "{stderr}");
}

#[test]
fn bind_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "files.yaml", FILES_PACKAGE);
    let config = write(
        dir.path(),
        "shell.yaml",
        "version: '1.0'\nname: demo\nsources:\n  - files.yaml\nlog_filter: error\n",
    );

    let out = shellkit(&[
        "bind",
        "--config",
        config.to_str().unwrap(),
        "copy --mode=safe a b",
    ]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(stdout_json(&out)["arguments"]["--mode"], "safe");
}

#[test]
fn bind_requires_a_catalog() {
    let out = shellkit(&["bind", "copy a b"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("either --schemas or --config is required"), "{stderr}");
}
