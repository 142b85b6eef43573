use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const ONE_ENTRY: &str = r#"[{"day":1,"book":"Psalm","start_chapter":23,"start_verse":1,"end_chapter":23,"end_verse":6,"type":"Psalm","order":1}]"#;

fn write_catalog(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("devotion.json");
    std::fs::write(&path, contents).expect("write catalog");
    path
}

/// Full workflow against a stub LM: `cat` echoes each prompt back, so every
/// stage "generates" its own prompt text.
#[test]
fn run_completes_with_stub_lm() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let catalog = write_catalog(temp.path(), ONE_ENTRY);

    let mut child = Command::new(env!("CARGO_BIN_EXE_devotion"))
        .arg("run")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--date")
        .arg("2025-01-01")
        .arg("--lm")
        .arg("cat")
        .arg("--no-search")
        .arg("--json")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn run");
    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(b"Grateful for rest.\n\n")
        .expect("write reflection");

    let output = child.wait_with_output().expect("wait run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse result");
    assert_eq!(value["status"], "success");
    assert_eq!(value["user_input"], "Grateful for rest.");
    let summary = value["devotion_summary"].as_str().expect("summary");
    assert!(summary.contains("Psalm 23:1-6"), "summary: {summary}");
    let songs = value["worship_songs"].as_str().expect("songs");
    assert!(songs.contains("SESSION CONTEXT"), "songs: {songs}");
    assert!(value["error_message"].is_null());
}

/// A date with no slot halts the run before any generation; the failing LM
/// command would abort loudly if it were ever invoked.
#[test]
fn run_halts_on_feb_29_without_invoking_lm() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let catalog = write_catalog(temp.path(), ONE_ENTRY);

    let output = Command::new(env!("CARGO_BIN_EXE_devotion"))
        .arg("run")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--date")
        .arg("2024-02-29")
        .arg("--lm")
        .arg("false")
        .arg("--no-search")
        .arg("--json")
        .stdin(Stdio::null())
        .output()
        .expect("run workflow");

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse result");
    assert_eq!(value["status"], "error");
    let message = value["error_message"].as_str().expect("error message");
    assert!(message.contains("February 29"), "message: {message}");
    assert!(value["devotion_summary"].is_null());
}
