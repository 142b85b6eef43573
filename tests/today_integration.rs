use std::path::{Path, PathBuf};
use std::process::Command;

const ONE_ENTRY: &str = r#"[{"day":1,"book":"Psalm","start_chapter":23,"start_verse":1,"end_chapter":23,"end_verse":6,"type":"Psalm","order":1}]"#;

const MARCH_ENTRY: &str = r#"[{"day":60,"book":"Exodus","start_chapter":1,"start_verse":1,"end_chapter":2,"end_verse":25,"type":"OldTestament","order":1}]"#;

fn write_catalog(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("devotion.json");
    std::fs::write(&path, contents).expect("write catalog");
    path
}

fn run_today(catalog: &Path, date: &str) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_devotion"))
        .arg("today")
        .arg("--catalog")
        .arg(catalog)
        .arg("--date")
        .arg(date)
        .arg("--json")
        .output()
        .expect("run today")
}

#[test]
fn scheduled_day_reports_success() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let catalog = write_catalog(temp.path(), ONE_ENTRY);

    let output = run_today(&catalog, "2025-01-01");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(value["status"], "success");
    assert_eq!(value["day_of_year"], 1);
    assert_eq!(value["date"], "2025-01-01");
    assert_eq!(value["passages"][0]["book"], "Psalm");
    assert_eq!(value["passages"][0]["type"], "Psalm");
}

#[test]
fn leap_skew_keeps_march_first_on_slot_sixty() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let catalog = write_catalog(temp.path(), MARCH_ENTRY);

    for date in ["2023-03-01", "2024-03-01"] {
        let output = run_today(&catalog, date);
        assert!(output.status.success(), "date {date}");
        let value: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("parse json");
        assert_eq!(value["status"], "success", "date {date}");
        assert_eq!(value["day_of_year"], 60, "date {date}");
    }
}

#[test]
fn feb_29_reports_no_devotion_and_exits_cleanly() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let catalog = write_catalog(temp.path(), ONE_ENTRY);

    let output = run_today(&catalog, "2024-02-29");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(value["status"], "no_devotion");
    assert!(value["day_of_year"].is_null());
}

#[test]
fn missing_catalog_reports_error_and_nonzero_exit() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let catalog = temp.path().join("absent.json");

    let output = run_today(&catalog, "2025-01-01");
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(value["status"], "error");
    assert!(value["message"]
        .as_str()
        .expect("message")
        .contains("not found"));
}

#[test]
fn day_absent_from_catalog_reports_incomplete_error() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let catalog = write_catalog(temp.path(), ONE_ENTRY);

    let output = run_today(&catalog, "2025-01-02");
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(value["status"], "error");
    assert_eq!(value["day_of_year"], 2);
}
