use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write test file");
}

/// Run the binary with HOME and config dirs pointed at `root`, so no user
/// config or sample directory leaks into the test.
fn run_stepstats(args: &[&str], root: &Path) -> (bool, Vec<u8>, Vec<u8>) {
    let bin = std::env::var("CARGO_BIN_EXE_stepstats").unwrap_or_else(|_| {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("target");
        path.push("debug");
        if cfg!(windows) {
            path.push("stepstats.exe");
        } else {
            path.push("stepstats");
        }
        path.to_string_lossy().into_owned()
    });
    let output = Command::new(bin)
        .args(args)
        .env("HOME", root)
        .env("XDG_CONFIG_HOME", root.join(".config"))
        .env("STEPSTATS_HOME", root.join("stepstats-home"))
        .env_remove("RUST_LOG")
        .output()
        .expect("run stepstats");
    (output.status.success(), output.stdout, output.stderr)
}

fn run_json(args: &[&str], root: &Path) -> Value {
    let (ok, stdout, stderr) = run_stepstats(args, root);
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    serde_json::from_slice(&stdout).expect("json")
}

fn write_samples(root: &Path, content: &str) {
    write_file(
        &root.join("stepstats-home").join("samples").join("phone.jsonl"),
        content,
    );
}

#[test]
fn hourly_json_reads_sample_files() {
    let root = tempfile::tempdir().unwrap();
    write_samples(
        root.path(),
        r#"{"timestamp":"2025-03-15T07:05:00Z","steps":70}
{"timestamp":"2025-03-15T07:40:00Z","steps":50}
{"timestamp":"2025-03-15T09:15:00Z","count":300}
{"timestamp":"2025-03-14T09:15:00Z","steps":999}
not json
"#,
    );

    let json = run_json(
        &["hourly", "-j", "--timezone", "UTC", "--at", "2025-03-15T18:00:00Z"],
        root.path(),
    );
    assert_eq!(json["origin"], "source");
    let hours = json["data"].as_array().expect("array output");
    assert_eq!(hours.len(), 24);
    for (i, hour) in hours.iter().enumerate() {
        assert_eq!(hour["hour"].as_u64(), Some(i as u64));
        let expected = match i {
            7 => 120,
            9 => 300,
            _ => 0,
        };
        assert_eq!(hour["steps"].as_u64(), Some(expected), "hour {i}");
    }
}

#[test]
fn hourly_buckets_in_requested_timezone() {
    let root = tempfile::tempdir().unwrap();
    write_samples(
        root.path(),
        "{\"timestamp\":\"2025-03-14T23:30:00Z\",\"steps\":75}\n",
    );

    let json = run_json(
        &["-j", "--timezone", "Asia/Tokyo", "--at", "2025-03-15"],
        root.path(),
    );
    assert_eq!(json["data"][8]["steps"].as_u64(), Some(75));
}

#[test]
fn demo_mode_is_synthetic_and_reproducible_with_seed() {
    let root = tempfile::tempdir().unwrap();
    let args = [
        "daily", "--demo", "--seed", "7", "-j", "--days", "3", "--timezone", "UTC", "--at",
        "2025-03-15",
    ];
    let (ok, first, stderr) = run_stepstats(&args, root.path());
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    let (_, second, _) = run_stepstats(&args, root.path());
    assert_eq!(first, second);

    let json: Value = serde_json::from_slice(&first).expect("json");
    assert_eq!(json["origin"], "synthetic");
    let days = json["data"].as_array().expect("array output");
    let dates: Vec<&str> = days.iter().filter_map(|d| d["date"].as_str()).collect();
    assert_eq!(dates, vec!["2025-03-13", "2025-03-14", "2025-03-15"]);
    assert!(days.iter().all(|d| d["steps"].as_array().map(Vec::len) == Some(24)));
}

#[test]
fn no_synthetic_fills_zeros_for_missing_directory() {
    let root = tempfile::tempdir().unwrap();
    let missing = root.path().join("missing");
    let json = run_json(
        &[
            "monthly",
            "-j",
            "--no-synthetic",
            "--data-dir",
            missing.to_str().unwrap(),
            "--timezone",
            "UTC",
            "--at",
            "2024-02-10",
        ],
        root.path(),
    );
    assert_eq!(json["origin"], "source");
    assert_eq!(json["data"][0]["month"], "February 2024");
    let days = json["data"][0]["steps"].as_array().unwrap();
    assert_eq!(days.len(), 29);
    assert!(days.iter().all(|v| v.as_u64() == Some(0)));
}

#[test]
fn yearly_desc_lists_newest_first() {
    let root = tempfile::tempdir().unwrap();
    let json = run_json(
        &[
            "yearly", "--demo", "--years", "2", "-o", "desc", "-j", "--timezone", "UTC", "--at",
            "2025-06-01",
        ],
        root.path(),
    );
    let years: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|y| y["year"].as_i64())
        .collect();
    assert_eq!(years, vec![2025, 2024]);
}

#[test]
fn lifetime_starts_at_first_sample_year() {
    let root = tempfile::tempdir().unwrap();
    write_samples(
        root.path(),
        r#"{"timestamp":"2023-04-01T10:00:00Z","steps":1000}
{"timestamp":"2025-01-02T10:00:00Z","steps":250}
"#,
    );
    let json = run_json(
        &["lifetime", "-j", "--timezone", "UTC", "--at", "2025-06-01"],
        root.path(),
    );
    assert_eq!(json["origin"], "source");
    assert_eq!(json["data"]["start_year"].as_i64(), Some(2023));
    let steps: Vec<u64> = json["data"]["steps"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_u64)
        .collect();
    assert_eq!(steps, vec![1000, 0, 250]);
}

#[test]
fn all_json_contains_every_view() {
    let root = tempfile::tempdir().unwrap();
    let json = run_json(
        &["all", "--demo", "--seed", "1", "-j", "--timezone", "UTC", "--at", "2025-03-15"],
        root.path(),
    );
    for key in ["hourly", "daily", "monthly", "yearly"] {
        assert_eq!(json[key]["origin"], "synthetic", "{key}");
    }
    assert_eq!(json["hourly"]["data"].as_array().map(Vec::len), Some(24));
    assert_eq!(json["daily"]["data"].as_array().map(Vec::len), Some(7));
    assert_eq!(json["monthly"]["data"][0]["steps"].as_array().map(Vec::len), Some(31));
    assert_eq!(json["yearly"]["data"][0]["steps"].as_array().map(Vec::len), Some(12));
}

#[test]
fn table_output_marks_synthetic_data() {
    let root = tempfile::tempdir().unwrap();
    let (ok, stdout, stderr) = run_stepstats(
        &["--demo", "--no-color", "--timezone", "UTC", "--at", "2025-03-15"],
        root.path(),
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    let out = String::from_utf8_lossy(&stdout);
    assert!(out.contains("Hourly Steps, Sat, Mar 15"));
    assert!(out.contains("TOTAL"));
    assert!(out.contains("7 AM"));
    assert!(out.contains("synthetic data"));
}

#[test]
fn config_file_supplies_defaults() {
    let root = tempfile::tempdir().unwrap();
    write_file(
        &root.path().join(".stepstats.toml"),
        "timezone = \"UTC\"\ndays = 2\nseed = 3\n",
    );
    let json = run_json(&["daily", "--demo", "-j", "--at", "2025-03-15"], root.path());
    let dates: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["date"].as_str())
        .collect();
    assert_eq!(dates, vec!["2025-03-14", "2025-03-15"]);
}

#[test]
fn zero_days_is_rejected() {
    let root = tempfile::tempdir().unwrap();
    let (ok, _, stderr) = run_stepstats(&["daily", "--demo", "--days", "0"], root.path());
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("Invalid argument"));
}

#[test]
fn unknown_timezone_is_rejected() {
    let root = tempfile::tempdir().unwrap();
    let (ok, _, stderr) = run_stepstats(&["--demo", "--timezone", "Mars/Olympus"], root.path());
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("Invalid timezone: Mars/Olympus"));
}

#[test]
fn bad_reference_time_is_rejected() {
    let root = tempfile::tempdir().unwrap();
    let (ok, _, stderr) = run_stepstats(&["--demo", "--at", "yesterday"], root.path());
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("Invalid reference time"));
}
