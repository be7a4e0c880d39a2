use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{nanos}"));
    std::fs::create_dir_all(&dir).expect("should create temp dir");
    dir
}

#[test]
fn cli_reflows_sql_from_file_to_out() {
    let temp = unique_temp_dir("fmtkit_sql_reflow");
    let input_path = temp.join("query.sql");
    let out_path = temp.join("nested").join("query_pretty.sql");

    std::fs::write(&input_path, "SELECT id, name FROM users WHERE active = 1")
        .expect("should write temp input sql");

    let status = Command::new(env!("CARGO_BIN_EXE_fmtkit"))
        .arg("sql")
        .arg("--input")
        .arg(&input_path)
        .arg("--out")
        .arg(&out_path)
        .status()
        .expect("should run fmtkit binary");
    assert!(status.success(), "expected success, got {status:?}");

    let reflowed = std::fs::read_to_string(&out_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", out_path.display()));
    assert_eq!(reflowed, "SELECT id,\n    name\nFROM users\nWHERE active = 1");
}

#[test]
fn cli_json_check_fails_on_invalid_input() {
    let temp = unique_temp_dir("fmtkit_json_check");
    let good = temp.join("good.json");
    let bad = temp.join("bad.json");
    std::fs::write(&good, "{\"a\": 1}").expect("should write valid json");
    std::fs::write(&bad, "{\"a\": }").expect("should write invalid json");

    let ok_status = Command::new(env!("CARGO_BIN_EXE_fmtkit"))
        .args(["json", "--check", "--input"])
        .arg(&good)
        .status()
        .expect("should run fmtkit binary");
    assert!(ok_status.success());

    let bad_status = Command::new(env!("CARGO_BIN_EXE_fmtkit"))
        .args(["json", "--check", "--input"])
        .arg(&bad)
        .status()
        .expect("should run fmtkit binary");
    assert!(!bad_status.success(), "invalid JSON must fail the check");
}

#[test]
fn cli_json_minify_round_trips_through_stdout() {
    let temp = unique_temp_dir("fmtkit_json_minify");
    let input_path = temp.join("doc.json");
    std::fs::write(&input_path, "{ \"z\" : 1 , \"a\" : [ true ] }")
        .expect("should write temp input json");

    let output = Command::new(env!("CARGO_BIN_EXE_fmtkit"))
        .args(["json", "--minify", "--input"])
        .arg(&input_path)
        .output()
        .expect("should run fmtkit binary");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert_eq!(stdout.trim_end(), "{\"z\":1,\"a\":[true]}");
}

#[test]
fn cli_sql_stats_reports_statement_type() {
    let temp = unique_temp_dir("fmtkit_sql_stats");
    let input_path = temp.join("query.sql");
    std::fs::write(&input_path, "SELECT COUNT(id) FROM users")
        .expect("should write temp input sql");

    let output = Command::new(env!("CARGO_BIN_EXE_fmtkit"))
        .args(["sql", "--stats", "--input"])
        .arg(&input_path)
        .output()
        .expect("should run fmtkit binary");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert!(stdout.contains("\"statement_type\": \"SELECT\""), "got:\n{stdout}");
    assert!(stdout.contains("\"users\""), "got:\n{stdout}");
}
