use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "tcpml-sim-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

#[test]
fn scenario_sim_prints_per_host_results_and_report() {
    let dir = unique_temp_dir("scenario-sim");
    let scenario = write_file(
        &dir,
        "scenario.json",
        r#"
{
    "hosts": [ { "name": "a" }, { "name": "b" } ],
    "flows": [ { "src": "a", "dst": "b", "segments": 4, "start_tick": 2 } ]
}
        "#,
    );
    let report_json = dir.join("report.json");
    let viz_json = dir.join("viz.json");

    let output = Command::new(env!("CARGO_BIN_EXE_scenario_sim"))
        .args([
            "--scenario",
            scenario.to_str().unwrap(),
            "--report-json",
            report_json.to_str().unwrap(),
            "--viz-json",
            viz_json.to_str().unwrap(),
        ])
        .output()
        .expect("run scenario_sim");

    assert!(
        output.status.success(),
        "scenario_sim failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let host_lines: Vec<&str> = stdout.lines().filter(|l| l.starts_with("host ")).collect();
    assert_eq!(host_lines.len(), 2, "stdout: {stdout}");
    assert!(host_lines[0].starts_with("host a "));
    assert!(host_lines[0].contains("acked=4"));
    assert!(host_lines[0].contains("done_tick=8"));
    assert!(host_lines[1].contains("data_received=4"));
    assert!(host_lines[1].contains("done_tick=-"));
    assert!(stdout.lines().any(|l| l.starts_with("net ticks=9 ")), "stdout: {stdout}");

    let report: Value =
        serde_json::from_str(&fs::read_to_string(&report_json).expect("read report")).expect("parse report");
    assert_eq!(report["ticks"], 9);
    assert_eq!(report["hosts"][0]["done_tick"], 8);
    assert_eq!(report["stats"]["dropped"], 0);

    let events: Value =
        serde_json::from_str(&fs::read_to_string(&viz_json).expect("read viz")).expect("parse viz");
    assert_eq!(events[0]["kind"], "meta");
}

#[test]
fn scenario_sim_rejects_invalid_scenario() {
    let dir = unique_temp_dir("scenario-sim-invalid");
    let scenario = write_file(
        &dir,
        "scenario.json",
        r#"{ "hosts": [ { "name": "a" } ], "flows": [ { "src": "a", "dst": "nobody", "segments": 1 } ] }"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_scenario_sim"))
        .args(["--scenario", scenario.to_str().unwrap()])
        .output()
        .expect("run scenario_sim");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid scenario"), "stderr: {stderr}");
}
