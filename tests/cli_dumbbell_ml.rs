use serde_json::Value;
use std::fs;
use std::path::PathBuf;
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

#[test]
fn dumbbell_ml_finishes_and_writes_viz_json() {
    let dir = unique_temp_dir("dumbbell-ml-viz");
    let out_json = dir.join("viz.json");

    let output = Command::new(env!("CARGO_BIN_EXE_dumbbell_ml"))
        .args([
            "--segments",
            "5",
            "--viz-json",
            out_json.to_str().unwrap(),
        ])
        .output()
        .expect("run dumbbell_ml");

    assert!(
        output.status.success(),
        "dumbbell_ml failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("finished=true"), "stdout: {stdout}");
    assert!(stdout.contains("acked=5"), "stdout: {stdout}");

    let raw = fs::read_to_string(&out_json).expect("read viz json");
    let events: Value = serde_json::from_str(&raw).expect("parse viz json");
    let events = events.as_array().expect("events array");
    assert!(!events.is_empty());
    assert_eq!(events[0]["kind"], "meta");
    assert!(events.iter().any(|e| e["kind"] == "window"));
}

#[test]
fn dumbbell_ml_linear_policy_runs() {
    let output = Command::new(env!("CARGO_BIN_EXE_dumbbell_ml"))
        .args([
            "--segments",
            "3",
            "--policy",
            "linear",
            "--coef",
            "1,1,-5,0",
        ])
        .output()
        .expect("run dumbbell_ml");

    assert!(
        output.status.success(),
        "dumbbell_ml failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("finished=true"));
}

#[test]
fn dumbbell_ml_rejects_wrong_coefficient_count() {
    let output = Command::new(env!("CARGO_BIN_EXE_dumbbell_ml"))
        .args(["--policy", "linear", "--coef", "1,2,3"])
        .output()
        .expect("run dumbbell_ml");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--coef expects 4 values"), "stderr: {stderr}");
}

#[test]
fn dumbbell_ml_reports_tick_of_last_ack_at_h0() {
    let output = Command::new(env!("CARGO_BIN_EXE_dumbbell_ml"))
        .args(["--segments", "3"])
        .output()
        .expect("run dumbbell_ml");

    assert!(
        output.status.success(),
        "dumbbell_ml failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    // #1 is acked at t3, then #2/#3 go out together and are acked at t6.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("done_tick=6,"), "stdout: {stdout}");
}

#[test]
fn dumbbell_ml_unfinished_run_has_no_done_tick() {
    let output = Command::new(env!("CARGO_BIN_EXE_dumbbell_ml"))
        .args(["--segments", "3", "--ticks", "2"])
        .output()
        .expect("run dumbbell_ml");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("finished=false"), "stdout: {stdout}");
    assert!(stdout.contains("done_tick=-,"), "stdout: {stdout}");
}
