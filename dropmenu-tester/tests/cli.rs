use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "dropmenu-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_dropmenu-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("keyboard-walk"));
}

#[test]
fn cli_runs_catalog_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_dropmenu-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args(["--report", "json", "--scenarios", "all", "--output"])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let content = std::fs::read_to_string(output_path).expect("read report");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = parsed.as_array().expect("array of results");
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_fails_when_a_scenario_fails() {
    let exe = env!("CARGO_BIN_EXE_dropmenu-tester");
    let scenario_path = temp_path("failing.json");
    std::fs::write(
        &scenario_path,
        r#"{
            "name": "expects-the-impossible",
            "items": [{ "label": "Only" }],
            "steps": [{ "step": "open" }],
            "expect": { "open": false }
        }"#,
    )
    .expect("write scenario");
    let output = Command::new(exe)
        .args(["--scenarios", "keyboard-walk", "--report", "markdown", "--scenario-file"])
        .arg(&scenario_path)
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("expects-the-impossible"));
    assert!(stdout.contains("open state: expected false, got true"));
}
