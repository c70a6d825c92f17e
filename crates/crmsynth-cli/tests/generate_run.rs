use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn crmsynth(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_crmsynth"))
        .args(args)
        .env("RUST_LOG", "info")
        .output()
        .expect("run crmsynth")
}

fn read_json(path: &Path) -> Value {
    let contents =
        fs::read_to_string(path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    serde_json::from_str(&contents).expect("parse json")
}

#[test]
fn generate_writes_run_artifacts() {
    let run_dir = temp_out_dir("generate");
    let run_dir_arg = run_dir.to_string_lossy().to_string();
    let output = crmsynth(&[
        "generate",
        "--run-dir",
        &run_dir_arg,
        "--seed",
        "11",
        "--users",
        "5",
        "--accounts",
        "20",
        "--leads",
        "30",
        "--campaigns",
        "6",
        "--opportunities",
        "40",
        "--activities",
        "60",
        "--format",
        "csv",
        "--verify",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let root = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    assert!(root.starts_with(&run_dir));
    let name = root.file_name().expect("run name").to_string_lossy();
    assert!(name.contains("__run_"), "unexpected run dir {name}");

    let config = read_json(&root.join("config.json"));
    assert_eq!(config["generation"]["seed"], Value::from(11));
    assert_eq!(config["generation"]["counts"]["users"], Value::from(5));
    assert_eq!(config["format"], Value::from("csv"));

    let report = read_json(&root.join("generation_report.json"));
    assert_eq!(report["seed"], Value::from(11));
    assert_eq!(report["fingerprint"].as_str().map(str::len), Some(64));

    let verification = read_json(&root.join("verification_report.json"));
    assert_eq!(verification["violations"], Value::Array(Vec::new()));

    let logs = fs::read_to_string(root.join("logs.ndjson")).expect("read logs");
    let events: Vec<Value> = logs
        .lines()
        .map(|line| serde_json::from_str(line).expect("json log line"))
        .collect();
    assert!(events.iter().any(|event| event["fields"]["message"] == "generation completed"));
    assert!(events.iter().all(|event| event.get("timestamp").is_some()));

    let data_files = fs::read_dir(root.join("data"))
        .expect("read data dir")
        .map(|entry| entry.expect("entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
        .count();
    assert_eq!(data_files, 11);

    let _ = fs::remove_dir_all(&run_dir);
}

#[test]
fn invalid_configuration_fails_the_run() {
    let run_dir = temp_out_dir("invalid");
    let run_dir_arg = run_dir.to_string_lossy().to_string();
    let output = crmsynth(&["generate", "--run-dir", &run_dir_arg, "--users", "0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least one user"));

    let _ = fs::remove_dir_all(&run_dir);
}

#[test]
fn config_prints_default_toml() {
    let output = crmsynth(&["config"]);
    assert!(output.status.success());
    let rendered = String::from_utf8_lossy(&output.stdout);
    assert!(rendered.contains("seed = 42"));
    assert!(rendered.contains("[counts]"));
    assert!(rendered.contains("opportunities = 800"));
}

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("crmsynth_cli_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}
