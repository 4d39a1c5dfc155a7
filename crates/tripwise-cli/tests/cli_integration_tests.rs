//! CLI integration tests for tripwise
//!
//! Tests the tripwise CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const GENERATE_PATH: &str = "/v1/models/gemini-test:generateContent";

/// Helper to create a command isolated from the user's config and key
#[allow(deprecated)]
fn tripwise_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tripwise").unwrap();
    cmd.current_dir(config_dir.path());
    cmd.env("TRIPWISE_CONFIG_DIR", config_dir.path());
    cmd.env_remove("GEMINI_API_KEY");
    cmd.env("RUST_LOG", "off");
    cmd
}

fn write_config(config_dir: &TempDir, endpoint: &str) {
    let contents = format!(
        "[generation]\nendpoint = \"{}\"\nmax_attempts = 1\ntimeout_secs = 5\n",
        endpoint
    );
    std::fs::write(config_dir.path().join("config.toml"), contents).unwrap();
}

#[test]
fn test_prompt_works_without_api_key() {
    let dir = TempDir::new().unwrap();

    tripwise_cmd(&dir)
        .args([
            "prompt",
            "--destination",
            "Kyoto, Japan",
            "--days",
            "4",
            "--start",
            "2026-04-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Destination: Kyoto, Japan"))
        .stdout(predicate::str::contains("### Day 4"))
        .stdout(predicate::str::contains("### Day 5").not())
        .stdout(predicate::str::contains("Travel Dates: 2026-04-01 to 2026-04-04"));
}

#[test]
fn test_prompt_reports_recomputed_days() {
    let dir = TempDir::new().unwrap();

    tripwise_cmd(&dir)
        .args(["prompt", "--start", "2026-04-01", "--end", "2026-04-02"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Days updated to 2"))
        .stdout(predicate::str::contains("**2-day itinerary**"));
}

#[test]
fn test_prompt_json_output() {
    let dir = TempDir::new().unwrap();

    let output = tripwise_cmd(&dir)
        .args(["--format", "json", "prompt", "--days", "2", "--start", "2026-04-01"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["trip"]["days"], 2);
    assert_eq!(value["trip"]["end_date"], "2026-04-02");
    assert!(value["prompt"].as_str().unwrap().contains("### Day 2"));
}

#[test]
fn test_invalid_dates_are_rejected() {
    let dir = TempDir::new().unwrap();

    tripwise_cmd(&dir)
        .args(["prompt", "--start", "2026-04-05", "--end", "2026-04-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_plan_without_api_key_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();

    tripwise_cmd(&dir)
        .args(["plan", "--destination", "Paris, France"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_plan_prints_generated_itinerary() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .query_param("key", "test-key");
        then.status(200).json_body(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "### Day 1\nFree walking tour" } ] } }
            ]
        }));
    });
    write_config(&dir, &server.url(GENERATE_PATH));

    tripwise_cmd(&dir)
        .env("GEMINI_API_KEY", "test-key")
        .args(["plan", "--destination", "Lisbon, Portugal", "--days", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your 1-Day Student Trip to Lisbon, Portugal"))
        .stdout(predicate::str::contains("Free walking tour"));

    mock.assert();
}

#[test]
fn test_plan_surfaces_permanent_api_errors() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(403).body("permission denied");
    });
    write_config(&dir, &server.url(GENERATE_PATH));

    tripwise_cmd(&dir)
        .env("GEMINI_API_KEY", "test-key")
        .args(["plan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("status code 403"))
        .stderr(predicate::str::contains("permission denied"));

    mock.assert_hits(1);
}

#[test]
fn test_plan_reports_each_retry_once() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(503).body("overloaded");
    });
    let contents = format!(
        "[generation]\nendpoint = \"{}\"\nmax_attempts = 2\nbackoff_base_ms = 1\ntimeout_secs = 5\n",
        server.url(GENERATE_PATH)
    );
    std::fs::write(dir.path().join("config.toml"), contents).unwrap();

    let output = tripwise_cmd(&dir)
        .env("GEMINI_API_KEY", "test-key")
        .args(["plan"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let retry_lines: Vec<&str> = stderr.lines().filter(|l| l.contains("Retrying")).collect();
    assert_eq!(retry_lines, vec!["Warning: Rate limit or server error (503). Retrying in 0.001s..."]);
    assert!(stderr.contains("failed to connect after 2 attempts"));
    mock.assert_hits(2);

    let quiet = tripwise_cmd(&dir)
        .env("GEMINI_API_KEY", "test-key")
        .args(["-q", "plan"])
        .output()
        .unwrap();
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("Retrying"));
}

#[test]
fn test_plan_json_failure() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).body("{}");
    });
    write_config(&dir, &server.url(GENERATE_PATH));

    let output = tripwise_cmd(&dir)
        .env("GEMINI_API_KEY", "test-key")
        .args(["--format", "json", "plan"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "failure");
    assert!(value["error"].as_str().unwrap().starts_with("Parse error"));
}

#[test]
fn test_config_set_get_and_reset() {
    let dir = TempDir::new().unwrap();

    tripwise_cmd(&dir)
        .args(["config", "set", "generation.max_attempts", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set generation.max_attempts = 3"));

    tripwise_cmd(&dir)
        .args(["config", "get", "generation.max_attempts"])
        .assert()
        .success()
        .stdout(predicate::str::diff("3\n"));

    tripwise_cmd(&dir)
        .args(["config", "reset"])
        .assert()
        .success();

    tripwise_cmd(&dir)
        .args(["config", "get", "generation.max_attempts"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));
}

#[test]
fn test_config_refuses_api_key() {
    let dir = TempDir::new().unwrap();

    tripwise_cmd(&dir)
        .args(["config", "set", "generation.api_key", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be stored"));
}

#[test]
fn test_config_list_and_path() {
    let dir = TempDir::new().unwrap();

    tripwise_cmd(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("generation.endpoint = https://"))
        .stdout(predicate::str::contains("generation.api_key = (not set"));

    tripwise_cmd(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_doctor_flags_missing_key() {
    let dir = TempDir::new().unwrap();

    tripwise_cmd(&dir)
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[!!] API Key: Not configured"));
}

#[test]
fn test_doctor_redacts_multibyte_key() {
    let dir = TempDir::new().unwrap();

    tripwise_cmd(&dir)
        .env("GEMINI_API_KEY", "key\u{20ac}\u{20ac}")
        .arg("doctor")
        .assert()
        .stdout(predicate::str::contains("[OK] API Key: Configured (***ey\u{20ac}\u{20ac})"));
}
