//! CLI smoke tests for the tandem-server binary: help output, configuration
//! validation, and server startup against an in-memory database.

use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn run_tandem_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tandem-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute tandem-server")
}

async fn run_tandem_server_with_timeout(
    args: &[&str],
    timeout_duration: Duration,
) -> Result<std::process::Output, Box<dyn std::error::Error>> {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_tandem-server"));
    cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());

    match timeout(timeout_duration, cmd.output()).await {
        Ok(result) => result.map_err(|e| e.into()),
        Err(elapsed) => Err(elapsed.into()),
    }
}

const VALID_CONFIG: &str = r#"
server:
  host: 127.0.0.1
  port: 0
  public_base_url: "http://localhost:3000"

database:
  url: "sqlite::memory:"

logging:
  console_level: error
"#;

#[test]
fn help_lists_subcommands_and_options() {
    let output = run_tandem_server(&["--help"]);

    assert!(output.status.success(), "help should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tandem-server"), "should contain binary name");
    assert!(stdout.contains("Usage:"), "should contain usage information");
    assert!(stdout.contains("run"), "should list the run subcommand");
    assert!(stdout.contains("check"), "should list the check subcommand");
    assert!(stdout.contains("--config"), "should mention the config option");
}

#[test]
fn version_is_reported() {
    let output = run_tandem_server(&["--version"]);

    assert!(output.status.success(), "version should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tandem-server"), "should contain binary name");
    assert!(
        stdout.chars().any(|c| c.is_ascii_digit()),
        "should contain a version number"
    );
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_tandem_server(&["invalid-command"]);

    assert!(!output.status.success(), "invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("unexpected"),
        "should report the invalid command: {stderr}"
    );
}

#[test]
fn check_fails_for_missing_config_file() {
    let output = run_tandem_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "missing config should fail");
}

#[test]
fn check_fails_for_invalid_yaml() {
    let temp_dir = TempDir::new().expect("temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed").expect("write config");

    let output = run_tandem_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "invalid YAML should fail");
}

#[test]
fn check_fails_for_unknown_section() {
    let temp_dir = TempDir::new().expect("temp dir");
    let config_path = temp_dir.path().join("unknown.yaml");
    std::fs::write(
        &config_path,
        "database:\n  url: \"sqlite::memory:\"\nnot_a_section:\n  foo: 1\n",
    )
    .expect("write config");

    let output = run_tandem_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "unknown section should fail");
}

#[test]
fn check_accepts_a_valid_config() {
    let temp_dir = TempDir::new().expect("temp dir");
    let config_path = temp_dir.path().join("valid.yaml");
    std::fs::write(&config_path, VALID_CONFIG).expect("write config");

    let output = run_tandem_server(&["--config", config_path.to_str().unwrap(), "check"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "valid config should pass: {stderr}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Configuration check passed"),
        "should confirm the check: {stdout}"
    );
}

#[test]
fn print_config_echoes_effective_yaml() {
    let temp_dir = TempDir::new().expect("temp dir");
    let config_path = temp_dir.path().join("valid.yaml");
    std::fs::write(&config_path, VALID_CONFIG).expect("write config");

    let output = run_tandem_server(&[
        "--config",
        config_path.to_str().unwrap(),
        "--port",
        "4321",
        "--print-config",
    ]);

    assert!(output.status.success(), "print-config should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("public_base_url"), "should echo config: {stdout}");
    assert!(stdout.contains("4321"), "CLI port override should apply: {stdout}");
}

#[test]
fn short_config_flag_works() {
    let output = run_tandem_server(&["-c", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "missing config should fail via -c too");
}

#[tokio::test]
async fn run_starts_and_serves_until_shutdown() {
    let temp_dir = TempDir::new().expect("temp dir");
    let config_path = temp_dir.path().join("run.yaml");
    // File-backed database: every pooled connection must see the migrated
    // schema, which an in-memory SQLite URL does not guarantee.
    let db_path = temp_dir.path().join("tandem.db");
    let config = format!(
        r#"
server:
  host: 127.0.0.1
  port: 0
  public_base_url: "http://localhost:3000"

database:
  url: "sqlite://{}?mode=rwc"

logging:
  console_level: error
"#,
        db_path.display()
    );
    std::fs::write(&config_path, config).expect("write config");

    // A started server only terminates on a signal; a timeout means the
    // process came up, migrated, and kept serving.
    let result = run_tandem_server_with_timeout(
        &["--config", config_path.to_str().unwrap(), "run"],
        Duration::from_secs(10),
    )
    .await;

    match result {
        Err(err) => {
            assert!(
                err.to_string().contains("elapsed"),
                "unexpected failure: {err}"
            );
        }
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("server exited early\nSTDOUT: {stdout}\nSTDERR: {stderr}");
        }
    }
}
