// SPDX-License-Identifier: Apache-2.0

use assert_cmd::Command;
use std::path::Path;

// Nothing listens here; commands under test must fail before connecting.
const UNREACHABLE_API: &str = "http://127.0.0.1:9";

fn parse_commands_from_help(text: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut in_commands = false;
    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed == "Commands:" {
            in_commands = true;
            continue;
        }
        if in_commands {
            if trimmed.is_empty() {
                break;
            }
            let entry = trimmed.trim_start();
            let name = entry.split_whitespace().next().unwrap_or("");
            if !name.is_empty() && name != "help" {
                commands.push(name.to_string());
            }
        }
    }
    commands.sort();
    commands
}

fn cli(config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_prizenation"));
    cmd.current_dir(config_dir)
        .env("PRIZENATION_CONFIG_DIR", config_dir)
        .env("PRIZENATION_API_URL", UNREACHABLE_API)
        .env_remove("RUST_LOG")
        .env_remove("PRIZENATION_LOG_JSON");
    cmd
}

fn write_session(dir: &Path, is_admin: bool) {
    let session = serde_json::json!({
        "token": "test-token",
        "user": {
            "id": "u-1",
            "email": "ops@prizenation.test",
            "name": "Ops",
            "site_credit_balance": 0.0,
            "cash_balance": 0.0,
            "is_admin": is_admin
        }
    });
    std::fs::write(
        dir.join("session.json"),
        serde_json::to_vec(&session).expect("session json"),
    )
    .expect("write session");
}

fn stderr_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stderr).expect("machine error json")
}

#[test]
fn help_command_surface_is_stable() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = cli(tmp.path()).arg("--help").output().expect("run help");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8 help");
    let observed = parse_commands_from_help(&text);
    let expected = include_str!("snapshots/help.commands.txt")
        .lines()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    assert_eq!(observed, expected);
    assert!(text.contains("PRIZENATION_API_URL"));
}

#[test]
fn version_output_contains_crate_version() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = cli(tmp.path())
        .arg("--version")
        .output()
        .expect("run version");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8 version output");
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_returns_usage_exit_code_with_machine_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = cli(tmp.path())
        .args(["--json", "--unknown-flag"])
        .output()
        .expect("run bad cli");
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr_json(&output)["code"], "usage_error");
}

#[test]
fn missing_command_is_a_usage_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = cli(tmp.path()).output().expect("run bare cli");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_reports_resolved_paths() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = cli(tmp.path())
        .args(["--json", "config"])
        .output()
        .expect("run config");
    assert!(output.status.success());
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("config output json");
    assert_eq!(payload["api_url"], UNREACHABLE_API);
    assert_eq!(payload["api_base"], format!("{UNREACHABLE_API}/api"));
    let session = payload["session_file"].as_str().expect("session path");
    assert!(session.ends_with("session.json"));
}

#[test]
fn api_url_flag_beats_environment() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = cli(tmp.path())
        .args(["--json", "--api-url", "http://flag.test/", "config"])
        .output()
        .expect("run config");
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(payload["api_url"], "http://flag.test");
}

#[test]
fn invalid_competition_form_exits_with_validation_code_offline() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_session(tmp.path(), true);
    let output = cli(tmp.path())
        .args([
            "--json",
            "admin",
            "create",
            "--subtitle",
            "Win big",
            "--price",
            "0",
            "--max-tickets",
            "0",
        ])
        .output()
        .expect("run admin create");
    assert_eq!(output.status.code(), Some(3));
    let err = stderr_json(&output);
    assert_eq!(err["code"], "validation_error");
    assert_eq!(err["details"]["title"], "Title is required");
    assert_eq!(err["details"]["description"], "Description is required");
    assert_eq!(err["details"]["price"], "Price must be at least £0.01");
    assert_eq!(err["details"]["max_tickets"], "Max tickets must be at least 1");
    assert!(err["details"].get("subtitle").is_none());
}

#[test]
fn admin_commands_are_forbidden_for_regular_users() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_session(tmp.path(), false);
    let output = cli(tmp.path())
        .args(["--json", "admin", "stats"])
        .output()
        .expect("run admin stats");
    assert_eq!(output.status.code(), Some(3));
    let err = stderr_json(&output);
    assert_eq!(err["code"], "forbidden");
    assert_eq!(err["message"], "Admin access required");
}

#[test]
fn protected_commands_without_session_fail_locally() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = cli(tmp.path())
        .args(["--json", "cart", "show"])
        .output()
        .expect("run cart show");
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stderr_json(&output)["code"], "unauthenticated");
}

#[test]
fn draw_ticket_must_be_a_positive_number() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_session(tmp.path(), true);
    let output = cli(tmp.path())
        .args(["--json", "admin", "find-winner", "c-1", "--ticket", "abc"])
        .output()
        .expect("run find-winner");
    assert_eq!(output.status.code(), Some(3));
    let err = stderr_json(&output);
    assert_eq!(err["details"]["ticket"], "Please enter a ticket number");
}

#[test]
fn completion_script_is_generated() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = cli(tmp.path())
        .args(["completion", "bash"])
        .output()
        .expect("run completion");
    assert!(output.status.success());
    let script = String::from_utf8(output.stdout).expect("utf8 completion");
    assert!(script.contains("prizenation"));
}
