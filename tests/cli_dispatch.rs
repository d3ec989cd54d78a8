//! Integration tests for CLI dispatch
//!
//! These tests run the binary with hook input on stdin and check what it
//! pushes to a mock Pushbullet endpoint.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use tempfile::TempDir;

const BIN: &str = "claude-pushbullet-notify";

/// Isolated HOME/cwd with a config file pointing at `api_url`.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write_config(&self, api_url: &str, extra_notification: &str) -> PathBuf {
        let path = self.path().join("notify.toml");
        let log_file = self.path().join("notify.log");
        fs::write(
            &path,
            format!(
                "[notification]\n{extra_notification}\n\n[pushbullet]\ntoken = \"o.test\"\napi_url = \"{api_url}\"\n\n[logging]\ndebug = true\nlog_file = \"{}\"\n",
                log_file.display()
            ),
        )
        .unwrap();
        path
    }

    fn write_transcript(&self, texts: &[&str]) -> PathBuf {
        let path = self.path().join("transcript.jsonl");
        let lines: Vec<String> = texts
            .iter()
            .map(|text| {
                serde_json::json!({
                    "type": "assistant",
                    "message": {"role": "assistant", "content": [{"type": "text", "text": text}]}
                })
                .to_string()
            })
            .collect();
        fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin(BIN).unwrap();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("HOOK_GIT_REPO", "demo-repo")
            .env("HOOK_GIT_BRANCH", "feature")
            .env_remove("PUSHBULLET_TOKEN")
            .env_remove("PUSHBULLET_NOTIFY_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

// ============================================================================
// Help Tests
// ============================================================================

#[test]
fn test_cli_help_displays() {
    Command::cargo_bin(BIN)
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pushbullet notifications"))
        .stdout(predicate::str::contains("--transcript-path"));
}

#[test]
fn test_cli_version_displays() {
    Command::cargo_bin(BIN)
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(BIN));
}

#[test]
fn test_unknown_flag_fails() {
    Command::cargo_bin(BIN)
        .unwrap()
        .arg("--unknown-flag")
        .assert()
        .failure();
}

// ============================================================================
// Modes
// ============================================================================

#[test]
fn test_legacy_mode_without_token_still_exits_zero() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .arg("--config")
        .arg(sandbox.path().join("missing.toml"))
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("legacy test mode"))
        .stderr(predicate::str::contains("PUSHBULLET_TOKEN not set"));
}

#[test]
fn test_non_stop_event_is_skipped() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/v2/pushes").expect(0).create();

    let sandbox = Sandbox::new();
    let config = sandbox.write_config(&format!("{}/v2/pushes", server.url()), "");

    sandbox
        .command()
        .arg("--config")
        .arg(&config)
        .write_stdin(r#"{"hook_event_name": "Notification"}"#)
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping - Event: Notification"));

    mock.assert();
}

#[test]
fn test_stop_event_pushes_last_messages() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v2/pushes")
        .match_header("access-token", "o.test")
        .match_body(Matcher::Json(serde_json::json!({
            "type": "note",
            "title": "claude code task completed demo-repo feature",
            "body": "Second\n\nThird"
        })))
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create();

    let sandbox = Sandbox::new();
    let config = sandbox.write_config(
        &format!("{}/v2/pushes", server.url()),
        "num_messages = 2",
    );
    let transcript = sandbox.write_transcript(&["First", "Second", "Third"]);
    let input = serde_json::json!({
        "session_id": "sess-1",
        "hook_event_name": "Stop",
        "transcript_path": transcript,
        "stop_hook_active": false
    });

    sandbox
        .command()
        .arg("--config")
        .arg(&config)
        .write_stdin(input.to_string())
        .assert()
        .success();

    mock.assert();
    let log = fs::read_to_string(sandbox.path().join("notify.log")).unwrap();
    assert!(log.contains("Hook event: Stop"));
    assert!(log.contains("Notification sent: true"));
}

#[test]
fn test_test_mode_without_transcript() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v2/pushes")
        .match_body(Matcher::Json(serde_json::json!({
            "type": "note",
            "title": "claude code task completed demo-repo feature",
            "body": "Test mode - no transcript available"
        })))
        .with_status(200)
        .expect(1)
        .create();

    let sandbox = Sandbox::new();
    let config = sandbox.write_config(&format!("{}/v2/pushes", server.url()), "");

    sandbox
        .command()
        .arg("--config")
        .arg(&config)
        .arg("--test")
        .assert()
        .success()
        .stderr(predicate::str::contains("Running in test mode"));

    mock.assert();
}

#[test]
fn test_test_mode_title_template_uses_transcript() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v2/pushes")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "title": "[demo-repo] Third",
            "body": "Second\n\nThird"
        })))
        .with_status(200)
        .expect(1)
        .create();

    let sandbox = Sandbox::new();
    let config = sandbox.write_config(
        &format!("{}/v2/pushes", server.url()),
        r#"title_template = "[{GIT_REPO}] {MSG0}"
num_messages = 2"#,
    );
    let transcript = sandbox.write_transcript(&["First", "Second", "Third"]);

    sandbox
        .command()
        .arg("--config")
        .arg(&config)
        .arg("--test")
        .arg("--transcript-path")
        .arg(&transcript)
        .assert()
        .success();

    mock.assert();
}

#[test]
fn test_long_transcript_is_split_into_parts() {
    let mut server = mockito::Server::new();
    let first = server
        .mock("POST", "/v2/pushes")
        .match_body(Matcher::Regex(r#""title":"\[1/\d+\] "#.to_string()))
        .with_status(200)
        .expect(1)
        .create();
    let rest = server
        .mock("POST", "/v2/pushes")
        .match_body(Matcher::Regex(r#""title":"\[[2-9]/\d+\] "#.to_string()))
        .with_status(200)
        .expect_at_least(1)
        .create();

    let sandbox = Sandbox::new();
    let config = sandbox.write_config(
        &format!("{}/v2/pushes", server.url()),
        "max_body_length = 60\nnum_messages = 3",
    );
    let transcript = sandbox.write_transcript(&[
        "The build completed without warnings after the refactor.",
        "All integration tests pass on the feature branch now.",
        "Remaining work is documented in the pull request description.",
    ]);

    sandbox
        .command()
        .arg("--config")
        .arg(&config)
        .arg("--test")
        .arg("--transcript-path")
        .arg(&transcript)
        .assert()
        .success();

    first.assert();
    rest.assert();
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let sandbox = Sandbox::new();
    let config = sandbox.path().join("broken.toml");
    fs::write(&config, "[notification\nnum_messages = ").unwrap();

    sandbox
        .command()
        .arg("--config")
        .arg(&config)
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("using defaults"));
}
