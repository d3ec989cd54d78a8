//! Hook input and transcript reading.
//!
//! The transcript is a JSONL file written by Claude Code; only assistant
//! text is extracted from it.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::Result;
use crate::hooks::HookInput;

/// Body used when there are no assistant messages.
pub const EMPTY_TRANSCRIPT_BODY: &str = "Task completed.";
/// Body used when no transcript file is available.
pub const MISSING_TRANSCRIPT_BODY: &str = "completed.";

/// Read the hook payload from `reader` (stdin in production).
///
/// Empty input and an empty JSON object both yield `None`, which selects
/// legacy mode. Unparseable input is logged and also yields `None`.
pub fn read_hook_input<R: Read>(mut reader: R) -> Option<HookInput> {
    let mut raw = String::new();
    if let Err(e) = reader.read_to_string(&mut raw) {
        tracing::error!("Error reading hook input: {}", e);
        return None;
    }
    if raw.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("Error reading hook input: {}", e);
            return None;
        }
    };
    if value.as_object().is_some_and(|o| o.is_empty()) {
        return None;
    }

    match serde_json::from_value(value) {
        Ok(input) => Some(input),
        Err(e) => {
            tracing::error!("Error reading hook input: {}", e);
            None
        }
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// All assistant text blocks in transcript order.
pub fn read_messages(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut messages = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        messages.extend(parse_line(&line?, index + 1));
    }
    Ok(messages)
}

/// Like [`read_messages`] but an absent, missing or unreadable file is empty.
pub fn messages_or_empty(path: Option<&str>) -> Vec<String> {
    let Some(path) = path else {
        return Vec::new();
    };
    let path = expand_path(path);
    if !path.exists() {
        return Vec::new();
    }
    read_messages(&path).unwrap_or_else(|e| {
        tracing::debug!("Could not read transcript {}: {}", path.display(), e);
        Vec::new()
    })
}

/// Notification body built from the last `num_messages` assistant messages.
pub fn last_messages_body(path: Option<&str>, num_messages: usize) -> String {
    let Some(path) = path.map(expand_path).filter(|p| p.exists()) else {
        return MISSING_TRANSCRIPT_BODY.to_string();
    };
    match read_messages(&path) {
        Ok(messages) => format_notification_body(&messages, num_messages),
        Err(e) => {
            tracing::error!("Error reading transcript: {}", e);
            EMPTY_TRANSCRIPT_BODY.to_string()
        }
    }
}

/// Join the last `num_messages` messages with blank lines.
pub fn format_notification_body(messages: &[String], num_messages: usize) -> String {
    if messages.is_empty() {
        return EMPTY_TRANSCRIPT_BODY.to_string();
    }
    let start = messages.len().saturating_sub(num_messages);
    messages[start..].join("\n\n")
}

fn parse_line(line: &str, line_number: usize) -> Vec<String> {
    let json: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Line {}: Skipping invalid JSON - {}", line_number, e);
            return Vec::new();
        }
    };

    if json.get("type").and_then(Value::as_str) != Some("assistant") {
        return Vec::new();
    }
    let Some(message) = json.get("message") else {
        return Vec::new();
    };
    if message.get("role").and_then(Value::as_str) != Some("assistant") {
        return Vec::new();
    }
    message.get("content").map(extract_text).unwrap_or_default()
}

/// String content is taken whole; block lists keep non-empty `text` blocks.
fn extract_text(content: &Value) -> Vec<String> {
    match content {
        Value::String(s) => vec![s.clone()],
        Value::Array(blocks) => blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}
