//! Template variables.
//!
//! Collects everything a template can reference into one flat name → value
//! table: git info, host/user/terminal info, time stamps and the last ten
//! assistant messages (`MSG0` is the newest).

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

use crate::terminal::TerminalResolver;

/// Number of `MSGn` variables exposed to templates.
pub const MESSAGE_VARIABLES: usize = 10;

const UNKNOWN: &str = "unknown";

/// Resolved name → value table. Built once per notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMapping {
    values: HashMap<String, String>,
}

impl VariableMapping {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Host, user and terminal details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub hostname: String,
    pub username: String,
    pub cwd: String,
    pub cwd_basename: String,
    pub tty: String,
}

impl SystemInfo {
    /// Probe the running system. Every field falls back to a placeholder.
    pub fn detect(terminal: &dyn TerminalResolver) -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let username = std::env::var("USER")
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| std::env::var("USERNAME").ok().filter(|u| !u.is_empty()))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let cwd = std::env::current_dir()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        let cwd_basename = path_basename(&cwd);

        Self {
            hostname,
            username,
            cwd,
            cwd_basename,
            tty: terminal.resolve_terminal(),
        }
    }
}

/// Last path segment after trimming a trailing separator; the root yields "".
pub fn path_basename(path: &str) -> String {
    let trimmed = path.trim_end_matches(std::path::MAIN_SEPARATOR);
    if trimmed.is_empty() {
        return String::new();
    }
    Path::new(trimmed)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// `TIMESTAMP`, `DATE`, `TIME`, `TIMEZONE` and `TIMESTAMP_TZ`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeVariables {
    pub timestamp: String,
    pub date: String,
    pub time: String,
    pub timezone: String,
    pub timestamp_tz: String,
}

impl TimeVariables {
    pub fn now(timezone: Option<&str>) -> Self {
        Self::at(Utc::now(), timezone)
    }

    /// Time variables for `instant`, shown in `timezone` when it names a
    /// known IANA zone and in system local time otherwise.
    pub fn at(instant: DateTime<Utc>, timezone: Option<&str>) -> Self {
        let zone = timezone.and_then(|name| match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                tracing::debug!("Unknown timezone {:?}, using local time", name);
                None
            }
        });

        match zone {
            Some(tz) => {
                let local = instant.with_timezone(&tz);
                Self::build(
                    local.format("%Y-%m-%d %H:%M:%S").to_string(),
                    local.format("%Y-%m-%d").to_string(),
                    local.format("%H:%M:%S").to_string(),
                    local.format("%Z").to_string(),
                )
            }
            None => {
                let local = instant.with_timezone(&Local);
                Self::build(
                    local.format("%Y-%m-%d %H:%M:%S").to_string(),
                    local.format("%Y-%m-%d").to_string(),
                    local.format("%H:%M:%S").to_string(),
                    String::new(),
                )
            }
        }
    }

    fn build(timestamp: String, date: String, time: String, timezone: String) -> Self {
        let timestamp_tz = if timezone.is_empty() {
            timestamp.clone()
        } else {
            format!("{} {}", timestamp, timezone)
        };
        Self {
            timestamp,
            date,
            time,
            timezone,
            timestamp_tz,
        }
    }
}

/// Builds the variable table from collaborator outputs.
pub struct VariableResolver<'a> {
    terminal: &'a dyn TerminalResolver,
    timezone: Option<String>,
}

impl<'a> VariableResolver<'a> {
    pub fn new(terminal: &'a dyn TerminalResolver, timezone: Option<String>) -> Self {
        Self { terminal, timezone }
    }

    /// Resolve all variables. `messages` is oldest-first as read from the transcript.
    pub fn resolve(&self, repo: &str, branch: &str, messages: &[String]) -> VariableMapping {
        let system = SystemInfo::detect(self.terminal);
        let time = TimeVariables::now(self.timezone.as_deref());
        build_variables(repo, branch, messages, &system, &time)
    }
}

/// Assemble the table from already-gathered parts.
pub fn build_variables(
    repo: &str,
    branch: &str,
    messages: &[String],
    system: &SystemInfo,
    time: &TimeVariables,
) -> VariableMapping {
    let mut values: Vec<(String, String)> = vec![
        ("GIT_REPO".into(), repo.into()),
        ("GIT_BRANCH".into(), branch.into()),
        ("HOSTNAME".into(), system.hostname.clone()),
        ("USERNAME".into(), system.username.clone()),
        ("CWD".into(), system.cwd.clone()),
        ("CWD_BASENAME".into(), system.cwd_basename.clone()),
        ("TTY".into(), system.tty.clone()),
        ("TIMESTAMP".into(), time.timestamp.clone()),
        ("DATE".into(), time.date.clone()),
        ("TIME".into(), time.time.clone()),
        ("TIMEZONE".into(), time.timezone.clone()),
        ("TIMESTAMP_TZ".into(), time.timestamp_tz.clone()),
    ];

    let newest_first: Vec<&String> = messages.iter().rev().collect();
    for i in 0..MESSAGE_VARIABLES {
        let value = newest_first.get(i).map(|m| m.to_string()).unwrap_or_default();
        values.push((format!("MSG{}", i), value));
    }

    values.into_iter().collect()
}

// ============================================================================
// Tests
// ============================================================================
