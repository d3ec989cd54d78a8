//! Controlling-terminal lookup for the `TTY` template variable.

use std::fs;
use std::process::Command;

const UNKNOWN: &str = "unknown";
const MAX_ANCESTORS: usize = 10;

/// Answers "which terminal is this hook running under?".
pub trait TerminalResolver: Send + Sync {
    /// Terminal name without the `/dev/` prefix, or `"unknown"`.
    fn resolve_terminal(&self) -> String;
}

/// Asks `tty` first, then walks up the process tree with `ps`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTreeTerminal;

impl TerminalResolver for ProcessTreeTerminal {
    fn resolve_terminal(&self) -> String {
        tty_direct()
            .or_else(|| tty_from_ancestors(std::process::id()))
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}

/// Always reports the same terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTerminal(pub String);

impl TerminalResolver for FixedTerminal {
    fn resolve_terminal(&self) -> String {
        self.0.clone()
    }
}

fn tty_direct() -> Option<String> {
    let output = Command::new("tty").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let tty = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Some(strip_dev_prefix(&tty).to_string())
}

fn tty_from_ancestors(start: u32) -> Option<String> {
    let mut pid = start;
    for _ in 0..MAX_ANCESTORS {
        if let Some(tty) = tty_for_pid(pid) {
            return Some(tty);
        }
        let stat = fs::read_to_string(format!("/proc/{}/stat", pid)).ok()?;
        pid = parse_parent_pid(&stat, pid)?;
    }
    None
}

fn tty_for_pid(pid: u32) -> Option<String> {
    let output = Command::new("ps")
        .args(["-o", "tty=", "-p", &pid.to_string()])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    normalize_ps_tty(&String::from_utf8_lossy(&output.stdout))
}

/// `ps -o tty=` output → terminal name; `?`, `??` and `-` mean "none".
fn normalize_ps_tty(raw: &str) -> Option<String> {
    let tty = raw.trim();
    if tty.is_empty() || matches!(tty, "?" | "??" | "-") {
        return None;
    }
    Some(strip_dev_prefix(tty).to_string())
}

fn strip_dev_prefix(tty: &str) -> &str {
    tty.strip_prefix("/dev/").unwrap_or(tty)
}

/// Parent PID from a `/proc/[pid]/stat` line.
///
/// comm (field 2) may contain spaces and parens, so fields are counted from
/// the last `)`. Returns `None` for init or a self-parented process.
fn parse_parent_pid(stat: &str, pid: u32) -> Option<u32> {
    let close_paren = stat.rfind(')')?;
    let mut fields = stat[close_paren + 1..].split_whitespace();
    let _state = fields.next()?;
    let ppid: u32 = fields.next()?.parse().ok()?;
    if ppid == pid || ppid <= 1 {
        return None;
    }
    Some(ppid)
}
