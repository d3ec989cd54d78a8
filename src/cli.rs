// CLI Parser - Clap derive definitions

use std::path::PathBuf;

use clap::Parser;

/// Claude Code Stop hook that pushes the session's last messages to Pushbullet
#[derive(Parser, Debug)]
#[command(name = "claude-pushbullet-notify")]
#[command(version)]
#[command(about = "Pushbullet notifications for finished Claude Code sessions")]
pub struct Cli {
    /// Send a notification without reading hook input from stdin
    #[arg(long)]
    pub test: bool,

    /// Transcript file to use in test mode
    #[arg(long = "transcript-path", value_name = "PATH")]
    pub transcript_path: Option<String>,

    /// Config file (default: ~/.claude/config/pushbullet-notify.toml)
    #[arg(long, value_name = "PATH", env = "PUSHBULLET_NOTIFY_CONFIG")]
    pub config: Option<PathBuf>,
}
