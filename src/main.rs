//! claude-pushbullet-notify: Claude Code Stop hook
//!
//! Main entry point. Picks test, hook or legacy mode and always exits 0 so
//! a failed push never blocks Claude Code.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use claude_pushbullet_notify::hooks::{handle_hook, handle_legacy_mode, handle_test_mode};
use claude_pushbullet_notify::transcript::read_hook_input;
use claude_pushbullet_notify::{logging, Cli, Config, Notifier};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (config, load_error) = match load_config(&cli) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    logging::init(&config.logging);
    if let Some(e) = load_error {
        tracing::warn!("{:#}; using defaults", e);
    }

    let notifier = Notifier::from_config(&config);
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let outcome = if cli.test {
        handle_test_mode(&notifier, &cwd, cli.transcript_path.as_deref()).await
    } else {
        match read_hook_input(std::io::stdin().lock()) {
            Some(input) => handle_hook(&input, &notifier, &cwd).await,
            None => handle_legacy_mode(&notifier, &cwd).await,
        }
    };
    tracing::debug!("Hook finished: {:?}", outcome);

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let path = cli.config.clone().unwrap_or_else(Config::config_path);
    Config::load_from_path(&path)
        .with_context(|| format!("Error loading config {}", path.display()))
}
