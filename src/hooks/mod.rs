//! Hook handlers for Claude Code settings.json integration.
//!
//! The hook reads JSON from stdin. Only the Stop event triggers a push; with
//! no input at all the binary runs in legacy test mode.

pub mod stop;

pub use stop::handle_stop;

use std::path::Path;

use serde::Deserialize;

use crate::git::git_info;
use crate::notify::Notifier;
use crate::transcript::last_messages_body;

/// Body sent when testing without a transcript.
pub const TEST_MODE_BODY: &str = "Test mode - no transcript available";

const STOP_EVENT: &str = "Stop";

/// Standard input format for hooks (from Claude Code)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    /// Claude's session identifier
    #[serde(alias = "sessionId")]
    pub session_id: Option<String>,
    /// Path to transcript file
    pub transcript_path: Option<String>,
    /// Current working directory
    pub cwd: Option<String>,
    /// Hook event name
    pub hook_event_name: Option<String>,
    /// Set when Claude is already continuing because of a stop hook
    pub stop_hook_active: Option<bool>,
}

/// What a hook invocation ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// No notification was attempted
    Skipped,
    Delivered,
    /// At least one push failed
    Failed,
}

impl From<bool> for HookOutcome {
    fn from(sent: bool) -> Self {
        if sent {
            Self::Delivered
        } else {
            Self::Failed
        }
    }
}

/// Route a hook payload to its handler.
pub async fn handle_hook(input: &HookInput, notifier: &Notifier, cwd: &Path) -> HookOutcome {
    let event = input.hook_event_name.as_deref().unwrap_or_default();
    tracing::info!("Hook event: {}", event);

    if event == STOP_EVENT {
        handle_stop(input, notifier, cwd).await
    } else {
        tracing::info!("Skipping - Event: {} (not Stop)", event);
        HookOutcome::Skipped
    }
}

/// `--test`: send a notification for `transcript_path`, or a placeholder body.
pub async fn handle_test_mode(
    notifier: &Notifier,
    cwd: &Path,
    transcript_path: Option<&str>,
) -> HookOutcome {
    tracing::info!("Running in test mode");
    send_manual(notifier, cwd, transcript_path).await
}

/// No hook input: behave like `--test` without a transcript.
pub async fn handle_legacy_mode(notifier: &Notifier, cwd: &Path) -> HookOutcome {
    tracing::info!("No JSON input received. Running in legacy test mode");
    send_manual(notifier, cwd, None).await
}

async fn send_manual(notifier: &Notifier, cwd: &Path, transcript_path: Option<&str>) -> HookOutcome {
    let git = git_info(cwd);
    tracing::info!("Repository: {}, Branch: {}", git.repo, git.branch);

    let body = match transcript_path {
        Some(path) => last_messages_body(Some(path), notifier.config().num_messages),
        None => TEST_MODE_BODY.to_string(),
    };

    notifier.notify(&git, &body, transcript_path).await.into()
}
