//! Stop hook handler.
//!
//! Runs when Claude finishes responding. Reads the last assistant messages
//! from the transcript and pushes them as a notification.

use std::path::Path;

use crate::git::git_info;
use crate::notify::Notifier;
use crate::transcript::last_messages_body;

use super::{HookInput, HookOutcome};

/// Handle the Stop event.
///
/// Without a transcript path there is nothing to report and no push is sent.
pub async fn handle_stop(input: &HookInput, notifier: &Notifier, cwd: &Path) -> HookOutcome {
    tracing::debug!("Transcript path: {:?}", input.transcript_path);
    tracing::debug!("Stop hook active: {:?}", input.stop_hook_active);

    let Some(transcript_path) = input.transcript_path.as_deref() else {
        tracing::warn!("No transcript path provided");
        return HookOutcome::Skipped;
    };

    let git = git_info(cwd);
    let config = notifier.config();
    let body = last_messages_body(Some(transcript_path), config.num_messages);
    tracing::debug!(
        "Config: num_messages={}, max_body_length={}",
        config.num_messages,
        config.max_body_length
    );

    notifier
        .notify(&git, &body, Some(transcript_path))
        .await
        .into()
}
