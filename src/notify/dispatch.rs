//! Sequential delivery of a possibly split notification.

use std::time::Duration;

use crate::chunker::{add_part_number, split_message};
use crate::config::NotificationConfig;

use super::transport::Transport;

/// Split settings for [`Dispatcher::send_split`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSettings {
    pub max_body_length: usize,
    pub split_long_messages: bool,
    /// Pause between consecutive parts
    pub delay: Duration,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self::from(&NotificationConfig::default())
    }
}

impl From<&NotificationConfig> for SplitSettings {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            max_body_length: config.max_body_length,
            split_long_messages: config.split_long_messages,
            delay: Duration::from_millis(config.split_delay_ms),
        }
    }
}

/// Title width reserved for `[i/N] ` given the estimated part count.
pub fn reserve_space(body_length: usize, max_length: usize) -> usize {
    let estimated_parts = body_length / max_length.max(1) + 1;
    if estimated_parts < 10 {
        6
    } else if estimated_parts < 100 {
        8
    } else {
        10
    }
}

pub struct Dispatcher<'a> {
    transport: &'a dyn Transport,
    settings: SplitSettings,
}

impl<'a> Dispatcher<'a> {
    pub fn new(transport: &'a dyn Transport, settings: SplitSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Send `body`, splitting it into numbered parts when it is too long.
    ///
    /// `max_length` and `split_enabled` override the configured settings.
    /// Every part is attempted once; returns true only if all were delivered.
    pub async fn send_split(
        &self,
        title: &str,
        body: &str,
        max_length: Option<usize>,
        split_enabled: Option<bool>,
    ) -> bool {
        let max_length = max_length
            .unwrap_or(self.settings.max_body_length)
            .max(1);
        let split_enabled = split_enabled.unwrap_or(self.settings.split_long_messages);
        let body_length = body.chars().count();

        if !split_enabled || body_length <= max_length {
            return self.deliver(title, body).await;
        }

        let reserve = reserve_space(body_length, max_length);
        let chunks = split_message(body, max_length, reserve);

        if chunks.len() <= 1 {
            let single = chunks.first().map(String::as_str).unwrap_or(body);
            return self.deliver(title, single).await;
        }

        let total = chunks.len();
        let mut all_sent = true;
        for (index, chunk) in chunks.iter().enumerate() {
            let part = index + 1;
            let numbered = add_part_number(title, part, total);

            if self.deliver(&numbered, chunk).await {
                tracing::info!("Sent part {}/{}", part, total);
            } else {
                tracing::error!("Failed to send part {}/{}", part, total);
                all_sent = false;
            }

            if part < total && !self.settings.delay.is_zero() {
                tokio::time::sleep(self.settings.delay).await;
            }
        }
        all_sent
    }

    async fn deliver(&self, title: &str, body: &str) -> bool {
        match self.transport.send(title, body).await {
            Ok(sent) => sent,
            Err(e) => {
                tracing::error!("{}", e);
                false
            }
        }
    }
}
