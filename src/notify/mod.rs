//! Notification assembly and delivery.

pub mod dispatch;
pub mod transport;

pub use dispatch::{reserve_space, Dispatcher, SplitSettings};
pub use transport::{
    default_transport, CurlTransport, FallbackTransport, NotePush, PushbulletTransport, Transport,
};

use crate::config::{Config, NotificationConfig};
use crate::git::GitInfo;
use crate::template::render;
use crate::terminal::{ProcessTreeTerminal, TerminalResolver};
use crate::transcript::messages_or_empty;
use crate::variables::VariableResolver;

const BODY_PREVIEW_CHARS: usize = 100;

/// Builds the title and body from templates and sends them.
pub struct Notifier {
    config: NotificationConfig,
    transport: Box<dyn Transport>,
    terminal: Box<dyn TerminalResolver>,
}

impl Notifier {
    pub fn new(
        config: NotificationConfig,
        transport: Box<dyn Transport>,
        terminal: Box<dyn TerminalResolver>,
    ) -> Self {
        Self {
            config,
            transport,
            terminal,
        }
    }

    /// Pushbullet delivery with process-tree terminal lookup.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.notification.clone(),
            Box::new(default_transport(&config.pushbullet)),
            Box::new(ProcessTreeTerminal),
        )
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Render and send a notification.
    ///
    /// `default_body` is used unless a body template is configured. Template
    /// variables are built from every assistant message in the transcript.
    pub async fn notify(
        &self,
        git: &GitInfo,
        default_body: &str,
        transcript_path: Option<&str>,
    ) -> bool {
        let messages = messages_or_empty(transcript_path);
        let variables = VariableResolver::new(self.terminal.as_ref(), self.config.timezone.clone())
            .resolve(&git.repo, &git.branch, &messages);

        let title = render(self.config.title_template(), &variables);
        let body = match self.config.body_template.as_deref() {
            Some(template) if !template.is_empty() => render(template, &variables),
            _ => default_body.to_string(),
        };

        tracing::info!("Sending notification: {}", title);
        if body.chars().count() > BODY_PREVIEW_CHARS {
            let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
            tracing::debug!("Notification body: {}...", preview);
        } else if !body.is_empty() {
            tracing::debug!("Notification body: {}", body);
        }

        let dispatcher = Dispatcher::new(self.transport.as_ref(), SplitSettings::from(&self.config));
        let sent = dispatcher.send_split(&title, &body, None, None).await;
        tracing::info!("Notification sent: {}", sent);
        sent
    }
}
