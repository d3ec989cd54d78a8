//! Push delivery.
//!
//! `Ok(false)` means the push was attempted and rejected; `Err` means the
//! transport could not make the attempt at all.

use async_trait::async_trait;
use serde::Serialize;
use tokio::process::Command;

use crate::config::PushbulletConfig;
use crate::error::{NotifyError, Result};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one (title, body) note.
    async fn send(&self, title: &str, body: &str) -> Result<bool>;
}

/// Pushbullet `note` push body.
#[derive(Debug, Serialize)]
pub struct NotePush<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'a str,
    pub body: &'a str,
}

impl<'a> NotePush<'a> {
    pub fn new(title: &'a str, body: &'a str) -> Self {
        Self {
            kind: "note",
            title,
            body,
        }
    }
}

/// Pushbullet HTTP API via `reqwest`.
pub struct PushbulletTransport {
    client: reqwest::Client,
    token: Option<String>,
    api_url: String,
}

impl PushbulletTransport {
    pub fn new(token: Option<String>, api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl Transport for PushbulletTransport {
    async fn send(&self, title: &str, body: &str) -> Result<bool> {
        let token = self.token.as_deref().ok_or(NotifyError::MissingToken)?;

        let response = self
            .client
            .post(&self.api_url)
            .header("Access-Token", token)
            .json(&NotePush::new(title, body))
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::debug!("Pushbullet responded with {}", status);
        }
        Ok(status == reqwest::StatusCode::OK)
    }
}

/// Shells out to `curl` with basic auth.
pub struct CurlTransport {
    token: Option<String>,
    api_url: String,
}

impl CurlTransport {
    pub fn new(token: Option<String>, api_url: impl Into<String>) -> Self {
        Self {
            token,
            api_url: api_url.into(),
        }
    }

    fn args(&self, token: &str, payload: &str) -> Vec<String> {
        vec![
            "-s".to_string(),
            "-u".to_string(),
            format!("{}:", token),
            "-X".to_string(),
            "POST".to_string(),
            self.api_url.clone(),
            "-H".to_string(),
            "Content-Type: application/json".to_string(),
            "--data-raw".to_string(),
            payload.to_string(),
        ]
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn send(&self, title: &str, body: &str) -> Result<bool> {
        let token = self.token.as_deref().ok_or(NotifyError::MissingToken)?;
        let payload = serde_json::to_string(&NotePush::new(title, body))?;

        let output = Command::new("curl")
            .args(self.args(token, &payload))
            .output()
            .await?;

        Ok(output.status.success())
    }
}

/// Uses `secondary` only when `primary` failed before sending anything.
///
/// A push the primary rejected, or that failed after the request went out,
/// is not retried.
pub struct FallbackTransport<P, S> {
    primary: P,
    secondary: S,
}

impl<P: Transport, S: Transport> FallbackTransport<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl<P: Transport, S: Transport> Transport for FallbackTransport<P, S> {
    async fn send(&self, title: &str, body: &str) -> Result<bool> {
        match self.primary.send(title, body).await {
            Err(e) if e.is_unsent() => {
                tracing::warn!("Primary transport unavailable ({}), falling back", e);
                self.secondary.send(title, body).await
            }
            result => result,
        }
    }
}

/// HTTP first, `curl` when the HTTP client cannot connect.
pub fn default_transport(
    config: &PushbulletConfig,
) -> FallbackTransport<PushbulletTransport, CurlTransport> {
    let token = config.resolve_token();
    FallbackTransport::new(
        PushbulletTransport::new(token.clone(), config.api_url.clone()),
        CurlTransport::new(token, config.api_url.clone()),
    )
}
