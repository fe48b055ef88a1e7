//! Mattermost incoming-webhook notification channel.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::channels::NotifyChannel;
use crate::config::ENV_WEBHOOK_URL;
use crate::error::ChannelError;

/// Bounded request timeout so a slow webhook cannot stall the caller's
/// logging path.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Mattermost incoming-webhook channel.
pub struct MattermostChannel {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl MattermostChannel {
    /// Create a Mattermost channel from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let webhook_url = std::env::var(ENV_WEBHOOK_URL)
            .ok()
            .filter(|v| !v.trim().is_empty());

        if webhook_url.is_some() {
            debug!("Mattermost notifications enabled");
        } else {
            debug!("Mattermost notifications disabled ({ENV_WEBHOOK_URL} not set)");
        }

        Self {
            webhook_url,
            client: http_client(),
        }
    }

    /// Create a Mattermost channel with a specific webhook URL.
    ///
    /// An empty URL yields a disabled channel whose sends are no-ops at
    /// the dispatcher level.
    #[must_use]
    pub fn new(webhook_url: impl Into<String>) -> Self {
        let url = webhook_url.into();
        Self {
            webhook_url: (!url.trim().is_empty()).then_some(url),
            client: http_client(),
        }
    }

    /// Get the configured webhook URL, if any.
    #[must_use]
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }
}

#[async_trait]
impl NotifyChannel for MattermostChannel {
    fn name(&self) -> &'static str {
        "mattermost"
    }

    fn enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    async fn send(&self, text: &str) -> Result<(), ChannelError> {
        let webhook_url = self
            .webhook_url
            .as_ref()
            .ok_or_else(|| ChannelError::NotConfigured(ENV_WEBHOOK_URL.to_string()))?;

        let payload = MattermostPayload { text };

        debug!(channel = "mattermost", "Sending notification");

        let response = self.client.post(webhook_url).json(&payload).send().await?;

        if response.status().is_success() {
            debug!(channel = "mattermost", "Notification sent successfully");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            warn!(
                channel = "mattermost",
                status = %status,
                body = %body,
                "Mattermost webhook request failed"
            );

            Err(ChannelError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

// =============================================================================
// Mattermost API types
// =============================================================================

#[derive(Debug, Serialize)]
struct MattermostPayload<'a> {
    text: &'a str,
}
