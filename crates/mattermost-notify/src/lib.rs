//! Mattermost error-log notifier.
//!
//! This crate forwards log records at or above a configured severity
//! threshold to a Mattermost channel via an incoming webhook. Delivery
//! is fire-and-forget: a failed or slow webhook call never propagates
//! back into the host's logging path.
//!
//! # Usage
//!
//! ```no_run
//! use mattermost_notify::{ChatNotifier, Level, LogRecord};
//!
//! // Create notifier from environment variables
//! let notifier = ChatNotifier::from_env();
//!
//! // Hand it a record (fire-and-forget)
//! notifier.handle(&LogRecord::new(Level::ERROR, "DB down"));
//! ```
//!
//! # Configuration
//!
//! The notifier is configured via environment variables:
//!
//! - `MATTERMOST_WEBHOOK_URL`: incoming webhook URL (enables the channel)
//! - `NOTIFY_ERROR_THRESHOLD`: minimum severity to notify (default 400)
//! - `NOTIFY_TIMEZONE`: display timezone for timestamps (default Asia/Kolkata)
//! - `NOTIFY_APP_NAME`: application name shown in the message header
//! - `NOTIFY_DISABLED`: set to "true" to disable all notifications
//!
//! # Architecture
//!
//! The notifier uses a trait-based channel design rather than extending
//! any logging library's handler hierarchy:
//!
//! - [`NotifyChannel`] trait defines the transport interface
//! - [`MattermostChannel`] implements Mattermost webhook delivery
//! - [`ChatNotifier`] gates records, formats the message, and dispatches

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod record;

pub use channels::mattermost::MattermostChannel;
pub use channels::NotifyChannel;
pub use config::NotifierConfig;
pub use error::ChannelError;
pub use filter::MessageFilter;
pub use record::{Level, LogRecord};

use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Environment variable to disable all notifications.
const ENV_NOTIFY_DISABLED: &str = "NOTIFY_DISABLED";

/// Gate, format, and forward log records to chat channels.
///
/// Each call is stateless given the immutable configuration; the host
/// registers [`handle`](Self::handle) as its per-record callback.
pub struct ChatNotifier {
    config: Arc<NotifierConfig>,
    filter: MessageFilter,
    channels: Vec<Arc<dyn NotifyChannel>>,
    disabled: bool,
}

impl ChatNotifier {
    /// Create a notifier from environment variables.
    ///
    /// Auto-detects the Mattermost channel from `MATTERMOST_WEBHOOK_URL`
    /// and applies the default exclusion filter.
    #[must_use]
    pub fn from_env() -> Self {
        let disabled = std::env::var(ENV_NOTIFY_DISABLED)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        if disabled {
            info!("Notifications disabled via {ENV_NOTIFY_DISABLED}");
            return Self {
                config: Arc::new(NotifierConfig::default()),
                filter: MessageFilter::default(),
                channels: vec![],
                disabled: true,
            };
        }

        let config = NotifierConfig::from_env();

        let mut channels: Vec<Arc<dyn NotifyChannel>> = vec![];
        let mattermost = MattermostChannel::from_env();
        if mattermost.enabled() {
            info!("Mattermost notifications enabled");
            channels.push(Arc::new(mattermost));
        }

        if channels.is_empty() {
            warn!("No notification channels configured");
        } else {
            info!(
                channel_count = channels.len(),
                threshold = config.error_threshold.0,
                "Notification system initialized"
            );
        }

        Self {
            config: Arc::new(config),
            filter: MessageFilter::default(),
            channels,
            disabled: false,
        }
    }

    /// Create a notifier with specific channels.
    #[must_use]
    pub fn with_channels(config: NotifierConfig, channels: Vec<Arc<dyn NotifyChannel>>) -> Self {
        Self {
            config: Arc::new(config),
            filter: MessageFilter::default(),
            channels,
            disabled: false,
        }
    }

    /// Replace the exclusion filter.
    #[must_use]
    pub fn with_filter(mut self, filter: MessageFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Create a disabled notifier (for testing or when notifications are off).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            config: Arc::new(NotifierConfig::default()),
            filter: MessageFilter::default(),
            channels: vec![],
            disabled: true,
        }
    }

    /// Check if any notification channels are enabled.
    #[must_use]
    pub fn has_channels(&self) -> bool {
        !self.disabled && !self.channels.is_empty()
    }

    /// Get the number of enabled channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        if self.disabled {
            0
        } else {
            self.channels.len()
        }
    }

    /// Get the active configuration.
    #[must_use]
    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Decide whether a record qualifies for notification.
    ///
    /// True iff the record's level meets the configured threshold and
    /// its message matches no exclusion pattern.
    #[must_use]
    pub fn should_notify(&self, record: &LogRecord) -> bool {
        record.level >= self.config.error_threshold && !self.filter.matches(&record.message)
    }

    /// Forward a qualifying record to all enabled channels (fire-and-forget).
    ///
    /// Spawns one async task per channel and returns immediately.
    /// Delivery errors are logged but never propagated to the caller,
    /// so a broken webhook cannot feed failures back into the logging
    /// pipeline it is reporting on.
    pub fn handle(&self, record: &LogRecord) {
        if self.disabled {
            debug!("Notifications disabled, skipping record");
            return;
        }

        if self.channels.is_empty() {
            debug!("No channels configured, skipping record");
            return;
        }

        if !self.should_notify(record) {
            debug!(
                level = record.level.0,
                "Record below threshold or excluded, skipping"
            );
            return;
        }

        let text = Arc::new(format::format_text(&self.config, record));

        for channel in &self.channels {
            let channel = Arc::clone(channel);
            let text = Arc::clone(&text);

            tokio::spawn(async move {
                let channel_name = channel.name();

                if !channel.enabled() {
                    debug!(channel = channel_name, "Channel disabled, skipping");
                    return;
                }

                match channel.send(&text).await {
                    Ok(()) => {
                        debug!(channel = channel_name, "Notification sent");
                    }
                    Err(e) => {
                        error!(
                            channel = channel_name,
                            error = %e,
                            "Failed to send notification"
                        );
                    }
                }
            });
        }
    }

    /// Forward a qualifying record and wait for all channels to complete.
    ///
    /// Unlike [`handle`](Self::handle), this awaits every delivery and
    /// returns the per-channel results. Useful for tests or hosts that
    /// want delivery confirmation. Returns an empty list when the
    /// record does not qualify.
    pub async fn handle_and_wait(
        &self,
        record: &LogRecord,
    ) -> Vec<(String, Result<(), ChannelError>)> {
        if self.disabled || self.channels.is_empty() || !self.should_notify(record) {
            return vec![];
        }

        let text = format::format_text(&self.config, record);

        let mut results = vec![];
        for channel in &self.channels {
            let channel_name = channel.name().to_string();
            let result = channel.send(&text).await;
            results.push((channel_name, result));
        }

        results
    }
}

impl Default for ChatNotifier {
    fn default() -> Self {
        Self::from_env()
    }
}
