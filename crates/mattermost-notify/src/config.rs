//! Notifier configuration.
//!
//! Loaded once at startup from environment variables into a typed
//! struct; the notifier never reads configuration by key at call time.
//! Bad values fall back to defaults with a diagnostic instead of
//! failing, so a misconfigured notifier can never take down the host's
//! logging path.

use chrono_tz::Tz;
use tracing::warn;

use crate::record::Level;

/// Environment variable for the Mattermost incoming webhook URL.
pub const ENV_WEBHOOK_URL: &str = "MATTERMOST_WEBHOOK_URL";
/// Environment variable for the minimum severity that triggers a notification.
pub const ENV_ERROR_THRESHOLD: &str = "NOTIFY_ERROR_THRESHOLD";
/// Environment variable for the display timezone of message timestamps.
pub const ENV_TIMEZONE: &str = "NOTIFY_TIMEZONE";
/// Environment variable for the application name shown in the message header.
pub const ENV_APP_NAME: &str = "NOTIFY_APP_NAME";

/// Timezone used when none is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;
/// Application name used when none is configured.
pub const DEFAULT_APP_NAME: &str = "app";

/// Immutable notifier configuration.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Destination for the webhook POST. `None` disables sending.
    pub webhook_url: Option<String>,
    /// Minimum severity that triggers a notification.
    pub error_threshold: Level,
    /// Display timezone for message timestamps.
    pub timezone: Tz,
    /// Application name included in the message header.
    pub app_name: String,
}

impl NotifierConfig {
    /// Create a config for a given webhook URL with default threshold,
    /// timezone, and application name.
    #[must_use]
    pub fn new(webhook_url: impl Into<String>) -> Self {
        let url = webhook_url.into();
        Self {
            webhook_url: (!url.is_empty()).then_some(url),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Missing or invalid values fall back to defaults; an absent
    /// webhook URL leaves the notifier configured but inert.
    #[must_use]
    pub fn from_env() -> Self {
        let webhook_url = std::env::var(ENV_WEBHOOK_URL)
            .ok()
            .filter(|v| !v.trim().is_empty());

        let error_threshold = match std::env::var(ENV_ERROR_THRESHOLD) {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(value) => Level(value),
                Err(_) => {
                    warn!(
                        value = %raw,
                        default = Level::ERROR.0,
                        "Invalid {ENV_ERROR_THRESHOLD}, using default"
                    );
                    Level::ERROR
                }
            },
            Err(_) => Level::ERROR,
        };

        let timezone = match std::env::var(ENV_TIMEZONE) {
            Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        timezone = %raw,
                        default = %DEFAULT_TIMEZONE,
                        "Invalid {ENV_TIMEZONE}, using default"
                    );
                    DEFAULT_TIMEZONE
                }
            },
            _ => DEFAULT_TIMEZONE,
        };

        let app_name = std::env::var(ENV_APP_NAME)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        Self {
            webhook_url,
            error_threshold,
            timezone,
            app_name,
        }
    }

    /// Set the severity threshold.
    #[must_use]
    pub fn with_error_threshold(mut self, threshold: Level) -> Self {
        self.error_threshold = threshold;
        self
    }

    /// Set the display timezone.
    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Set the application name.
    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            error_threshold: Level::ERROR,
            timezone: DEFAULT_TIMEZONE,
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            ENV_WEBHOOK_URL,
            ENV_ERROR_THRESHOLD,
            ENV_TIMEZONE,
            ENV_APP_NAME,
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = NotifierConfig::from_env();

        assert!(config.webhook_url.is_none());
        assert_eq!(config.error_threshold, Level::ERROR);
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
        assert_eq!(config.app_name, DEFAULT_APP_NAME);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_all_values() {
        clear_env();
        std::env::set_var(ENV_WEBHOOK_URL, "https://chat.example.com/hooks/abc");
        std::env::set_var(ENV_ERROR_THRESHOLD, "500");
        std::env::set_var(ENV_TIMEZONE, "Europe/Berlin");
        std::env::set_var(ENV_APP_NAME, "billing-api");

        let config = NotifierConfig::from_env();

        assert_eq!(
            config.webhook_url.as_deref(),
            Some("https://chat.example.com/hooks/abc")
        );
        assert_eq!(config.error_threshold, Level::CRITICAL);
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.app_name, "billing-api");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_falls_back_on_bad_values() {
        clear_env();
        std::env::set_var(ENV_WEBHOOK_URL, "  ");
        std::env::set_var(ENV_ERROR_THRESHOLD, "loud");
        std::env::set_var(ENV_TIMEZONE, "Mars/Olympus_Mons");

        let config = NotifierConfig::from_env();

        assert!(config.webhook_url.is_none());
        assert_eq!(config.error_threshold, Level::ERROR);
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);

        clear_env();
    }

    #[test]
    fn test_new_treats_empty_url_as_unset() {
        assert!(NotifierConfig::new("").webhook_url.is_none());
        assert!(NotifierConfig::new("https://chat.example.com/hooks/abc")
            .webhook_url
            .is_some());
    }
}
