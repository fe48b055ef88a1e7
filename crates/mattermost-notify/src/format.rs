//! Chat message formatting.
//!
//! Builds the single text string posted to the webhook: an all-channel
//! mention, the application name, the error message, the timestamp in
//! the configured timezone, and the rendered record capped so the
//! payload stays under the receiving chat API's size limit.

use crate::config::NotifierConfig;
use crate::record::LogRecord;

/// Maximum characters of rendered record content carried in a message.
/// Header lines (mention, app name, error, timestamp) are never capped.
pub const MAX_TAIL_CHARS: usize = 38_000;

/// Mattermost mention that notifies everyone in the channel.
pub const CHANNEL_MENTION: &str = "@channel";

// e.g. "2024-01-01 05:30: AM"
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M: %p";

/// Build the webhook message text for a record.
#[must_use]
pub fn format_text(config: &NotifierConfig, record: &LogRecord) -> String {
    let local = record.timestamp.with_timezone(&config.timezone);

    let mut text = format!(
        "{CHANNEL_MENTION} **{app}**\nError: {message}\nDate&Time: {timestamp}",
        app = config.app_name,
        message = record.message,
        timestamp = local.format(TIMESTAMP_FORMAT),
    );

    let tail = truncate_tail(&record.formatted);
    if !tail.is_empty() {
        text.push('\n');
        text.push_str(tail);
    }

    text
}

/// Cap the rendered record content at [`MAX_TAIL_CHARS`] characters.
///
/// Idempotent, and never splits a UTF-8 code point.
#[must_use]
pub fn truncate_tail(content: &str) -> &str {
    match content.char_indices().nth(MAX_TAIL_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}
