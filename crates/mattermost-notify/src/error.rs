//! Error types for the notification pipeline.

use thiserror::Error;

/// Errors that can occur when sending a notification.
///
/// These never propagate back into the host's logging call; the
/// dispatcher logs them on its own diagnostic channel and drops them.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Channel is not configured
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    /// Webhook responded with a non-success status
    #[error("Webhook returned {status}: {body}")]
    Status { status: u16, body: String },
}
