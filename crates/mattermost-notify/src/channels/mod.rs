//! Notification channel implementations.

pub mod mattermost;

use async_trait::async_trait;

use crate::error::ChannelError;

/// Trait for chat notification transports.
///
/// A channel carries an already formatted message; gating and
/// formatting stay in the dispatcher.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Check if this channel is enabled/configured.
    fn enabled(&self) -> bool;

    /// Deliver a formatted message through this channel.
    async fn send(&self, text: &str) -> Result<(), ChannelError>;
}
