use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

/// An inbound event as handed over by a transport.
///
/// Transports are allowed to deliver events with missing fields; those are
/// rejected by [`ChannelMessage::validate`] before reaching the dialogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub channel: String,
    pub sender: Option<String>,
    pub content: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChannelMessage {
    pub fn new(channel: &str, sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            channel: channel.to_string(),
            sender: Some(sender.into()),
            content: Some(content.into()),
            timestamp: Utc::now(),
        }
    }

    /// Return `(sender, body)` if the event is well-formed.
    ///
    /// A body made of whitespace only is still a message; only a missing or
    /// zero-length body is rejected.
    pub fn validate(&self) -> Result<(&str, &str), InboundError> {
        let sender = self
            .sender
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(InboundError::MissingSender)?;
        let body = self
            .content
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or(InboundError::EmptyBody)?;
        Ok((sender, body))
    }
}

/// Reasons an inbound event is dropped without a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InboundError {
    #[error("inbound message has no sender")]
    MissingSender,
    #[error("inbound message has an empty body")]
    EmptyBody,
}

/// An outbound reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    pub recipient: String,
    pub content: String,
}

impl SendMessage {
    pub fn new(recipient: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            content: content.into(),
        }
    }
}

/// Message transport (WhatsApp bridge, console, ...).
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver a reply. Errors are reported to the caller but never retried.
    async fn send(&self, message: &SendMessage) -> anyhow::Result<()>;

    /// Push inbound events into `tx` until the transport closes.
    async fn listen(&self, tx: mpsc::Sender<ChannelMessage>) -> anyhow::Result<()>;
}
