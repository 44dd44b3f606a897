//! Notifiers: LINE Messaging API push, and a logging stand-in.

use std::fmt;
use std::time::Duration;

use mailbox_core::{Notifier, NotifyError};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::RunnerError;

/// LINE Messaging API push endpoint.
pub const LINE_PUSH_ENDPOINT: &str = "https://api.line.me/v2/bot/message/push";

/// Body of a push request.
#[derive(Debug, Serialize)]
pub struct PushRequest<'a> {
    /// User, group or room ID.
    pub to: &'a str,
    /// Messages to deliver (a single text message here).
    pub messages: [TextMessage<'a>; 1],
}

/// A text message object.
#[derive(Debug, Serialize)]
pub struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    /// Message text.
    pub text: &'a str,
}

impl<'a> PushRequest<'a> {
    /// A push of one text message.
    pub fn text(to: &'a str, text: &'a str) -> Self {
        PushRequest {
            to,
            messages: [TextMessage { kind: "text", text }],
        }
    }
}

/// Sends notifications as LINE push messages.
pub struct LineMessagingNotifier {
    client: Client,
    endpoint: String,
    channel_access_token: String,
}

impl LineMessagingNotifier {
    /// Create a notifier posting to `endpoint` with the given channel token.
    pub fn new(
        channel_access_token: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RunnerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(LineMessagingNotifier {
            client,
            endpoint: endpoint.into(),
            channel_access_token: channel_access_token.into(),
        })
    }

    /// The endpoint requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for LineMessagingNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineMessagingNotifier")
            .field("endpoint", &self.endpoint)
            .field("channel_access_token", &"<redacted>")
            .finish()
    }
}

impl Notifier for LineMessagingNotifier {
    fn send(&self, message: &str, recipient: &str) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(&PushRequest::text(recipient, message))
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.channel_access_token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response.text().unwrap_or_default();
        debug!(status = status.as_u16(), body = %text, "push response");

        if status.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Rejected {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

/// Logs notifications instead of sending them (`--dry-run`).
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, message: &str, recipient: &str) -> Result<(), NotifyError> {
        info!(recipient, message, "dry run: not sending notification");
        Ok(())
    }
}
