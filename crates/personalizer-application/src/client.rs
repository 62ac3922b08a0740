//! Runtime channel between the non-background contexts and the background.
//!
//! Requests travel as raw JSON so that the background, not the sender,
//! decides whether a payload is a known message.

use personalizer_core::message::{RuntimeMessage, RuntimeResponse, error_codes};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::context::ContextKind;

/// One request on the runtime channel.
#[derive(Debug)]
pub struct RuntimeRequest {
    pub payload: Value,
    pub sender: Option<ContextKind>,
    /// Dropping this without sending counts as an empty reply.
    pub reply: oneshot::Sender<RuntimeResponse>,
}

pub type RequestSender = mpsc::UnboundedSender<RuntimeRequest>;
pub type RequestReceiver = mpsc::UnboundedReceiver<RuntimeRequest>;

/// Creates the channel the background serves requests from.
pub fn runtime_channel() -> (RequestSender, RequestReceiver) {
    mpsc::unbounded_channel()
}

/// What a popup, options page or page script holds to reach the background.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    channel: Option<RequestSender>,
    sender: Option<ContextKind>,
}

impl RuntimeClient {
    pub fn connected(channel: RequestSender, sender: ContextKind) -> Self {
        Self {
            channel: Some(channel),
            sender: Some(sender),
        }
    }

    /// A client for a context without a runtime; every send fails with
    /// `runtime_unavailable`.
    pub fn unavailable() -> Self {
        Self {
            channel: None,
            sender: None,
        }
    }

    pub async fn send(&self, message: &RuntimeMessage) -> RuntimeResponse {
        match serde_json::to_value(message) {
            Ok(payload) => self.send_value(payload).await,
            Err(e) => {
                tracing::warn!(message = message.kind(), "Failed to encode runtime message: {}", e);
                RuntimeResponse::error(error_codes::MESSAGE_FAILED)
            }
        }
    }

    /// Sends a raw payload and waits for the reply.
    pub async fn send_value(&self, payload: Value) -> RuntimeResponse {
        let Some(channel) = &self.channel else {
            return RuntimeResponse::error(error_codes::RUNTIME_UNAVAILABLE);
        };

        let (reply, response) = oneshot::channel();
        let request = RuntimeRequest {
            payload,
            sender: self.sender,
            reply,
        };

        if let Err(e) = channel.send(request) {
            tracing::warn!(
                payload = %e.0.payload,
                "Failed to send runtime message, background is gone"
            );
            return RuntimeResponse::error(error_codes::MESSAGE_FAILED);
        }

        match response.await {
            Ok(response) => response,
            Err(_) => RuntimeResponse::ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_unavailable_runtime() {
        let client = RuntimeClient::unavailable();
        let response = client.send(&RuntimeMessage::Ping).await;
        assert_eq!(response.error_code(), Some(error_codes::RUNTIME_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_closed_channel_is_message_failed() {
        let (sender, receiver) = runtime_channel();
        drop(receiver);

        let client = RuntimeClient::connected(sender, ContextKind::Popup);
        let response = client.send(&RuntimeMessage::GetState).await;
        assert_eq!(response.error_code(), Some(error_codes::MESSAGE_FAILED));
    }

    #[tokio::test]
    async fn test_dropped_reply_is_ok() {
        let (sender, mut receiver) = runtime_channel();
        tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                drop(request);
            }
        });

        let client = RuntimeClient::connected(sender, ContextKind::Options);
        assert_eq!(client.send(&RuntimeMessage::Ping).await, RuntimeResponse::ok());
    }

    #[tokio::test]
    async fn test_request_carries_payload_and_sender() {
        let (sender, mut receiver) = runtime_channel();
        let client = RuntimeClient::connected(sender, ContextKind::Page { tab_id: 4 });

        let pending = tokio::spawn(async move {
            client
                .send_value(json!({ "type": "SOMETHING_ELSE", "n": 1 }))
                .await
        });

        let request = receiver.recv().await.unwrap();
        assert_eq!(request.payload["type"], "SOMETHING_ELSE");
        assert_eq!(request.sender, Some(ContextKind::Page { tab_id: 4 }));
        request
            .reply
            .send(RuntimeResponse::error(error_codes::UNKNOWN_MESSAGE))
            .unwrap();

        let response = pending.await.unwrap();
        assert_eq!(response.error_code(), Some(error_codes::UNKNOWN_MESSAGE));
    }
}
