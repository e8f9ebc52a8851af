//! Completion client trait and implementations
//!
//! Agents depend only on "messages in, text out, may fail". The HTTP
//! transport lives in `chat`.

use crate::error::PlannerError;
use crate::models::ChatMessage;
use crate::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

pub mod chat;
pub use chat::ChatCompletionsClient;

/// Text completion collaborator
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String>;
}

/// One recorded call to a `ScriptedCompletionClient`
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// Replays queued replies in order and records every call.
/// Keeps the agents runnable without a live model.
#[derive(Default)]
pub struct ScriptedCompletionClient {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().await.push_back(Ok(reply.into()));
    }

    pub async fn push_failure(&self, error: PlannerError) {
        self.replies.lock().await.push_back(Err(error));
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        self.calls.lock().await.push(RecordedCall {
            messages: messages.to_vec(),
            temperature,
        });

        self.replies.lock().await.pop_front().unwrap_or_else(|| {
            Err(PlannerError::Transport(
                "No scripted reply left".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_client_replays_in_order() {
        let client = ScriptedCompletionClient::with_replies(["first", "second"]);
        client
            .push_failure(PlannerError::Transport("connection reset".to_string()))
            .await;

        let messages = vec![ChatMessage::user("hi")];
        assert_eq!(client.complete(&messages, 0.0).await.unwrap(), "first");
        assert_eq!(client.complete(&messages, 0.5).await.unwrap(), "second");
        assert!(matches!(
            client.complete(&messages, 0.5).await,
            Err(PlannerError::Transport(_))
        ));
        assert!(client.complete(&messages, 0.5).await.is_err());

        let calls = client.calls().await;
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].temperature, 0.0);
        assert_eq!(calls[1].messages, messages);
    }
}
