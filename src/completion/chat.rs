//! OpenAI-compatible chat-completions client (Groq by default)
//!
//! Uses a long-lived reqwest::Client for connection pooling.

use super::CompletionClient;
use crate::config::CompletionConfig;
use crate::error::PlannerError;
use crate::models::ChatMessage;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// Reusable chat-completions client (connection-pooled)
pub struct ChatCompletionsClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl ChatCompletionsClient {
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(PlannerError::Config(
                "GROQ_API_KEY not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
        };

        info!(model = %self.model, temperature, "Calling chat completions");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Chat completions request failed: {}", e);
                PlannerError::Transport(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Chat completions error response: {}", error_text);
            return Err(PlannerError::Transport(format!(
                "endpoint returned {}: {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            error!("Failed to decode chat completions response: {}", e);
            PlannerError::Transport(format!("undecodable response: {}", e))
        })?;

        let content = extract_content(body)?;

        debug!(chars = content.chars().count(), "Chat completion received");

        Ok(content)
    }
}

fn extract_content(body: ChatResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| PlannerError::Transport("No choices in response".to_string()))
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let messages = vec![
            ChatMessage::system("Respond ONLY in valid JSON."),
            ChatMessage::user("현재 사용자 상태"),
        ];
        let request = ChatRequest {
            model: "llama-3.3-70b-versatile",
            messages: &messages,
            temperature: 0.0,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama-3.3-70b-versatile");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "현재 사용자 상태");
        assert_eq!(json["temperature"], 0.0);
    }

    #[test]
    fn test_extract_first_choice() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"{\"action\":\"END\"}"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(body).unwrap(), r#"{"action":"END"}"#);
    }

    #[test]
    fn test_empty_choices_is_transport_error() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_content(body), Err(PlannerError::Transport(_))));
    }

    #[test]
    fn test_missing_api_key() {
        let config = CompletionConfig::default();
        assert!(matches!(
            ChatCompletionsClient::new(&config),
            Err(PlannerError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint_join() {
        let config = CompletionConfig {
            api_key: "gsk_test".to_string(),
            base_url: "http://localhost:9000/v1/".to_string(),
            ..CompletionConfig::default()
        };
        let client = ChatCompletionsClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/v1/chat/completions");
    }
}
