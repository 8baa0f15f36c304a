use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmSettings;

/// Configuration for an OpenAI-compatible chat-completion endpoint
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL including the version segment (e.g., "http://localhost:1234/v1")
    pub base_url: String,
    /// Bearer token; local servers accept any placeholder
    pub api_key: String,
    /// Model identifier as known to the server
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
}

impl ChatConfig {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url,
            api_key: "lm-studio".to_string(),
            model,
            temperature: 0.7,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl From<&LlmSettings> for ChatConfig {
    fn from(settings: &LlmSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }
}

/// Chat-completion client
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(client: Client, config: ChatConfig) -> Self {
        Self { client, config }
    }

    /// Send a system + user message pair and return the top completion's text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: Some(self.config.temperature),
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to chat-completion endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat-completion error: {} - {}", status, body);
        }

        let response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat-completion response")?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("No text content in completion")
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        let config = ChatConfig::new("http://localhost:1234/v1/".to_string(), "m".to_string());
        assert_eq!(
            config.completions_url(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            temperature: Some(0.7),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["temperature"], 0.7);
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Be patient."}, "finish_reason": "stop"}
            ]
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("Be patient.")
        );
    }
}
