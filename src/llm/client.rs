// src/llm/client.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::Config;

/// One role-tagged turn in a chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".to_string(), content: content.into() }
    }
}

/// Seam for the chat-completion provider: ordered messages in, reply text
/// out. Handlers and the session engine only ever see this trait, so tests
/// inject scripted providers instead of the network client.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String>;
}

#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAIClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.chat_timeout))
            .build()
            .context("Failed to build chat HTTP client")?;

        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            api_base: config.openai_base_url.clone(),
            model: config.chat_model.clone(),
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAIClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        if self.api_key.is_empty() {
            anyhow::bail!("OpenAI API key not configured");
        }

        let payload = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.api_base.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("OpenAI API error {}: {}", status, error_text);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        let text = body["choices"][0]["message"]["content"]
            .as_str()
            .context("Chat completion response missing message content")?;

        Ok(text.to_string())
    }
}
