// src/tts/mod.rs
// Text-to-speech provider: text and a voice id in, raw audio bytes out.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::config::Config;

#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>>;

    /// Voice used when the caller does not specify one.
    fn default_voice(&self) -> &str;
}

#[derive(Clone)]
pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    default_voice_id: String,
}

const TTS_MODEL_ID: &str = "eleven_turbo_v2_5";

impl ElevenLabsClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.tts_timeout))
            .build()
            .context("Failed to build TTS HTTP client")?;

        Ok(Self {
            client,
            api_key: config.elevenlabs_api_key.clone(),
            default_voice_id: config.elevenlabs_voice_id.clone(),
        })
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsClient {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>> {
        if self.api_key.is_empty() {
            anyhow::bail!("ElevenLabs API key not configured");
        }

        let response = self
            .client
            .post(format!(
                "https://api.elevenlabs.io/v1/text-to-speech/{voice_id}"
            ))
            .header("Accept", "audio/mpeg")
            .header("Content-Type", "application/json")
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "text": text,
                "model_id": TTS_MODEL_ID,
                "voice_settings": {
                    "stability": 0.5,
                    "similarity_boost": 0.75
                }
            }))
            .send()
            .await
            .context("Failed to send TTS request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text: String = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string())
                .chars()
                .take(200)
                .collect();
            anyhow::bail!("ElevenLabs API error {}: {}", status, error_text);
        }

        let audio = response.bytes().await.context("Failed to read TTS audio")?;
        if audio.is_empty() {
            anyhow::bail!("Empty audio response from ElevenLabs");
        }

        Ok(audio.to_vec())
    }

    fn default_voice(&self) -> &str {
        &self.default_voice_id
    }
}
