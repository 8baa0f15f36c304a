use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Settings;

/// Extension of files written from the speech service's default output
pub const AUDIO_EXT: &str = "mp3";

/// Configuration for the text-to-speech service
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// API key sent as `xi-api-key`
    pub api_key: String,
    /// Service root (e.g., "https://api.elevenlabs.io")
    pub base_url: String,
}

impl TtsConfig {
    fn voices_url(&self) -> String {
        format!("{}/v1/voices", self.base_url.trim_end_matches('/'))
    }

    fn speech_url(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            voice_id
        )
    }
}

impl From<&Settings> for TtsConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            api_key: settings.elevenlabs_api_key.clone(),
            base_url: settings.elevenlabs_base_url.clone(),
        }
    }
}

/// Text-to-speech client
pub struct TtsClient {
    client: Client,
    config: TtsConfig,
}

impl TtsClient {
    pub fn new(client: Client, config: TtsConfig) -> Self {
        Self { client, config }
    }

    /// Map a configured voice to a voice ID. Names are looked up in the
    /// account's voice list; IDs and unknown values pass through unchanged.
    pub async fn resolve_voice(&self, voice: &str) -> Result<String> {
        let response = self
            .client
            .get(self.config.voices_url())
            .header("xi-api-key", &self.config.api_key)
            .send()
            .await
            .context("Failed to request voice list")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Voice list error: {} - {}", status, body);
        }

        let list: VoiceList = response
            .json()
            .await
            .context("Failed to parse voice list")?;

        let resolved = match_voice(&list.voices, voice);
        if resolved != voice {
            info!("Voice {} resolved to {}", voice, resolved);
        } else {
            debug!("Using voice ID {}", voice);
        }
        Ok(resolved)
    }

    /// Synthesize `text` and return the encoded audio bytes
    pub async fn synthesize(&self, text: &str, voice_id: &str, model_id: &str) -> Result<Vec<u8>> {
        let request = SpeechRequest {
            text: text.to_string(),
            model_id: model_id.to_string(),
        };

        let response = self
            .client
            .post(self.config.speech_url(voice_id))
            .header("xi-api-key", &self.config.api_key)
            .header("accept", "audio/mpeg")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to text-to-speech API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Text-to-speech API error: {} - {}", status, body);
        }

        let audio = response
            .bytes()
            .await
            .context("Failed to read text-to-speech audio")?;

        if audio.is_empty() {
            anyhow::bail!("Text-to-speech API returned no audio");
        }

        Ok(audio.to_vec())
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest {
    text: String,
    model_id: String,
}

#[derive(Debug, Deserialize)]
struct VoiceList {
    voices: Vec<Voice>,
}

#[derive(Debug, Deserialize)]
struct Voice {
    voice_id: String,
    name: String,
}

/// ID match wins over name match; names compare case-insensitively
fn match_voice(voices: &[Voice], voice: &str) -> String {
    if voices.iter().any(|v| v.voice_id == voice) {
        return voice.to_string();
    }
    voices
        .iter()
        .find(|v| v.name.eq_ignore_ascii_case(voice))
        .map(|v| v.voice_id.clone())
        .unwrap_or_else(|| voice.to_string())
}
