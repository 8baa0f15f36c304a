use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Page returning one random verse per request
pub const DEFAULT_VERSE_URL: &str = "https://dailyverses.net/random-bible-verse";

/// Run configuration loaded from the YAML config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory for persisted batch files
    pub output_text_dir: PathBuf,
    /// Root directory for narration audio (one subdirectory per batch)
    pub output_audio_dir: PathBuf,
    /// Root directory for composed videos (one subdirectory per batch)
    pub output_video_dir: PathBuf,
    /// Directory of background clips to choose from
    pub input_video_dir: PathBuf,
    pub elevenlabs_api_key: String,
    pub elevenlabs_voice: String,
    pub elevenlabs_model: String,
    #[serde(default = "default_elevenlabs_base_url")]
    pub elevenlabs_base_url: String,
    #[serde(default = "default_verse_url")]
    pub verse_url: String,
    #[serde(default)]
    pub llm: LlmSettings,
    /// Upper bound on commentary length in characters; unset means unbounded
    #[serde(default)]
    pub commentary_max_chars: Option<usize>,
    #[serde(default)]
    pub composition: CompositionSettings,
}

/// Chat-completion endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            api_key: "lm-studio".to_string(),
            model: "lmstudio-community/Meta-Llama-3-8B-Instruct-GGUF".to_string(),
            temperature: 0.7,
        }
    }
}

/// How a background clip is stretched to the narration length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionStrategy {
    /// Loop the clip inside the encoder and copy the video stream
    #[default]
    StreamLoop,
    /// Repeat the clip through a concat list, then re-encode and trim
    Concat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionSettings {
    pub strategy: CompositionStrategy,
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for CompositionSettings {
    fn default() -> Self {
        Self {
            strategy: CompositionStrategy::default(),
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

fn default_elevenlabs_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_verse_url() -> String {
    DEFAULT_VERSE_URL.to_string()
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse config YAML")
    }

    /// Create the output directories if they don't exist yet
    pub fn ensure_output_dirs(&self) -> Result<()> {
        for dir in [
            &self.output_text_dir,
            &self.output_audio_dir,
            &self.output_video_dir,
        ] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        }
        Ok(())
    }

    /// Batch file for the given output identifier
    pub fn batch_path(&self, output: &str) -> PathBuf {
        self.output_text_dir.join(format!("{}.yaml", output))
    }

    /// Narration directory for the given output identifier
    pub fn audio_dir(&self, output: &str) -> PathBuf {
        self.output_audio_dir.join(output)
    }

    /// Video directory for the given output identifier
    pub fn video_dir(&self, output: &str) -> PathBuf {
        self.output_video_dir.join(output)
    }
}
