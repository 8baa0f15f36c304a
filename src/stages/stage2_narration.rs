use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::models::Batch;
use crate::tts::{AUDIO_EXT, TtsClient};

/// Configuration for Stage 2
#[derive(Debug, Clone)]
pub struct Stage2Config {
    /// Voice identifier passed to the speech service
    pub voice_id: String,
    /// Model identifier passed to the speech service
    pub model_id: String,
    /// Directory receiving one audio file per verse
    pub out_dir: PathBuf,
}

/// Result of Stage 2 processing
#[derive(Debug, Default)]
pub struct Stage2Result {
    /// Written audio files, in batch order
    pub audio_files: Vec<PathBuf>,
}

/// Narration file for a verse key
pub fn audio_path(out_dir: &Path, key: &str) -> PathBuf {
    out_dir.join(format!("{}.{}", key, AUDIO_EXT))
}

/// Execute Stage 2: narration synthesis
///
/// Joins each verse's fields into one script, synthesizes it and writes the
/// audio to `<out_dir>/<key>.mp3`. Stops at the first failure.
pub async fn execute_stage2(
    client: &TtsClient,
    batch: &Batch,
    config: &Stage2Config,
) -> Result<Stage2Result> {
    std::fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("Failed to create directory: {:?}", config.out_dir))?;

    let mut result = Stage2Result::default();

    for verse in batch {
        info!("generate audio: {}", verse.key);

        let audio = client
            .synthesize(&verse.narration_script(), &config.voice_id, &config.model_id)
            .await
            .with_context(|| format!("Failed to synthesize narration for {}", verse.key))?;

        let path = audio_path(&config.out_dir, &verse.key);
        std::fs::write(&path, &audio)
            .with_context(|| format!("Failed to write audio file: {:?}", path))?;

        result.audio_files.push(path);
    }

    Ok(result)
}
