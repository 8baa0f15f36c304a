use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{error, info};

use super::audio_path;
use crate::media::{VideoComposer, choose_background, video_path};
use crate::models::Batch;

/// Configuration for Stage 3
#[derive(Debug, Clone)]
pub struct Stage3Config {
    /// Directory holding the narration for each verse
    pub audio_dir: PathBuf,
    /// Directory of background clips
    pub background_dir: PathBuf,
    /// Directory receiving one video per verse
    pub out_dir: PathBuf,
}

/// Result of Stage 3 processing
#[derive(Debug, Default)]
pub struct ComposeReport {
    /// Written videos, in batch order
    pub composed: Vec<PathBuf>,
    /// Verse keys whose composition failed, with the reason
    pub failed: Vec<(String, String)>,
}

impl ComposeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Execute Stage 3: video composition
///
/// Each verse gets its own randomly chosen background. A failure is logged
/// and recorded for that verse only; the remaining verses are still composed.
pub async fn execute_stage3<R: Rng + ?Sized>(
    composer: &VideoComposer,
    batch: &Batch,
    config: &Stage3Config,
    rng: &mut R,
) -> Result<ComposeReport> {
    std::fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("Failed to create directory: {:?}", config.out_dir))?;

    let mut report = ComposeReport::default();

    for verse in batch {
        info!("compose video: {}", verse.key);

        let narration = audio_path(&config.audio_dir, &verse.key);
        let output = video_path(&config.out_dir, &verse.key);

        let composed = match choose_background(&config.background_dir, rng) {
            Ok(background) => composer.compose(&background, &narration, &output).await,
            Err(e) => Err(e),
        };

        match composed {
            Ok(duration) => {
                info!("Wrote {:?} ({:.2}s)", output, duration);
                report.composed.push(output);
            }
            Err(e) => {
                error!("Composition failed for {}: {}", verse.key, e);
                report.failed.push((verse.key.clone(), e.to_string()));
            }
        }
    }

    Ok(report)
}
