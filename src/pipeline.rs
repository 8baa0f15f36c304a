//! Run modes and the stage sequence for one invocation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::Settings;
use crate::io::{load_batch, save_batch};
use crate::llm::{ChatClient, ChatConfig};
use crate::media::VideoComposer;
use crate::models::Batch;
use crate::scrape::VerseFetcher;
use crate::stages::{
    Stage0Config, Stage1Config, Stage2Config, Stage3Config, execute_stage0, execute_stage1,
    execute_stage2, execute_stage3,
};
use crate::tts::{TtsClient, TtsConfig};

/// Where the batch for this run comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Scrape and annotate new verses
    Fresh,
    /// Reuse a saved batch and regenerate audio and video
    Load(PathBuf),
    /// Reuse a saved batch and its existing audio, compose video only
    VideoOnly(PathBuf),
}

impl RunMode {
    /// Batch file this mode reads from, if any
    pub fn saved_batch(&self) -> Option<&Path> {
        match self {
            RunMode::Fresh => None,
            RunMode::Load(path) | RunMode::VideoOnly(path) => Some(path),
        }
    }
}

/// Options collected from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: RunMode,
    /// Skip synthesis and composition
    pub text_only: bool,
    pub num_verses: usize,
    /// Batch identifier used for the batch file and artifact subdirectories
    pub output: String,
}

/// Which stages a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagePlan {
    pub fetch: bool,
    pub annotate: bool,
    pub save: bool,
    pub synthesize: bool,
    pub compose: bool,
}

impl StagePlan {
    pub fn for_options(mode: &RunMode, text_only: bool) -> Self {
        let fresh = matches!(mode, RunMode::Fresh);
        let video_only = matches!(mode, RunMode::VideoOnly(_));
        Self {
            fetch: fresh,
            annotate: fresh,
            save: fresh,
            synthesize: !text_only && !video_only,
            compose: !text_only,
        }
    }
}

/// External service handles, built once per run
pub struct Services {
    pub fetcher: VerseFetcher,
    pub chat: ChatClient,
    pub tts: TtsClient,
    pub composer: VideoComposer,
}

impl Services {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            fetcher: VerseFetcher::new(client.clone(), settings.verse_url.clone()),
            chat: ChatClient::new(client.clone(), ChatConfig::from(&settings.llm)),
            tts: TtsClient::new(client, TtsConfig::from(settings)),
            composer: VideoComposer::from(&settings.composition),
        })
    }
}

/// What a run produced
#[derive(Debug, Default)]
pub struct RunSummary {
    pub verses: usize,
    pub batch_file: Option<PathBuf>,
    pub audio_files: usize,
    pub videos: usize,
    pub failed_videos: Vec<String>,
}

/// Execute one run according to `options`
pub async fn run(settings: &Settings, options: &RunOptions) -> Result<RunSummary> {
    settings.ensure_output_dirs()?;
    let services = Services::from_settings(settings)?;
    run_with(settings, options, &services).await
}

/// Execute one run with prepared service handles
pub async fn run_with(
    settings: &Settings,
    options: &RunOptions,
    services: &Services,
) -> Result<RunSummary> {
    let plan = StagePlan::for_options(&options.mode, options.text_only);
    let mut summary = RunSummary::default();

    let mut batch = match options.mode.saved_batch() {
        Some(path) if !plan.fetch => load(path)?,
        _ => {
            execute_stage0(
                &services.fetcher,
                &Stage0Config {
                    count: options.num_verses,
                },
            )
            .await?
        }
    };

    if plan.annotate {
        let stage1 = execute_stage1(
            &services.chat,
            &mut batch,
            &Stage1Config {
                max_commentary_chars: settings.commentary_max_chars,
            },
        )
        .await?;
        info!(
            "Stage 1: {} verses annotated, {} truncated",
            stage1.verses_annotated, stage1.commentaries_truncated
        );
    }

    if plan.save {
        let path = settings.batch_path(&options.output);
        info!("Saving batch to {:?}", path);
        save_batch(&batch, &path)?;
        summary.batch_file = Some(path);
    }
    summary.verses = batch.len();

    if plan.synthesize {
        info!("Stage 2: Synthesizing narration...");
        let voice_id = services.tts.resolve_voice(&settings.elevenlabs_voice).await?;
        let stage2 = execute_stage2(
            &services.tts,
            &batch,
            &Stage2Config {
                voice_id,
                model_id: settings.elevenlabs_model.clone(),
                out_dir: settings.audio_dir(&options.output),
            },
        )
        .await?;
        summary.audio_files = stage2.audio_files.len();
    } else if options.text_only {
        info!("Skipping narration (--text-only)");
    }

    if plan.compose {
        if settings.input_video_dir.is_dir() {
            info!("Stage 3: Composing video...");
            let mut rng = StdRng::from_entropy();
            let report = execute_stage3(
                &services.composer,
                &batch,
                &Stage3Config {
                    audio_dir: settings.audio_dir(&options.output),
                    background_dir: settings.input_video_dir.clone(),
                    out_dir: settings.video_dir(&options.output),
                },
                &mut rng,
            )
            .await?;
            summary.videos = report.composed.len();
            summary.failed_videos = report.failed.into_iter().map(|(key, _)| key).collect();
        } else {
            warn!(
                "Skipping video composition: {:?} is not a directory",
                settings.input_video_dir
            );
        }
    }

    Ok(summary)
}

fn load(path: &Path) -> Result<Batch> {
    info!("Loading batch from {:?}", path);
    let batch = load_batch(path)?;
    info!(
        "Loaded {} verses ({} with commentary)",
        batch.len(),
        batch.annotated_count()
    );
    Ok(batch)
}
