use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use versecast::{RunMode, RunOptions, Settings, run};

#[derive(Parser, Debug)]
#[command(name = "versecast")]
#[command(author, version, about = "Generate narrated bible verse videos", long_about = None)]
#[command(group(ArgGroup::new("mode").args(["load", "text_only", "video_only"])))]
struct Cli {
    /// Number of bible verses to fetch
    #[arg(short, long, default_value_t = 1)]
    num_verses: usize,

    /// Batch name used for the batch file and output subdirectories
    #[arg(short, long, default_value = "bible-verses")]
    output: String,

    /// Configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Load a saved batch instead of fetching new verses
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Generate text only, no narration or video
    #[arg(short, long)]
    text_only: bool,

    /// Load a saved batch and compose video from existing narration
    #[arg(short, long)]
    video_only: Option<PathBuf>,

    /// Verbose output
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        let mode = match (&self.load, &self.video_only) {
            (Some(path), _) => RunMode::Load(path.clone()),
            (None, Some(path)) => RunMode::VideoOnly(path.clone()),
            (None, None) => RunMode::Fresh,
        };

        RunOptions {
            mode,
            text_only: self.text_only,
            num_verses: self.num_verses,
            output: self.output.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let settings = Settings::load(&cli.config).context("Failed to load configuration")?;
    let options = cli.run_options();
    info!("Run mode: {:?}, batch {}", options.mode, options.output);

    let summary = run(&settings, &options).await?;

    if let Some(path) = &summary.batch_file {
        info!("Batch written to {:?}", path);
    }
    info!(
        "Complete: {} verses, {} narration files, {} videos",
        summary.verses, summary.audio_files, summary.videos
    );
    if !summary.failed_videos.is_empty() {
        warn!(
            "{} videos failed: {}",
            summary.failed_videos.len(),
            summary.failed_videos.join(", ")
        );
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["versecast"]).unwrap();
        assert_eq!(cli.num_verses, 1);
        assert_eq!(cli.output, "bible-verses");
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
        assert_eq!(cli.run_options().mode, RunMode::Fresh);
    }

    #[test]
    fn test_short_flags() {
        let cli =
            Cli::try_parse_from(["versecast", "-n", "3", "-o", "week1", "-c", "alt.yaml", "-t"])
                .unwrap();
        let options = cli.run_options();
        assert_eq!(options.num_verses, 3);
        assert_eq!(options.output, "week1");
        assert!(options.text_only);
        assert_eq!(options.mode, RunMode::Fresh);
    }

    #[test]
    fn test_load_mode() {
        let cli = Cli::try_parse_from(["versecast", "-l", "text/old.yaml"]).unwrap();
        assert_eq!(
            cli.run_options().mode,
            RunMode::Load(PathBuf::from("text/old.yaml"))
        );
    }

    #[test]
    fn test_video_only_mode() {
        let cli = Cli::try_parse_from(["versecast", "--video-only", "text/old.yaml"]).unwrap();
        assert_eq!(
            cli.run_options().mode,
            RunMode::VideoOnly(PathBuf::from("text/old.yaml"))
        );
    }

    #[test]
    fn test_load_and_video_only_conflict() {
        let err = Cli::try_parse_from(["versecast", "-l", "a.yaml", "-v", "b.yaml"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_text_only_conflicts_with_load() {
        let err = Cli::try_parse_from(["versecast", "-t", "-l", "a.yaml"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_invalid_count() {
        let err = Cli::try_parse_from(["versecast", "-n", "many"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
