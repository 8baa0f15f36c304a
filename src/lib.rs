pub mod config;
pub mod io;
pub mod llm;
pub mod media;
pub mod models;
pub mod pipeline;
pub mod scrape;
pub mod stages;
pub mod tts;

pub use config::{CompositionStrategy, Settings};
pub use io::{load_batch, save_batch};
pub use llm::{ChatClient, ChatConfig};
pub use media::{ComposeError, VideoComposer};
pub use models::{Batch, Verse, to_display_name, to_key};
pub use pipeline::{RunMode, RunOptions, RunSummary, Services, StagePlan, run, run_with};
pub use scrape::VerseFetcher;
pub use stages::{
    ComposeReport, Stage0Config, Stage1Config, Stage2Config, Stage3Config, execute_stage0,
    execute_stage1, execute_stage2, execute_stage3,
};
pub use tts::{TtsClient, TtsConfig};
