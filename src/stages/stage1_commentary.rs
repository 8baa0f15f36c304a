use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::llm::{ChatClient, SYSTEM_PROMPT, build_commentary_prompt, truncate_commentary};
use crate::models::Batch;

/// Configuration for Stage 1
#[derive(Debug, Clone, Default)]
pub struct Stage1Config {
    /// Cut commentary longer than this many characters
    pub max_commentary_chars: Option<usize>,
}

/// Result of Stage 1 processing
#[derive(Debug, Default)]
pub struct Stage1Result {
    /// Number of verses that received commentary
    pub verses_annotated: usize,
    /// Number of commentaries cut to the character budget
    pub commentaries_truncated: usize,
}

/// Execute Stage 1: LLM commentary
///
/// Sends every verse to the chat-completion endpoint and stores the reply as
/// the verse's commentary. Any failed request aborts the stage.
pub async fn execute_stage1(
    client: &ChatClient,
    batch: &mut Batch,
    config: &Stage1Config,
) -> Result<Stage1Result> {
    let mut result = Stage1Result::default();

    for verse in batch.iter_mut() {
        info!("generate commentary: {}", verse.key);

        let prompt = build_commentary_prompt(verse);
        let mut commentary = client
            .complete(SYSTEM_PROMPT, &prompt)
            .await
            .with_context(|| format!("Failed to generate commentary for {}", verse.key))?;

        if let Some(max_chars) = config.max_commentary_chars {
            let truncated = truncate_commentary(&commentary, max_chars);
            if truncated.len() < commentary.len() {
                warn!(
                    "Commentary for {} cut from {} to {} chars",
                    verse.key,
                    commentary.chars().count(),
                    truncated.chars().count()
                );
                commentary = truncated;
                result.commentaries_truncated += 1;
            }
        }

        debug!("{}: {}", verse.key, commentary);
        verse.commentary = Some(commentary);
        result.verses_annotated += 1;
    }

    Ok(result)
}
