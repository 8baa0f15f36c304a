use anyhow::{Context, Result};
use tracing::info;

use crate::models::Batch;
use crate::scrape::VerseFetcher;

/// Configuration for Stage 0
#[derive(Debug, Clone)]
pub struct Stage0Config {
    /// Number of verses to request
    pub count: usize,
}

impl Default for Stage0Config {
    fn default() -> Self {
        Self { count: 1 }
    }
}

/// Execute Stage 0: fetch a batch of random verses
///
/// One request per verse, in order. The first failed request or missing
/// page element ends the stage with an error.
pub async fn execute_stage0(fetcher: &VerseFetcher, config: &Stage0Config) -> Result<Batch> {
    info!("Stage 0: Fetching {} verses", config.count);

    let batch = fetcher
        .fetch(config.count)
        .await
        .context("Failed to fetch verses")?;

    if batch.len() < config.count {
        info!(
            "Stage 0: {} duplicate verses replaced, {} unique",
            config.count - batch.len(),
            batch.len()
        );
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage0_config_default() {
        let config = Stage0Config::default();
        assert_eq!(config.count, 1);
    }
}
