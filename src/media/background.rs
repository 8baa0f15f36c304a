use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;

use super::ComposeError;

/// Regular files in `dir`, sorted by path. Subdirectories are skipped.
pub fn list_background_clips(dir: &Path) -> Result<Vec<PathBuf>, ComposeError> {
    let mut clips: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    clips.sort();
    Ok(clips)
}

/// Choose one clip at random
pub fn pick_background<'a, R: Rng + ?Sized>(
    clips: &'a [PathBuf],
    rng: &mut R,
) -> Option<&'a PathBuf> {
    clips.choose(rng)
}

/// List `dir` and choose one clip, failing when there is nothing eligible
pub fn choose_background<R: Rng + ?Sized>(
    dir: &Path,
    rng: &mut R,
) -> Result<PathBuf, ComposeError> {
    let clips = list_background_clips(dir)?;
    pick_background(&clips, rng)
        .cloned()
        .ok_or_else(|| ComposeError::NoBackgroundClip(dir.to_path_buf()))
}
