use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::{ComposeError, probe_duration};
use crate::config::{CompositionSettings, CompositionStrategy};

/// Extension of composed videos
pub const VIDEO_EXT: &str = "mp4";

/// Muxes narration over a looped background clip with ffmpeg
#[derive(Debug, Clone)]
pub struct VideoComposer {
    strategy: CompositionStrategy,
    ffmpeg: String,
    ffprobe: String,
}

impl VideoComposer {
    pub fn new(strategy: CompositionStrategy) -> Self {
        Self {
            strategy,
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }

    /// Duration of a media file in seconds
    pub async fn duration(&self, path: &Path) -> Result<f64, ComposeError> {
        probe_duration(&self.ffprobe, path).await
    }

    /// Write `output`: `background` looped and cut to the narration length,
    /// with `narration` as the only audio track. Returns the narration length.
    pub async fn compose(
        &self,
        background: &Path,
        narration: &Path,
        output: &Path,
    ) -> Result<f64, ComposeError> {
        if !narration.is_file() {
            return Err(ComposeError::MissingNarration(narration.to_path_buf()));
        }

        let duration = self.duration(narration).await?;
        debug!(
            "Narration {:?} is {:.2}s, background {:?}",
            narration, duration, background
        );

        match self.strategy {
            CompositionStrategy::StreamLoop => {
                let args = stream_loop_args(background, narration, duration, output);
                self.run_ffmpeg(args).await?;
            }
            CompositionStrategy::Concat => {
                let clip_duration = self.duration(background).await?;
                let list_path = output.with_extension("concat.txt");
                let clip = std::fs::canonicalize(background)?;
                let list = concat_list(&clip, repeat_count(clip_duration, duration));
                std::fs::write(&list_path, list)?;

                let args = concat_args(&list_path, narration, duration, output);
                let result = self.run_ffmpeg(args).await;
                let _ = std::fs::remove_file(&list_path);
                result?;
            }
        }

        Ok(duration)
    }

    async fn run_ffmpeg(&self, args: Vec<OsString>) -> Result<(), ComposeError> {
        let result = Command::new(&self.ffmpeg)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        match result {
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => {
                let err = String::from_utf8_lossy(&out.stderr);
                Err(ComposeError::EncoderFailed(format!(
                    "{} exited with {}: {}",
                    self.ffmpeg,
                    out.status,
                    err.trim()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ComposeError::ToolNotFound(self.ffmpeg.clone()))
            }
            Err(e) => Err(ComposeError::EncoderFailed(format!("{} error: {e}", self.ffmpeg))),
        }
    }
}

impl From<&CompositionSettings> for VideoComposer {
    fn from(settings: &CompositionSettings) -> Self {
        Self {
            strategy: settings.strategy,
            ffmpeg: settings.ffmpeg.clone(),
            ffprobe: settings.ffprobe.clone(),
        }
    }
}

/// Output path for a verse key
pub fn video_path(out_dir: &Path, key: &str) -> PathBuf {
    out_dir.join(format!("{}.{}", key, VIDEO_EXT))
}

/// Loop input 0 indefinitely, take video from it and audio from input 1,
/// copy the video stream and stop at the narration length.
pub fn stream_loop_args(
    background: &Path,
    narration: &Path,
    duration: f64,
    output: &Path,
) -> Vec<OsString> {
    let duration = format!("{:.3}", duration);
    os_args(&[
        OsStr::new("-y"),
        OsStr::new("-loglevel"),
        OsStr::new("error"),
        OsStr::new("-stream_loop"),
        OsStr::new("-1"),
        OsStr::new("-i"),
        background.as_os_str(),
        OsStr::new("-i"),
        narration.as_os_str(),
        OsStr::new("-map"),
        OsStr::new("0:v:0"),
        OsStr::new("-map"),
        OsStr::new("1:a:0"),
        OsStr::new("-c:v"),
        OsStr::new("copy"),
        OsStr::new("-c:a"),
        OsStr::new("aac"),
        OsStr::new("-t"),
        OsStr::new(&duration),
        OsStr::new("-shortest"),
        output.as_os_str(),
    ])
}

/// Read the repeated clip from a concat list, re-encode video and cut to
/// the narration length.
pub fn concat_args(list: &Path, narration: &Path, duration: f64, output: &Path) -> Vec<OsString> {
    let duration = format!("{:.3}", duration);
    os_args(&[
        OsStr::new("-y"),
        OsStr::new("-loglevel"),
        OsStr::new("error"),
        OsStr::new("-f"),
        OsStr::new("concat"),
        OsStr::new("-safe"),
        OsStr::new("0"),
        OsStr::new("-i"),
        list.as_os_str(),
        OsStr::new("-i"),
        narration.as_os_str(),
        OsStr::new("-map"),
        OsStr::new("0:v:0"),
        OsStr::new("-map"),
        OsStr::new("1:a:0"),
        OsStr::new("-c:a"),
        OsStr::new("aac"),
        OsStr::new("-t"),
        OsStr::new(&duration),
        OsStr::new("-shortest"),
        output.as_os_str(),
    ])
}

fn os_args(parts: &[&OsStr]) -> Vec<OsString> {
    parts.iter().map(|p| p.to_os_string()).collect()
}

/// How many copies of a clip cover the target duration
pub fn repeat_count(clip_duration: f64, target_duration: f64) -> usize {
    if clip_duration <= 0.0 {
        return 1;
    }
    ((target_duration / clip_duration).ceil() as usize).max(1)
}

/// ffconcat list naming `clip` `count` times
pub fn concat_list(clip: &Path, count: usize) -> String {
    let escaped = clip.to_string_lossy().replace('\'', r"'\''");
    let mut list = String::from("ffconcat version 1.0\n");
    for _ in 0..count {
        list.push_str(&format!("file '{}'\n", escaped));
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_stream_loop_args() {
        let args = strings(&stream_loop_args(
            Path::new("bg.mp4"),
            Path::new("n.mp3"),
            12.5,
            Path::new("out.mp4"),
        ));

        let loop_pos = args.iter().position(|a| a == "-stream_loop").unwrap();
        assert_eq!(args[loop_pos + 1], "-1");
        assert_eq!(args[loop_pos + 2], "-i");
        assert_eq!(args[loop_pos + 3], "bg.mp4");

        let joined = args.join(" ");
        assert!(joined.contains("-map 0:v:0 -map 1:a:0"));
        assert!(joined.contains("-c:v copy"));
        assert!(joined.contains("-t 12.500"));
        assert!(joined.contains("-shortest"));
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_concat_args_reencode_video() {
        let args = strings(&concat_args(
            Path::new("list.txt"),
            Path::new("n.mp3"),
            3.0,
            Path::new("out.mp4"),
        ));
        let joined = args.join(" ");

        assert!(joined.contains("-f concat -safe 0 -i list.txt"));
        assert!(!joined.contains("-c:v copy"));
        assert!(joined.contains("-t 3.000"));
    }

    #[test]
    fn test_repeat_count() {
        assert_eq!(repeat_count(10.0, 25.0), 3);
        assert_eq!(repeat_count(10.0, 10.0), 1);
        assert_eq!(repeat_count(10.0, 2.0), 1);
        assert_eq!(repeat_count(0.0, 5.0), 1);
    }

    #[test]
    fn test_concat_list() {
        let list = concat_list(Path::new("/clips/it's.mp4"), 2);
        assert_eq!(
            list,
            "ffconcat version 1.0\nfile '/clips/it'\\''s.mp4'\nfile '/clips/it'\\''s.mp4'\n"
        );
    }

    #[test]
    fn test_video_path() {
        assert_eq!(
            video_path(Path::new("out"), "John_3.16"),
            PathBuf::from("out/John_3.16.mp4")
        );
    }

    #[tokio::test]
    async fn test_missing_narration() {
        let tmp = tempfile::tempdir().unwrap();
        let composer = VideoComposer::new(CompositionStrategy::StreamLoop);
        let err = composer
            .compose(
                &tmp.path().join("bg.mp4"),
                &tmp.path().join("missing.mp3"),
                &tmp.path().join("out.mp4"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ComposeError::MissingNarration(_)));
    }
}
