//! Composition against a real ffmpeg. Skipped when ffmpeg or ffprobe is
//! missing, or cannot encode the synthetic fixtures.

use std::path::Path;
use std::process::Command;

use versecast::{CompositionStrategy, VideoComposer};

fn ffmpeg(args: &[&str]) -> bool {
    Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error"])
        .args(args)
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn tools_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|tool| {
        Command::new(tool)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    })
}

/// One-second background clip and a 2.5 second narration track
fn make_fixtures(dir: &Path) -> bool {
    let background = dir.join("background.mp4");
    let narration = dir.join("narration.mp3");
    ffmpeg(&[
        "-f",
        "lavfi",
        "-i",
        "testsrc=duration=1:size=64x64:rate=10",
        "-c:v",
        "mpeg4",
        background.to_str().unwrap(),
    ]) && ffmpeg(&[
        "-f",
        "lavfi",
        "-i",
        "sine=frequency=440:duration=2.5",
        "-c:a",
        "libmp3lame",
        narration.to_str().unwrap(),
    ])
}

async fn check_strategy(strategy: CompositionStrategy) {
    if !tools_available() {
        eprintln!("ffmpeg/ffprobe not available, skipping");
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    if !make_fixtures(tmp.path()) {
        eprintln!("could not build fixtures, skipping");
        return;
    }

    let composer = VideoComposer::new(strategy);
    let output = tmp.path().join("out.mp4");
    let narration = tmp.path().join("narration.mp3");

    let narration_duration = composer
        .compose(&tmp.path().join("background.mp4"), &narration, &output)
        .await
        .unwrap();
    let output_duration = composer.duration(&output).await.unwrap();

    assert!(output.is_file());
    assert!(
        (output_duration - narration_duration).abs() < 0.3,
        "output {output_duration}s vs narration {narration_duration}s"
    );
    assert!(output_duration > 2.0, "background was not looped");
}

#[tokio::test]
async fn test_stream_loop_matches_narration_length() {
    check_strategy(CompositionStrategy::StreamLoop).await;
}

#[tokio::test]
async fn test_concat_matches_narration_length() {
    check_strategy(CompositionStrategy::Concat).await;
}
