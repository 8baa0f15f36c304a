use std::path::Path;

use tokio::process::Command;

use super::ComposeError;

/// Duration of a media file in seconds, read from ffprobe's format section
pub async fn probe_duration(ffprobe: &str, path: &Path) -> Result<f64, ComposeError> {
    let result = Command::new(ffprobe)
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ComposeError::ToolNotFound(ffprobe.to_string()));
        }
        Err(e) => return Err(ComposeError::Probe(format!("{ffprobe} failed: {e}"))),
    };

    if !output.status.success() {
        return Err(ComposeError::Probe(format!(
            "{ffprobe} returned error for {}",
            path.display()
        )));
    }

    parse_format_duration(&String::from_utf8_lossy(&output.stdout))
}

/// Extract `format.duration` from ffprobe JSON output
pub fn parse_format_duration(json: &str) -> Result<f64, ComposeError> {
    let parsed: serde_json::Value = serde_json::from_str(json)
        .map_err(|_| ComposeError::Probe("Invalid ffprobe output".into()))?;

    parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| ComposeError::Probe("No duration in ffprobe output".into()))
}
