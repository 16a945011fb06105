//! External media probe (ffprobe) behind a narrow capability trait.

use super::classifier::ClassifyError;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;

/// Width and height of one media stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDims {
    pub width: u32,
    pub height: u32,
}

impl StreamDims {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Inspects a local media file and reports its streams, in file order.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<Vec<StreamDims>, ClassifyError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

/// Parse `ffprobe -print_format json -show_streams` output.
///
/// Every stream is kept in file order. Streams without dimensions (audio, data)
/// report `0x0`.
pub fn parse_probe_output(stdout: &[u8]) -> Result<Vec<StreamDims>, ClassifyError> {
    let output: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| ClassifyError::ParseFailed(e.to_string()))?;

    Ok(output
        .streams
        .into_iter()
        .map(|s| StreamDims::new(s.width.unwrap_or(0), s.height.unwrap_or(0)))
        .collect())
}

/// Probe backed by the ffprobe executable
pub struct FfprobeProbe {
    ffprobe_path: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: String) -> Result<Self> {
        if ffprobe_path.is_empty() || ffprobe_path.contains("..") {
            return Err(anyhow!("Invalid ffprobe_path: {}", ffprobe_path));
        }

        if !ffprobe_path.chars().all(|c| {
            c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
        }) {
            return Err(anyhow!("Invalid ffprobe_path: contains unsafe characters"));
        }

        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl Probe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        process.command = "ffprobe"
    ))]
    async fn probe(&self, path: &Path) -> Result<Vec<StreamDims>, ClassifyError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ClassifyError::ProbeFailed(format!("failed to execute ffprobe: {}", e)))?;

        if !output.status.success() {
            // stderr names the probed file; keep it in the logs only.
            tracing::warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "ffprobe exited unsuccessfully"
            );
            return Err(ClassifyError::ProbeFailed(format!(
                "ffprobe exited with {}",
                output.status
            )));
        }

        let streams = parse_probe_output(&output.stdout)?;

        tracing::debug!(
            streams = streams.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ffprobe completed"
        );

        Ok(streams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let json = br#"{
            "streams": [
                {"index": 0, "codec_type": "video", "width": 1920, "height": 1080},
                {"index": 1, "codec_type": "audio", "sample_rate": "48000"}
            ]
        }"#;
        let streams = parse_probe_output(json).unwrap();
        assert_eq!(
            streams,
            vec![StreamDims::new(1920, 1080), StreamDims::new(0, 0)]
        );
    }

    #[test]
    fn test_parse_probe_output_without_streams() {
        assert!(parse_probe_output(b"{}").unwrap().is_empty());
        assert!(parse_probe_output(br#"{"streams": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_probe_output_keeps_stream_order() {
        let json = br#"{"streams": [
            {"codec_type": "audio", "sample_rate": "44100"},
            {"codec_type": "video", "width": 1080, "height": 1920}
        ]}"#;
        assert_eq!(
            parse_probe_output(json).unwrap(),
            vec![StreamDims::new(0, 0), StreamDims::new(1080, 1920)]
        );
    }

    #[test]
    fn test_parse_probe_output_audio_only() {
        let json = br#"{"streams": [{"codec_type": "audio"}]}"#;
        assert_eq!(parse_probe_output(json).unwrap(), vec![StreamDims::new(0, 0)]);
    }

    #[test]
    fn test_parse_probe_output_malformed() {
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(ClassifyError::ParseFailed(_))
        ));
        assert!(matches!(
            parse_probe_output(br#"{"streams": {"width": 1}}"#),
            Err(ClassifyError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_ffprobe_path_validation() {
        assert!(FfprobeProbe::new("ffprobe".to_string()).is_ok());
        assert!(FfprobeProbe::new("/usr/bin/ffprobe".to_string()).is_ok());
        assert!(FfprobeProbe::new("ffprobe; rm -rf /".to_string()).is_err());
        assert!(FfprobeProbe::new("../ffprobe".to_string()).is_err());
        assert!(FfprobeProbe::new(String::new()).is_err());
    }

    #[tokio::test]
    async fn test_missing_executable_is_probe_failure() {
        let probe = FfprobeProbe::new("/nonexistent/tubely-ffprobe".to_string()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = probe.probe(&dir.path().join("clip.mp4")).await;
        assert!(matches!(result, Err(ClassifyError::ProbeFailed(_))));
    }
}
