// Extraction engine boundary
//
// The engine owns everything hard: site extraction, stream selection,
// merging, transcoding. We treat it as a black box behind a trait so the
// orchestrator can be exercised against a stub. The production
// implementation shells out to the yt-dlp binary and parses its progress
// lines into ticks.

use std::process::Stdio;

use async_trait::async_trait;
use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use super::errors::DownloadError;
use super::models::{DownloadOptions, ProgressTick};

/// One blocking extraction call. May take seconds to hours, may send zero
/// or more ticks, returns Ok only when the engine finished without error.
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    /// Name of the engine (for logging)
    fn name(&self) -> &'static str;

    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        progress: mpsc::Sender<ProgressTick>,
    ) -> Result<(), DownloadError>;
}

/// Production engine: the native yt-dlp binary.
pub struct YtDlpEngine;

impl YtDlpEngine {
    pub fn new() -> Self {
        Self
    }

    fn build_args(url: &str, options: &DownloadOptions) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            options.format_spec.clone(),
            "--no-playlist".to_string(),
            "--newline".to_string(),
            "-o".to_string(),
            options.output_template.clone(),
        ];

        if options.extract_audio {
            args.push("-x".to_string());
            if let Some(format) = options.audio_format {
                args.push("--audio-format".to_string());
                args.push(format.to_string());
            }
            if let Some(quality) = options.audio_quality {
                args.push("--audio-quality".to_string());
                args.push(format!("{}K", quality));
            }
        }

        args.push(url.to_string());
        args
    }
}

impl Default for YtDlpEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionEngine for YtDlpEngine {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        progress: mpsc::Sender<ProgressTick>,
    ) -> Result<(), DownloadError> {
        let ytdlp_path = find_ytdlp();
        let args = Self::build_args(url, options);

        eprintln!("[YtDlp] Starting: {} {:?}", ytdlp_path, args);

        let mut child = Command::new(&ytdlp_path)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DownloadError::ToolNotFound(format!("{}: {}", ytdlp_path, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::ExecutionError("Failed to capture stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::ExecutionError("Failed to capture stderr".to_string()))?;

        // Collect stderr in the background for the failure message
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut collected = Vec::new();
            while let Ok(Some(line)) = lines.next_line().await {
                collected.push(line);
            }
            collected.join("\n")
        });

        // Relay stdout progress lines as ticks. A closed receiver just means
        // the caller stopped listening; keep draining so the child can exit.
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(tick) = parse_progress(&line) {
                let _ = progress.send(tick).await;
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| DownloadError::ExecutionError(format!("Process error: {}", e)))?;
        let stderr_output = stderr_task.await.unwrap_or_default();

        if status.success() {
            eprintln!("[YtDlp] Finished: {}", url);
            return Ok(());
        }

        // Surface the ERROR: lines when present; raw stderr otherwise
        let error_lines: Vec<&str> = stderr_output
            .lines()
            .filter(|l| l.trim_start().starts_with("ERROR:"))
            .collect();
        let message = if error_lines.is_empty() {
            stderr_output
        } else {
            error_lines.join(" | ")
        };

        eprintln!("[YtDlp] Failed: {}", message);
        Err(DownloadError::from(message))
    }
}

// Find yt-dlp executable in common install paths
fn find_ytdlp() -> String {
    let common_paths = vec![
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
    ];

    for path in common_paths {
        if std::path::Path::new(path).exists() {
            return path.to_string();
        }
    }

    if let Ok(output) = std::process::Command::new("which").arg("yt-dlp").output() {
        if output.status.success() {
            if let Ok(path) = String::from_utf8(output.stdout) {
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        }
    }

    // Last resort: hope it's in PATH
    "yt-dlp".to_string()
}

/// Parse a yt-dlp progress line like:
/// `[download]  12.5% of ~ 310.04MiB at  374.36KiB/s ETA 11:59`
/// into a tick. Merge/transcode phase lines map to Postprocessing.
fn parse_progress(line: &str) -> Option<ProgressTick> {
    lazy_static::lazy_static! {
        static ref PROGRESS_RE: Regex = Regex::new(
            r"\[download\]\s+(\d+\.?\d*%)\s+of\s+~?\s*\S+(?:\s+at\s+(\S+))?(?:\s+ETA\s+(\S+))?"
        ).unwrap();
        static ref POSTPROCESS_RE: Regex = Regex::new(
            r"^\[(Merger|ExtractAudio|FixupM4a|VideoRemuxer)\]"
        ).unwrap();
    }

    if POSTPROCESS_RE.is_match(line) || line.contains("has already been downloaded") {
        return Some(ProgressTick::Postprocessing);
    }

    if let Some(caps) = PROGRESS_RE.captures(line) {
        let percent = caps.get(1)?.as_str().to_string();
        if percent == "100%" {
            // Final tick of the transfer: the merge/transcode phase begins
            return Some(ProgressTick::Postprocessing);
        }
        let speed = caps.get(2).map(|m| m.as_str()).unwrap_or("?").to_string();
        let eta = caps.get(3).map(|m| m.as_str()).unwrap_or("?").to_string();
        return Some(ProgressTick::Downloading { percent, speed, eta });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::{DownloadRequest, MediaKind};
    use std::path::Path;

    #[test]
    fn parses_regular_progress_line() {
        let tick =
            parse_progress("[download]  12.5% of ~ 310.04MiB at  374.36KiB/s ETA 11:59").unwrap();
        assert_eq!(
            tick,
            ProgressTick::Downloading {
                percent: "12.5%".to_string(),
                speed: "374.36KiB/s".to_string(),
                eta: "11:59".to_string(),
            }
        );
    }

    #[test]
    fn hundred_percent_maps_to_postprocessing() {
        let tick = parse_progress("[download] 100% of 310.04MiB in 00:42").unwrap();
        assert_eq!(tick, ProgressTick::Postprocessing);
    }

    #[test]
    fn merge_and_extract_lines_map_to_postprocessing() {
        assert_eq!(
            parse_progress("[Merger] Merging formats into \"out.mp4\""),
            Some(ProgressTick::Postprocessing)
        );
        assert_eq!(
            parse_progress("[ExtractAudio] Destination: out.mp3"),
            Some(ProgressTick::Postprocessing)
        );
    }

    #[test]
    fn unrelated_lines_produce_no_tick() {
        assert_eq!(parse_progress("[youtube] abc123: Downloading webpage"), None);
        assert_eq!(parse_progress(""), None);
    }

    #[test]
    fn audio_args_include_extraction_flags() {
        let request = DownloadRequest::new("https://example.com/a", MediaKind::Audio);
        let options = DownloadOptions::for_request(&request, Path::new("/tmp/out"));
        let args = YtDlpEngine::build_args("https://example.com/a", &options);

        assert!(args.contains(&"-x".to_string()));
        assert!(args.contains(&"--audio-format".to_string()));
        assert!(args.contains(&"mp3".to_string()));
        assert!(args.contains(&"192K".to_string()));
        assert_eq!(args.last().unwrap(), "https://example.com/a");
    }

    #[test]
    fn video_args_carry_format_and_template() {
        let request =
            DownloadRequest::new("https://example.com/v", MediaKind::Video).with_quality("480p");
        let options = DownloadOptions::for_request(&request, Path::new("/tmp/out"));
        let args = YtDlpEngine::build_args("https://example.com/v", &options);

        assert!(args.contains(&"bestvideo[height<=?480]+bestaudio/best".to_string()));
        assert!(args.contains(&"/tmp/out/%(title)s.%(ext)s".to_string()));
        assert!(!args.contains(&"-x".to_string()));
    }
}
