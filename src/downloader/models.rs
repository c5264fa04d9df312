// Common data models for the downloader

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::format_selector;

/// What the user wants out of a URL: the video itself, or just the audio
/// track extracted to mp3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    Video,
    Audio,
}

/// One download as submitted by the UI (or the CLI). Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub kind: MediaKind,
    /// Approximate quality tier, e.g. "720p" or "Maximum Quality".
    /// Only meaningful for video; ignored for audio.
    pub quality: Option<String>,
    /// Destination folder. When absent the default download directory
    /// is resolved per platform.
    pub directory: Option<PathBuf>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            url: url.into(),
            kind,
            quality: None,
            directory: None,
        }
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }
}

/// Engine-ready configuration derived from one request. Built once by the
/// orchestrator and discarded when the worker finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// yt-dlp format expression (`-f`).
    pub format_spec: String,
    /// Output template rooted at the resolved directory (`-o`),
    /// interpolating title and extension.
    pub output_template: String,
    /// Run the ffmpeg extract-audio postprocessor (`-x`).
    pub extract_audio: bool,
    /// Target codec for audio extraction.
    pub audio_format: Option<&'static str>,
    /// Target bitrate in kbps for audio extraction.
    pub audio_quality: Option<&'static str>,
}

impl DownloadOptions {
    /// Derive options from a request and an already-resolved directory.
    /// Deterministic: the same request and directory always produce the
    /// same options.
    pub fn for_request(request: &DownloadRequest, directory: &std::path::Path) -> Self {
        let format_spec =
            format_selector::format_spec_for(request.kind, request.quality.as_deref());
        let output_template = format_selector::output_template(directory);

        match request.kind {
            MediaKind::Video => Self {
                format_spec,
                output_template,
                extract_audio: false,
                audio_format: None,
                audio_quality: None,
            },
            MediaKind::Audio => Self {
                format_spec,
                output_template,
                extract_audio: true,
                audio_format: Some("mp3"),
                audio_quality: Some("192"),
            },
        }
    }
}

/// One engine-emitted status update during a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressTick {
    Downloading {
        percent: String,
        speed: String,
        eta: String,
    },
    /// Download finished, merge/transcode in progress.
    Postprocessing,
}

/// Event stream delivered to the caller for one request. `Finished` is the
/// terminal result: exactly one per request, always the last event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DownloadEvent {
    Downloading {
        percent: String,
        speed: String,
        eta: String,
    },
    Postprocessing,
    Error {
        message: String,
    },
    Finished {
        success: bool,
    },
}

impl DownloadEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }

    /// Short status line for the UI label / CLI output.
    pub fn status_line(&self) -> String {
        match self {
            Self::Downloading { percent, speed, eta } => {
                format!("Downloading {} {} ETA {}", percent, speed, eta)
            }
            Self::Postprocessing => "Processing finished, finalizing...".to_string(),
            Self::Error { message } => format!("Error: {}", message),
            Self::Finished { success: true } => "Download completed".to_string(),
            Self::Finished { success: false } => "Download failed".to_string(),
        }
    }
}

impl From<ProgressTick> for DownloadEvent {
    fn from(tick: ProgressTick) -> Self {
        match tick {
            ProgressTick::Downloading { percent, speed, eta } => {
                Self::Downloading { percent, speed, eta }
            }
            ProgressTick::Postprocessing => Self::Postprocessing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn video_options_carry_no_postprocessor() {
        let request =
            DownloadRequest::new("https://example.com/v", MediaKind::Video).with_quality("720p");
        let options = DownloadOptions::for_request(&request, Path::new("/tmp/out"));

        assert!(!options.extract_audio);
        assert_eq!(options.audio_format, None);
        assert_eq!(options.format_spec, "bestvideo[height<=?720]+bestaudio/best");
    }

    #[test]
    fn audio_options_request_mp3_at_192() {
        let request = DownloadRequest::new("https://example.com/a", MediaKind::Audio);
        let options = DownloadOptions::for_request(&request, Path::new("/tmp/out"));

        assert!(options.extract_audio);
        assert_eq!(options.audio_format, Some("mp3"));
        assert_eq!(options.audio_quality, Some("192"));
        assert_eq!(options.format_spec, "bestaudio/best");
    }

    #[test]
    fn options_are_deterministic() {
        let request =
            DownloadRequest::new("https://example.com/v", MediaKind::Video).with_quality("1080p");
        let dir = Path::new("/tmp/out");

        assert_eq!(
            DownloadOptions::for_request(&request, dir),
            DownloadOptions::for_request(&request, dir)
        );
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = DownloadEvent::Finished { success: true };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "finished");
        assert_eq!(json["success"], true);
    }
}
