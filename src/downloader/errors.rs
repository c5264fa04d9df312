// Error types for the downloader

use std::fmt;

#[derive(Debug, Clone)]
pub enum DownloadError {
    /// Request rejected before touching the engine (empty URL).
    InvalidRequest(String),

    /// Engine rejected the URL (unsupported site, malformed link).
    InvalidUrl(String),

    /// yt-dlp or ffmpeg not found on the system.
    ToolNotFound(String),

    /// Network timeout while the engine was transferring.
    NetworkTimeout,

    /// Engine process failed to start or exited with an error.
    ExecutionError(String),

    /// Unknown engine failure with details.
    Unknown(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            Self::ToolNotFound(tool) => write!(f, "Tool not found: {}", tool),
            Self::NetworkTimeout => write!(f, "Network timeout: the server is not responding"),
            Self::ExecutionError(msg) => write!(f, "Execution error: {}", msg),
            Self::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for DownloadError {}

// Classify raw engine stderr into an error variant. yt-dlp does not give
// structured errors over the CLI boundary, so this stays string matching.
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        if s.contains("timeout") || s.contains("timed out") {
            return Self::NetworkTimeout;
        }

        // ffmpeg missing shows up as a postprocessor error, not a spawn error
        if s.contains("ffprobe and ffmpeg not found")
            || s.contains("ffmpeg not found")
            || s.contains("ffmpeg is not installed")
        {
            return Self::ToolNotFound(format!("ffmpeg (required for audio extraction): {}", s));
        }

        if s.contains("not found") || s.contains("No such file") || s.contains("command not found")
        {
            return Self::ToolNotFound(s);
        }

        if s.contains("Unsupported URL") || s.contains("is not a valid URL") {
            return Self::InvalidUrl(s);
        }

        Self::Unknown(s)
    }
}
