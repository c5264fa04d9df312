// Downloader module - request lifecycle, directory resolution, engine boundary

pub mod directories;
pub mod engine;
pub mod errors;
pub mod format_selector;
pub mod models;
pub mod orchestrator;
pub mod tools;

pub use engine::{ExtractionEngine, YtDlpEngine};
pub use errors::DownloadError;
pub use models::{DownloadEvent, DownloadOptions, DownloadRequest, MediaKind, ProgressTick};
pub use orchestrator::Downloader;
