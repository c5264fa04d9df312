// Minimal command-line front-end: same orchestrator, no window.
//
// Usage: videoleech-cli <url> [quality]
//   quality: "720p", "1080p", ... or "audio" for mp3 extraction

use std::process::ExitCode;

use videoleech_lib::downloader::{DownloadEvent, DownloadRequest, Downloader, MediaKind};

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        eprintln!("usage: videoleech-cli <url> [quality|audio]");
        return ExitCode::FAILURE;
    };

    let request = match args.next() {
        Some(q) if q == "audio" => DownloadRequest::new(url, MediaKind::Audio),
        Some(q) => DownloadRequest::new(url, MediaKind::Video).with_quality(q),
        None => DownloadRequest::new(url, MediaKind::Video),
    };

    let downloader = Downloader::new();
    let mut rx = downloader.start(request);

    let mut success = false;
    while let Some(event) = rx.recv().await {
        println!("{}", event.status_line());
        if let DownloadEvent::Finished { success: ok } = event {
            success = ok;
        }
    }

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
