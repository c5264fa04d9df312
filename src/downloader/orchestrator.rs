// Download orchestrator
//
// One worker task per request. The caller gets a bounded receiver and
// never blocks on the engine: submit, then drain events until the terminal
// `Finished` arrives. There is no retry, no cancellation and no timeout of
// our own; dropping the receiver abandons the request abruptly.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::directories;
use super::engine::{ExtractionEngine, YtDlpEngine};
use super::errors::DownloadError;
use super::models::{DownloadEvent, DownloadOptions, DownloadRequest};

/// Events buffered per in-flight request before the sender waits for the
/// consumer to catch up.
const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct Downloader {
    engine: Arc<dyn ExtractionEngine>,
}

impl Downloader {
    pub fn new() -> Self {
        Self::with_engine(Arc::new(YtDlpEngine::new()))
    }

    pub fn with_engine(engine: Arc<dyn ExtractionEngine>) -> Self {
        Self { engine }
    }

    /// Submit one request. Returns immediately with the event stream for
    /// that request; events arrive in generation order and the stream ends
    /// with exactly one `Finished`.
    pub fn start(&self, request: DownloadRequest) -> mpsc::Receiver<DownloadEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        // Reject empty URLs without touching the engine
        if request.url.trim().is_empty() {
            tokio::spawn(async move {
                let error = DownloadError::InvalidRequest("no URL given".to_string());
                let _ = tx
                    .send(DownloadEvent::Error {
                        message: error.to_string(),
                    })
                    .await;
                let _ = tx.send(DownloadEvent::Finished { success: false }).await;
            });
            return rx;
        }

        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            run_one(engine, request, tx).await;
        });

        rx
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_one(
    engine: Arc<dyn ExtractionEngine>,
    request: DownloadRequest,
    tx: mpsc::Sender<DownloadEvent>,
) {
    let directory = match &request.directory {
        Some(dir) => dir.clone(),
        None => directories::resolve_default_directory(),
    };
    let options = DownloadOptions::for_request(&request, &directory);

    eprintln!(
        "[Downloader] {} -> {} via {}",
        request.url,
        directory.display(),
        engine.name()
    );

    // Ticks flow through their own channel and a relay task so the event
    // stream stays ordered: the relay is joined before the terminal event.
    let (tick_tx, mut tick_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let event_tx = tx.clone();
    let relay = tokio::spawn(async move {
        while let Some(tick) = tick_rx.recv().await {
            let _ = event_tx.send(DownloadEvent::from(tick)).await;
        }
    });

    let result = engine.download(&request.url, &options, tick_tx).await;
    let _ = relay.await;

    // Terminal notification is fire-and-forget: the receiver may already
    // be gone, and that must not fail the worker.
    match result {
        Ok(()) => {
            let _ = tx.send(DownloadEvent::Finished { success: true }).await;
        }
        Err(e) => {
            eprintln!("[Downloader] {} failed: {}", engine.name(), e);
            let _ = tx
                .send(DownloadEvent::Error {
                    message: e.to_string(),
                })
                .await;
            let _ = tx.send(DownloadEvent::Finished { success: false }).await;
        }
    }
}
