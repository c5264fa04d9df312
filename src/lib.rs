pub mod downloader;
mod settings;

use tauri::{Emitter, Manager, State};

use downloader::tools::{ToolInfo, ToolManager};
use downloader::{DownloadRequest, Downloader};
use settings::UiSettings;

/// Submit one download. Returns as soon as the worker is spawned; progress
/// and the terminal result arrive as `download-event` app events.
#[tauri::command]
async fn start_download(
    request: DownloadRequest,
    downloader: State<'_, Downloader>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    let mut rx = downloader.start(request);

    tauri::async_runtime::spawn(async move {
        while let Some(event) = rx.recv().await {
            let done = event.is_terminal();
            // Best-effort: a closed window must not fail the worker
            let _ = app_handle.emit("download-event", &event);
            if done {
                break;
            }
        }
    });

    Ok(())
}

/// Default download directory, for pre-filling the destination field.
#[tauri::command]
fn default_download_dir() -> String {
    downloader::directories::resolve_default_directory()
        .to_string_lossy()
        .to_string()
}

/// Availability and versions of yt-dlp and ffmpeg for UI warnings.
#[tauri::command]
async fn get_tools_status() -> Result<Vec<ToolInfo>, String> {
    Ok(ToolManager::new().get_all_tools())
}

#[tauri::command]
fn get_ui_settings() -> UiSettings {
    settings::load()
}

#[tauri::command]
fn set_ui_settings(new_settings: UiSettings) -> Result<(), String> {
    settings::save(&new_settings)
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            app.manage(Downloader::new());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            start_download,
            default_download_dir,
            get_tools_status,
            get_ui_settings,
            set_ui_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
