// Default download directory resolution
//
// Best-effort, per platform, and infallible: every filesystem or
// environment problem is absorbed into the fallback chain. The worst case
// answer is the home directory itself.
//
// Windows:  %USERPROFILE%\Downloads, then <home>/Downloads, <home>/Descargas
// Unix:     XDG_DOWNLOAD_DIR from ~/.config/user-dirs.dirs,
//           then <home>/Descargas, <home>/Downloads

use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the default download directory for the current user.
///
/// Returns the first candidate that already exists; otherwise creates
/// `<home>/Downloads` (parents included) and returns it; if even that
/// fails, returns the home directory. Idempotent under an unchanged
/// environment and filesystem.
pub fn resolve_default_directory() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    resolve_with_home(&home)
}

/// Resolution against an explicit home, so tests can drive it with a
/// temporary directory.
pub(crate) fn resolve_with_home(home: &Path) -> PathBuf {
    for candidate in candidates(home) {
        if candidate.is_dir() {
            return candidate;
        }
    }

    let downloads = home.join("Downloads");
    match fs::create_dir_all(&downloads) {
        Ok(()) => downloads,
        Err(e) => {
            eprintln!(
                "[Directories] Could not create {}: {} - falling back to home",
                downloads.display(),
                e
            );
            home.to_path_buf()
        }
    }
}

#[cfg(windows)]
fn candidates(home: &Path) -> Vec<PathBuf> {
    let mut list = Vec::new();
    if let Ok(profile) = std::env::var("USERPROFILE") {
        if !profile.is_empty() {
            list.push(PathBuf::from(profile).join("Downloads"));
        }
    }
    list.push(home.join("Downloads"));
    list.push(home.join("Descargas"));
    list
}

#[cfg(not(windows))]
fn candidates(home: &Path) -> Vec<PathBuf> {
    let mut list = Vec::new();
    if let Some(xdg) = xdg_download_dir(home) {
        list.push(xdg);
    }
    list.push(home.join("Descargas"));
    list.push(home.join("Downloads"));
    list
}

/// Read `~/.config/user-dirs.dirs` and extract XDG_DOWNLOAD_DIR, expanding
/// `$HOME` and a leading `~` to the real home path. Any read or parse
/// problem yields None.
#[cfg(not(windows))]
fn xdg_download_dir(home: &Path) -> Option<PathBuf> {
    let config = home.join(".config").join("user-dirs.dirs");
    let content = fs::read_to_string(config).ok()?;
    parse_user_dirs(&content, home)
}

#[cfg(not(windows))]
fn parse_user_dirs(content: &str, home: &Path) -> Option<PathBuf> {
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let Some(value) = line.strip_prefix("XDG_DOWNLOAD_DIR=") else {
            continue;
        };
        let value = value.trim_matches('"');

        let expanded = if let Some(rest) = value.strip_prefix("$HOME/") {
            home.join(rest)
        } else if let Some(rest) = value.strip_prefix("~/") {
            home.join(rest)
        } else if value == "$HOME" || value == "~" {
            home.to_path_buf()
        } else {
            PathBuf::from(value)
        };
        return Some(expanded);
    }
    None
}
