// FormatSelector - maps the UI quality tier onto a yt-dlp format expression
//
// The UI offers approximate tiers ("1080p", "720p", "Maximum Quality") plus
// an audio-only mode. Anything we cannot interpret degrades silently to
// "best"; selection never fails.

use std::path::Path;

use super::models::MediaKind;

/// Quality value meaning "no height ceiling".
pub const MAX_QUALITY: &str = "Maximum Quality";

/// Build the yt-dlp `-f` expression for a request.
///
/// Video with a `<N>p` hint constrains to the best stream at or below that
/// height, merged with the best audio. The sentinel, a missing hint, or an
/// unparsable hint all mean plain `best`. Audio always selects the best
/// audio-only stream (the mp3 transcode is a postprocessor concern, not a
/// selection concern).
pub fn format_spec_for(kind: MediaKind, quality: Option<&str>) -> String {
    match kind {
        MediaKind::Audio => "bestaudio/best".to_string(),
        MediaKind::Video => match quality {
            Some(q) if !q.eq_ignore_ascii_case(MAX_QUALITY) => match parse_height(q) {
                Some(height) => format!("bestvideo[height<=?{}]+bestaudio/best", height),
                None => "best".to_string(),
            },
            _ => "best".to_string(),
        },
    }
}

/// Output template interpolating source title and extension, rooted at the
/// destination directory.
pub fn output_template(directory: &Path) -> String {
    directory.join("%(title)s.%(ext)s").to_string_lossy().to_string()
}

/// Parse "720p" -> 720. Returns None for anything that is not a plain
/// number followed by an optional trailing 'p'.
fn parse_height(quality: &str) -> Option<u32> {
    let digits = quality
        .trim()
        .trim_end_matches(['p', 'P']);
    digits.parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_hint_constrains_height() {
        let spec = format_spec_for(MediaKind::Video, Some("720p"));
        assert_eq!(spec, "bestvideo[height<=?720]+bestaudio/best");

        let spec = format_spec_for(MediaKind::Video, Some("1080p"));
        assert_eq!(spec, "bestvideo[height<=?1080]+bestaudio/best");
    }

    #[test]
    fn max_quality_sentinel_is_unconstrained() {
        assert_eq!(format_spec_for(MediaKind::Video, Some(MAX_QUALITY)), "best");
        assert_eq!(format_spec_for(MediaKind::Video, Some("maximum quality")), "best");
        assert_eq!(format_spec_for(MediaKind::Video, None), "best");
    }

    #[test]
    fn unparsable_hint_degrades_to_best() {
        assert_eq!(format_spec_for(MediaKind::Video, Some("notanumberp")), "best");
        assert_eq!(format_spec_for(MediaKind::Video, Some("")), "best");
        assert_eq!(format_spec_for(MediaKind::Video, Some("p")), "best");
    }

    #[test]
    fn audio_ignores_quality_hint() {
        assert_eq!(format_spec_for(MediaKind::Audio, Some("720p")), "bestaudio/best");
        assert_eq!(format_spec_for(MediaKind::Audio, None), "bestaudio/best");
    }

    #[test]
    fn template_roots_at_directory() {
        let template = output_template(Path::new("/tmp/out"));
        assert_eq!(template, "/tmp/out/%(title)s.%(ext)s");
    }
}
