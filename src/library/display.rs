use crate::config::TrackLabelField;

use super::model::Track;

/// Build the list label for a track according to the provided `fields` and separator.
///
/// Empty fields are skipped; when nothing is left the title is used as-is.
pub fn label_from_fields(track: &Track, fields: &[TrackLabelField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackLabelField::Title => {
                let title = track.title.trim();
                if !title.is_empty() {
                    parts.push(title.to_string());
                }
            }
            TrackLabelField::Artist => {
                let artist = track.artist.trim();
                if !artist.is_empty() {
                    parts.push(artist.to_string());
                }
            }
            TrackLabelField::Filename => {
                if let Some(stem) = track.source.path().file_stem().and_then(|s| s.to_str()) {
                    if !stem.trim().is_empty() {
                        parts.push(stem.to_string());
                    }
                }
            }
            TrackLabelField::Path => {
                parts.push(track.source.path().display().to_string());
            }
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
