//! Human-readable technical details for the active track.
//!
//! Output looks like `"MP3 / 44.1kHz / 16-bit"`. Missing pieces are left out;
//! with no format at all the file extension is used (`"FLAC / Ready"`), and
//! with no track at all the result is `"No Audio"`.

use crate::engine::{AudioFormat, PcmEncoding, TrackGroup, TrackKind};
use crate::library::Track;

pub const NO_AUDIO: &str = "No Audio";
pub const LOADING: &str = "Loading Format...";

/// Pick the format to describe: the first selected track of the first
/// selected audio group, else whatever `fallback` yields.
pub fn select_format(
    groups: &[TrackGroup],
    fallback: impl FnOnce() -> Option<AudioFormat>,
) -> Option<AudioFormat> {
    groups
        .iter()
        .filter(|g| g.kind == TrackKind::Audio && g.selected)
        .find_map(|g| g.selected_format().cloned())
        .or_else(fallback)
}

/// Short codec name derived from a MIME type.
pub fn codec_label(mime: Option<&str>) -> String {
    let mime = mime.unwrap_or("Unknown");
    let label = if mime.contains("mpeg") {
        "MP3"
    } else if mime.contains("flac") {
        "FLAC"
    } else if mime.contains("mp4") || mime.contains("aac") {
        "AAC"
    } else if mime.contains("raw") || mime.contains("wav") {
        "WAV"
    } else if mime.contains("vorbis") {
        "OGG"
    } else {
        mime.split_once('/').map_or(mime, |(_, subtype)| subtype)
    };
    label.to_uppercase()
}

/// `44100` → `"44.1kHz"`, `48000` → `"48kHz"`.
pub fn sample_rate_label(rate_hz: u32) -> String {
    if rate_hz % 1000 == 0 {
        format!("{}kHz", rate_hz / 1000)
    } else {
        format!("{}kHz", f64::from(rate_hz) / 1000.0)
    }
}

pub fn bit_depth_label(encoding: PcmEncoding) -> &'static str {
    match encoding {
        PcmEncoding::Pcm8 => "8-bit",
        PcmEncoding::Pcm16 => "16-bit",
        PcmEncoding::Pcm24 => "24-bit",
        PcmEncoding::Pcm32 => "32-bit",
        PcmEncoding::Float => "32-bit Float",
    }
}

/// Build the details string for `format`, falling back to `current`'s
/// file extension when there is no format.
pub fn describe(format: Option<&AudioFormat>, current: Option<&Track>) -> String {
    if let Some(format) = format {
        let mut parts = vec![codec_label(format.sample_mime_type.as_deref())];
        if let Some(rate) = format.sample_rate {
            parts.push(sample_rate_label(rate));
        }
        if let Some(encoding) = format.pcm_encoding {
            parts.push(bit_depth_label(encoding).to_string());
        }
        return parts.join(" / ");
    }

    match current {
        Some(track) => match track.source.extension() {
            Some(ext) => format!("{} / Ready", ext.to_uppercase()),
            None => "Unknown / Ready".to_string(),
        },
        None => NO_AUDIO.to_string(),
    }
}
