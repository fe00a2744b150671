//! Track format probing via `lofty`.
//!
//! Produces the [`AudioFormat`] an engine reports for its selected audio
//! track. Only lossless containers get a PCM encoding; compressed formats
//! have no meaningful bit depth before decoding.

use std::path::Path;

use lofty::file::FileType;
use lofty::prelude::*;
use tracing::debug;

use super::types::{AudioFormat, PcmEncoding};

/// Result of probing one file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbedTrack {
    pub format: Option<AudioFormat>,
    pub duration_ms: Option<u64>,
}

/// MIME type a decoder would advertise for `file_type`.
pub fn mime_for(file_type: &FileType) -> String {
    match file_type {
        FileType::Mpeg => "audio/mpeg".to_string(),
        FileType::Flac => "audio/flac".to_string(),
        FileType::Mp4 | FileType::Aac => "audio/mp4a-latm".to_string(),
        FileType::Wav | FileType::Aiff => "audio/raw".to_string(),
        FileType::Vorbis => "audio/vorbis".to_string(),
        FileType::Opus => "audio/opus".to_string(),
        other => {
            let name = format!("{other:?}");
            let name = name.split('(').next().unwrap_or_default();
            format!("audio/x-{}", name.to_ascii_lowercase())
        }
    }
}

fn is_lossless(file_type: &FileType) -> bool {
    matches!(
        file_type,
        FileType::Flac | FileType::Wav | FileType::Aiff | FileType::WavPack | FileType::Ape
    )
}

/// Read container-level format information for `path`.
///
/// Unreadable or unrecognised files yield an empty probe rather than an error.
pub fn probe(path: &Path) -> ProbedTrack {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), "format probe failed: {e}");
            return ProbedTrack::default();
        }
    };

    let file_type = tagged.file_type();
    let props = tagged.properties();
    let pcm_encoding = if is_lossless(&file_type) {
        props.bit_depth().and_then(PcmEncoding::from_bit_depth)
    } else {
        None
    };

    ProbedTrack {
        format: Some(AudioFormat {
            sample_mime_type: Some(mime_for(&file_type)),
            sample_rate: props.sample_rate(),
            pcm_encoding,
        }),
        duration_ms: Some(props.duration().as_millis() as u64),
    }
}
