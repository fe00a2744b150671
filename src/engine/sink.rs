//! Utilities for creating `rodio` sinks from queue items.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::EngineError;

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Also returns the decoder's sample rate.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, u32), EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let rate: u32 = decoder.sample_rate().into();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, rate))
}
