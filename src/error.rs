//! Error types shared across the player.
//!
//! Most runtime conditions in the playback core are not errors
//! (a stale track or a missing format leaves state alone). What
//! remains here are the I/O-bound failures at the edges.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while enumerating the music library.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// The library root does not exist or cannot be listed.
    #[error("library root {path:?} is not readable: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures inside the playback engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No audio output device could be opened.
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    /// A queued source could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A queued source could not be decoded.
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

/// Settings that loaded but make no sense.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0} must be >= 1")]
    ZeroInterval(&'static str),
    #[error("library.extensions must name at least one extension")]
    NoExtensions,
}
