use std::sync::{Arc, Mutex};

use crate::library::Track;

use super::details::LOADING;

/// What the presentation layer renders. Always derived, never edited by readers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    /// The loaded library snapshot, in queue order.
    pub playlist: Arc<Vec<Track>>,
    pub current: Option<Track>,
    pub is_playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub technical_details: String,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            playlist: Arc::new(Vec::new()),
            current: None,
            is_playing: false,
            position_ms: 0,
            duration_ms: 0,
            technical_details: LOADING.to_string(),
        }
    }
}

impl PlaybackSnapshot {
    /// Index of the current track within the playlist.
    pub fn current_index(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.playlist.iter().position(|t| t == current)
    }

    /// Playback progress in `[0, 1]`; zero while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        (self.position_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }
}

/// Shared handle to the latest snapshot. The coordinator is its only writer.
pub type SnapshotHandle = Arc<Mutex<PlaybackSnapshot>>;
