use std::sync::{Arc, MutexGuard};

use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use crate::engine::{EngineEvent, EngineState, PlaybackEngine};
use crate::library::{LibrarySource, Track};

use super::details::{describe, select_format};
use super::snapshot::{PlaybackSnapshot, SnapshotHandle};

/// Read one batch from `source`. A failing source is logged and treated
/// like an empty library.
pub fn read_library(source: &dyn LibrarySource) -> Vec<Track> {
    source.load().unwrap_or_else(|e| {
        warn!("library load failed: {e}");
        Vec::new()
    })
}

/// Reconciles a [`PlaybackEngine`] with the observable [`PlaybackSnapshot`].
///
/// Every method takes `&mut self`, so whoever owns the coordinator is the
/// single writer of the snapshot. After [`Coordinator::dispose`] every
/// operation is a no-op.
pub struct Coordinator<E: PlaybackEngine> {
    engine: Option<E>,
    snapshot: SnapshotHandle,
}

impl<E: PlaybackEngine> Coordinator<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Some(engine),
            snapshot: SnapshotHandle::default(),
        }
    }

    /// A handle readers can clone and lock to observe state.
    pub fn snapshot_handle(&self) -> SnapshotHandle {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.lock().clone()
    }

    /// Subscribe to the engine's events. `None` once disposed.
    pub fn events(&self) -> Option<Receiver<EngineEvent>> {
        self.engine.as_ref().map(|e| e.events())
    }

    pub fn is_disposed(&self) -> bool {
        self.engine.is_none()
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackSnapshot> {
        self.snapshot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the playlist with `tracks` and prepare the first one, paused.
    ///
    /// An empty batch clears the playlist and the engine queue, leaves the
    /// engine idle and resets duration and details.
    pub fn apply_library(&mut self, tracks: Vec<Track>) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        let playlist = Arc::new(tracks);
        engine.set_queue(playlist.iter().map(|t| t.source.clone()).collect());
        let first = playlist.first().cloned();
        if first.is_some() {
            engine.prepare();
        }
        info!(tracks = playlist.len(), "playlist replaced");

        let mut snap = self.lock();
        snap.playlist = playlist;
        if first.is_none() {
            snap.duration_ms = 0;
            snap.technical_details = describe(None, None);
        }
        snap.current = first;
        snap.position_ms = 0;
    }

    /// Jump to `track` and start playing it.
    ///
    /// A track that is not part of the playlist is ignored.
    pub fn play_track(&mut self, track: &Track) {
        let index = self.lock().playlist.iter().position(|t| t == track);
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let Some(index) = index else {
            debug!(id = track.id, "play request for a track outside the playlist");
            return;
        };

        engine.seek_to_index(index, 0);
        engine.play();
        // Shown right away; the engine's transition event confirms it.
        self.lock().current = Some(track.clone());
    }

    pub fn toggle_play_pause(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if engine.is_playing() {
            engine.pause();
        } else {
            engine.play();
        }
    }

    /// Advance to the next queue item; nothing happens on the last one.
    pub fn skip_next(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if engine.has_next() {
            engine.seek_to_next();
        }
    }

    /// Go back one queue item, or restart the first one.
    pub fn skip_previous(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if engine.has_previous() {
            engine.seek_to_previous();
        } else {
            self.seek(0);
        }
    }

    /// Seek within the current item. The position is reflected immediately.
    pub fn seek(&mut self, position_ms: u64) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        engine.seek_to(position_ms);
        self.lock().position_ms = position_ms;
    }

    /// Fold one engine notification into the snapshot.
    pub fn handle_event(&mut self, event: EngineEvent) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };

        match event {
            EngineEvent::IsPlayingChanged(playing) => {
                self.lock().is_playing = playing;
            }
            EngineEvent::ItemTransitioned(index) => {
                let mut snap = self.lock();
                let track = snap.playlist.get(index).cloned();
                match track {
                    Some(track) => snap.current = Some(track),
                    None => debug!(index, "transition outside the playlist ignored"),
                }
            }
            EngineEvent::StateChanged(EngineState::Ready) => {
                let duration = engine.duration().unwrap_or(0);
                self.lock().duration_ms = duration;
            }
            EngineEvent::StateChanged(_) => {}
            EngineEvent::TracksChanged => {
                let format = select_format(&engine.current_tracks(), || engine.audio_format());
                let mut snap = self.lock();
                let details = describe(format.as_ref(), snap.current.as_ref());
                debug!(%details, "technical details refreshed");
                snap.technical_details = details;
            }
        }
    }

    /// Copy the engine position into the snapshot, but only while playing.
    pub fn poll_position(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        if engine.is_playing() {
            let position = engine.current_position();
            self.lock().position_ms = position;
        }
    }

    /// Release the engine. Returns whether this call did the release.
    pub fn dispose(&mut self) -> bool {
        match self.engine.take() {
            Some(mut engine) => {
                engine.release();
                info!("coordinator disposed");
                true
            }
            None => false,
        }
    }
}

impl<E: PlaybackEngine> Drop for Coordinator<E> {
    fn drop(&mut self) {
        self.dispose();
    }
}
