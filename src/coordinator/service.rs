//! Runs a [`Coordinator`] on its own thread.
//!
//! The thread multiplexes user intents, engine events, library results and
//! the position ticker, so every snapshot write happens in one place.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, never, select, tick, unbounded};
use tracing::{debug, info, warn};

use crate::config::PlaybackSettings;
use crate::engine::PlaybackEngine;
use crate::library::{LibrarySource, Track};

use super::reconciler::{Coordinator, read_library};
use super::snapshot::{PlaybackSnapshot, SnapshotHandle};

#[derive(Debug)]
pub enum Intent {
    LibraryLoaded(Vec<Track>),
    PlayTrack(Track),
    TogglePlayPause,
    SkipNext,
    SkipPrevious,
    Seek(u64),
    Dispose,
}

pub struct CoordinatorService;

impl CoordinatorService {
    /// Move `engine` into a fresh coordinator thread and return its handle.
    pub fn spawn<E>(
        engine: E,
        library: Arc<dyn LibrarySource>,
        settings: &PlaybackSettings,
    ) -> CoordinatorHandle
    where
        E: PlaybackEngine + 'static,
    {
        let coordinator = Coordinator::new(engine);
        let snapshot = coordinator.snapshot_handle();
        let (tx, rx) = unbounded::<Intent>();
        let poll = Duration::from_millis(settings.poll_interval_ms.max(1));

        let join = thread::spawn(move || run(coordinator, rx, poll));

        CoordinatorHandle {
            tx,
            snapshot,
            library,
            join: Mutex::new(Some(join)),
        }
    }
}

fn run<E: PlaybackEngine>(
    mut coordinator: Coordinator<E>,
    intents: Receiver<Intent>,
    poll: Duration,
) {
    let events = coordinator.events().unwrap_or_else(never);
    let ticker = tick(poll);
    info!(poll_ms = poll.as_millis() as u64, "coordinator started");

    loop {
        select! {
            recv(intents) -> msg => match msg {
                Ok(Intent::Dispose) | Err(_) => break,
                Ok(intent) => apply(&mut coordinator, intent),
            },
            recv(events) -> event => match event {
                Ok(event) => coordinator.handle_event(event),
                Err(_) => {
                    warn!("engine event channel closed");
                    break;
                }
            },
            recv(ticker) -> _ => coordinator.poll_position(),
        }
    }

    coordinator.dispose();
    info!("coordinator stopped");
}

fn apply<E: PlaybackEngine>(coordinator: &mut Coordinator<E>, intent: Intent) {
    debug!(?intent, "intent");
    match intent {
        Intent::LibraryLoaded(tracks) => coordinator.apply_library(tracks),
        Intent::PlayTrack(track) => coordinator.play_track(&track),
        Intent::TogglePlayPause => coordinator.toggle_play_pause(),
        Intent::SkipNext => coordinator.skip_next(),
        Intent::SkipPrevious => coordinator.skip_previous(),
        Intent::Seek(ms) => coordinator.seek(ms),
        Intent::Dispose => {}
    }
}

/// Cheap front door to a running coordinator thread.
///
/// Intents are queued and applied in order. Reads go through the shared
/// snapshot and never wait on the engine.
pub struct CoordinatorHandle {
    tx: Sender<Intent>,
    snapshot: SnapshotHandle,
    library: Arc<dyn LibrarySource>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl CoordinatorHandle {
    fn send(&self, intent: Intent) {
        if let Err(e) = self.tx.send(intent) {
            debug!("coordinator is gone, dropping {:?}", e.into_inner());
        }
    }

    /// Scan the library on a worker thread; the result replaces the playlist.
    pub fn load_library(&self) {
        let library = self.library.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let tracks = read_library(library.as_ref());
            if tx.send(Intent::LibraryLoaded(tracks)).is_err() {
                debug!("library loaded after dispose");
            }
        });
    }

    pub fn play_track(&self, track: Track) {
        self.send(Intent::PlayTrack(track));
    }

    pub fn toggle_play_pause(&self) {
        self.send(Intent::TogglePlayPause);
    }

    pub fn skip_next(&self) {
        self.send(Intent::SkipNext);
    }

    pub fn skip_previous(&self) {
        self.send(Intent::SkipPrevious);
    }

    pub fn seek(&self, position_ms: u64) {
        self.send(Intent::Seek(position_ms));
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    /// Stop the coordinator thread and release the engine. Idempotent.
    pub fn dispose(&self) {
        let join = match self.join.lock() {
            Ok(mut j) => j.take(),
            Err(e) => e.into_inner().take(),
        };
        if let Some(h) = join {
            self.send(Intent::Dispose);
            let _ = h.join();
        }
    }
}

impl Drop for CoordinatorHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}
