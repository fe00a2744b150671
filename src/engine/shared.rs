//! State shared between the engine handle and its audio thread.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use tracing::trace;

use crate::library::Locator;

use super::cursor::QueueCursor;
use super::probe::{ProbedTrack, probe};
use super::types::{AudioFormat, EngineEvent, EngineState};

/// Everything the synchronous queries of the engine read.
#[derive(Debug, Default)]
pub(super) struct EngineStatus {
    pub cursor: QueueCursor,
    pub state: EngineState,
    pub playing: bool,
    /// Position at the last pause/seek.
    pub position_base: Duration,
    /// Set while playing; position advances from here.
    pub resumed_at: Option<Instant>,
    pub duration_ms: Option<u64>,
    pub format: Option<AudioFormat>,
    /// Sample rate of the decoder feeding the output.
    pub output_rate: Option<u32>,
    /// Bumped on every load so the audio thread can ignore stale sinks.
    pub generation: u64,
    /// The audio thread could not open or decode the current item.
    pub sink_missing: bool,
    pub released: bool,
}

impl EngineStatus {
    pub fn position(&self) -> Duration {
        let pos = self.position_base + self.resumed_at.map_or(Duration::ZERO, |t| t.elapsed());
        match self.duration_ms {
            Some(d) => pos.min(Duration::from_millis(d)),
            None => pos,
        }
    }

    /// Stop the position clock at its current value.
    pub fn freeze_position(&mut self) {
        self.position_base = self.position();
        self.resumed_at = None;
    }

    /// Point the status at the probed queue item, starting at `offset`.
    ///
    /// Returns the load the audio thread has to perform, or `None` when the
    /// item is no longer at that queue position.
    pub fn enter_item(&mut self, item: ProbedItem, offset: Duration) -> Option<LoadRequest> {
        if self.cursor.get(item.index) != Some(&item.locator) {
            return None;
        }
        self.cursor.jump(item.index);

        self.duration_ms = item.probed.duration_ms;
        self.format = item.probed.format;
        self.output_rate = None;
        self.sink_missing = false;
        self.position_base = offset;
        self.resumed_at = self.playing.then(Instant::now);
        self.state = EngineState::Ready;
        self.generation += 1;

        Some(LoadRequest {
            locator: item.locator,
            start_at: offset,
            play: self.playing,
            generation: self.generation,
        })
    }
}

/// A queue item together with what probing its file found.
#[derive(Debug, Clone)]
pub(super) struct ProbedItem {
    pub index: usize,
    pub locator: Locator,
    pub probed: ProbedTrack,
}

/// Instruction for the audio thread to build a new sink.
#[derive(Debug, Clone)]
pub(super) struct LoadRequest {
    pub locator: Locator,
    pub start_at: Duration,
    pub play: bool,
    pub generation: u64,
}

#[derive(Debug)]
pub(super) struct Shared {
    status: Mutex<EngineStatus>,
    events: Sender<EngineEvent>,
}

impl Shared {
    pub fn new(events: Sender<EngineEvent>) -> Self {
        Self {
            status: Mutex::new(EngineStatus::default()),
            events,
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, EngineStatus> {
        self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Probe queue item `index`. File I/O happens outside the status lock.
    pub fn probe_item(&self, index: usize) -> Option<ProbedItem> {
        let locator = self.lock().cursor.get(index)?.clone();
        let probed = probe(locator.path());
        Some(ProbedItem {
            index,
            locator,
            probed,
        })
    }

    /// Record that the sink for load `generation` could not be built.
    ///
    /// The item stays loaded without a sink: playback stops and `play` is
    /// refused until another item (or the same one again) is entered.
    pub fn load_failed(&self, generation: u64) {
        let mut status = self.lock();
        if status.generation != generation {
            return;
        }
        status.sink_missing = true;
        if status.playing {
            status.playing = false;
            status.freeze_position();
            self.emit(EngineEvent::IsPlayingChanged(false));
        }
    }

    pub fn emit(&self, event: EngineEvent) {
        if self.events.send(event).is_err() {
            trace!("engine event dropped, no subscriber");
        }
    }

    /// Announce a finished `enter_item`: the optional item transition, the
    /// buffering round-trip and the new track formats.
    pub fn emit_loaded(&self, transitioned_to: Option<usize>) {
        if let Some(index) = transitioned_to {
            self.emit(EngineEvent::ItemTransitioned(index));
        }
        self.emit(EngineEvent::StateChanged(EngineState::Buffering));
        self.emit(EngineEvent::StateChanged(EngineState::Ready));
        self.emit(EngineEvent::TracksChanged);
    }
}
