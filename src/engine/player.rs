use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, info, warn};

use crate::config::EngineSettings;
use crate::error::EngineError;
use crate::library::Locator;

use super::PlaybackEngine;
use super::shared::{LoadRequest, Shared};
use super::thread::{AudioCmd, spawn_audio_thread};
use super::types::{AudioFormat, EngineEvent, EngineState, PcmEncoding, TrackGroup};

/// [`PlaybackEngine`] backed by `rodio`.
///
/// Queue state is kept on the caller's side so queries answer immediately;
/// the audio thread only owns the output stream and the current sink.
pub struct RodioEngine {
    tx: Sender<AudioCmd>,
    shared: Arc<Shared>,
    events: Receiver<EngineEvent>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioEngine {
    /// Open the default output device and start the audio thread.
    pub fn new(settings: &EngineSettings) -> Result<Self, EngineError> {
        let (tx, rx) = unbounded::<AudioCmd>();
        let (events_tx, events_rx) = unbounded::<EngineEvent>();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
        let shared = Arc::new(Shared::new(events_tx));

        let join = spawn_audio_thread(
            shared.clone(),
            rx,
            Duration::from_millis(settings.end_check_ms.max(1)),
            ready_tx,
        );

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(EngineError::NoOutputDevice(
                    "audio thread exited during startup".to_string(),
                ));
            }
        }

        Ok(Self {
            tx,
            shared,
            events: events_rx,
            join: Mutex::new(Some(join)),
        })
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            warn!("audio thread is gone, dropping {:?}", e.into_inner());
        }
    }

    /// Load queue item `index` at `offset`, emitting what changed.
    fn enter(&mut self, index: usize, offset: Duration) {
        if self.shared.lock().released {
            return;
        }
        let Some(item) = self.shared.probe_item(index) else {
            debug!(index, "seek outside the queue ignored");
            return;
        };

        let (req, previous): (Option<LoadRequest>, Option<usize>) = {
            let mut status = self.shared.lock();
            if status.released {
                return;
            }
            let previous = status.cursor.index();
            (status.enter_item(item, offset), previous)
        };

        let Some(req) = req else {
            debug!(index, "queue changed while probing, load skipped");
            return;
        };

        self.shared
            .emit_loaded((previous != Some(index)).then_some(index));
        self.send(AudioCmd::Load(req));
    }
}

impl PlaybackEngine for RodioEngine {
    fn set_queue(&mut self, queue: Vec<Locator>) {
        let was_playing = {
            let mut status = self.shared.lock();
            if status.released {
                return;
            }
            let was_playing = status.playing;
            status.cursor.set_queue(queue);
            status.playing = false;
            status.position_base = Duration::ZERO;
            status.resumed_at = None;
            status.duration_ms = None;
            status.format = None;
            status.output_rate = None;
            status.state = EngineState::Idle;
            status.sink_missing = false;
            status.generation += 1;
            debug!(len = status.cursor.len(), "queue replaced");
            was_playing
        };

        self.send(AudioCmd::Stop);
        if was_playing {
            self.shared.emit(EngineEvent::IsPlayingChanged(false));
        }
        self.shared
            .emit(EngineEvent::StateChanged(EngineState::Idle));
    }

    fn prepare(&mut self) {
        let index = self.shared.lock().cursor.index();
        match index {
            Some(i) => self.enter(i, Duration::ZERO),
            None => debug!("prepare with an empty queue"),
        }
    }

    fn play(&mut self) {
        let mut status = self.shared.lock();
        if status.released || status.playing || status.state != EngineState::Ready {
            return;
        }
        if status.sink_missing {
            debug!("current item has no sink, play refused");
            return;
        }
        status.playing = true;
        status.resumed_at = Some(Instant::now());
        self.send(AudioCmd::Resume);
        self.shared.emit(EngineEvent::IsPlayingChanged(true));
    }

    fn pause(&mut self) {
        let mut status = self.shared.lock();
        if !status.playing {
            return;
        }
        status.freeze_position();
        status.playing = false;
        self.send(AudioCmd::Pause);
        self.shared.emit(EngineEvent::IsPlayingChanged(false));
    }

    fn seek_to(&mut self, position_ms: u64) {
        let index = self.shared.lock().cursor.index();
        if let Some(i) = index {
            self.enter(i, Duration::from_millis(position_ms));
        }
    }

    fn seek_to_index(&mut self, index: usize, offset_ms: u64) {
        self.enter(index, Duration::from_millis(offset_ms));
    }

    fn has_next(&self) -> bool {
        self.shared.lock().cursor.has_next()
    }

    fn seek_to_next(&mut self) {
        let next = {
            let status = self.shared.lock();
            status
                .cursor
                .has_next()
                .then(|| status.cursor.index().map_or(0, |i| i + 1))
        };
        if let Some(i) = next {
            self.enter(i, Duration::ZERO);
        }
    }

    fn has_previous(&self) -> bool {
        self.shared.lock().cursor.has_previous()
    }

    fn seek_to_previous(&mut self) {
        let prev = {
            let status = self.shared.lock();
            status
                .cursor
                .has_previous()
                .then(|| status.cursor.index().map_or(0, |i| i - 1))
        };
        if let Some(i) = prev {
            self.enter(i, Duration::ZERO);
        }
    }

    fn current_position(&self) -> u64 {
        self.shared.lock().position().as_millis() as u64
    }

    fn current_index(&self) -> Option<usize> {
        self.shared.lock().cursor.index()
    }

    fn duration(&self) -> Option<u64> {
        self.shared.lock().duration_ms
    }

    fn is_playing(&self) -> bool {
        self.shared.lock().playing
    }

    fn current_tracks(&self) -> Vec<TrackGroup> {
        self.shared
            .lock()
            .format
            .clone()
            .map(TrackGroup::single_audio)
            .into_iter()
            .collect()
    }

    fn audio_format(&self) -> Option<AudioFormat> {
        // rodio hands the mixer f32 samples whatever the source was.
        self.shared.lock().output_rate.map(|rate| AudioFormat {
            sample_mime_type: None,
            sample_rate: Some(rate),
            pcm_encoding: Some(PcmEncoding::Float),
        })
    }

    fn events(&self) -> Receiver<EngineEvent> {
        self.events.clone()
    }

    fn release(&mut self) {
        {
            let mut status = self.shared.lock();
            if status.released {
                return;
            }
            status.released = true;
            status.freeze_position();
            status.playing = false;
        }

        self.send(AudioCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
        info!("engine released");
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.release();
    }
}
