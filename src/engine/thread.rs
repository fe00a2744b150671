//! The audio thread: owns the output stream and the current sink.
//!
//! Queue bookkeeping lives in [`EngineStatus`]; this thread only turns
//! [`AudioCmd`]s into sink operations and notices when the current item has
//! drained so it can auto-advance.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info};

use crate::error::EngineError;

use super::shared::{LoadRequest, Shared};
use super::sink::create_sink_at;
use super::types::{EngineEvent, EngineState};

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace the current sink with a new one.
    Load(LoadRequest),
    /// Resume the current sink.
    Resume,
    /// Pause the current sink.
    Pause,
    /// Drop the current sink.
    Stop,
    /// Stop everything and exit the thread.
    Quit,
}

struct Current {
    sink: Sink,
    generation: u64,
}

pub(super) fn spawn_audio_thread(
    shared: Arc<Shared>,
    rx: Receiver<AudioCmd>,
    end_check: Duration,
    ready: Sender<Result<(), EngineError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let _ = ready.send(Err(EngineError::NoOutputDevice(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the TUI.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));
        info!("audio thread started");

        let mut current: Option<Current> = None;

        loop {
            match rx.recv_timeout(end_check) {
                Ok(AudioCmd::Load(req)) => {
                    if let Some(old) = current.take() {
                        old.sink.stop();
                    }
                    current = load(&stream, &shared, req);
                }
                Ok(AudioCmd::Resume) => {
                    if let Some(c) = current.as_ref() {
                        c.sink.play();
                    }
                }
                Ok(AudioCmd::Pause) => {
                    if let Some(c) = current.as_ref() {
                        c.sink.pause();
                    }
                }
                Ok(AudioCmd::Stop) => {
                    if let Some(old) = current.take() {
                        old.sink.stop();
                    }
                }
                Ok(AudioCmd::Quit) | Err(RecvTimeoutError::Disconnected) => {
                    if let Some(old) = current.take() {
                        old.sink.stop();
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    let drained = current.as_ref().is_some_and(|c| c.sink.empty());
                    if drained {
                        let finished = current.take().map_or(0, |c| c.generation);
                        if let Some(req) = advance_after(&shared, finished) {
                            current = load(&stream, &shared, req);
                        }
                    }
                }
            }
        }

        info!("audio thread stopped");
    })
}

/// Build the sink for `req` and record the outcome in the shared status.
fn load(stream: &OutputStream, shared: &Shared, req: LoadRequest) -> Option<Current> {
    match create_sink_at(stream, req.locator.path(), req.start_at) {
        Ok((sink, rate)) => {
            if req.play {
                sink.play();
            }
            let mut status = shared.lock();
            if status.generation == req.generation {
                status.output_rate = Some(rate);
            }
            debug!(path = %req.locator.path().display(), rate, "sink loaded");
            Some(Current {
                sink,
                generation: req.generation,
            })
        }
        Err(e) => {
            error!("{e}");
            shared.load_failed(req.generation);
            None
        }
    }
}

/// Handle the end of the item loaded under `finished`.
///
/// Moves to the next queue item if there is one, otherwise stops at the end
/// of the queue. Returns the next load, if any.
pub(super) fn advance_after(shared: &Shared, finished: u64) -> Option<LoadRequest> {
    let next = {
        let mut status = shared.lock();
        // A newer load is already on its way; this drain belongs to a stale sink.
        if status.generation != finished || !status.playing {
            return None;
        }
        if !status.cursor.has_next() {
            status.freeze_position();
            status.playing = false;
            status.state = EngineState::Ended;
            debug!("end of queue");
            shared.emit(EngineEvent::IsPlayingChanged(false));
            shared.emit(EngineEvent::StateChanged(EngineState::Ended));
            return None;
        }
        status.cursor.index().map_or(0, |i| i + 1)
    };

    let item = shared.probe_item(next)?;
    let mut status = shared.lock();
    if status.generation != finished || !status.playing {
        return None;
    }
    let req = status.enter_item(item, Duration::ZERO)?;
    debug!(index = next, "auto-advance");
    shared.emit_loaded(Some(next));
    Some(req)
}
