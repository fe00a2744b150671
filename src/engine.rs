//! Playback engine: the component that actually makes sound.
//!
//! The coordinator talks to an engine only through [`PlaybackEngine`]. The
//! engine owns an ordered queue of locators, exposes transport controls and
//! synchronous queries, and pushes [`EngineEvent`]s on a channel that the
//! coordinator subscribes to once.

mod cursor;
mod player;
mod probe;
mod shared;
mod sink;
mod thread;
mod types;

use crossbeam_channel::Receiver;

use crate::library::Locator;

pub use player::RodioEngine;
pub use types::*;

/// Transport surface of a playback engine.
///
/// Positions and durations are milliseconds. Every method is cheap and
/// non-blocking from the caller's point of view; audible effects and events
/// follow asynchronously.
pub trait PlaybackEngine: Send {
    /// Replace the queue. Playback stops and the engine becomes idle.
    fn set_queue(&mut self, queue: Vec<Locator>);
    /// Load the item under the cursor so that `play` can start immediately.
    fn prepare(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    /// Seek within the current item.
    fn seek_to(&mut self, position_ms: u64);
    /// Move the queue cursor to `index` and seek to `offset_ms` within it.
    fn seek_to_index(&mut self, index: usize, offset_ms: u64);
    fn has_next(&self) -> bool;
    fn seek_to_next(&mut self);
    fn has_previous(&self) -> bool;
    fn seek_to_previous(&mut self);
    fn current_position(&self) -> u64;
    fn current_index(&self) -> Option<usize>;
    /// Duration of the current item, `None` while unknown.
    fn duration(&self) -> Option<u64>;
    fn is_playing(&self) -> bool;
    /// Track groups of the current item, with their selection state.
    fn current_tracks(&self) -> Vec<TrackGroup>;
    /// Format of the audio currently fed to the output, if any.
    fn audio_format(&self) -> Option<AudioFormat>;
    /// Subscribe to engine events.
    fn events(&self) -> Receiver<EngineEvent>;
    /// Tear down the engine. Safe to call more than once.
    fn release(&mut self);
}

#[cfg(test)]
mod tests;
