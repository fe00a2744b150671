//! Playback coordination: the bridge between the engine and what the user
//! sees.
//!
//! [`Coordinator`] holds the logic and [`CoordinatorService`] runs it on a
//! dedicated thread; the UI reads [`PlaybackSnapshot`]s and sends intents
//! through a [`CoordinatorHandle`].

mod details;
mod reconciler;
mod service;
mod snapshot;

pub use service::{CoordinatorHandle, CoordinatorService};
pub use snapshot::PlaybackSnapshot;
