use crate::error::LibraryError;

use super::model::Track;

/// Something that can enumerate the music available to the player.
///
/// A call returns one batch; the order of the batch becomes the playlist
/// order. An empty batch is a valid answer.
pub trait LibrarySource: Send + Sync {
    fn load(&self) -> Result<Vec<Track>, LibraryError>;
}

/// A fixed batch of tracks.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticLibrary {
    tracks: Vec<Track>,
}

#[cfg(test)]
impl StaticLibrary {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }
}

#[cfg(test)]
impl LibrarySource for StaticLibrary {
    fn load(&self) -> Result<Vec<Track>, LibraryError> {
        Ok(self.tracks.clone())
    }
}
