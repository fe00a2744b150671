use crate::coordinator::PlaybackSnapshot;
use crate::library::Track;
use crate::mpris::MprisHandle;

/// Publishes snapshots to MPRIS, skipping the ones that only moved the
/// position.
#[derive(Debug, Default)]
pub struct MprisSync {
    last: Option<(Option<Track>, bool, u64)>,
}

impl MprisSync {
    /// Push `snapshot` to `mpris` if it differs from the last one sent.
    /// Returns whether anything was published.
    pub fn update(&mut self, mpris: &MprisHandle, snapshot: &PlaybackSnapshot) -> bool {
        let key = (
            snapshot.current.clone(),
            snapshot.is_playing,
            snapshot.duration_ms,
        );
        if self.last.as_ref() == Some(&key) {
            return false;
        }
        mpris.set_from_snapshot(snapshot);
        self.last = Some(key);
        true
    }
}
