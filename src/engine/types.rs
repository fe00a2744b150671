//! Engine-facing value types: events, states and track formats.

/// Coarse lifecycle state reported by an engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Nothing prepared.
    #[default]
    Idle,
    /// Loading the current item.
    Buffering,
    /// The current item is loaded and can play immediately.
    Ready,
    /// Playback ran off the end of the queue.
    Ended,
}

/// Asynchronous notifications pushed by an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine started or stopped producing audio.
    IsPlayingChanged(bool),
    /// The queue cursor moved to another item (auto-advance or explicit jump).
    ItemTransitioned(usize),
    /// The engine lifecycle state changed.
    StateChanged(EngineState),
    /// The set of selected tracks (and therefore their formats) changed.
    TracksChanged,
}

/// Sample layout of decoded PCM audio.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PcmEncoding {
    Pcm8,
    Pcm16,
    Pcm24,
    Pcm32,
    Float,
}

impl PcmEncoding {
    /// Map an integer bit depth to an encoding.
    pub fn from_bit_depth(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(Self::Pcm8),
            16 => Some(Self::Pcm16),
            24 => Some(Self::Pcm24),
            32 => Some(Self::Pcm32),
            _ => None,
        }
    }
}

/// What an engine knows about the format of a track. Every field may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioFormat {
    pub sample_mime_type: Option<String>,
    pub sample_rate: Option<u32>,
    pub pcm_encoding: Option<PcmEncoding>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    /// Video, text, metadata and anything else that is not sound.
    Other,
}

/// One track inside a [`TrackGroup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFormat {
    pub format: AudioFormat,
    pub selected: bool,
}

/// A group of alternative tracks of one kind, as exposed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackGroup {
    pub kind: TrackKind,
    pub selected: bool,
    pub tracks: Vec<TrackFormat>,
}

impl TrackGroup {
    /// A selected audio group holding a single selected track.
    pub fn single_audio(format: AudioFormat) -> Self {
        Self {
            kind: TrackKind::Audio,
            selected: true,
            tracks: vec![TrackFormat {
                format,
                selected: true,
            }],
        }
    }

    /// Format of the first selected track in this group.
    pub fn selected_format(&self) -> Option<&AudioFormat> {
        self.tracks.iter().find(|t| t.selected).map(|t| &t.format)
    }
}
