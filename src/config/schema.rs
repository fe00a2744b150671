use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tapedeck/config.toml` or `~/.config/tapedeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TAPEDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub engine: EngineSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How often the coordinator copies the engine position while playing (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// How often the audio thread checks whether the current item drained (milliseconds).
    pub end_check_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self { end_check_ms: 200 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Redraw/input poll period of the terminal loop (milliseconds).
    pub frame_ms: u64,
    /// Switch to the now-playing screen after starting a track from the library.
    pub open_now_playing: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ side A ~ ".to_string(),
            frame_ms: 50,
            open_now_playing: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `TAPEDECK_LOG` is not set.
    pub level: String,
    /// Log file; defaults to `$XDG_STATE_HOME/tapedeck/tapedeck.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackLabelField {
    Title,
    Artist,
    Filename,
    Path,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Library root; the first CLI argument wins over this.
    pub root: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,

    /// Which fields build the list label, which is also the playlist order.
    ///
    /// Example: ["artist", "title"] -> "Artist - Title"
    pub list_fields: Vec<TrackLabelField>,
    /// Separator used to join `list_fields`.
    pub list_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            list_fields: vec![TrackLabelField::Artist, TrackLabelField::Title],
            list_separator: " - ".to_string(),
        }
    }
}
