use std::path::{Path, PathBuf};

/// Where a piece of media lives.
///
/// Treated as opaque by the playback core; only the engine opens it and only
/// the technical-details fallback peeks at its extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(PathBuf);

impl Locator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File extension of the locator, if it has a non-empty one.
    pub fn extension(&self) -> Option<&str> {
        self.0
            .extension()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
    }

    /// `file://` URI form, used when publishing metadata over MPRIS.
    pub fn to_uri(&self) -> String {
        format!("file://{}", self.0.display())
    }
}

impl From<&str> for Locator {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A single entry of a library snapshot. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Stable within one library snapshot only.
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub source: Locator,
    pub artwork: Option<Locator>,
    pub duration_ms: u64,
}
