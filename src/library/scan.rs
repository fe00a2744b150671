use std::fs;
use std::path::{Path, PathBuf};

use lofty::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::LibraryError;

use super::display::label_from_fields;
use super::model::{Locator, Track};
use super::source::LibrarySource;

/// Artist used when a file carries no artist tag.
pub const UNKNOWN_ARTIST: &str = "<unknown>";

/// Sidecar image names probed for artwork, in priority order.
const ARTWORK_NAMES: [&str; 5] = ["cover.jpg", "cover.png", "folder.jpg", "folder.png", "front.jpg"];

/// Library source backed by a directory tree on disk.
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    root: PathBuf,
    settings: LibrarySettings,
}

impl DirectoryLibrary {
    pub fn new(root: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }
}

impl LibrarySource for DirectoryLibrary {
    fn load(&self) -> Result<Vec<Track>, LibraryError> {
        scan(&self.root, &self.settings)
    }
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Find a sidecar cover image next to `track_path`.
fn find_artwork(track_path: &Path) -> Option<Locator> {
    let dir = track_path.parent()?;
    let entries = fs::read_dir(dir).ok()?;
    let names: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();

    ARTWORK_NAMES.iter().find_map(|wanted| {
        names
            .iter()
            .find(|p| {
                p.file_name()
                    .and_then(|s| s.to_str())
                    .is_some_and(|n| n.eq_ignore_ascii_case(wanted))
            })
            .map(|p| Locator::new(p.clone()))
    })
}

struct Tags {
    title: Option<String>,
    artist: Option<String>,
    duration_ms: u64,
}

fn read_tags(path: &Path) -> Tags {
    let mut tags = Tags {
        title: None,
        artist: None,
        duration_ms: 0,
    };

    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), "no readable tags: {e}");
            return tags;
        }
    };

    tags.duration_ms = tagged.properties().duration().as_millis() as u64;

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        tags.title = tag
            .title()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        tags.artist = tag
            .artist()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
    }

    tags
}

/// Walk `dir` and build a library snapshot.
///
/// Tracks come back sorted by list label (case-insensitive) with ids
/// assigned in that order.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, LibraryError> {
    fs::read_dir(dir).map_err(|source| LibraryError::RootUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut labelled: Vec<(String, Track)> = Vec::new();

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let tags = read_tags(path);
        let title = tags.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string()
        });

        let track = Track {
            id: 0,
            title,
            artist: tags.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            source: Locator::new(path),
            artwork: find_artwork(path),
            duration_ms: tags.duration_ms,
        };
        let label = label_from_fields(&track, &settings.list_fields, &settings.list_separator);
        labelled.push((label.to_lowercase(), track));
    }

    labelled.sort_by(|a, b| a.0.cmp(&b.0));

    let tracks: Vec<Track> = labelled
        .into_iter()
        .enumerate()
        .map(|(i, (_, mut t))| {
            t.id = i as i64;
            t
        })
        .collect();

    info!(root = %dir.display(), count = tracks.len(), "library scanned");
    Ok(tracks)
}
