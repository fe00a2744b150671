//! Application model types: `App`, `Screen` and `NowPlayingPage`.
//!
//! The playlist and playback state live in the coordinator's snapshot; `App`
//! only holds what the terminal adds on top of it: the list cursor, the
//! library filter, which screen and page are showing, and popup flags.

use crate::coordinator::PlaybackSnapshot;
use crate::library::Track;

/// Top-level screen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Library,
    NowPlaying,
}

/// Pages of the now-playing screen, left to right.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NowPlayingPage {
    Artwork,
    #[default]
    Cassette,
    Details,
}

impl NowPlayingPage {
    pub const ALL: [Self; 3] = [Self::Artwork, Self::Cassette, Self::Details];

    pub fn index(self) -> usize {
        match self {
            Self::Artwork => 0,
            Self::Cassette => 1,
            Self::Details => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Artwork => " art ",
            Self::Cassette => " tape ",
            Self::Details => " details ",
        }
    }
}

/// The main application model.
#[derive(Debug)]
pub struct App {
    pub selected: usize,
    pub screen: Screen,
    pub page: NowPlayingPage,

    /// Move the cursor along with the playing track.
    pub follow_playback: bool,
    pub metadata_window: bool,
    pub library_root: Option<String>,

    /// Animation step of the cassette reels; advances only while playing.
    pub reel_frame: usize,

    /// Keys go to the filter query instead of the key map.
    pub filter_mode: bool,
    /// Case-insensitive substring matched against title and artist.
    pub filter_query: String,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            selected: 0,
            screen: Screen::Library,
            page: NowPlayingPage::default(),
            follow_playback: true,
            metadata_window: false,
            library_root: None,
            reel_frame: 0,
            filter_mode: false,
            filter_query: String::new(),
        }
    }

    /// Record the library directory shown in the header.
    pub fn set_library_root(&mut self, dir: String) {
        self.library_root = Some(dir);
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Reconcile the cursor with a fresh snapshot.
    ///
    /// Keeps `selected` inside the playlist and, when following playback
    /// outside filter mode, moves it onto the current track.
    pub fn sync(&mut self, snapshot: &PlaybackSnapshot) {
        let len = snapshot.playlist.len();
        if self.follow_playback && !self.filter_mode {
            if let Some(idx) = snapshot.current_index() {
                self.selected = idx;
            }
        }
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        if snapshot.is_playing {
            self.reel_frame = self.reel_frame.wrapping_add(1);
        }
    }

    fn matches_filter(&self, track: &Track) -> bool {
        let query = self.filter_query.trim();
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        track.title.to_lowercase().contains(&query) || track.artist.to_lowercase().contains(&query)
    }

    /// Playlist indices the library list shows, in playlist order.
    pub fn display_indices(&self, snapshot: &PlaybackSnapshot) -> Vec<usize> {
        snapshot
            .playlist
            .iter()
            .enumerate()
            .filter(|(_, t)| self.matches_filter(t))
            .map(|(i, _)| i)
            .collect()
    }

    /// Track under the cursor, if it is in the playlist and passes the filter.
    pub fn selected_track<'a>(&self, snapshot: &'a PlaybackSnapshot) -> Option<&'a Track> {
        snapshot
            .playlist
            .get(self.selected)
            .filter(|t| self.matches_filter(t))
    }

    /// Move selection to the next visible track.
    pub fn next(&mut self, snapshot: &PlaybackSnapshot) {
        let view = self.display_indices(snapshot);
        if let Some(&i) = view.iter().find(|&&i| i > self.selected) {
            self.selected = i;
        }
    }

    /// Move selection to the previous visible track.
    pub fn prev(&mut self, snapshot: &PlaybackSnapshot) {
        let view = self.display_indices(snapshot);
        if let Some(&i) = view.iter().rev().find(|&&i| i < self.selected) {
            self.selected = i;
        }
    }

    pub fn select_first(&mut self, snapshot: &PlaybackSnapshot) {
        if let Some(&i) = self.display_indices(snapshot).first() {
            self.selected = i;
        }
    }

    pub fn select_last(&mut self, snapshot: &PlaybackSnapshot) {
        if let Some(&i) = self.display_indices(snapshot).last() {
            self.selected = i;
        }
    }

    /// Start typing a filter query; the cursor stops following playback.
    pub fn enter_filter_mode(&mut self, snapshot: &PlaybackSnapshot) {
        self.filter_mode = true;
        self.follow_playback_off();
        self.ensure_selected_visible(snapshot);
    }

    /// Stop typing but keep the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    pub fn clear_filter(&mut self, snapshot: &PlaybackSnapshot) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible(snapshot);
    }

    pub fn push_filter_char(&mut self, c: char, snapshot: &PlaybackSnapshot) {
        self.filter_query.push(c);
        self.ensure_selected_visible(snapshot);
    }

    pub fn pop_filter_char(&mut self, snapshot: &PlaybackSnapshot) {
        self.filter_query.pop();
        self.ensure_selected_visible(snapshot);
    }

    /// Move the cursor to the first visible track when the filter hides it.
    fn ensure_selected_visible(&mut self, snapshot: &PlaybackSnapshot) {
        let view = self.display_indices(snapshot);
        match view.first() {
            None => self.selected = 0,
            Some(&first) if !view.contains(&self.selected) => self.selected = first,
            Some(_) => {}
        }
    }

    /// Jump the cursor onto the playing track and resume following it.
    pub fn jump_to_playing(&mut self, snapshot: &PlaybackSnapshot) {
        if let Some(idx) = snapshot.current_index() {
            self.selected = idx;
            self.follow_playback_on();
        }
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Library => Screen::NowPlaying,
            Screen::NowPlaying => Screen::Library,
        };
    }

    /// Show the next now-playing page; stays on the last one.
    pub fn next_page(&mut self) {
        let i = (self.page.index() + 1).min(NowPlayingPage::ALL.len() - 1);
        self.page = NowPlayingPage::ALL[i];
    }

    pub fn prev_page(&mut self) {
        let i = self.page.index().saturating_sub(1);
        self.page = NowPlayingPage::ALL[i];
    }
}
