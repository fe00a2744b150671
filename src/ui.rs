//! UI rendering helpers for the terminal user interface.
//!
//! Everything here is a pure function of the `App` model and the latest
//! `PlaybackSnapshot`; nothing in this module talks to the coordinator.

mod cassette;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, NowPlayingPage, Screen};
use crate::config::Settings;
use crate::coordinator::PlaybackSnapshot;
use crate::library::{Track, label_from_fields};

pub const NO_SONG: &str = "No Song Selected";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected song");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("tab", "library/now playing");
    map.insert("[/]", "page");
    map.insert("zz", "jump to playing");
    map.insert("K", "metadata");
    map.insert("/", "filter");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(screen: Screen, scrub_seconds: u64) -> String {
    let order: &[&str] = match screen {
        Screen::Library => &[
            "j/k", "h/l", "H/L", "enter", "space/p", "gg/G", "zz", "/", "K", "tab", "q",
        ],
        Screen::NowPlaying => &["space/p", "h/l", "H/L", "[/]", "tab", "q"],
    };
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{scrub_seconds}s"))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format milliseconds as `MM:SS`.
pub fn format_time(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `"01:05 / 03:20"` for the current snapshot.
fn time_text(snapshot: &PlaybackSnapshot) -> String {
    format!(
        "{} / {}",
        format_time(snapshot.position_ms),
        format_time(snapshot.duration_ms)
    )
}

/// Title and artist lines for `current`, with placeholders.
pub fn title_and_artist(current: Option<&Track>) -> (&str, &str) {
    match current {
        Some(t) => {
            let artist = if t.artist.trim().is_empty() {
                UNKNOWN_ARTIST
            } else {
                t.artist.as_str()
            };
            (t.title.as_str(), artist)
        }
        None => (NO_SONG, UNKNOWN_ARTIST),
    }
}

fn play_glyph(playing: bool) -> &'static str {
    if playing { ">" } else { "||" }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, snapshot: &PlaybackSnapshot, settings: &Settings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let mut header_text = settings.ui.header_text.clone();
    if let Some(dir) = &app.library_root {
        header_text.push_str(&format!(" • {dir}"));
    }
    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tapedeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    match app.screen {
        Screen::Library => draw_library(frame, chunks[1], app, snapshot, settings),
        Screen::NowPlaying => draw_now_playing(frame, chunks[1], app, snapshot),
    }

    if app.metadata_window {
        draw_metadata(frame, chunks[1], app, snapshot);
    }

    let footer = Paragraph::new(controls_text(app.screen, settings.controls.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);
}

fn draw_library(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    snapshot: &PlaybackSnapshot,
    settings: &Settings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    // Only build ListItems for the visible window, centred on the selection.
    let display = app.display_indices(snapshot);
    let total = display.len();
    let list_height = chunks[0].height.saturating_sub(2) as usize;
    let sel_pos = display
        .iter()
        .position(|&i| i == app.selected)
        .unwrap_or(0);
    let (start, end, selected_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let playing_idx = snapshot.current_index();
    let lib = &settings.library;
    let items: Vec<ListItem> = display[start..end]
        .iter()
        .filter_map(|&i| snapshot.playlist.get(i).map(|track| (i, track)))
        .map(|(i, track)| {
            let marker = if playing_idx == Some(i) { "* " } else { "  " };
            let label = label_from_fields(track, &lib.list_fields, &lib.list_separator);
            ListItem::new(format!(
                "{marker}{label}  {}",
                format_time(track.duration_ms)
            ))
        })
        .collect();

    let query = app.filter_query.trim();
    let mut title = if snapshot.playlist.is_empty() {
        " tracks (empty) ".to_string()
    } else if query.is_empty() {
        format!(" tracks ({total}) ")
    } else {
        format!(" tracks ({total}/{}) ", snapshot.playlist.len())
    };
    if app.filter_mode || !query.is_empty() {
        let cursor = if app.filter_mode { "_" } else { "" };
        title.push_str(&format!("/{}{cursor} ", app.filter_query));
    }
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_in_visible));
    }
    frame.render_stateful_widget(list, chunks[0], &mut state);

    // Mini player
    let (title, artist) = title_and_artist(snapshot.current.as_ref());
    let mini = Paragraph::new(format!(
        "{} {title} - {artist}  [{}]",
        play_glyph(snapshot.is_playing),
        time_text(snapshot)
    ))
    .block(Block::bordered().padding(left_pad()).title(" now playing "));
    frame.render_widget(mini, chunks[1]);
}

fn draw_now_playing(frame: &mut Frame, area: Rect, app: &App, snapshot: &PlaybackSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(area);

    let page_titles: Vec<&str> = NowPlayingPage::ALL
        .iter()
        .map(|p| if *p == app.page { p.title().trim() } else { "." })
        .collect();
    let page_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", page_titles.join(" ")))
        .title_alignment(Alignment::Center);

    let body = match app.page {
        NowPlayingPage::Artwork => match snapshot.current.as_ref().and_then(|t| t.artwork.as_ref()) {
            Some(art) => format!("[ artwork ]\n\n{}", art.path().display()),
            None => "[ no artwork ]".to_string(),
        },
        NowPlayingPage::Cassette => {
            cassette::lines(snapshot.progress(), app.reel_frame).join("\n")
        }
        NowPlayingPage::Details => {
            let file = snapshot
                .current
                .as_ref()
                .map(|t| t.source.path().display().to_string())
                .unwrap_or_else(|| "-".to_string());
            format!(
                "Format: {}\nFile: {file}",
                snapshot.technical_details
            )
        }
    };
    let alignment = match app.page {
        NowPlayingPage::Details => Alignment::Left,
        _ => Alignment::Center,
    };
    frame.render_widget(
        Paragraph::new(body)
            .alignment(alignment)
            .block(page_block.padding(left_pad()))
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    let (title, artist) = title_and_artist(snapshot.current.as_ref());
    let info = Paragraph::new(format!("{title}\n{artist}"))
        .alignment(Alignment::Center)
        .bold()
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(info, chunks[1]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", play_glyph(snapshot.is_playing))),
        )
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(snapshot.progress())
        .label(time_text(snapshot));
    frame.render_widget(gauge, chunks[2]);
}

/// Overlay popup with the selected track's metadata.
fn draw_metadata(frame: &mut Frame, area: Rect, app: &App, snapshot: &PlaybackSnapshot) {
    let popup_area = centered_rect_sized(72, 9, area);
    frame.render_widget(Clear, popup_area);

    let track = match app.screen {
        Screen::Library => app.selected_track(snapshot),
        Screen::NowPlaying => snapshot.current.as_ref(),
    };
    let meta = match track {
        Some(track) => format!(
            "Title: {}\nArtist: {}\nDuration: {}\nPath: {}\nArtwork: {}",
            track.title,
            track.artist,
            format_time(track.duration_ms),
            track.source.path().display(),
            track
                .artwork
                .as_ref()
                .map_or_else(|| "-".to_string(), |a| a.path().display().to_string())
        ),
        None => "No track selected".to_string(),
    };
    let meta_paragraph = Paragraph::new(meta)
        .block(
            Block::default()
                .padding(left_pad())
                .borders(Borders::ALL)
                .title(" metadata (K closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(meta_paragraph, popup_area);
}

#[cfg(test)]
mod tests;
