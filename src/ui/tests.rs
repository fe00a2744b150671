use std::sync::Arc;

use ratatui::{Terminal, backend::TestBackend};

use super::*;
use crate::library::Locator;

fn track() -> Track {
    Track {
        id: 0,
        title: "Night Drive".into(),
        artist: "The Spools".into(),
        source: Locator::new("/music/night.flac"),
        artwork: None,
        duration_ms: 200_000,
    }
}

fn render(app: &App, snapshot: &PlaybackSnapshot) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|f| draw(f, app, snapshot, &Settings::default()))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn format_time_is_minutes_and_seconds() {
    assert_eq!(format_time(0), "00:00");
    assert_eq!(format_time(65_999), "01:05");
    assert_eq!(format_time(3_600_000), "60:00");
}

#[test]
fn placeholders_without_a_track() {
    assert_eq!(title_and_artist(None), (NO_SONG, UNKNOWN_ARTIST));

    let mut t = track();
    assert_eq!(title_and_artist(Some(&t)), ("Night Drive", "The Spools"));
    t.artist = "  ".into();
    assert_eq!(title_and_artist(Some(&t)).1, UNKNOWN_ARTIST);
}

#[test]
fn controls_text_mentions_scrub_seconds() {
    let text = controls_text(Screen::Library, 7);
    assert!(text.contains("[H/L] scrub -/+7s"));
    assert!(text.contains("[enter] play selected song"));
    assert!(!controls_text(Screen::NowPlaying, 7).contains("enter"));
}

#[test]
fn cassette_lines_share_one_width() {
    for progress in [0.0, 0.5, 1.0] {
        for line in cassette::lines(progress, 3) {
            assert_eq!(line.chars().count(), cassette::WIDTH, "{line:?}");
        }
    }
}

#[test]
fn tape_winds_from_left_to_right() {
    assert_eq!(cassette::winding(0.0), (3, 0));
    assert_eq!(cassette::winding(0.5), (1, 2));
    assert_eq!(cassette::winding(1.0), (0, 3));
    assert_eq!(cassette::winding(7.0), (0, 3));
    assert_eq!(cassette::winding(f64::NAN), (3, 0));
}

#[test]
fn reels_cycle_through_spokes() {
    let spokes: Vec<char> = (0..8).map(cassette::spoke).collect();
    assert_eq!(spokes, vec!['|', '|', '/', '/', '-', '-', '\\', '\\']);
    assert_eq!(cassette::spoke(8), '|');
}

#[test]
fn library_screen_shows_tracks_and_mini_player() {
    let app = App::new();
    let snap = PlaybackSnapshot {
        playlist: Arc::new(vec![track()]),
        current: Some(track()),
        position_ms: 61_000,
        duration_ms: 200_000,
        ..PlaybackSnapshot::default()
    };
    let screen = render(&app, &snap);
    assert!(screen.contains("The Spools - Night Drive"));
    assert!(screen.contains("01:01 / 03:20"));
}

#[test]
fn now_playing_details_page_shows_format_and_file() {
    let mut app = App::new();
    app.toggle_screen();
    app.next_page();
    let snap = PlaybackSnapshot {
        playlist: Arc::new(vec![track()]),
        current: Some(track()),
        technical_details: "FLAC / 44.1kHz / 16-bit".into(),
        ..PlaybackSnapshot::default()
    };
    let screen = render(&app, &snap);
    assert!(screen.contains("Format: FLAC / 44.1kHz / 16-bit"));
    assert!(screen.contains("File: /music/night.flac"));
}

#[test]
fn now_playing_without_a_track_uses_placeholders() {
    let mut app = App::new();
    app.toggle_screen();
    let screen = render(&app, &PlaybackSnapshot::default());
    assert!(screen.contains(NO_SONG));
    assert!(screen.contains(UNKNOWN_ARTIST));
}

#[test]
fn library_rows_show_each_track_length() {
    let app = App::new();
    let snap = PlaybackSnapshot {
        playlist: Arc::new(vec![track()]),
        ..PlaybackSnapshot::default()
    };
    let screen = render(&app, &snap);
    assert!(screen.contains("The Spools - Night Drive  03:20"));
}

#[test]
fn filtered_library_lists_only_matching_tracks() {
    let mut other = track();
    other.id = 1;
    other.title = "Morning Walk".into();
    other.artist = "Quiet Hours".into();
    other.source = Locator::new("/music/morning.flac");
    let snap = PlaybackSnapshot {
        playlist: Arc::new(vec![track(), other]),
        ..PlaybackSnapshot::default()
    };

    let mut app = App::new();
    app.enter_filter_mode(&snap);
    for c in "quiet".chars() {
        app.push_filter_char(c, &snap);
    }
    let screen = render(&app, &snap);
    assert!(screen.contains("Quiet Hours - Morning Walk"));
    assert!(!screen.contains("Night Drive"));
    assert!(screen.contains("tracks (1/2)"));
    assert!(screen.contains("/quiet_"));
}
