use std::sync::Arc;

use super::*;
use crate::coordinator::PlaybackSnapshot;
use crate::library::{Locator, Track};

fn t(id: i64, title: &str) -> Track {
    Track {
        id,
        title: title.into(),
        artist: "Artist".into(),
        source: Locator::new(format!("/music/{title}.mp3")),
        artwork: None,
        duration_ms: 0,
    }
}

fn mixed() -> PlaybackSnapshot {
    let mut playlist: Vec<Track> = ["Blackbird", "Yesterday", "Black Dog", "Help"]
        .iter()
        .enumerate()
        .map(|(i, title)| t(i as i64, title))
        .collect();
    playlist[3].artist = "The BLACK Keys".into();
    PlaybackSnapshot {
        playlist: Arc::new(playlist),
        ..PlaybackSnapshot::default()
    }
}

fn snapshot(n: usize, current: Option<usize>) -> PlaybackSnapshot {
    let playlist: Vec<Track> = (0..n).map(|i| t(i as i64, &format!("song{i}"))).collect();
    PlaybackSnapshot {
        current: current.map(|i| playlist[i].clone()),
        playlist: Arc::new(playlist),
        ..PlaybackSnapshot::default()
    }
}

#[test]
fn starts_on_library_screen_with_cassette_page() {
    let app = App::new();
    assert_eq!(app.screen, Screen::Library);
    assert_eq!(app.page, NowPlayingPage::Cassette);
    assert!(app.follow_playback);
    assert!(!app.metadata_window);
}

#[test]
fn cursor_movement_is_clamped() {
    let mut app = App::new();
    let three = snapshot(3, None);
    app.prev(&three);
    assert_eq!(app.selected, 0);

    app.next(&three);
    app.next(&three);
    app.next(&three);
    assert_eq!(app.selected, 2);

    app.select_first(&three);
    assert_eq!(app.selected, 0);
    app.select_last(&snapshot(5, None));
    assert_eq!(app.selected, 4);
    app.select_last(&snapshot(0, None));
    assert_eq!(app.selected, 4);
}

#[test]
fn sync_follows_the_playing_track() {
    let mut app = App::new();
    app.sync(&snapshot(4, Some(2)));
    assert_eq!(app.selected, 2);

    app.follow_playback_off();
    app.sync(&snapshot(4, Some(3)));
    assert_eq!(app.selected, 2);
}

#[test]
fn sync_keeps_the_cursor_inside_the_playlist() {
    let mut app = App::new();
    app.follow_playback_off();
    app.selected = 9;
    app.sync(&snapshot(3, None));
    assert_eq!(app.selected, 2);

    app.sync(&snapshot(0, None));
    assert_eq!(app.selected, 0);
}

#[test]
fn reels_turn_only_while_playing() {
    let mut app = App::new();
    let mut snap = snapshot(1, Some(0));
    app.sync(&snap);
    assert_eq!(app.reel_frame, 0);

    snap.is_playing = true;
    app.sync(&snap);
    app.sync(&snap);
    assert_eq!(app.reel_frame, 2);
}

#[test]
fn jump_to_playing_restores_follow() {
    let mut app = App::new();
    app.follow_playback_off();
    app.jump_to_playing(&snapshot(3, Some(1)));
    assert_eq!(app.selected, 1);
    assert!(app.follow_playback);

    // Nothing playing: cursor and mode unchanged.
    app.follow_playback_off();
    app.jump_to_playing(&snapshot(3, None));
    assert_eq!(app.selected, 1);
    assert!(!app.follow_playback);
}

#[test]
fn selected_track_reads_from_the_snapshot() {
    let mut app = App::new();
    let snap = snapshot(2, None);
    app.selected = 1;
    assert_eq!(app.selected_track(&snap).map(|t| t.id), Some(1));
    assert_eq!(app.selected_track(&snapshot(0, None)), None);
}

#[test]
fn pages_and_screens_switch() {
    let mut app = App::new();
    app.toggle_screen();
    assert_eq!(app.screen, Screen::NowPlaying);
    app.toggle_screen();
    assert_eq!(app.screen, Screen::Library);

    app.next_page();
    assert_eq!(app.page, NowPlayingPage::Details);
    app.next_page();
    assert_eq!(app.page, NowPlayingPage::Details);
    app.prev_page();
    app.prev_page();
    app.prev_page();
    assert_eq!(app.page, NowPlayingPage::Artwork);
}

#[test]
fn metadata_window_toggles() {
    let mut app = App::new();
    app.toggle_metadata_window();
    assert!(app.metadata_window);
    app.toggle_metadata_window();
    assert!(!app.metadata_window);
}

#[test]
fn filter_matches_title_or_artist_ignoring_case() {
    let snap = mixed();
    let mut app = App::new();
    assert_eq!(app.display_indices(&snap), vec![0, 1, 2, 3]);

    app.filter_query = "black".into();
    assert_eq!(app.display_indices(&snap), vec![0, 2, 3]);

    app.filter_query = "  YESTER ".into();
    assert_eq!(app.display_indices(&snap), vec![1]);

    // A blank query shows everything.
    app.filter_query = "   ".into();
    assert_eq!(app.display_indices(&snap).len(), 4);
}

#[test]
fn typing_a_filter_keeps_the_cursor_on_a_visible_track() {
    let snap = mixed();
    let mut app = App::new();
    app.selected = 1;

    app.enter_filter_mode(&snap);
    assert!(app.filter_mode);
    assert!(!app.follow_playback);

    for c in "dog".chars() {
        app.push_filter_char(c, &snap);
    }
    assert_eq!(app.selected, 2);
    assert_eq!(app.selected_track(&snap).map(|t| t.id), Some(2));

    app.push_filter_char('z', &snap);
    assert!(app.display_indices(&snap).is_empty());
    assert_eq!(app.selected_track(&snap), None);

    app.pop_filter_char(&snap);
    assert_eq!(app.filter_query, "dog");
    assert_eq!(app.selected, 2);

    app.clear_filter(&snap);
    assert!(!app.filter_mode);
    assert!(app.filter_query.is_empty());
    assert_eq!(app.display_indices(&snap).len(), 4);
}

#[test]
fn cursor_skips_tracks_hidden_by_the_filter() {
    let snap = mixed();
    let mut app = App::new();
    app.filter_query = "black".into();

    app.next(&snap);
    assert_eq!(app.selected, 2);
    app.next(&snap);
    assert_eq!(app.selected, 3);
    app.next(&snap);
    assert_eq!(app.selected, 3);
    app.prev(&snap);
    assert_eq!(app.selected, 2);

    app.select_first(&snap);
    assert_eq!(app.selected, 0);
    app.select_last(&snap);
    assert_eq!(app.selected, 3);
}

#[test]
fn filtered_selection_keeps_its_playlist_index() {
    let snap = mixed();
    let mut app = App::new();
    app.enter_filter_mode(&snap);
    app.push_filter_char('h', &snap);
    app.push_filter_char('e', &snap);
    app.push_filter_char('l', &snap);
    app.exit_filter_mode();

    // The only visible row is the last playlist entry, not row 0.
    assert_eq!(app.display_indices(&snap), vec![3]);
    assert_eq!(app.selected_track(&snap), Some(&snap.playlist[3]));
}

#[test]
fn filter_mode_pauses_following_playback() {
    let mut snap = mixed();
    let mut app = App::new();
    app.enter_filter_mode(&snap);
    app.follow_playback_on();

    snap.current = Some(snap.playlist[1].clone());
    app.sync(&snap);
    assert_eq!(app.selected, 0);

    app.exit_filter_mode();
    app.sync(&snap);
    assert_eq!(app.selected, 1);
}
