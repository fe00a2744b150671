use std::path::Path;
use std::time::Duration;

use crossbeam_channel::unbounded;
use lofty::file::FileType;

use super::cursor::QueueCursor;
use super::probe::{ProbedTrack, mime_for, probe};
use super::shared::{ProbedItem, Shared};
use super::thread::advance_after;
use super::*;

fn queue(n: usize) -> Vec<Locator> {
    (0..n)
        .map(|i| Locator::new(format!("/nonexistent/track{i}.mp3")))
        .collect()
}

fn item(index: usize) -> ProbedItem {
    ProbedItem {
        index,
        locator: Locator::new(format!("/nonexistent/track{index}.mp3")),
        probed: ProbedTrack::default(),
    }
}

#[test]
fn cursor_starts_on_first_item_and_never_wraps() {
    let mut c = QueueCursor::default();
    assert_eq!(c.index(), None);
    assert!(!c.has_next());
    assert!(!c.has_previous());
    assert_eq!(c.advance(), None);

    c.set_queue(queue(3));
    assert_eq!(c.index(), Some(0));
    assert!(!c.has_previous());
    assert_eq!(c.retreat(), None);

    assert_eq!(c.advance(), Some(1));
    assert_eq!(c.advance(), Some(2));
    assert!(!c.has_next());
    assert_eq!(c.advance(), None);
    assert_eq!(c.index(), Some(2));

    assert_eq!(c.retreat(), Some(1));
    assert_eq!(c.current(), Some(&Locator::new("/nonexistent/track1.mp3")));
}

#[test]
fn cursor_jump_is_bounds_checked() {
    let mut c = QueueCursor::default();
    c.set_queue(queue(2));
    assert_eq!(c.jump(5), None);
    assert_eq!(c.index(), Some(0));
    assert_eq!(c.jump(1), Some(1));

    c.set_queue(Vec::new());
    assert_eq!(c.index(), None);
    assert_eq!(c.current(), None);
}

#[test]
fn pcm_encoding_from_known_bit_depths_only() {
    assert_eq!(PcmEncoding::from_bit_depth(8), Some(PcmEncoding::Pcm8));
    assert_eq!(PcmEncoding::from_bit_depth(16), Some(PcmEncoding::Pcm16));
    assert_eq!(PcmEncoding::from_bit_depth(24), Some(PcmEncoding::Pcm24));
    assert_eq!(PcmEncoding::from_bit_depth(32), Some(PcmEncoding::Pcm32));
    assert_eq!(PcmEncoding::from_bit_depth(12), None);
}

#[test]
fn track_group_reports_first_selected_track() {
    let a = AudioFormat {
        sample_mime_type: Some("audio/flac".into()),
        ..AudioFormat::default()
    };
    let b = AudioFormat {
        sample_mime_type: Some("audio/mpeg".into()),
        ..AudioFormat::default()
    };
    let group = TrackGroup {
        kind: TrackKind::Audio,
        selected: true,
        tracks: vec![
            TrackFormat {
                format: a,
                selected: false,
            },
            TrackFormat {
                format: b.clone(),
                selected: true,
            },
        ],
    };
    assert_eq!(group.selected_format(), Some(&b));
    assert_eq!(TrackGroup::single_audio(b.clone()).selected_format(), Some(&b));
}

#[test]
fn mime_for_maps_common_containers() {
    assert_eq!(mime_for(&FileType::Mpeg), "audio/mpeg");
    assert_eq!(mime_for(&FileType::Flac), "audio/flac");
    assert_eq!(mime_for(&FileType::Mp4), "audio/mp4a-latm");
    assert_eq!(mime_for(&FileType::Wav), "audio/raw");
    assert_eq!(mime_for(&FileType::Vorbis), "audio/vorbis");
    assert_eq!(mime_for(&FileType::Ape), "audio/x-ape");
}

#[test]
fn probe_of_unreadable_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.mp3");
    std::fs::write(&path, b"definitely not audio").unwrap();

    assert_eq!(probe(&path), ProbedTrack::default());
    assert_eq!(probe(Path::new("/nonexistent/x.flac")), ProbedTrack::default());
}

#[test]
fn status_enter_item_loads_and_bumps_generation() {
    let (tx, _rx) = unbounded();
    let shared = Shared::new(tx);
    let mut status = shared.lock();
    status.cursor.set_queue(queue(2));

    assert!(status.enter_item(item(7), Duration::ZERO).is_none());
    // The queue no longer holds this locator at index 1.
    let stale = ProbedItem {
        locator: Locator::new("/elsewhere/other.mp3"),
        ..item(1)
    };
    assert!(status.enter_item(stale, Duration::ZERO).is_none());
    assert_eq!(status.cursor.index(), Some(0));

    let before = status.generation;
    let req = status.enter_item(item(1), Duration::from_millis(1500)).unwrap();
    assert_eq!(req.generation, before + 1);
    assert_eq!(req.start_at, Duration::from_millis(1500));
    assert!(!req.play);
    assert_eq!(status.cursor.index(), Some(1));
    assert_eq!(status.state, EngineState::Ready);
    assert_eq!(status.position(), Duration::from_millis(1500));
}

#[test]
fn drained_item_advances_then_ends_the_queue() {
    let (tx, rx) = unbounded();
    let shared = Shared::new(tx);

    let first = {
        let mut status = shared.lock();
        status.cursor.set_queue(queue(2));
        status.playing = true;
        status.enter_item(item(0), Duration::ZERO).unwrap().generation
    };

    // A drain from an outdated sink is ignored.
    assert!(advance_after(&shared, first - 1).is_none());
    assert!(rx.try_recv().is_err());

    let second = advance_after(&shared, first).unwrap();
    assert_eq!(second.locator, Locator::new("/nonexistent/track1.mp3"));
    assert!(second.play);
    let events: Vec<EngineEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            EngineEvent::ItemTransitioned(1),
            EngineEvent::StateChanged(EngineState::Buffering),
            EngineEvent::StateChanged(EngineState::Ready),
            EngineEvent::TracksChanged,
        ]
    );

    assert!(advance_after(&shared, second.generation).is_none());
    assert_eq!(rx.try_recv().unwrap(), EngineEvent::IsPlayingChanged(false));
    assert_eq!(
        rx.try_recv().unwrap(),
        EngineEvent::StateChanged(EngineState::Ended)
    );

    let status = shared.lock();
    assert!(!status.playing);
    assert_eq!(status.state, EngineState::Ended);
    assert_eq!(status.cursor.index(), Some(1));
}

#[test]
fn failed_load_marks_the_item_and_stops_playback() {
    let (tx, rx) = unbounded();
    let shared = Shared::new(tx);
    let generation = {
        let mut status = shared.lock();
        status.cursor.set_queue(queue(2));
        status.playing = true;
        status.enter_item(item(0), Duration::ZERO).unwrap().generation
    };

    // Failures of an older load leave the current item alone.
    shared.load_failed(generation - 1);
    assert!(!shared.lock().sink_missing);
    assert!(rx.try_recv().is_err());

    shared.load_failed(generation);
    assert_eq!(rx.try_recv().unwrap(), EngineEvent::IsPlayingChanged(false));
    {
        let status = shared.lock();
        assert!(status.sink_missing);
        assert!(!status.playing);
        assert!(status.resumed_at.is_none());
    }

    // Entering an item again clears the mark.
    shared.lock().enter_item(item(1), Duration::ZERO).unwrap();
    assert!(!shared.lock().sink_missing);
}
