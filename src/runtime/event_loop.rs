use std::time::Duration;

use crossbeam_channel::Receiver;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::{App, Screen};
use crate::config;
use crate::coordinator::{CoordinatorHandle, PlaybackSnapshot};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::MprisSync;
use crate::ui;

/// What a key press asks for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Down,
    Up,
    Top,
    Bottom,
    PlaySelected,
    TogglePlayPause,
    Next,
    Prev,
    ScrubBack,
    ScrubForward,
    ToggleScreen,
    NextPage,
    PrevPage,
    ToggleMetadata,
    JumpToPlaying,
    Filter,
    FilterChar(char),
    FilterBackspace,
    FilterClear,
    FilterAccept,
}

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Same for `zz`.
    pub pending_zz: bool,
    pub mpris: MprisSync,
}

/// Main terminal event loop: draws the latest snapshot, forwards input and
/// MPRIS commands to the coordinator. Returns `Ok(())` when shutdown is
/// requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    coordinator: &CoordinatorHandle,
    mpris: &MprisHandle,
    control_rx: &Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame = Duration::from_millis(settings.ui.frame_ms.max(1));

    loop {
        let snapshot = coordinator.snapshot();
        app.sync(&snapshot);

        // Keep MPRIS in sync even when changes come from media keys or auto-advance.
        state.mpris.update(mpris, &snapshot);

        terminal.draw(|f| ui::draw(f, app, &snapshot, settings))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, &snapshot, coordinator) {
                return Ok(());
            }
        }

        if event::poll(frame)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let Some(action) = action_for(key, app.filter_mode, state) else {
                    continue;
                };
                if apply(action, app, &snapshot, coordinator, settings) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Turn an MPRIS command into coordinator intents. Returns `true` on quit.
pub fn handle_control_cmd(
    cmd: ControlCmd,
    snapshot: &PlaybackSnapshot,
    coordinator: &CoordinatorHandle,
) -> bool {
    debug!(?cmd, "mpris command");
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if !snapshot.is_playing {
                coordinator.toggle_play_pause();
            }
        }
        ControlCmd::Pause => {
            if snapshot.is_playing {
                coordinator.toggle_play_pause();
            }
        }
        ControlCmd::PlayPause => coordinator.toggle_play_pause(),
        ControlCmd::Stop => {
            if snapshot.is_playing {
                coordinator.toggle_play_pause();
            }
            coordinator.seek(0);
        }
        ControlCmd::Next => coordinator.skip_next(),
        ControlCmd::Prev => coordinator.skip_previous(),
    }
    false
}

/// Map a key press to an [`Action`], tracking the `gg`/`zz` prefixes.
///
/// While a filter query is being typed, printable keys extend the query.
pub fn action_for(key: KeyEvent, filter_mode: bool, state: &mut EventLoopState) -> Option<Action> {
    let was_gg = std::mem::take(&mut state.pending_gg);
    let was_zz = std::mem::take(&mut state.pending_zz);

    if filter_mode {
        return match key.code {
            KeyCode::Esc => Some(Action::FilterClear),
            KeyCode::Backspace => Some(Action::FilterBackspace),
            KeyCode::Enter => Some(Action::FilterAccept),
            KeyCode::Down => Some(Action::Down),
            KeyCode::Up => Some(Action::Up),
            KeyCode::Char(c) if !c.is_control() => Some(Action::FilterChar(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('g') => {
            if was_gg {
                Some(Action::Top)
            } else {
                state.pending_gg = true;
                None
            }
        }
        KeyCode::Char('z') => {
            if was_zz {
                Some(Action::JumpToPlaying)
            } else {
                state.pending_zz = true;
                None
            }
        }
        KeyCode::Char('G') => Some(Action::Bottom),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Enter => Some(Action::PlaySelected),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Action::TogglePlayPause),
        KeyCode::Char('l') => Some(Action::Next),
        KeyCode::Char('h') => Some(Action::Prev),
        KeyCode::Char('L') => Some(Action::ScrubForward),
        KeyCode::Char('H') => Some(Action::ScrubBack),
        KeyCode::Tab => Some(Action::ToggleScreen),
        KeyCode::Char(']') => Some(Action::NextPage),
        KeyCode::Char('[') => Some(Action::PrevPage),
        KeyCode::Char('K') => Some(Action::ToggleMetadata),
        KeyCode::Char('/') => Some(Action::Filter),
        _ => None,
    }
}

/// Position after scrubbing `delta_ms` from the snapshot position, kept
/// inside the track when its duration is known.
pub fn scrub_target(snapshot: &PlaybackSnapshot, delta_ms: i64) -> u64 {
    let target = snapshot.position_ms.saturating_add_signed(delta_ms);
    if snapshot.duration_ms > 0 {
        target.min(snapshot.duration_ms)
    } else {
        target
    }
}

/// Apply `action`. Returns `true` when the app should quit.
pub fn apply(
    action: Action,
    app: &mut App,
    snapshot: &PlaybackSnapshot,
    coordinator: &CoordinatorHandle,
    settings: &config::Settings,
) -> bool {
    let scrub_ms = settings
        .controls
        .scrub_seconds
        .saturating_mul(1000)
        .min(i64::MAX as u64) as i64;

    match action {
        Action::Quit => return true,
        Action::Down => {
            app.follow_playback_off();
            app.next(snapshot);
        }
        Action::Up => {
            app.follow_playback_off();
            app.prev(snapshot);
        }
        Action::Top => {
            app.follow_playback_off();
            app.select_first(snapshot);
        }
        Action::Bottom => {
            app.follow_playback_off();
            app.select_last(snapshot);
        }
        Action::PlaySelected => play_selected(app, snapshot, coordinator, settings),
        Action::TogglePlayPause => coordinator.toggle_play_pause(),
        Action::Next => coordinator.skip_next(),
        Action::Prev => coordinator.skip_previous(),
        Action::ScrubForward => {
            if snapshot.current.is_some() {
                coordinator.seek(scrub_target(snapshot, scrub_ms));
            }
        }
        Action::ScrubBack => {
            if snapshot.current.is_some() {
                coordinator.seek(scrub_target(snapshot, -scrub_ms));
            }
        }
        Action::ToggleScreen => app.toggle_screen(),
        Action::NextPage => app.next_page(),
        Action::PrevPage => app.prev_page(),
        Action::ToggleMetadata => app.toggle_metadata_window(),
        Action::JumpToPlaying => app.jump_to_playing(snapshot),
        Action::Filter => {
            app.screen = Screen::Library;
            app.enter_filter_mode(snapshot);
        }
        Action::FilterChar(c) => app.push_filter_char(c, snapshot),
        Action::FilterBackspace => app.pop_filter_char(snapshot),
        Action::FilterClear => app.clear_filter(snapshot),
        Action::FilterAccept => {
            // Nothing visible: stay in filter mode.
            if app.selected_track(snapshot).is_some() {
                app.exit_filter_mode();
                play_selected(app, snapshot, coordinator, settings);
            }
        }
    }
    false
}

/// Play the track under the cursor unless it is already playing.
///
/// The track is resolved against the full playlist, so a filtered view never
/// shifts the queue position.
fn play_selected(
    app: &mut App,
    snapshot: &PlaybackSnapshot,
    coordinator: &CoordinatorHandle,
    settings: &config::Settings,
) {
    let Some(track) = app.selected_track(snapshot) else {
        return;
    };
    let already_playing = snapshot.is_playing && snapshot.current.as_ref() == Some(track);
    if !already_playing {
        coordinator.play_track(track.clone());
    }
    app.follow_playback_on();
    if app.screen == Screen::Library && settings.ui.open_now_playing {
        app.toggle_screen();
    }
}
