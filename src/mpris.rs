//! MPRIS D-Bus adapter.
//!
//! Media keys and `playerctl` arrive here as [`ControlCmd`]s; the runtime
//! turns them into coordinator intents and pushes snapshot changes back
//! through [`MprisHandle`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_io::{Timer, block_on};
use crossbeam_channel::Sender;
use tracing::{debug, info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::coordinator::PlaybackSnapshot;
use crate::library::Track;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.tapedeck";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

/// MPRIS `PlaybackStatus`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackStatus {
    pub fn from_snapshot(snapshot: &PlaybackSnapshot) -> Self {
        match (&snapshot.current, snapshot.is_playing) {
            (None, _) => Self::Stopped,
            (Some(_), true) => Self::Playing,
            (Some(_), false) => Self::Paused,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
        }
    }
}

#[derive(Debug, Default)]
struct SharedState {
    status: PlaybackStatus,
    title: Option<String>,
    artist: Vec<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<ObjectPath<'static>>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_playback(&self, status: PlaybackStatus) {
        if let Ok(mut s) = self.state.lock() {
            s.status = status;
        }
    }

    /// Publish `track` (at playlist position `index`) as the current item.
    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&Track>, length_ms: u64) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        match track {
            Some(t) => {
                s.title = Some(t.title.clone());
                s.artist = vec![t.artist.clone()];
                s.url = Some(t.source.to_uri());
                s.art_url = t.artwork.as_ref().map(|a| a.to_uri());
                let ms = if length_ms > 0 { length_ms } else { t.duration_ms };
                s.length_micros = (ms > 0).then(|| (ms as i64).saturating_mul(1000));
                s.track_id = index.and_then(|i| {
                    ObjectPath::try_from(format!("{OBJECT_PATH}/track/{i}"))
                        .ok()
                        .map(|p| p.to_owned())
                });
            }
            None => {
                s.title = None;
                s.artist.clear();
                s.url = None;
                s.art_url = None;
                s.length_micros = None;
                s.track_id = None;
            }
        }
    }

    /// Mirror status and metadata of `snapshot`.
    pub fn set_from_snapshot(&self, snapshot: &PlaybackSnapshot) {
        self.set_track_metadata(
            snapshot.current_index(),
            snapshot.current.as_ref(),
            snapshot.duration_ms,
        );
        self.set_playback(PlaybackStatus::from_snapshot(snapshot));
    }
}

fn send(tx: &Sender<ControlCmd>, cmd: ControlCmd) {
    if tx.send(cmd).is_err() {
        debug!("mpris: runtime is gone");
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        send(&self.tx, ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "tapedeck"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn insert(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    match OwnedValue::try_from(value) {
        Ok(v) => {
            map.insert(key.to_string(), v);
        }
        Err(e) => debug!("mpris: skipping {key}: {e}"),
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        send(&self.tx, ControlCmd::Next);
    }

    fn previous(&self) {
        send(&self.tx, ControlCmd::Prev);
    }

    fn play(&self) {
        send(&self.tx, ControlCmd::Play);
    }

    fn pause(&self) {
        send(&self.tx, ControlCmd::Pause);
    }

    fn play_pause(&self) {
        send(&self.tx, ControlCmd::PlayPause);
    }

    fn stop(&self) {
        send(&self.tx, ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        self.state
            .lock()
            .map_or("Stopped", |s| s.status.as_str())
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(id) = &s.track_id {
            insert(&mut map, "mpris:trackid", Value::from(id.clone()));
        }
        if let Some(title) = &s.title {
            insert(&mut map, "xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            insert(&mut map, "xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(url) = &s.url {
            insert(&mut map, "xesam:url", Value::from(url.clone()));
        }
        if let Some(art) = &s.art_url {
            insert(&mut map, "mpris:artUrl", Value::from(art.clone()));
        }
        if let Some(len) = s.length_micros {
            insert(&mut map, "mpris:length", Value::from(len));
        }
        map
    }
}

/// Start the MPRIS service on its own thread.
///
/// Failing to reach the session bus only disables MPRIS; the returned handle
/// keeps working either way.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!("mpris: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!("mpris: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!("mpris: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!("mpris: failed to register player iface: {e}");
                return;
            }
            info!(name = BUS_NAME, "mpris service registered");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}
