use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use crate::error::SettingsError;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_tapedeck_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", "/tmp/tapedeck-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/tapedeck-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("tapedeck")
            .join("config.toml")
    );
}

#[test]
fn default_paths_fall_back_to_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::remove("XDG_STATE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("tapedeck")
            .join("config.toml")
    );
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local")
            .join("state")
            .join("tapedeck")
            .join("tapedeck.log")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
poll_interval_ms = 250

[engine]
end_check_ms = 100

[controls]
scrub_seconds = 9

[ui]
header_text = "hello"
frame_ms = 30

[logging]
level = "debug"
file = "/tmp/tapedeck.log"

[library]
root = "/srv/music"
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false
list_fields = ["filename"]
list_separator = "::"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TAPEDECK__PLAYBACK__POLL_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.poll_interval_ms, 250);
    assert_eq!(s.engine.end_check_ms, 100);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.frame_ms, 30);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file,
        Some(std::path::PathBuf::from("/tmp/tapedeck.log"))
    );
    assert_eq!(s.library.root, Some(std::path::PathBuf::from("/srv/music")));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.list_fields, vec![TrackLabelField::Filename]);
    assert_eq!(s.library.list_separator, "::");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
poll_interval_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("TAPEDECK__PLAYBACK__POLL_INTERVAL_MS", "750");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.poll_interval_ms, 750);
}

#[test]
fn defaults_poll_every_half_second() {
    let s = Settings::default();
    assert_eq!(s.playback.poll_interval_ms, 500);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_intervals_and_empty_extensions() {
    let mut s = Settings::default();
    s.playback.poll_interval_ms = 0;
    assert_eq!(
        s.validate(),
        Err(SettingsError::ZeroInterval("playback.poll_interval_ms"))
    );

    let mut s = Settings::default();
    s.engine.end_check_ms = 0;
    assert_eq!(
        s.validate(),
        Err(SettingsError::ZeroInterval("engine.end_check_ms"))
    );

    let mut s = Settings::default();
    s.library.extensions = vec![" . ".to_string(), String::new()];
    assert_eq!(s.validate(), Err(SettingsError::NoExtensions));
}
