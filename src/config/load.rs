use std::{env, path::PathBuf};

use crate::error::SettingsError;

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads the optional config file, then layers environment
/// variables (prefix `TAPEDECK__`) over it and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TAPEDECK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject settings that would stall a loop or match no files.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.playback.poll_interval_ms == 0 {
            return Err(SettingsError::ZeroInterval("playback.poll_interval_ms"));
        }
        if self.engine.end_check_ms == 0 {
            return Err(SettingsError::ZeroInterval("engine.end_check_ms"));
        }
        if self.ui.frame_ms == 0 {
            return Err(SettingsError::ZeroInterval("ui.frame_ms"));
        }
        if self
            .library
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err(SettingsError::NoExtensions);
        }
        Ok(())
    }
}

/// Resolve the config path from `TAPEDECK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TAPEDECK_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

fn xdg_dir(var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        return Some(PathBuf::from(xdg));
    }
    env::var_os("HOME").map(|home| {
        home_fallback
            .iter()
            .fold(PathBuf::from(home), |acc, part| acc.join(part))
    })
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tapedeck/config.toml`
/// or `~/.config/tapedeck/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("tapedeck").join("config.toml"))
}

/// Compute the default log path under `$XDG_STATE_HOME/tapedeck/tapedeck.log`
/// or `~/.local/state/tapedeck/tapedeck.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", &[".local", "state"]).map(|d| d.join("tapedeck").join("tapedeck.log"))
}
