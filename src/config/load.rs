use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `BEATBOX__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("BEATBOX")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject values the session cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        let volume = self.playback.volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(format!("playback.volume must be within [0, 1], got {volume}"));
        }
        let threshold = self.playback.previous_restart_threshold_secs;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(format!(
                "playback.previous_restart_threshold_secs must be >= 0, got {threshold}"
            ));
        }
        if self.controls.seek_step_secs == 0 {
            return Err("controls.seek_step_secs must be >= 1".to_string());
        }
        let step = self.controls.volume_step;
        if !(step > 0.0 && step <= 1.0) {
            return Err(format!("controls.volume_step must be within (0, 1], got {step}"));
        }
        if self.audio.crossfade_steps == 0 {
            return Err("audio.crossfade_steps must be >= 1".to_string());
        }
        if self.audio.fetch_timeout_secs == 0 {
            return Err("audio.fetch_timeout_secs must be >= 1".to_string());
        }
        if self.media.identity.trim().is_empty() {
            return Err("media.identity must not be empty".to_string());
        }
        Ok(())
    }

    /// The effective settings rendered as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve the config path from `BEATBOX_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("BEATBOX_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/beatbox/config.toml`
/// or `~/.config/beatbox/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("beatbox").join("config.toml"))
}

/// `$XDG_STATE_HOME/beatbox/beatbox.log`, or `~/.local/state/beatbox/beatbox.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", &[".local", "state"]).map(|d| d.join("beatbox").join("beatbox.log"))
}

fn xdg_dir(var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        return Some(PathBuf::from(xdg));
    }
    env::var_os("HOME").map(|home| {
        home_fallback
            .iter()
            .fold(PathBuf::from(home), |dir, part| dir.join(part))
    })
}
