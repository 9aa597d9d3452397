use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::media::MetadataDefaults;
use crate::queue::RepeatMode;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/beatbox/config.toml` or `~/.config/beatbox/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `BEATBOX__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub audio: AudioSettings,
    pub media: MediaSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume in `[0, 1]`.
    pub volume: f32,
    /// Initial repeat mode.
    pub repeat: RepeatSetting,
    /// `previous` restarts the current track once it has played this long.
    pub previous_restart_threshold_secs: f64,
    /// What `next` and natural track end do after the last track.
    pub end_of_queue: EndOfQueueSetting,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            repeat: RepeatSetting::Off,
            previous_restart_threshold_secs: 3.0,
            end_of_queue: EndOfQueueSetting::Stop,
        }
    }
}

impl PlaybackSettings {
    pub fn previous_restart_threshold(&self) -> Duration {
        Duration::try_from_secs_f64(self.previous_restart_threshold_secs)
            .unwrap_or(Duration::from_secs(3))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatSetting {
    #[serde(alias = "none", alias = "no-repeat", alias = "no_repeat")]
    Off,
    #[serde(
        alias = "loop_current",
        alias = "loopone",
        alias = "loop-one",
        alias = "repeat-one"
    )]
    LoopCurrent,
}

impl From<RepeatSetting> for RepeatMode {
    fn from(setting: RepeatSetting) -> Self {
        match setting {
            RepeatSetting::Off => RepeatMode::Off,
            RepeatSetting::LoopCurrent => RepeatMode::LoopCurrent,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndOfQueueSetting {
    Stop,
    #[serde(alias = "wrap-around", alias = "loop-all", alias = "loop_all")]
    Wrap,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Seconds to seek for `H` / `L` and the media seek actions.
    pub seek_step_secs: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_step_secs: 5,
            volume_step: 0.05,
        }
    }
}

impl ControlsSettings {
    pub fn seek_step(&self) -> Duration {
        Duration::from_secs(self.seek_step_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Crossfade duration when switching tracks (milliseconds).
    /// Set to 0 to disable crossfade.
    pub crossfade_ms: u64,
    /// Number of steps used to fade volumes (higher = smoother, more CPU).
    pub crossfade_steps: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Timeout for fetching a remote source, in seconds.
    pub fetch_timeout_secs: u64,
    /// Sources larger than this are rejected.
    pub max_source_bytes: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            crossfade_ms: 0,
            crossfade_steps: 10,
            quit_fade_out_ms: 300,
            fetch_timeout_secs: 30,
            max_source_bytes: 64 * 1024 * 1024,
        }
    }
}

impl AudioSettings {
    pub fn quit_fade_out(&self) -> Duration {
        Duration::from_millis(self.quit_fade_out_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Publish an MPRIS service on the session bus.
    pub enabled: bool,
    /// MPRIS `Identity`; the bus name is `org.mpris.MediaPlayer2.<identity>`.
    pub identity: String,
    /// Album shown when a track has none.
    pub fallback_album: String,
    /// Artwork shown when a track has none.
    pub placeholder_artwork: String,
    pub artwork_sizes: String,
    pub artwork_type: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        let defaults = MetadataDefaults::default();
        Self {
            enabled: true,
            identity: "beatbox".to_string(),
            fallback_album: defaults.fallback_album,
            placeholder_artwork: defaults.placeholder_artwork,
            artwork_sizes: defaults.artwork_sizes,
            artwork_type: defaults.artwork_type,
        }
    }
}

impl MediaSettings {
    pub fn metadata_defaults(&self) -> MetadataDefaults {
        MetadataDefaults {
            fallback_album: self.fallback_album.clone(),
            placeholder_artwork: self.placeholder_artwork.clone(),
            artwork_sizes: self.artwork_sizes.clone(),
            artwork_type: self.artwork_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/beatbox/beatbox.log`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
