//! Commands, events and the generation counter shared by the audio thread
//! and the session.

use std::fmt;
use std::time::Duration;

use crate::error::DeviceError;

/// Monotonic fence counter. Each `load` and each seek is issued under a
/// fresh generation; events carry the generation they were produced under.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle events reported by the device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// The source decoded; `duration` is known for most formats.
    Loaded { duration: Option<Duration> },
    /// Current playback position.
    TimeUpdate(Duration),
    /// The sink ran dry.
    Ended,
    Error(DeviceError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedEvent {
    pub generation: Generation,
    pub event: DeviceEvent,
}

#[derive(Debug)]
pub(crate) enum AudioCmd {
    /// Replace the current source.
    Load { url: String, generation: Generation },
    SetPlaying(bool),
    SetVolume(f32),
    /// Restart the current source at `position` and re-tag its events.
    Seek {
        position: Duration,
        generation: Generation,
    },
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
