use std::time::Duration;

/// Repeat behavior for the active track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    /// Replay the active track when it ends or on `next`.
    LoopCurrent,
}

impl RepeatMode {
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::LoopCurrent,
            RepeatMode::LoopCurrent => RepeatMode::Off,
        }
    }
}

/// Clamp a volume to `[0, 1]`. NaN is treated as silence.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Transport state for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportState {
    pub playing: bool,
    /// Always within `[0, 1]`.
    pub volume: f32,
    /// Last requested seek position for the active track.
    pub seek_target: Duration,
    /// Last position reported by the device (or the last seek).
    pub position: Duration,
    /// Device-reported duration once loaded, otherwise the catalog value.
    pub duration: Option<Duration>,
    pub repeat: RepeatMode,
    /// The device ran off the end of the queue; the next play restarts the
    /// active track.
    pub finished: bool,
}

impl TransportState {
    pub fn new(volume: f32, repeat: RepeatMode) -> Self {
        Self {
            playing: false,
            volume: clamp_volume(volume),
            seek_target: Duration::ZERO,
            position: Duration::ZERO,
            duration: None,
            repeat,
            finished: false,
        }
    }

    /// Reset per-track fields on a track change or restart.
    pub(crate) fn reset_for_track(&mut self, duration: Option<Duration>) {
        self.seek_target = Duration::ZERO;
        self.position = Duration::ZERO;
        self.duration = duration;
        self.finished = false;
    }

    /// Clamp a seek to `[0, duration]` when the duration is known.
    pub fn clamp_seek(&self, position: Duration) -> Duration {
        match self.duration {
            Some(d) => position.min(d),
            None => position,
        }
    }
}

impl Default for TransportState {
    fn default() -> Self {
        Self::new(1.0, RepeatMode::Off)
    }
}
