use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::config::AudioSettings;
use crate::error::PlaybackError;
use crate::queue::clamp_volume;

use super::output::{AudioOutput, require_url};
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, Generation, TaggedEvent};

/// Handle to the audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<TaggedEvent>,
    join: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    pub fn new(audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events) = mpsc::channel::<TaggedEvent>();
        let join = spawn_audio_thread(rx, events_tx, audio_settings);

        Self {
            tx,
            events,
            join: Some(join),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            warn!(cmd = ?e.0, "audio thread is gone; dropping command");
        }
    }

    fn quit(&mut self, fade_out: Duration) {
        let Some(handle) = self.join.take() else {
            return;
        };
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });
        if handle.join().is_err() {
            warn!("audio thread panicked");
        }
    }
}

impl AudioOutput for AudioPlayer {
    fn load(&mut self, url: &str, generation: Generation) -> Result<(), PlaybackError> {
        let url = require_url(url)?;
        self.send(AudioCmd::Load {
            url: url.to_string(),
            generation,
        });
        Ok(())
    }

    fn set_playing(&mut self, playing: bool) {
        self.send(AudioCmd::SetPlaying(playing));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCmd::SetVolume(clamp_volume(volume)));
    }

    fn set_seek(&mut self, position: Duration, generation: Generation) {
        self.send(AudioCmd::Seek {
            position,
            generation,
        });
    }

    fn poll_event(&mut self) -> Option<TaggedEvent> {
        self.events.try_recv().ok()
    }

    fn shutdown(&mut self, fade_out: Duration) {
        self.quit(fade_out);
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.quit(Duration::ZERO);
    }
}
