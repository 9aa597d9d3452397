use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::config::AudioSettings;
use crate::error::DeviceError;

use super::fetch::{Fetcher, SharedBytes};
use super::sink::create_sink_at;
use super::types::{AudioCmd, DeviceEvent, Generation, TaggedEvent};

const TICK: Duration = Duration::from_millis(200);

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<TaggedEvent>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!("no audio output device: {e}");
                None
            }
        };

        let mut engine = Engine::new(stream, audio_settings, events);
        let mut last_tick = Instant::now();

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    engine.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => engine.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            if last_tick.elapsed() >= TICK {
                engine.tick();
                last_tick = Instant::now();
            }
        }
        debug!("audio thread exiting");
    })
}

/// State owned by the audio thread: the output stream, the single live sink
/// and the bytes it was built from.
pub(super) struct Engine {
    stream: Option<OutputStream>,
    fetcher: Fetcher,
    settings: AudioSettings,
    events: Sender<TaggedEvent>,

    sink: Option<Sink>,
    bytes: Option<SharedBytes>,
    generation: Generation,
    playing: bool,
    volume: f32,
    duration: Option<Duration>,

    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    ended_reported: bool,
}

impl Engine {
    pub(super) fn new(
        stream: Option<OutputStream>,
        settings: AudioSettings,
        events: Sender<TaggedEvent>,
    ) -> Self {
        let fetcher = Fetcher::new(
            Duration::from_secs(settings.fetch_timeout_secs),
            settings.max_source_bytes,
        );
        Self {
            stream,
            fetcher,
            settings,
            events,
            sink: None,
            bytes: None,
            generation: Generation::default(),
            playing: false,
            volume: 1.0,
            duration: None,
            started_at: None,
            accumulated: Duration::ZERO,
            ended_reported: false,
        }
    }

    pub(super) fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load { url, generation } => self.load(&url, generation),
            AudioCmd::SetPlaying(playing) => self.set_playing(playing),
            AudioCmd::SetVolume(volume) => self.set_volume(volume),
            AudioCmd::Seek {
                position,
                generation,
            } => self.seek(position, generation),
            AudioCmd::Quit { fade_out_ms } => self.quit(fade_out_ms),
        }
    }

    fn emit(&self, event: DeviceEvent) {
        let _ = self.events.send(TaggedEvent {
            generation: self.generation,
            event,
        });
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn stop_current(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.bytes = None;
        self.duration = None;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn fail(&mut self, error: DeviceError) {
        warn!(generation = %self.generation, "audio device error: {error}");
        self.stop_current();
        self.playing = false;
        self.emit(DeviceEvent::Error(error));
    }

    fn load(&mut self, url: &str, generation: Generation) {
        self.generation = generation;
        self.ended_reported = false;

        let Some(stream) = self.stream.as_ref() else {
            self.fail(DeviceError::Unavailable(
                "no default output stream".to_string(),
            ));
            return;
        };

        let loaded = self
            .fetcher
            .fetch(url)
            .and_then(|bytes| create_sink_at(stream, &bytes, Duration::ZERO).map(|s| (bytes, s)));
        let (bytes, (new_sink, duration)) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                self.fail(e);
                return;
            }
        };

        new_sink.set_volume(self.volume);
        match self.sink.take() {
            Some(old_sink) if self.playing => self.crossfade(&old_sink, &new_sink),
            Some(old_sink) => old_sink.stop(),
            None => {}
        }

        if self.playing {
            new_sink.play();
            self.started_at = Some(Instant::now());
        } else {
            self.started_at = None;
        }
        self.sink = Some(new_sink);
        self.bytes = Some(bytes);
        self.duration = duration;
        self.accumulated = Duration::ZERO;

        info!(generation = %generation, ?duration, "source loaded");
        self.emit(DeviceEvent::Loaded { duration });
    }

    /// Fade `old` out and `new` in. A zero crossfade is a hard swap.
    fn crossfade(&self, old: &Sink, new: &Sink) {
        let crossfade_ms = self.settings.crossfade_ms;
        let crossfade_steps = self.settings.crossfade_steps.max(1);
        if crossfade_ms == 0 {
            old.stop();
            return;
        }

        new.set_volume(0.0);
        new.play();
        // Fade volumes in a short blocking loop; audio continues in rodio's mixer thread.
        for step in 1..=crossfade_steps {
            let t = (step as f32) / (crossfade_steps as f32);
            old.set_volume(self.volume * (1.0 - t));
            new.set_volume(self.volume * t);
            thread::sleep(Duration::from_millis(
                (crossfade_ms / crossfade_steps).max(1),
            ));
        }
        old.stop();
    }

    fn set_playing(&mut self, playing: bool) {
        if playing == self.playing {
            return;
        }
        self.playing = playing;
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if playing {
            sink.play();
            self.started_at = Some(Instant::now());
        } else {
            sink.pause();
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(volume);
        }
    }

    /// Scrubbing: rebuild the current sink and skip into the source.
    fn seek(&mut self, position: Duration, generation: Generation) {
        self.generation = generation;
        let (Some(stream), Some(bytes)) = (self.stream.as_ref(), self.bytes.as_ref()) else {
            debug!("seek ignored: nothing loaded");
            return;
        };
        let position = match self.duration {
            Some(d) => position.min(d),
            None => position,
        };

        let new_sink = match create_sink_at(stream, bytes, position) {
            Ok((sink, _)) => sink,
            Err(e) => {
                self.fail(e);
                return;
            }
        };
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        new_sink.set_volume(self.volume);
        if self.playing {
            new_sink.play();
            self.started_at = Some(Instant::now());
        } else {
            self.started_at = None;
        }
        self.sink = Some(new_sink);
        self.accumulated = position;
        self.ended_reported = false;
        self.emit(DeviceEvent::TimeUpdate(position));
    }

    /// Periodic position report and end-of-source detection.
    pub(super) fn tick(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        let drained = sink.empty();
        if self.end_due(drained) {
            self.ended_reported = true;
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            debug!(generation = %self.generation, "source ended");
            self.emit(DeviceEvent::Ended);
        }
        if drained {
            return;
        }
        if self.playing {
            self.emit(DeviceEvent::TimeUpdate(self.elapsed()));
        }
    }

    /// A drained sink counts as ended only while playing; a paused seek to
    /// the very end waits for the next `play`.
    pub(super) fn end_due(&self, drained: bool) -> bool {
        drained && self.playing && !self.ended_reported
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.take() {
            // Fade out gently before stopping.
            if self.playing {
                fade_out_sink(&s, self.volume, fade_out_ms);
            }
            s.stop();
        }
        self.playing = false;
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
