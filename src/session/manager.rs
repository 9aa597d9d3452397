use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::{AudioOutput, DeviceEvent, Generation, TaggedEvent};
use crate::config::Settings;
use crate::error::PlaybackError;
use crate::media::{
    MediaAction, MediaBinding, MediaControls, MediaMetadata, MetadataDefaults, PlaybackStatus,
};
use crate::queue::{
    NextStep, PreviousStep, Queue, RepeatMode, SharedTrack, TransportState, clamp_volume,
};

use super::policy::{EndOfQueuePolicy, QueueEnd, StopAtEnd};

/// Tunables the session reads at construction.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub volume: f32,
    pub repeat: RepeatMode,
    /// `previous` restarts the track once it has played this long.
    pub previous_restart_threshold: Duration,
    /// Step for the media seek-backward/forward actions.
    pub seek_step: Duration,
    pub quit_fade_out: Duration,
    pub metadata: MetadataDefaults,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            repeat: RepeatMode::Off,
            previous_restart_threshold: Duration::from_secs(3),
            seek_step: Duration::from_secs(5),
            quit_fade_out: Duration::from_millis(300),
            metadata: MetadataDefaults::default(),
        }
    }
}

impl From<&Settings> for SessionOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            volume: settings.playback.volume,
            repeat: settings.playback.repeat.into(),
            previous_restart_threshold: settings.playback.previous_restart_threshold(),
            seek_step: settings.controls.seek_step(),
            quit_fade_out: settings.audio.quit_fade_out(),
            metadata: settings.media.metadata_defaults(),
        }
    }
}

/// Owns the queue and transport state and keeps the audio output and the
/// media surface in line with them.
///
/// All mutation goes through `&mut self`, so there is exactly one writer.
/// Failures are returned to the caller and also kept in an error slot for
/// presentation; none of them leave the session unusable.
pub struct PlaybackSession<A: AudioOutput, M: MediaControls> {
    queue: Queue,
    transport: TransportState,
    audio: A,
    media: MediaBinding<M>,
    policy: Box<dyn EndOfQueuePolicy>,
    options: SessionOptions,

    /// Generation of the live audio binding; events tagged otherwise are stale.
    generation: Generation,
    /// Url the live audio binding was loaded from.
    bound_url: Option<String>,
    error: Option<PlaybackError>,
}

impl<A: AudioOutput, M: MediaControls> PlaybackSession<A, M> {
    pub fn new(mut audio: A, surface: M, options: SessionOptions) -> Self {
        let transport = TransportState::new(options.volume, options.repeat);
        audio.set_volume(transport.volume);
        let mut media = MediaBinding::new(surface);
        media.set_status(PlaybackStatus::Stopped);
        Self {
            queue: Queue::default(),
            transport,
            audio,
            media,
            policy: Box::new(StopAtEnd),
            options,
            generation: Generation::default(),
            bound_url: None,
            error: None,
        }
    }

    pub fn set_end_of_queue_policy(&mut self, policy: Box<dyn EndOfQueuePolicy>) {
        self.policy = policy;
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn transport(&self) -> &TransportState {
        &self.transport
    }

    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.queue.active().is_none() {
            PlaybackStatus::Stopped
        } else if self.transport.playing {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Paused
        }
    }

    #[cfg(test)]
    pub(crate) fn audio(&self) -> &A {
        &self.audio
    }

    /// Play `track` within `queue_hint`: resume it where the hint already
    /// holds it, otherwise append it. On `NoPlayableSource` nothing changes.
    pub fn play_track(
        &mut self,
        track: SharedTrack,
        queue_hint: Vec<SharedTrack>,
    ) -> Result<(), PlaybackError> {
        let queue = Queue::resume_or_enqueue(track, queue_hint);
        if let Some(Err(e)) = queue.active().map(|t| t.audio_url()) {
            return self.record(Err(e));
        }

        let resume =
            self.queue.active_id() == queue.active_id() && !self.transport.finished;
        self.queue = queue;
        self.transport.playing = true;
        let result = self.bind_active(!resume);
        self.sync_media();
        self.record(result)
    }

    pub fn toggle_play_pause(&mut self) -> Result<(), PlaybackError> {
        if self.transport.playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Resume the active track; after the queue ran out it starts over.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        if self.queue.active().is_none() {
            return Ok(());
        }
        let restart = self.transport.finished;
        self.transport.playing = true;
        let result = self.bind_active(restart);
        if result.is_err() {
            self.transport.playing = false;
        }
        self.sync_status();
        self.record(result)
    }

    pub fn pause(&mut self) {
        self.transport.playing = false;
        self.audio.set_playing(false);
        self.sync_status();
    }

    pub fn next(&mut self) -> Result<(), PlaybackError> {
        let result = self.advance(false);
        self.record(result)
    }

    /// Step back while the track has only just started, otherwise restart it.
    pub fn previous(&mut self) -> Result<(), PlaybackError> {
        let step = self
            .queue
            .previous_step(self.transport.position, self.options.previous_restart_threshold);
        let result = match step {
            None | Some(PreviousStep::Stay) => Ok(()),
            Some(PreviousStep::Restart) => self.bind_active(true),
            Some(PreviousStep::MoveTo(i)) => self.move_to(i),
        };
        self.record(result)
    }

    /// Seek within the active track; clamped to its duration when known.
    pub fn seek_to(&mut self, position: Duration) {
        if self.bound_url.is_none() {
            debug!("seek ignored: no source bound");
            return;
        }
        let position = self.transport.clamp_seek(position);
        self.transport.seek_target = position;
        self.transport.position = position;
        self.transport.finished = false;
        self.seek_fenced(position);
    }

    /// Seek relative to the current position, floored at 0.
    pub fn seek_by(&mut self, delta_secs: f64) {
        if !delta_secs.is_finite() {
            return;
        }
        let target = (self.transport.position.as_secs_f64() + delta_secs).max(0.0);
        self.seek_to(Duration::try_from_secs_f64(target).unwrap_or(Duration::MAX));
    }

    /// Clamp to `[0, 1]`; a no-op when the clamped value is unchanged.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = clamp_volume(volume);
        if volume == self.transport.volume {
            return;
        }
        self.transport.volume = volume;
        self.audio.set_volume(volume);
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.transport.repeat = repeat;
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.transport.repeat = self.transport.repeat.cycle();
        self.transport.repeat
    }

    /// Make `index` active. Out-of-range or inert positions leave everything
    /// as it was.
    pub fn set_active_by_index(&mut self, index: usize) -> Result<(), PlaybackError> {
        let result = self.move_to(index);
        self.record(result)
    }

    /// Apply one device event; events from a replaced binding are dropped.
    pub fn handle_device_event(&mut self, tagged: TaggedEvent) {
        if tagged.generation != self.generation || self.bound_url.is_none() {
            debug!(
                event_generation = %tagged.generation,
                current_generation = %self.generation,
                event = ?tagged.event,
                "discarding stale device event"
            );
            return;
        }

        match tagged.event {
            DeviceEvent::Loaded { duration } => {
                if duration.is_some() {
                    self.transport.duration = duration;
                }
            }
            DeviceEvent::TimeUpdate(position) => {
                self.transport.position = self.transport.clamp_seek(position);
            }
            DeviceEvent::Ended => {
                debug!(track = ?self.queue.active_id(), "track ended");
                let result = self.advance(true);
                let _ = self.record(result);
            }
            DeviceEvent::Error(e) => {
                self.transport.playing = false;
                self.bound_url = None;
                self.audio.set_playing(false);
                self.sync_status();
                let _ = self.record(Err::<(), _>(PlaybackError::Device(e)));
            }
        }
    }

    pub fn handle_media_action(&mut self, action: MediaAction) {
        debug!(?action, "media action");
        let step = self.options.seek_step.as_secs_f64();
        // Errors are already in the error slot.
        let _ = match action {
            MediaAction::Play => self.play(),
            MediaAction::Pause => {
                self.pause();
                Ok(())
            }
            MediaAction::Previous => self.previous(),
            MediaAction::Next => self.next(),
            MediaAction::SeekBackward => {
                self.seek_by(-step);
                Ok(())
            }
            MediaAction::SeekForward => {
                self.seek_by(step);
                Ok(())
            }
        };
    }

    /// Drain pending device events and media actions. Returns how many were
    /// applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.audio.poll_event() {
            self.handle_device_event(event);
            applied += 1;
        }
        while let Some(action) = self.media.poll() {
            self.handle_media_action(action);
            applied += 1;
        }
        applied
    }

    /// Release the media surface and stop audio with a soft fade.
    pub fn shutdown(&mut self) {
        info!("shutting down playback session");
        self.media.release();
        self.transport.playing = false;
        self.bound_url = None;
        self.generation = self.generation.next();
        self.audio.shutdown(self.options.quit_fade_out);
    }

    fn record<T>(&mut self, result: Result<T, PlaybackError>) -> Result<T, PlaybackError> {
        if let Err(e) = &result {
            warn!("{e}");
            self.error = Some(e.clone());
        }
        result
    }

    /// `next` and natural end of track share this path; `natural` forces
    /// playback on and marks a stop at the end of the queue as finished.
    fn advance(&mut self, natural: bool) -> Result<(), PlaybackError> {
        if natural {
            self.transport.playing = true;
        }
        match self.queue.next_step(self.transport.repeat) {
            None => Ok(()),
            Some(NextStep::Restart) => {
                let result = self.bind_active(true);
                self.sync_status();
                result
            }
            Some(NextStep::MoveTo(i)) => self.move_to(i),
            Some(NextStep::EndOfQueue) => self.end_of_queue(natural),
        }
    }

    fn end_of_queue(&mut self, natural: bool) -> Result<(), PlaybackError> {
        match self.policy.on_end(&self.queue) {
            QueueEnd::Wrap => match self.queue.first_playable() {
                Some(i) => self.move_to(i),
                None => {
                    self.stop_at_end(natural);
                    Ok(())
                }
            },
            QueueEnd::Extend(more) if !more.is_empty() => {
                let from = self.queue.active_index().map_or(0, |i| i + 1);
                info!(added = more.len(), "extending queue at its end");
                self.queue = self.queue.extended(more);
                match self.queue.first_playable_from(from) {
                    Some(i) => self.move_to(i),
                    None => {
                        self.sync_media();
                        self.stop_at_end(natural);
                        Ok(())
                    }
                }
            }
            QueueEnd::Stop | QueueEnd::Extend(_) => {
                self.stop_at_end(natural);
                Ok(())
            }
        }
    }

    fn stop_at_end(&mut self, natural: bool) {
        info!("end of queue");
        self.transport.playing = false;
        self.transport.finished = natural;
        self.audio.set_playing(false);
        self.sync_status();
    }

    fn move_to(&mut self, index: usize) -> Result<(), PlaybackError> {
        let queue = self.queue.with_active(index)?;
        if let Some(track) = queue.active() {
            track.audio_url()?;
        }
        self.queue = queue;
        let result = self.bind_active(true);
        self.sync_media();
        result
    }

    /// Bring the audio binding in line with the active track. A changed url
    /// reloads under a fresh generation; the same url is only restarted from
    /// 0 when `restart` is set.
    fn bind_active(&mut self, restart: bool) -> Result<(), PlaybackError> {
        let Some(track) = self.queue.active().cloned() else {
            self.bound_url = None;
            self.generation = self.generation.next();
            self.transport.playing = false;
            self.audio.set_playing(false);
            return Ok(());
        };
        let url = track.audio_url()?;

        if self.bound_url.as_deref() == Some(url) {
            if restart {
                debug!(track = %track.id, "restarting track");
                let duration = self.transport.duration;
                self.transport.reset_for_track(duration);
                self.seek_fenced(Duration::ZERO);
            }
        } else {
            let generation = self.generation.next();
            if let Err(e) = self.audio.load(url, generation) {
                self.bound_url = None;
                return Err(e);
            }
            info!(track = %track.id, %generation, "loading track");
            self.generation = generation;
            self.bound_url = Some(url.to_string());
            self.transport.reset_for_track(track.duration);
            self.error = None;
        }
        self.audio.set_playing(self.transport.playing);
        Ok(())
    }

    /// Seek under a fresh generation so position and end events queued
    /// before the seek no longer apply.
    fn seek_fenced(&mut self, position: Duration) {
        self.generation = self.generation.next();
        self.audio.set_seek(position, self.generation);
    }

    fn sync_media(&mut self) {
        let metadata = self
            .queue
            .active()
            .map(|t| MediaMetadata::for_track(t, &self.options.metadata));
        self.media.reconcile(metadata);
        self.sync_status();
    }

    fn sync_status(&mut self) {
        let status = self.status();
        self.media.set_status(status);
    }
}
