use crate::config::EndOfQueueSetting;
use crate::queue::{Queue, SharedTrack};

/// What happens when playback runs past the last playable track.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueEnd {
    Stop,
    /// Continue at the first playable track.
    Wrap,
    /// Append these tracks and continue with the first playable one.
    Extend(Vec<SharedTrack>),
}

pub trait EndOfQueuePolicy {
    fn on_end(&mut self, queue: &Queue) -> QueueEnd;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StopAtEnd;

impl EndOfQueuePolicy for StopAtEnd {
    fn on_end(&mut self, _queue: &Queue) -> QueueEnd {
        QueueEnd::Stop
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WrapAround;

impl EndOfQueuePolicy for WrapAround {
    fn on_end(&mut self, _queue: &Queue) -> QueueEnd {
        QueueEnd::Wrap
    }
}

/// Asks a provider for more tracks; an empty answer stops playback.
pub struct ContinueWith<F>(pub F);

impl<F> EndOfQueuePolicy for ContinueWith<F>
where
    F: FnMut(&Queue) -> Vec<SharedTrack>,
{
    fn on_end(&mut self, queue: &Queue) -> QueueEnd {
        let more = (self.0)(queue);
        if more.is_empty() {
            QueueEnd::Stop
        } else {
            QueueEnd::Extend(more)
        }
    }
}

impl From<EndOfQueueSetting> for Box<dyn EndOfQueuePolicy> {
    fn from(setting: EndOfQueueSetting) -> Self {
        match setting {
            EndOfQueueSetting::Stop => Box::new(StopAtEnd),
            EndOfQueueSetting::Wrap => Box::new(WrapAround),
        }
    }
}
