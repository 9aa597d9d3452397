//! Audio output: one rodio sink driven from a dedicated thread.
//!
//! The session talks to the thread through `AudioOutput`. Every event the
//! thread reports carries the `Generation` of the load it belongs to, so the
//! session can drop events from a source it has already replaced.

mod fetch;
mod output;
mod player;
mod sink;
mod thread;
mod types;

pub use output::AudioOutput;
pub use player::AudioPlayer;
pub use types::{DeviceEvent, Generation, TaggedEvent};
