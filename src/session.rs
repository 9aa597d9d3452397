//! The playback session: one owner for the queue, the transport state and
//! both device adapters.
//!
//! Presentation code calls the public operations and reads `queue()` /
//! `transport()`; the event loop calls `pump()` so device events and media
//! actions flow back through the same single writer.

mod manager;
mod policy;

pub use manager::*;
pub use policy::*;
