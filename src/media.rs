//! OS-level "now playing" integration.
//!
//! A `MediaControls` surface only stores what it is given: metadata, a
//! playback status and one handler per transport action. `MediaBinding`
//! owns the surface and performs the registration dance, so a handler from an
//! older registration can never act on newer session state.

mod binding;
mod types;

pub use binding::*;
pub use types::*;

#[cfg(test)]
mod tests;
