//! Presentation model for the TUI.
//!
//! `App` holds only what the screen needs on top of the playback session:
//! the loaded catalog, the two list cursors and the catalog filter.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
