//! Queue Store: the ordered track list, its active position and the
//! transport state.
//!
//! Mutation algorithms here are pure: they take a queue and return the next
//! one (or a navigation decision). Side effects on the audio device and the
//! media surface belong to `session`.

mod store;
mod transport;

pub use store::*;
pub use transport::*;

#[cfg(test)]
mod tests;
