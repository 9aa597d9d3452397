//! Track records: the canonical, already-normalized shape the playback
//! session consumes.
//!
//! Upstream catalog payloads use several naming conventions for the same
//! data. `raw` mirrors those payloads leniently and `resolve` folds them into
//! one `TrackRecord` at ingestion time, so nothing downstream ever looks at a
//! field-name variant again.

mod model;
mod raw;
mod resolve;

pub use model::*;
