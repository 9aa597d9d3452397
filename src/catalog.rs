//! Catalog ingestion: pull the track list out of a catalog JSON document.
//!
//! Upstream responses wrap the list differently depending on the endpoint;
//! `TRACK_LIST_POINTERS` names every wrapper we accept, in order.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::queue::SharedTrack;
use crate::track::TrackRecord;

/// JSON pointers to the track array, tried in order. `""` is a bare array.
const TRACK_LIST_POINTERS: &[&str] = &[
    "",
    "/data/tracks",
    "/data/songs/results",
    "/songs/results",
    "/data/results",
];

/// Read and normalize the catalog at `path`.
pub fn load_tracks(path: &Path) -> Result<Vec<SharedTrack>, CatalogError> {
    let text = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&text)?;
    let tracks = tracks_from_document(&document)?;
    info!(
        path = %path.display(),
        tracks = tracks.len(),
        playable = tracks.iter().filter(|t| t.is_playable()).count(),
        "catalog loaded"
    );
    Ok(tracks)
}

/// Normalize every record in the document's track list.
///
/// Records that cannot be normalized are skipped; records without a playable
/// source are kept and stay inert.
pub fn tracks_from_document(document: &Value) -> Result<Vec<SharedTrack>, CatalogError> {
    let records = TRACK_LIST_POINTERS
        .iter()
        .find_map(|pointer| document.pointer(pointer).and_then(Value::as_array))
        .ok_or(CatalogError::NoTrackList)?;

    let tracks = records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| match TrackRecord::from_json(record) {
            Ok(track) => Some(Arc::new(track)),
            Err(e) => {
                warn!(index = i, "skipping catalog record: {e}");
                None
            }
        })
        .collect();
    Ok(tracks)
}
