//! Utilities for creating `rodio` sinks from fetched source bytes.
//!
//! The helper here decodes an in-memory source and prepares a paused `Sink`
//! at the requested start position.

use std::io::Cursor;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::DeviceError;

use super::fetch::SharedBytes;

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
///
/// Also returns the total duration when the decoder can tell.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: &SharedBytes,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), DeviceError> {
    let decoder =
        Decoder::new(Cursor::new(bytes.clone())).map_err(|e| DeviceError::Decode(e.to_string()))?;
    let total = decoder.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
