//! Source retrieval: remote urls over HTTP(S), everything else from disk.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::error::DeviceError;

/// Fetched source bytes, cheap to clone for each sink rebuild.
#[derive(Debug, Clone)]
pub(crate) struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for SharedBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

/// Where a source url points.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SourceLocation<'a> {
    Remote(&'a str),
    Local(&'a Path),
}

impl<'a> SourceLocation<'a> {
    pub(crate) fn parse(url: &'a str) -> Self {
        let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return SourceLocation::Remote(url);
        }
        match url.strip_prefix("file://") {
            Some(path) => SourceLocation::Local(Path::new(path)),
            None => SourceLocation::Local(Path::new(url)),
        }
    }
}

pub(crate) struct Fetcher {
    agent: Agent,
    max_bytes: u64,
}

impl Fetcher {
    pub(crate) fn new(timeout: Duration, max_bytes: u64) -> Self {
        let config = Agent::config_builder().timeout_global(Some(timeout)).build();
        Self {
            agent: config.into(),
            max_bytes,
        }
    }

    pub(crate) fn fetch(&self, url: &str) -> Result<SharedBytes, DeviceError> {
        let bytes = match SourceLocation::parse(url) {
            SourceLocation::Remote(url) => self.fetch_remote(url)?,
            SourceLocation::Local(path) => {
                let file = File::open(path)
                    .map_err(|e| DeviceError::Io(format!("{}: {e}", path.display())))?;
                read_bounded(file, self.max_bytes)?
            }
        };
        debug!(url, bytes = bytes.len(), "source fetched");
        Ok(bytes.into())
    }

    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, DeviceError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| DeviceError::Fetch(format!("{url}: {e}")))?;
        let (_parts, body) = response.into_parts();
        read_bounded(body.into_reader(), self.max_bytes)
    }
}

/// Read at most `max_bytes`; anything longer is rejected rather than truncated.
pub(crate) fn read_bounded(reader: impl Read, max_bytes: u64) -> Result<Vec<u8>, DeviceError> {
    let mut buf = Vec::new();
    reader
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|e| DeviceError::Io(e.to_string()))?;
    if buf.len() as u64 > max_bytes {
        return Err(DeviceError::Fetch(format!(
            "source is larger than {max_bytes} bytes"
        )));
    }
    Ok(buf)
}
