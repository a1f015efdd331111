//! Byte sources that resolve an upload location to its raw bytes.

use crate::error::{Error, Result};
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

/// Something that can fetch the bytes behind an upload location.
pub trait ByteSource {
    /// Fetch all bytes at `location`.
    fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// Fetches uploads over HTTP(S) with a bounded request time.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    /// Create a source whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl ByteSource for HttpSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        debug!("downloading {}", location);

        let response = self.client.get(location).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Download(format!("{} returned {}", location, status)));
        }

        Ok(response.bytes()?.to_vec())
    }
}

/// Reads uploads from the local file system.
///
/// Locations are file paths, optionally relative to `base`.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    base: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against `base`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }
}

impl ByteSource for FileSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let path = match &self.base {
            Some(base) => base.join(location),
            None => PathBuf::from(location),
        };

        std::fs::read(&path)
            .map_err(|e| Error::Download(format!("{}: {}", path.display(), e)))
    }
}

/// Sends `http://` and `https://` locations to an [`HttpSource`] and
/// everything else to a [`FileSource`].
pub struct AutoSource {
    http: HttpSource,
    files: FileSource,
}

impl AutoSource {
    pub fn new(http: HttpSource, files: FileSource) -> Self {
        Self { http, files }
    }
}

impl ByteSource for AutoSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if location.starts_with("http://") || location.starts_with("https://") {
            self.http.fetch(location)
        } else {
            self.files.fetch(location)
        }
    }
}
