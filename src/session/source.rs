//! Snapshot providers.
//!
//! The graph endpoint of the administrative UI serves the snapshot document;
//! saved copies of it on disk are accepted as well, which is what the tests
//! and the `layout` command use.

use crate::core::error::{SnapshotError, SnapshotResult};
use crate::graph::snapshot::GraphSnapshot;
use log::trace;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for HTTP fetches.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that can produce graph snapshots.
pub trait SnapshotSource {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// Fetch the current snapshot.
    fn fetch(&self) -> SnapshotResult<GraphSnapshot>;
}

/// Reads a snapshot document from a file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    /// Read snapshots from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File read on every fetch.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> SnapshotResult<GraphSnapshot> {
        trace!("reading snapshot from {}", self.path.display());
        let bytes = std::fs::read(&self.path)?;
        Ok(GraphSnapshot::from_slice(&bytes)?)
    }
}

/// Fetches the snapshot document over HTTP.
pub struct HttpSnapshotSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpSnapshotSource {
    /// Fetch from `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Fetch from `url`, giving up after `timeout`.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    /// Endpoint requested on every fetch.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SnapshotSource for HttpSnapshotSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> SnapshotResult<GraphSnapshot> {
        trace!("fetching snapshot from {}", self.url);
        let response = self.agent.get(&self.url).call().map_err(|e| SnapshotError::Http {
            url: self.url.clone(),
            error: e.to_string(),
        })?;
        let body = response.into_string()?;
        Ok(GraphSnapshot::from_json(&body)?)
    }
}

/// A source for `location`: HTTP(S) URLs are fetched, anything else is read
/// as a file path.
pub fn source_for(location: &str) -> Box<dyn SnapshotSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSnapshotSource::new(location))
    } else {
        Box::new(FileSnapshotSource::new(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"nodes": [{{"id": 1, "name": "mic", "mediaClass": "Audio/Source"}}]}}"#).unwrap();

        let source = FileSnapshotSource::new(file.path());
        let snapshot = source.fetch().unwrap();
        assert_eq!(snapshot.nodes.len(), 1);
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    #[test]
    fn test_file_source_errors() {
        let missing = FileSnapshotSource::new("/nonexistent/graph.json");
        assert!(matches!(missing.fetch(), Err(SnapshotError::Io(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let malformed = FileSnapshotSource::new(file.path());
        let err = malformed.fetch().unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_source_for_location() {
        assert_eq!(source_for("http://fpp.local/api/pipewire/graph").describe(), "http://fpp.local/api/pipewire/graph");
        assert_eq!(source_for("graph.json").describe(), "graph.json");
    }
}
