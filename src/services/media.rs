//! In-memory media store for headless sessions.
//!
//! Stands in for the browser's object URLs: every ingested file gets a fresh
//! `mem://` handle that stays live until the session releases it. Comparing
//! live handles with live items is how a session proves it never leaks.

use std::collections::HashSet;

use review_canvas::doc::ResourceRef;
use review_canvas::ingest::{FileInfo, IngestError, IngestedImage, MediaIngest};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A file as described by a session script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSpec {
    pub name: String,
    pub mime: String,
    /// Natural pixel size, when the script knows it.
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl FileSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>) -> Self {
        Self { name: name.into(), mime: mime.into(), width: 0.0, height: 0.0 }
    }
}

#[derive(Debug, Default)]
pub struct MemoryMedia {
    live: HashSet<String>,
    minted: u64,
}

impl MemoryMedia {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Free a handle. Returns `false` if it was not live.
    pub fn release(&mut self, resource: &ResourceRef) -> bool {
        if self.live.remove(resource.as_str()) {
            debug!(resource = resource.as_str(), "handle released");
            true
        } else {
            warn!(resource = resource.as_str(), "release of unknown handle");
            false
        }
    }

    #[must_use]
    pub fn is_live(&self, resource: &ResourceRef) -> bool {
        self.live.contains(resource.as_str())
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl MediaIngest for MemoryMedia {
    type File = FileSpec;

    fn describe(&self, file: &FileSpec) -> FileInfo {
        FileInfo::new(file.name.clone(), file.mime.clone())
    }

    fn ingest(&mut self, file: &FileSpec) -> Result<IngestedImage, IngestError> {
        if file.name.is_empty() {
            return Err(IngestError::Resource("file has no name".into()));
        }
        self.minted += 1;
        let handle = format!("mem://{}/{}", self.minted, file.name);
        self.live.insert(handle.clone());
        debug!(%handle, "handle minted");
        Ok(IngestedImage { resource: ResourceRef::new(handle), width: file.width, height: file.height })
    }
}

#[cfg(test)]
#[path = "media_test.rs"]
mod tests;
