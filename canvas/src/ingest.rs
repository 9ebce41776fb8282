//! Media ingestion seam.
//!
//! The engine never touches file contents. A [`MediaIngest`] implementation
//! describes each user-supplied file and turns accepted ones into an image
//! handle plus natural size. The browser binding uses object URLs; the headless
//! host mints in-memory handles.

#[cfg(test)]
#[path = "ingest_test.rs"]
mod ingest_test;

use serde::{Deserialize, Serialize};

use crate::doc::ResourceRef;

/// Name and MIME type of a user-supplied file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub mime: String,
}

impl FileInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>) -> Self {
        Self { name: name.into(), mime: mime.into() }
    }

    /// Only `image/*` files become canvas items.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// A displayable image produced by ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedImage {
    pub resource: ResourceRef,
    /// Natural width in pixels; zero when not yet known.
    pub width: f64,
    /// Natural height in pixels; zero when not yet known.
    pub height: f64,
}

/// Why a file did not become a canvas item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("not an image: {mime:?}")]
    NotAnImage { mime: String },
    #[error("could not create image resource: {0}")]
    Resource(String),
}

/// Turns user-supplied files into image handles.
pub trait MediaIngest {
    /// Platform file type (a browser `File`, a script descriptor, ...).
    type File;

    /// Name and MIME type of `file`.
    fn describe(&self, file: &Self::File) -> FileInfo;

    /// Create a displayable handle for an image file.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Resource`] when the platform cannot create a handle.
    fn ingest(&mut self, file: &Self::File) -> Result<IngestedImage, IngestError>;
}

/// Validate `file` and ingest it when it is an image.
///
/// # Errors
///
/// Returns [`IngestError::NotAnImage`] without calling the ingestor when the
/// MIME type is not `image/*`, and propagates ingestion failures otherwise.
pub fn ingest_image<M: MediaIngest>(media: &mut M, file: &M::File) -> Result<IngestedImage, IngestError> {
    let info = media.describe(file);
    if !info.is_image() {
        return Err(IngestError::NotAnImage { mime: info.mime });
    }
    media.ingest(file)
}
