// src/metadata/mod.rs
//
// Metadata Source boundary.
//
// Document parsing and cover rendering are external collaborators; this
// module only fixes their contract. A provider is set up against one
// document at a time, answers the metadata accessors for that document, and
// generates covers asynchronously: `request_cover` returns immediately and
// the result arrives later as a `CoverReady` event on the bus.

use chrono::{DateTime, Utc};
use std::path::Path;

use crate::domain::PageDimensions;

/// Capability interface for document metadata extraction.
///
/// Accessors answer for the document most recently set up with
/// `setup_document`. Implementations manage that state internally so the
/// trait stays `&self` (providers are shared behind `Arc`).
#[cfg_attr(test, mockall::automock)]
pub trait MetadataProvider: Send + Sync {
    /// Open and parse the document. Returns `false` when the file cannot be
    /// parsed; accessors are only meaningful after a `true` return.
    fn setup_document(&self, path: &Path, max_cover_width: u32, max_cover_height: u32) -> bool;

    fn title(&self) -> String;
    fn author(&self) -> String;
    fn creator(&self) -> String;
    fn creation_date(&self) -> Option<DateTime<Utc>>;
    fn format(&self) -> String;
    fn document_size(&self) -> u64;
    fn page_dimensions(&self) -> PageDimensions;
    fn page_count(&self) -> u32;

    /// Fire-and-forget cover generation for the current document. The image
    /// arrives later as a `CoverReady` event, JPEG-encoded at
    /// [`crate::domain::COVER_JPEG_QUALITY`].
    fn request_cover(&self);
}
