use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::tag::Tag;

/// Largest cover size requested from the metadata provider, in pixels.
pub const MAX_COVER_WIDTH: u32 = 188;
pub const MAX_COVER_HEIGHT: u32 = 238;

/// JPEG quality covers are encoded with at the metadata boundary.
pub const COVER_JPEG_QUALITY: u8 = 20;

/// An encoded cover image (JPEG bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub data: Vec<u8>,
}

impl CoverImage {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Page dimensions of a document, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    pub width: f64,
    pub height: f64,
}

/// A book entry in the library.
///
/// A book exists in up to three places at once: the in-memory working set,
/// the on-device downloaded cache, and the remote account store. The entity
/// itself is plain data; which stores hold it is decided by the services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Immutable identity, unique within the working set
    pub uuid: Uuid,

    pub title: String,
    pub author: String,

    /// Local file path, or a remote reference for books that are not
    /// downloaded
    pub file_path: PathBuf,

    pub creator: String,
    pub creation_date: Option<DateTime<Utc>>,
    pub format: String,

    /// On-disk size in bytes
    pub document_size: u64,

    pub page_dimensions: PageDimensions,
    pub page_count: u32,

    pub added_to_library: DateTime<Utc>,

    /// `None` = never opened
    pub last_opened: Option<DateTime<Utc>>,

    /// Whether the full content is cached locally. Books with
    /// `downloaded == false` exist as metadata only; their content lives
    /// remotely.
    pub downloaded: bool,

    pub cover: Option<CoverImage>,

    /// Unique by exact name match, enforced per book
    pub tags: Vec<Tag>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: String,
        author: String,
        file_path: PathBuf,
        creator: String,
        creation_date: Option<DateTime<Utc>>,
        format: String,
        document_size: u64,
        page_dimensions: PageDimensions,
        page_count: u32,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title,
            author,
            file_path,
            creator,
            creation_date,
            format,
            document_size,
            page_dimensions,
            page_count,
            added_to_library: Utc::now(),
            last_opened: None,
            downloaded: false,
            cover: None,
            tags: Vec::new(),
        }
    }

    /// Add a tag. Returns `false` if a tag with the same name is already
    /// present.
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        if self.tags.iter().any(|t| t.name() == tag.name()) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove a tag by exact name match. Returns `false` if no such tag
    /// exists.
    pub fn remove_tag(&mut self, tag: &Tag) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t.name() != tag.name());
        self.tags.len() != before
    }

    pub fn has_cover(&self) -> bool {
        self.cover.is_some()
    }

    /// Merge a partial update into this entry. Identity and position are
    /// unchanged; only `Some` fields are applied.
    pub fn apply_update(&mut self, update: BookUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if let Some(file_path) = update.file_path {
            self.file_path = file_path;
        }
        if let Some(last_opened) = update.last_opened {
            self.last_opened = last_opened;
        }
        if let Some(downloaded) = update.downloaded {
            self.downloaded = downloaded;
        }
        if let Some(cover) = update.cover {
            self.cover = cover;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
    }
}

/// Statically-typed partial update: one optional field per updatable
/// attribute. Double options carry "set to absent" for nullable fields.
#[derive(Debug, Clone, Default)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub file_path: Option<PathBuf>,
    pub last_opened: Option<Option<DateTime<Utc>>>,
    pub downloaded: Option<bool>,
    pub cover: Option<Option<CoverImage>>,
    pub tags: Option<Vec<Tag>>,
}

/// Immutable deletion intent, snapshotted at request time so deletion policy
/// never depends on re-reading a possibly-removed live entry.
#[derive(Debug, Clone, Copy)]
pub struct BookForDeletion {
    pub uuid: Uuid,
    pub downloaded: bool,
}

impl BookForDeletion {
    pub fn from_book(book: &Book) -> Self {
        Self {
            uuid: book.uuid,
            downloaded: book.downloaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tag::Tag;

    fn sample_book() -> Book {
        Book::new(
            "The Name of the Wind".to_string(),
            "Patrick Rothfuss".to_string(),
            PathBuf::from("/books/notw.pdf"),
            "calibre".to_string(),
            None,
            "pdf".to_string(),
            1_204_224,
            PageDimensions {
                width: 595.0,
                height: 842.0,
            },
            662,
        )
    }

    #[test]
    fn new_book_starts_unopened_and_not_downloaded() {
        let book = sample_book();
        assert!(book.last_opened.is_none());
        assert!(!book.downloaded);
        assert!(book.cover.is_none());
        assert!(book.tags.is_empty());
    }

    #[test]
    fn duplicate_tag_is_rejected() {
        let mut book = sample_book();
        let tag = Tag::new("fantasy").unwrap();
        assert!(book.add_tag(tag.clone()));
        assert!(!book.add_tag(tag));
        assert_eq!(book.tags.len(), 1);
    }

    #[test]
    fn removing_missing_tag_reports_false() {
        let mut book = sample_book();
        let tag = Tag::new("fantasy").unwrap();
        assert!(!book.remove_tag(&tag));
        book.add_tag(tag.clone());
        assert!(book.remove_tag(&tag));
        assert!(book.tags.is_empty());
    }

    #[test]
    fn apply_update_merges_only_some_fields() {
        let mut book = sample_book();
        let original_author = book.author.clone();

        book.apply_update(BookUpdate {
            title: Some("Renamed".to_string()),
            downloaded: Some(true),
            ..Default::default()
        });

        assert_eq!(book.title, "Renamed");
        assert!(book.downloaded);
        assert_eq!(book.author, original_author);
        assert_eq!(book.page_count, 662);
    }

    #[test]
    fn deletion_snapshot_captures_flag_at_request_time() {
        let mut book = sample_book();
        book.downloaded = true;

        let snapshot = BookForDeletion::from_book(&book);
        book.downloaded = false;

        assert!(snapshot.downloaded);
        assert_eq!(snapshot.uuid, book.uuid);
    }
}
