// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - Collection events are index-addressed: the index is the entry's position
//   at emission time and shifts when an earlier entry is removed, so it must
//   be consumed before any further mutation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::{Book, CoverImage};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// COLLECTION EVENTS (index-addressed)
// ============================================================================

/// Emitted immediately before a book is appended to the working set.
/// `index` is the pre-insertion size, i.e. where the entry will land.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookInsertionStarted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub index: usize,
}

impl BookInsertionStarted {
    pub fn new(index: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            index,
        }
    }
}

impl DomainEvent for BookInsertionStarted {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookInsertionStarted"
    }
}

/// Emitted once the append has completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookInsertionEnded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl BookInsertionEnded {
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        }
    }
}

impl Default for BookInsertionEnded {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEvent for BookInsertionEnded {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookInsertionEnded"
    }
}

/// Emitted immediately before a book is removed, with its index at that point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDeletionStarted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub index: usize,
}

impl BookDeletionStarted {
    pub fn new(index: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            index,
        }
    }
}

impl DomainEvent for BookDeletionStarted {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookDeletionStarted"
    }
}

/// Emitted once the removal has completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDeletionEnded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl BookDeletionEnded {
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        }
    }
}

impl Default for BookDeletionEnded {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEvent for BookDeletionEnded {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookDeletionEnded"
    }
}

/// Emitted when an entry's data changed in place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDataChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub index: usize,
}

impl BookDataChanged {
    pub fn new(index: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            index,
        }
    }
}

impl DomainEvent for BookDataChanged {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookDataChanged"
    }
}

/// Emitted when an entry's tag set changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookTagsChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub index: usize,
}

impl BookTagsChanged {
    pub fn new(index: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            index,
        }
    }
}

impl DomainEvent for BookTagsChanged {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookTagsChanged"
    }
}

/// Emitted when a generated cover has been stored on an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookCoverGenerated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub index: usize,
}

impl BookCoverGenerated {
    pub fn new(index: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            index,
        }
    }
}

impl DomainEvent for BookCoverGenerated {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookCoverGenerated"
    }
}

// ============================================================================
// STORAGE EVENTS
// ============================================================================

/// Emitted when a remote listing has been accepted (session still valid at
/// arrival time)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteBooksLoaded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub books: Vec<Book>,
}

impl RemoteBooksLoaded {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            books,
        }
    }
}

impl DomainEvent for RemoteBooksLoaded {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "RemoteBooksLoaded"
    }
}

/// Emitted when downloaded content has been written to its local path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDownloadFinished {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub uuid: Uuid,
    pub path: PathBuf,
}

impl BookDownloadFinished {
    pub fn new(uuid: Uuid, path: PathBuf) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            uuid,
            path,
        }
    }
}

impl DomainEvent for BookDownloadFinished {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookDownloadFinished"
    }
}

// ============================================================================
// BOUNDARY EVENTS (emitted by external collaborators)
// ============================================================================

/// Emitted by the metadata provider when cover generation finishes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverReady {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub image: CoverImage,
}

impl CoverReady {
    pub fn new(image: CoverImage) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            image,
        }
    }
}

impl DomainEvent for CoverReady {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "CoverReady"
    }
}

/// Emitted by the remote gateway when a metadata listing request completes.
/// Raw gateway result; session gating happens in the storage service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteBooksMetadataReady {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub books: Vec<Book>,
}

impl RemoteBooksMetadataReady {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            books,
        }
    }
}

impl DomainEvent for RemoteBooksMetadataReady {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "RemoteBooksMetadataReady"
    }
}

/// Emitted by the remote gateway when a content download completes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookContentDownloaded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub uuid: Uuid,
    pub data: Vec<u8>,
}

impl BookContentDownloaded {
    pub fn new(uuid: Uuid, data: Vec<u8>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            uuid,
            data,
        }
    }
}

impl DomainEvent for BookContentDownloaded {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookContentDownloaded"
    }
}
