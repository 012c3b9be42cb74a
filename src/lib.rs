// src/lib.rs
// BookHub - Personal book library core
//
// Architecture:
// - Domain-centric: entities and invariants live in `domain`
// - Event-driven: services publish ordered, index-addressed change events
// - Explicit: no implicit behavior, no ambient globals (the session is an
//   owned value with a set/clear lifecycle)
// - Three representations of every book: in-memory working set, on-device
//   downloaded cache, remote account store. The services enforce the
//   consistency policy between them.

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod metadata;
pub mod repositories;
pub mod services;

// ============================================================================
// INTEGRATIONS
// ============================================================================

pub mod integrations;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_book,
    // Book
    Book,
    BookForDeletion,
    BookUpdate,
    CoverImage,
    PageDimensions,
    // Session
    Session,
    // Tag
    Tag,
    COVER_JPEG_QUALITY,
    MAX_COVER_HEIGHT,
    MAX_COVER_WIDTH,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{LibraryError, LibraryResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    register_cover_handler,
    register_storage_handlers,
    // Boundary completions
    BookContentDownloaded,
    // Collection events
    BookCoverGenerated,
    BookDataChanged,
    BookDeletionEnded,
    BookDeletionStarted,
    // Storage events
    BookDownloadFinished,
    BookInsertionEnded,
    BookInsertionStarted,
    BookTagsChanged,
    CoverReady,
    DomainEvent,
    EventBus,
    EventLogEntry,
    RemoteBooksLoaded,
    RemoteBooksMetadataReady,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{
    create_connection_pool, default_library_base_dir, initialize_database, ConnectionPool,
};

// ============================================================================
// PUBLIC API - Boundaries
// ============================================================================

pub use metadata::MetadataProvider;

pub use repositories::{DownloadedBooksTracker, SqliteDownloadedBooksTracker};

pub use integrations::{BookStorageGateway, HttpBookStorageGateway};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    // Collection Manager
    BookService,
    // Synchronization Manager
    BookStorageService,
    BOOK_COVER_PREFIX,
    BOOK_COVER_TYPE,
    DOWNLOADED_BOOK_EXTENSION,
};
