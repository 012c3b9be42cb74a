// src/services/storage_service.rs
//
// Dual-Store Synchronization Manager: keeps the local tracker and the remote
// gateway consistent with the intended state of the library.
//
// POLICY:
// - The remote store is authoritative for every book regardless of download
//   status
// - The local tracker holds only entries currently marked `downloaded`
// - Calls toward both stores are fire-and-forget: the two legs of a dual
//   write are independent, with no atomicity and no compensation; failures
//   are logged and absorbed

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::{Book, BookForDeletion, CoverImage, Session};
use crate::error::LibraryResult;
use crate::events::{BookDownloadFinished, EventBus, RemoteBooksLoaded};
use crate::integrations::BookStorageGateway;
use crate::repositories::DownloadedBooksTracker;

/// Deterministic artifact naming under the tracker's library directory
pub const BOOK_COVER_PREFIX: &str = "cover_";
pub const BOOK_COVER_TYPE: &str = "jpg";
pub const DOWNLOADED_BOOK_EXTENSION: &str = "pdf";

pub struct BookStorageService {
    gateway: Arc<dyn BookStorageGateway>,
    tracker: Arc<dyn DownloadedBooksTracker>,
    event_bus: Arc<EventBus>,
    session: RwLock<Session>,
}

impl BookStorageService {
    pub fn new(
        gateway: Arc<dyn BookStorageGateway>,
        tracker: Arc<dyn DownloadedBooksTracker>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            gateway,
            tracker,
            event_bus,
            session: RwLock::new(Session::default()),
        }
    }

    // ========================================================================
    // SESSION
    // ========================================================================

    pub fn set_user_data(&self, owner: &str, auth_token: &str) {
        *self.session.write().unwrap() = Session::new(owner, auth_token);

        if let Err(e) = self.tracker.set_library_owner(owner) {
            log::warn!("Setting library owner failed: {}", e);
        }
    }

    pub fn clear_user_data(&self) {
        self.session.write().unwrap().clear();
        self.tracker.clear_library_owner();
    }

    pub fn user_logged_in(&self) -> bool {
        self.session.read().unwrap().is_logged_in()
    }

    fn auth_token(&self) -> String {
        self.session.read().unwrap().token().to_string()
    }

    // ========================================================================
    // DUAL-WRITE OPERATIONS
    // ========================================================================

    pub fn add_book(&self, book: &Book) {
        // Only downloaded books belong in the local library
        if book.downloaded {
            if let Err(e) = self.tracker.track_book(book) {
                log::warn!("Tracking book {} failed: {}", book.uuid, e);
            }
        }

        self.gateway.create_book(&self.auth_token(), book);
    }

    /// Deletion works from the snapshot taken at request time: the live
    /// entry may already be gone from the working set.
    pub fn delete_book(&self, book_to_delete: BookForDeletion) {
        // Books that were never downloaded have nothing to untrack
        if book_to_delete.downloaded {
            if let Err(e) = self.tracker.untrack_book(book_to_delete.uuid) {
                log::warn!("Untracking book {} failed: {}", book_to_delete.uuid, e);
            }
        }

        self.gateway
            .delete_book(&self.auth_token(), book_to_delete.uuid);
    }

    pub fn update_book(&self, book: &Book) {
        // Local leg: only downloaded books have a tracked entry to update
        if book.downloaded {
            if let Err(e) = self.tracker.update_tracked_book(book) {
                log::warn!("Updating tracked book {} failed: {}", book.uuid, e);
            }
        }

        // Remote leg, unconditional
        self.gateway.update_book(&self.auth_token(), book);
    }

    /// Drop the local copy without touching the remote store: the book
    /// becomes reference-only but stays in the account.
    pub fn uninstall_book(&self, uuid: Uuid) {
        if let Err(e) = self.tracker.untrack_book(uuid) {
            log::warn!("Uninstalling book {} failed: {}", uuid, e);
        }
    }

    // ========================================================================
    // DOWNLOADS
    // ========================================================================

    /// Request full content from the remote store. Persistence happens in
    /// `handle_download_finished` once the gateway delivers the bytes.
    pub fn download_book(&self, uuid: Uuid) {
        self.gateway.download_book(&self.auth_token(), uuid);
    }

    /// Gateway download completion. Unconditional: no re-validation that the
    /// book still exists in the working set. A failed open loses the
    /// completion event.
    pub fn handle_download_finished(&self, uuid: Uuid, data: &[u8]) {
        let Some(path) = self.downloaded_book_path(uuid) else {
            log::warn!("No library directory to store download {}", uuid);
            return;
        };

        let mut file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                log::warn!("Could not open {}: {}", path.display(), e);
                return;
            }
        };

        if let Err(e) = file.write_all(data) {
            log::warn!("Could not write {}: {}", path.display(), e);
            return;
        }

        self.event_bus.emit(BookDownloadFinished::new(uuid, path));
    }

    // ========================================================================
    // COVERS
    // ========================================================================

    /// Push the book's cover state to both stores. Absence of a cover is an
    /// explicit remote delete, not a no-op.
    pub fn change_book_cover(&self, book: &Book) {
        self.update_book(book);

        if book.has_cover() {
            match self.book_cover_path(book.uuid) {
                Some(path) => {
                    self.gateway
                        .change_book_cover(&self.auth_token(), book.uuid, &path);
                }
                None => log::warn!("No library directory for cover of {}", book.uuid),
            }
        } else {
            self.gateway.delete_book_cover(&self.auth_token(), book.uuid);
        }
    }

    /// Write a cover image to its deterministic path. Returns the path, or
    /// `None` when the file cannot be opened for writing.
    pub fn save_book_cover_to_file(&self, uuid: Uuid, cover: &CoverImage) -> Option<PathBuf> {
        let path = self.book_cover_path(uuid)?;

        let mut file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                log::warn!("Could not open {}: {}", path.display(), e);
                return None;
            }
        };

        if let Err(e) = file.write_all(cover.as_bytes()) {
            log::warn!("Could not write {}: {}", path.display(), e);
            return None;
        }

        Some(path)
    }

    /// Remove the local cover file. Returns whether removal succeeded.
    pub fn delete_book_cover(&self, uuid: Uuid) -> bool {
        match self.book_cover_path(uuid) {
            Some(path) => std::fs::remove_file(path).is_ok(),
            None => false,
        }
    }

    /// `{library_dir}/cover_{uuid}.jpg`
    pub fn book_cover_path(&self, uuid: Uuid) -> Option<PathBuf> {
        self.tracker
            .library_dir()
            .map(|dir| dir.join(format!("{}{}.{}", BOOK_COVER_PREFIX, uuid, BOOK_COVER_TYPE)))
    }

    /// `{library_dir}/{uuid}.pdf`
    pub fn downloaded_book_path(&self, uuid: Uuid) -> Option<PathBuf> {
        self.tracker
            .library_dir()
            .map(|dir| dir.join(format!("{}.{}", uuid, DOWNLOADED_BOOK_EXTENSION)))
    }

    // ========================================================================
    // BULK LOADING
    // ========================================================================

    /// Synchronous read of the tracker's full tracked set.
    pub fn load_local_books(&self) -> LibraryResult<Vec<Book>> {
        self.tracker.get_tracked_books()
    }

    /// Fire-and-forget listing request; the result arrives through
    /// `handle_remote_listing`.
    pub fn load_remote_books(&self) {
        self.gateway.get_books_metadata(&self.auth_token());
    }

    /// Gateway listing completion.
    ///
    /// The session is re-checked at arrival time, not request time: a
    /// listing in flight across a logout must not surface, else books would
    /// get loaded for a logged-out user.
    pub fn handle_remote_listing(&self, books: &[Book]) {
        if !self.user_logged_in() {
            log::debug!("Discarding remote listing: session is empty");
            return;
        }

        self.event_bus.emit(RemoteBooksLoaded::new(books.to_vec()));
    }
}
