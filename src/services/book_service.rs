// src/services/book_service.rs
//
// Library Collection Manager: owns the authoritative ordered in-memory set
// of book entries and emits index-addressed change events around every
// mutation. Indices are positional and shift when earlier entries are
// removed; an event's index is only valid until the next mutation.

use chrono::Utc;
use std::path::Path;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::{
    Book, BookUpdate, CoverImage, Tag, MAX_COVER_HEIGHT, MAX_COVER_WIDTH,
};
use crate::error::{LibraryError, LibraryResult};
use crate::events::{
    BookCoverGenerated, BookDataChanged, BookDeletionEnded, BookDeletionStarted,
    BookInsertionEnded, BookInsertionStarted, BookTagsChanged, EventBus,
};
use crate::metadata::MetadataProvider;

pub struct BookService {
    books: RwLock<Vec<Book>>,
    metadata_provider: Arc<dyn MetadataProvider>,
    event_bus: Arc<EventBus>,
    auth_token: RwLock<String>,
}

impl BookService {
    pub fn new(metadata_provider: Arc<dyn MetadataProvider>, event_bus: Arc<EventBus>) -> Self {
        Self {
            books: RwLock::new(Vec::new()),
            metadata_provider,
            event_bus,
            auth_token: RwLock::new(String::new()),
        }
    }

    /// Import a local file into the library.
    ///
    /// The document is parsed by the metadata provider; on success the new
    /// entry is appended to the end of the working set and cover generation
    /// is requested fire-and-forget (the result arrives later through
    /// `store_book_cover`).
    pub fn add_book(&self, path: &Path) -> LibraryResult<()> {
        if !self
            .metadata_provider
            .setup_document(path, MAX_COVER_WIDTH, MAX_COVER_HEIGHT)
        {
            return Err(LibraryError::OpeningBookFailed);
        }

        let book = Book::new(
            self.metadata_provider.title(),
            self.metadata_provider.author(),
            path.to_path_buf(),
            self.metadata_provider.creator(),
            self.metadata_provider.creation_date(),
            self.metadata_provider.format(),
            self.metadata_provider.document_size(),
            self.metadata_provider.page_dimensions(),
            self.metadata_provider.page_count(),
        );

        let index = self.books.read().unwrap().len();
        self.event_bus.emit(BookInsertionStarted::new(index));
        self.books.write().unwrap().push(book);
        self.event_bus.emit(BookInsertionEnded::new());

        self.metadata_provider.request_cover();
        Ok(())
    }

    pub fn delete_book(&self, uuid: Uuid) -> LibraryResult<()> {
        let index = self
            .get_book_index(uuid)
            .ok_or(LibraryError::BookDoesNotExist)?;

        self.event_bus.emit(BookDeletionStarted::new(index));
        self.books.write().unwrap().remove(index);
        self.event_bus.emit(BookDeletionEnded::new());

        Ok(())
    }

    /// Merge a partial update into an existing entry. Identity and position
    /// are unchanged.
    pub fn update_book(&self, uuid: Uuid, update: BookUpdate) -> LibraryResult<()> {
        let index = {
            let mut books = self.books.write().unwrap();
            let index = books
                .iter()
                .position(|b| b.uuid == uuid)
                .ok_or(LibraryError::BookDoesNotExist)?;
            books[index].apply_update(update);
            index
        };

        self.event_bus.emit(BookDataChanged::new(index));
        Ok(())
    }

    pub fn add_tag(&self, uuid: Uuid, tag: Tag) -> LibraryResult<()> {
        let index = {
            let mut books = self.books.write().unwrap();
            let index = books
                .iter()
                .position(|b| b.uuid == uuid)
                .ok_or(LibraryError::BookDoesNotExist)?;
            if !books[index].add_tag(tag) {
                return Err(LibraryError::TagAlreadyExists);
            }
            index
        };

        self.event_bus.emit(BookTagsChanged::new(index));
        Ok(())
    }

    pub fn remove_tag(&self, uuid: Uuid, tag: &Tag) -> LibraryResult<()> {
        let index = {
            let mut books = self.books.write().unwrap();
            let index = books
                .iter()
                .position(|b| b.uuid == uuid)
                .ok_or(LibraryError::BookDoesNotExist)?;
            if !books[index].remove_tag(tag) {
                return Err(LibraryError::TagDoesNotExist);
            }
            index
        };

        self.event_bus.emit(BookTagsChanged::new(index));
        Ok(())
    }

    pub fn get_book(&self, uuid: Uuid) -> Option<Book> {
        self.books
            .read()
            .unwrap()
            .iter()
            .find(|b| b.uuid == uuid)
            .cloned()
    }

    /// Mutable access to an entry. Returns `None` for a missing id; emitting
    /// the matching change event stays with the caller.
    pub fn with_book_mut<R>(&self, uuid: Uuid, f: impl FnOnce(&mut Book) -> R) -> Option<R> {
        let mut books = self.books.write().unwrap();
        books.iter_mut().find(|b| b.uuid == uuid).map(f)
    }

    pub fn get_books(&self) -> Vec<Book> {
        self.books.read().unwrap().clone()
    }

    /// Current position of the entry. Transient: shifts whenever an earlier
    /// entry is removed.
    pub fn get_book_index(&self, uuid: Uuid) -> Option<usize> {
        self.books.read().unwrap().iter().position(|b| b.uuid == uuid)
    }

    pub fn get_book_count(&self) -> usize {
        self.books.read().unwrap().len()
    }

    /// Copy the underlying file into `destination_folder`, preserving the
    /// file name.
    pub fn save_book_to_path(&self, uuid: Uuid, destination_folder: &Path) -> LibraryResult<()> {
        let book = self.get_book(uuid).ok_or(LibraryError::BookDoesNotExist)?;

        let file_name = book
            .file_path
            .file_name()
            .ok_or_else(|| LibraryError::OperationFailed("Book has no file name".to_string()))?;

        std::fs::copy(&book.file_path, destination_folder.join(file_name))
            .map_err(|e| LibraryError::OperationFailed(e.to_string()))?;

        Ok(())
    }

    /// Returns `false` only when the id is absent.
    pub fn refresh_last_opened_flag(&self, uuid: Uuid) -> bool {
        if self
            .with_book_mut(uuid, |book| book.last_opened = Some(Utc::now()))
            .is_none()
        {
            return false;
        }

        if let Some(index) = self.get_book_index(uuid) {
            self.event_bus.emit(BookDataChanged::new(index));
        }
        true
    }

    /// Asynchronous cover arrival.
    ///
    /// Attribution is positional: the cover lands on the most recently
    /// appended entry, even if another import started while this cover was
    /// generating.
    pub fn store_book_cover(&self, image: CoverImage) {
        let index = {
            let mut books = self.books.write().unwrap();
            if books.is_empty() {
                return;
            }
            let index = books.len() - 1;
            books[index].cover = Some(image);
            index
        };

        self.event_bus.emit(BookCoverGenerated::new(index));
    }

    /// The token is stored here for consumers that need it alongside the
    /// collection; this service performs no gating itself.
    pub fn set_authentication_token(&self, token: &str) {
        *self.auth_token.write().unwrap() = token.to_string();
    }

    pub fn clear_authentication_token(&self) {
        self.auth_token.write().unwrap().clear();
    }

    pub fn authentication_token(&self) -> String {
        self.auth_token.read().unwrap().clone()
    }
}
