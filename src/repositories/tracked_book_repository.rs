// src/repositories/tracked_book_repository.rs
//
// Local Tracker: persistence for books whose content is cached on-device.
// Only entries marked `downloaded` ever live here; the remote store is
// authoritative for everything else.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::path::PathBuf;
use std::sync::RwLock;
use uuid::Uuid;

use crate::db::{
    create_connection_pool, default_library_base_dir, initialize_database, ConnectionPool,
};
use crate::domain::{validate_book, Book, PageDimensions, Tag};
use crate::error::{LibraryError, LibraryResult};

/// Capability interface over the downloaded-books store.
///
/// Storage is scoped to a library owner; operations other than owner
/// management fail with `NoLibraryOwner` until an owner is set.
#[cfg_attr(test, mockall::automock)]
pub trait DownloadedBooksTracker: Send + Sync {
    fn track_book(&self, book: &Book) -> LibraryResult<()>;
    fn untrack_book(&self, uuid: Uuid) -> LibraryResult<()>;
    fn update_tracked_book(&self, book: &Book) -> LibraryResult<()>;
    fn get_tracked_books(&self) -> LibraryResult<Vec<Book>>;

    /// Scope the store to `owner`'s account directory
    fn set_library_owner(&self, owner: &str) -> LibraryResult<()>;
    fn clear_library_owner(&self);

    /// The owner-scoped directory holding downloaded content and covers.
    /// `None` while no owner is set.
    fn library_dir(&self) -> Option<PathBuf>;
}

struct OwnerStore {
    dir: PathBuf,
    pool: ConnectionPool,
}

/// SQLite-backed tracker. Each owner gets its own directory under the base
/// dir, holding the store database plus downloaded content and cover files.
///
/// Covers are not persisted in the store; they live as files next to it.
pub struct SqliteDownloadedBooksTracker {
    base_dir: PathBuf,
    store: RwLock<Option<OwnerStore>>,
}

impl SqliteDownloadedBooksTracker {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            store: RwLock::new(None),
        }
    }

    /// Tracker rooted at the platform data directory.
    pub fn with_default_base_dir() -> LibraryResult<Self> {
        Ok(Self::new(default_library_base_dir()?))
    }

    fn pool(&self) -> LibraryResult<ConnectionPool> {
        self.store
            .read()
            .unwrap()
            .as_ref()
            .map(|s| s.pool.clone())
            .ok_or(LibraryError::NoLibraryOwner)
    }

    /// Map database row to Book - returns rusqlite::Error for query_map
    /// compatibility
    fn row_to_book(row: &Row) -> Result<Book, rusqlite::Error> {
        let uuid_str: String = row.get("uuid")?;
        let uuid = Uuid::parse_str(&uuid_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let creation_date_str: Option<String> = row.get("creation_date")?;
        let creation_date = creation_date_str
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
            })
            .transpose()?;

        let added_to_library_str: String = row.get("added_to_library")?;
        let added_to_library = DateTime::parse_from_rfc3339(&added_to_library_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let last_opened_str: Option<String> = row.get("last_opened")?;
        let last_opened = last_opened_str
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
            })
            .transpose()?;

        let tags_json: String = row.get("tags")?;
        let tags: Vec<Tag> = serde_json::from_str(&tags_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let file_path: String = row.get("file_path")?;
        let document_size: i64 = row.get("document_size")?;
        let page_count: i64 = row.get("page_count")?;

        Ok(Book {
            uuid,
            title: row.get("title")?,
            author: row.get("author")?,
            file_path: PathBuf::from(file_path),
            creator: row.get("creator")?,
            creation_date,
            format: row.get("format")?,
            document_size: document_size as u64,
            page_dimensions: PageDimensions {
                width: row.get("page_width")?,
                height: row.get("page_height")?,
            },
            page_count: page_count as u32,
            added_to_library,
            last_opened,
            downloaded: row.get("downloaded")?,
            cover: None,
            tags,
        })
    }

    fn book_params(book: &Book) -> LibraryResult<[String; 3]> {
        // Columns that need pre-serialization
        let tags_json = serde_json::to_string(&book.tags)?;
        let added = book.added_to_library.to_rfc3339();
        let file_path = book.file_path.to_string_lossy().into_owned();
        Ok([tags_json, added, file_path])
    }
}

impl DownloadedBooksTracker for SqliteDownloadedBooksTracker {
    fn track_book(&self, book: &Book) -> LibraryResult<()> {
        validate_book(book)?;

        let pool = self.pool()?;
        let conn = pool.get()?;
        let [tags_json, added, file_path] = Self::book_params(book)?;

        conn.execute(
            "INSERT OR REPLACE INTO tracked_books (
                uuid, title, author, file_path, creator, creation_date,
                format, document_size, page_width, page_height, page_count,
                added_to_library, last_opened, downloaded, tags
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                book.uuid.to_string(),
                book.title,
                book.author,
                file_path,
                book.creator,
                book.creation_date.map(|dt| dt.to_rfc3339()),
                book.format,
                book.document_size as i64,
                book.page_dimensions.width,
                book.page_dimensions.height,
                book.page_count as i64,
                added,
                book.last_opened.map(|dt| dt.to_rfc3339()),
                book.downloaded,
                tags_json,
            ],
        )?;

        Ok(())
    }

    fn untrack_book(&self, uuid: Uuid) -> LibraryResult<()> {
        let pool = self.pool()?;
        let conn = pool.get()?;

        let rows_affected = conn.execute(
            "DELETE FROM tracked_books WHERE uuid = ?1",
            params![uuid.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(LibraryError::BookDoesNotExist);
        }

        Ok(())
    }

    fn update_tracked_book(&self, book: &Book) -> LibraryResult<()> {
        validate_book(book)?;

        let pool = self.pool()?;
        let conn = pool.get()?;
        let [tags_json, added, file_path] = Self::book_params(book)?;

        let rows_affected = conn.execute(
            "UPDATE tracked_books SET
                title = ?2, author = ?3, file_path = ?4, creator = ?5,
                creation_date = ?6, format = ?7, document_size = ?8,
                page_width = ?9, page_height = ?10, page_count = ?11,
                added_to_library = ?12, last_opened = ?13, downloaded = ?14,
                tags = ?15
             WHERE uuid = ?1",
            params![
                book.uuid.to_string(),
                book.title,
                book.author,
                file_path,
                book.creator,
                book.creation_date.map(|dt| dt.to_rfc3339()),
                book.format,
                book.document_size as i64,
                book.page_dimensions.width,
                book.page_dimensions.height,
                book.page_count as i64,
                added,
                book.last_opened.map(|dt| dt.to_rfc3339()),
                book.downloaded,
                tags_json,
            ],
        )?;

        if rows_affected == 0 {
            return Err(LibraryError::BookDoesNotExist);
        }

        Ok(())
    }

    fn get_tracked_books(&self) -> LibraryResult<Vec<Book>> {
        let pool = self.pool()?;
        let conn = pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT uuid, title, author, file_path, creator, creation_date,
                    format, document_size, page_width, page_height, page_count,
                    added_to_library, last_opened, downloaded, tags
             FROM tracked_books
             ORDER BY added_to_library",
        )?;

        let books: Vec<Book> = stmt
            .query_map([], Self::row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(books)
    }

    fn set_library_owner(&self, owner: &str) -> LibraryResult<()> {
        if owner.trim().is_empty() {
            return Err(LibraryError::Other(
                "Library owner cannot be empty".to_string(),
            ));
        }

        let dir = self.base_dir.join(owner);
        std::fs::create_dir_all(&dir)?;

        let pool = create_connection_pool(&dir.join("tracked_books.db"))?;
        {
            let conn = pool.get()?;
            initialize_database(&conn)?;
        }

        *self.store.write().unwrap() = Some(OwnerStore { dir, pool });
        Ok(())
    }

    fn clear_library_owner(&self) {
        *self.store.write().unwrap() = None;
    }

    fn library_dir(&self) -> Option<PathBuf> {
        self.store.read().unwrap().as_ref().map(|s| s.dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn sample_book(title: &str) -> Book {
        let mut book = Book::new(
            title.to_string(),
            "Ursula K. Le Guin".to_string(),
            PathBuf::from(format!("/books/{}.pdf", title)),
            "scanner".to_string(),
            None,
            "pdf".to_string(),
            4_096,
            PageDimensions {
                width: 595.0,
                height: 842.0,
            },
            180,
        );
        book.downloaded = true;
        book
    }

    fn tracker_in(dir: &Path) -> SqliteDownloadedBooksTracker {
        let tracker = SqliteDownloadedBooksTracker::new(dir.to_path_buf());
        tracker.set_library_owner("reader@example.com").unwrap();
        tracker
    }

    #[test]
    fn operations_without_owner_are_rejected() {
        let tracker = SqliteDownloadedBooksTracker::new(PathBuf::from("/tmp/unused"));
        let result = tracker.get_tracked_books();
        assert!(matches!(result, Err(LibraryError::NoLibraryOwner)));
        assert!(tracker.library_dir().is_none());
    }

    #[test]
    fn library_dir_is_owner_scoped() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker_in(dir.path());

        let lib_dir = tracker.library_dir().unwrap();
        assert_eq!(lib_dir, dir.path().join("reader@example.com"));
        assert!(lib_dir.is_dir());
    }

    #[test]
    fn tracked_books_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker_in(dir.path());

        let book = sample_book("left-hand-of-darkness");
        tracker.track_book(&book).unwrap();

        let loaded = tracker.get_tracked_books().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].uuid, book.uuid);
        assert_eq!(loaded[0].title, book.title);
        assert!(loaded[0].downloaded);
    }

    #[test]
    fn tracked_books_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let book = sample_book("dispossessed");

        {
            let tracker = tracker_in(dir.path());
            tracker.track_book(&book).unwrap();
        }

        let tracker = tracker_in(dir.path());
        let loaded = tracker.get_tracked_books().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].uuid, book.uuid);
    }

    #[test]
    fn untracked_books_do_not_reappear() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker_in(dir.path());

        let book = sample_book("lathe-of-heaven");
        tracker.track_book(&book).unwrap();
        tracker.untrack_book(book.uuid).unwrap();

        assert!(tracker.get_tracked_books().unwrap().is_empty());
    }

    #[test]
    fn untracking_unknown_book_errors() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker_in(dir.path());

        let result = tracker.untrack_book(Uuid::new_v4());
        assert!(matches!(result, Err(LibraryError::BookDoesNotExist)));
    }

    #[test]
    fn update_rewrites_tracked_entry() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker_in(dir.path());

        let mut book = sample_book("word-for-world");
        tracker.track_book(&book).unwrap();

        book.title = "The Word for World Is Forest".to_string();
        book.tags = vec![Tag::new("novella").unwrap()];
        tracker.update_tracked_book(&book).unwrap();

        let loaded = tracker.get_tracked_books().unwrap();
        assert_eq!(loaded[0].title, "The Word for World Is Forest");
        assert_eq!(loaded[0].tags, book.tags);
    }

    #[test]
    fn clearing_owner_detaches_store() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker_in(dir.path());

        tracker.clear_library_owner();
        assert!(tracker.library_dir().is_none());
        assert!(matches!(
            tracker.get_tracked_books(),
            Err(LibraryError::NoLibraryOwner)
        ));
    }
}
