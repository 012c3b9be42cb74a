// src/services/book_service_tests.rs
//
// Book Service Tests
//
// The metadata provider is an external collaborator; tests drive the service
// through a mocked provider and observe the working set plus the emitted
// index-addressed events.

#[cfg(test)]
mod tests {
    use crate::domain::{BookUpdate, CoverImage, PageDimensions, Tag};
    use crate::error::LibraryError;
    use crate::events::{
        create_event_bus, BookCoverGenerated, BookDataChanged, BookDeletionEnded,
        BookDeletionStarted, BookInsertionEnded, BookInsertionStarted, EventBus,
    };
    use crate::metadata::MockMetadataProvider;
    use crate::services::BookService;
    use std::path::Path;
    use std::sync::{Arc, Mutex, RwLock};
    use uuid::Uuid;

    // ========================================================================
    // TEST HELPERS
    // ========================================================================

    /// Provider whose accessors answer with fixed metadata for every
    /// document.
    fn fixture_provider(title: &str, author: &str, page_count: u32) -> MockMetadataProvider {
        let mut provider = MockMetadataProvider::new();
        provider.expect_setup_document().return_const(true);
        provider.expect_title().return_const(title.to_string());
        provider.expect_author().return_const(author.to_string());
        provider
            .expect_creator()
            .return_const("calibre".to_string());
        provider.expect_creation_date().return_const(None);
        provider.expect_format().return_const("pdf".to_string());
        provider.expect_document_size().return_const(1_024u64);
        provider.expect_page_dimensions().return_const(PageDimensions {
            width: 595.0,
            height: 842.0,
        });
        provider.expect_page_count().return_const(page_count);
        provider.expect_request_cover().return_const(());
        provider
    }

    fn service_with(provider: MockMetadataProvider) -> (BookService, Arc<EventBus>) {
        let bus = Arc::new(create_event_bus());
        let service = BookService::new(Arc::new(provider), Arc::clone(&bus));
        (service, bus)
    }

    // ========================================================================
    // IMPORT
    // ========================================================================

    #[test]
    fn add_book_appends_entry_with_extracted_metadata() {
        let (service, _bus) = service_with(fixture_provider("T", "A", 10));

        service.add_book(Path::new("/books/import.pdf")).unwrap();

        assert_eq!(service.get_book_count(), 1);

        let books = service.get_books();
        let book = &books[0];
        assert_eq!(book.title, "T");
        assert_eq!(book.author, "A");
        assert_eq!(book.page_count, 10);
        assert_eq!(book.file_path, Path::new("/books/import.pdf"));
        assert!(book.last_opened.is_none());
        assert!(!book.downloaded);

        // Retrievable by its generated identifier
        let by_id = service.get_book(book.uuid).unwrap();
        assert_eq!(by_id.title, "T");
        assert_eq!(service.get_book_index(book.uuid), Some(0));
    }

    #[test]
    fn add_book_on_unparsable_file_changes_nothing() {
        let mut provider = MockMetadataProvider::new();
        provider.expect_setup_document().return_const(false);

        let (service, _bus) = service_with(provider);
        let result = service.add_book(Path::new("/books/broken.pdf"));

        assert!(matches!(result, Err(LibraryError::OpeningBookFailed)));
        assert_eq!(service.get_book_count(), 0);
    }

    #[test]
    fn add_book_emits_started_with_pre_insertion_size_then_ended() {
        let (service, bus) = service_with(fixture_provider("T", "A", 10));
        let sequence = Arc::new(Mutex::new(Vec::new()));

        let seq = Arc::clone(&sequence);
        bus.subscribe::<BookInsertionStarted, _>(move |event| {
            seq.lock().unwrap().push(format!("started:{}", event.index));
        });
        let seq = Arc::clone(&sequence);
        bus.subscribe::<BookInsertionEnded, _>(move |_| {
            seq.lock().unwrap().push("ended".to_string());
        });

        service.add_book(Path::new("/books/a.pdf")).unwrap();
        service.add_book(Path::new("/books/b.pdf")).unwrap();

        let result = sequence.lock().unwrap();
        assert_eq!(*result, vec!["started:0", "ended", "started:1", "ended"]);
    }

    // ========================================================================
    // DELETION
    // ========================================================================

    #[test]
    fn delete_unknown_book_leaves_collection_unchanged() {
        let (service, _bus) = service_with(fixture_provider("T", "A", 10));
        service.add_book(Path::new("/books/a.pdf")).unwrap();

        let result = service.delete_book(Uuid::new_v4());

        assert!(matches!(result, Err(LibraryError::BookDoesNotExist)));
        assert_eq!(service.get_book_count(), 1);
    }

    #[test]
    fn deleting_earlier_entry_shifts_later_indices() {
        let (service, _bus) = service_with(fixture_provider("T", "A", 10));
        service.add_book(Path::new("/books/a.pdf")).unwrap();
        service.add_book(Path::new("/books/b.pdf")).unwrap();

        let books = service.get_books();
        let (first, second) = (books[0].uuid, books[1].uuid);
        assert_eq!(service.get_book_index(second), Some(1));

        service.delete_book(first).unwrap();

        assert_eq!(service.get_book_index(second), Some(0));
        assert_eq!(service.get_book_count(), 1);
    }

    #[test]
    fn delete_emits_started_with_current_index_then_ended() {
        let (service, bus) = service_with(fixture_provider("T", "A", 10));
        service.add_book(Path::new("/books/a.pdf")).unwrap();
        service.add_book(Path::new("/books/b.pdf")).unwrap();
        let second = service.get_books()[1].uuid;

        let sequence = Arc::new(Mutex::new(Vec::new()));
        let seq = Arc::clone(&sequence);
        bus.subscribe::<BookDeletionStarted, _>(move |event| {
            seq.lock().unwrap().push(format!("started:{}", event.index));
        });
        let seq = Arc::clone(&sequence);
        bus.subscribe::<BookDeletionEnded, _>(move |_| {
            seq.lock().unwrap().push("ended".to_string());
        });

        service.delete_book(second).unwrap();

        let result = sequence.lock().unwrap();
        assert_eq!(*result, vec!["started:1", "ended"]);
    }

    // ========================================================================
    // UPDATE
    // ========================================================================

    #[test]
    fn update_merges_only_provided_fields() {
        let (service, bus) = service_with(fixture_provider("T", "A", 10));
        service.add_book(Path::new("/books/a.pdf")).unwrap();
        let uuid = service.get_books()[0].uuid;

        let changed = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&changed);
        bus.subscribe::<BookDataChanged, _>(move |event| {
            seen.lock().unwrap().push(event.index);
        });

        service
            .update_book(
                uuid,
                BookUpdate {
                    title: Some("Renamed".to_string()),
                    downloaded: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        let book = service.get_book(uuid).unwrap();
        assert_eq!(book.title, "Renamed");
        assert!(book.downloaded);
        assert_eq!(book.author, "A");
        assert_eq!(*changed.lock().unwrap(), vec![0]);
    }

    #[test]
    fn update_unknown_book_fails() {
        let (service, _bus) = service_with(fixture_provider("T", "A", 10));

        let result = service.update_book(Uuid::new_v4(), BookUpdate::default());
        assert!(matches!(result, Err(LibraryError::BookDoesNotExist)));
    }

    #[test]
    fn with_book_mut_hands_out_a_handle_only_for_existing_entries() {
        let (service, _bus) = service_with(fixture_provider("T", "A", 10));
        service.add_book(Path::new("/books/a.pdf")).unwrap();
        let uuid = service.get_books()[0].uuid;

        let result = service.with_book_mut(uuid, |book| {
            book.author = "B".to_string();
            book.page_count
        });
        assert_eq!(result, Some(10));
        assert_eq!(service.get_book(uuid).unwrap().author, "B");

        assert!(service.with_book_mut(Uuid::new_v4(), |_| ()).is_none());
    }

    // ========================================================================
    // TAGS
    // ========================================================================

    #[test]
    fn adding_same_tag_twice_is_rejected() {
        let (service, _bus) = service_with(fixture_provider("T", "A", 10));
        service.add_book(Path::new("/books/a.pdf")).unwrap();
        let uuid = service.get_books()[0].uuid;
        let tag = Tag::new("fantasy").unwrap();

        assert!(service.add_tag(uuid, tag.clone()).is_ok());
        let result = service.add_tag(uuid, tag);
        assert!(matches!(result, Err(LibraryError::TagAlreadyExists)));

        assert_eq!(service.get_book(uuid).unwrap().tags.len(), 1);
    }

    #[test]
    fn removing_missing_tag_is_rejected() {
        let (service, _bus) = service_with(fixture_provider("T", "A", 10));
        service.add_book(Path::new("/books/a.pdf")).unwrap();
        let uuid = service.get_books()[0].uuid;

        let result = service.remove_tag(uuid, &Tag::new("fantasy").unwrap());
        assert!(matches!(result, Err(LibraryError::TagDoesNotExist)));
    }

    #[test]
    fn tag_operations_on_unknown_book_fail() {
        let (service, _bus) = service_with(fixture_provider("T", "A", 10));
        let tag = Tag::new("fantasy").unwrap();

        assert!(matches!(
            service.add_tag(Uuid::new_v4(), tag.clone()),
            Err(LibraryError::BookDoesNotExist)
        ));
        assert!(matches!(
            service.remove_tag(Uuid::new_v4(), &tag),
            Err(LibraryError::BookDoesNotExist)
        ));
    }

    // ========================================================================
    // COVER ARRIVAL
    // ========================================================================

    #[test]
    fn cover_is_stored_on_most_recently_appended_entry() {
        let (service, bus) = service_with(fixture_provider("T", "A", 10));
        let indices = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&indices);
        bus.subscribe::<BookCoverGenerated, _>(move |event| {
            seen.lock().unwrap().push(event.index);
        });

        // A second import starts before the first cover arrives; the cover
        // lands on the newer entry (documented positional attribution).
        service.add_book(Path::new("/books/a.pdf")).unwrap();
        service.add_book(Path::new("/books/b.pdf")).unwrap();
        service.store_book_cover(CoverImage::new(vec![0xFF, 0xD8]));

        let books = service.get_books();
        assert!(books[0].cover.is_none());
        assert!(books[1].cover.is_some());
        assert_eq!(*indices.lock().unwrap(), vec![1]);
    }

    #[test]
    fn cover_for_empty_collection_is_ignored() {
        let (service, bus) = service_with(MockMetadataProvider::new());
        let count = Arc::new(Mutex::new(0usize));

        let seen = Arc::clone(&count);
        bus.subscribe::<BookCoverGenerated, _>(move |_| {
            *seen.lock().unwrap() += 1;
        });

        service.store_book_cover(CoverImage::new(vec![0xFF]));
        assert_eq!(*count.lock().unwrap(), 0);
    }

    // ========================================================================
    // LAST OPENED
    // ========================================================================

    #[test]
    fn refresh_last_opened_sets_timestamp_and_emits() {
        let (service, bus) = service_with(fixture_provider("T", "A", 10));
        service.add_book(Path::new("/books/a.pdf")).unwrap();
        let uuid = service.get_books()[0].uuid;

        let changed = Arc::new(RwLock::new(Vec::new()));
        let seen = Arc::clone(&changed);
        bus.subscribe::<BookDataChanged, _>(move |event| {
            seen.write().unwrap().push(event.index);
        });

        assert!(service.refresh_last_opened_flag(uuid));
        assert!(service.get_book(uuid).unwrap().last_opened.is_some());
        assert_eq!(*changed.read().unwrap(), vec![0]);
    }

    #[test]
    fn refresh_last_opened_for_unknown_book_returns_false() {
        let (service, _bus) = service_with(fixture_provider("T", "A", 10));
        assert!(!service.refresh_last_opened_flag(Uuid::new_v4()));
    }

    // ========================================================================
    // FILE EXPORT
    // ========================================================================

    #[test]
    fn save_book_to_path_copies_file_preserving_name() {
        let source_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("novel.pdf");
        std::fs::write(&source, b"%PDF-1.4").unwrap();

        let (service, _bus) = service_with(fixture_provider("T", "A", 10));
        service.add_book(&source).unwrap();
        let uuid = service.get_books()[0].uuid;

        service.save_book_to_path(uuid, dest_dir.path()).unwrap();

        let copied = dest_dir.path().join("novel.pdf");
        assert_eq!(std::fs::read(copied).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn save_book_to_path_reports_fs_failure() {
        let (service, _bus) = service_with(fixture_provider("T", "A", 10));
        service.add_book(Path::new("/nonexistent/novel.pdf")).unwrap();
        let uuid = service.get_books()[0].uuid;

        let dest_dir = tempfile::tempdir().unwrap();
        let result = service.save_book_to_path(uuid, dest_dir.path());

        assert!(matches!(result, Err(LibraryError::OperationFailed(_))));
    }

    #[test]
    fn save_book_to_path_for_unknown_book_fails() {
        let (service, _bus) = service_with(fixture_provider("T", "A", 10));
        let dest_dir = tempfile::tempdir().unwrap();

        let result = service.save_book_to_path(Uuid::new_v4(), dest_dir.path());
        assert!(matches!(result, Err(LibraryError::BookDoesNotExist)));
    }

    // ========================================================================
    // SESSION TOKEN
    // ========================================================================

    #[test]
    fn token_is_stored_and_cleared_verbatim() {
        let (service, _bus) = service_with(MockMetadataProvider::new());

        service.set_authentication_token("tok-123");
        assert_eq!(service.authentication_token(), "tok-123");

        service.clear_authentication_token();
        assert_eq!(service.authentication_token(), "");
    }
}
