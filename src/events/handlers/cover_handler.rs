// src/events/handlers/cover_handler.rs
//
// Bridges the metadata provider's asynchronous cover delivery into the
// collection manager. Delegates all logic to BookService.

use std::sync::Arc;

use crate::events::types::CoverReady;
use crate::events::EventBus;
use crate::services::BookService;

/// Registers the cover-arrival handler with the event bus.
pub fn register_cover_handler(bus: &EventBus, books: Arc<BookService>) {
    bus.subscribe::<CoverReady, _>(move |event| {
        books.store_book_cover(event.image.clone());
    });
}
