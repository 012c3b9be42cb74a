// src/events/handlers/storage_handler.rs
//
// Bridges the remote gateway's asynchronous completions into the storage
// service. This is where in-flight results re-enter the core; the storage
// service re-validates session state before surfacing them.
//
// CRITICAL RULES:
// - Only consumes RemoteBooksMetadataReady and BookContentDownloaded
// - Delegates all logic to BookStorageService
// - Uses closure-based subscription (EventHandler is internal to the bus)

use std::sync::Arc;

use crate::events::types::{BookContentDownloaded, RemoteBooksMetadataReady};
use crate::events::EventBus;
use crate::services::BookStorageService;

/// Registers all storage completion handlers with the event bus.
pub fn register_storage_handlers(bus: &EventBus, storage: Arc<BookStorageService>) {
    let listing_storage = Arc::clone(&storage);
    bus.subscribe::<RemoteBooksMetadataReady, _>(move |event| {
        listing_storage.handle_remote_listing(&event.books);
    });

    let download_storage = storage;
    bus.subscribe::<BookContentDownloaded, _>(move |event| {
        download_storage.handle_download_finished(event.uuid, &event.data);
    });
}
