// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod book_service;
pub mod storage_service;

#[cfg(test)]
mod book_service_tests;

// Re-export all services and their types
pub use book_service::BookService;

pub use storage_service::{
    BookStorageService, BOOK_COVER_PREFIX, BOOK_COVER_TYPE, DOWNLOADED_BOOK_EXTENSION,
};
