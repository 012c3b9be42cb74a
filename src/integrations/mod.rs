// src/integrations/mod.rs
//
// Remote Gateway boundary + concrete implementations.
//
// The gateway is fire-and-forget by contract: calls return immediately and
// results (metadata listings, downloaded content) arrive later as events on
// the bus. Request failures surface through the gateway's own reporting
// channel; this core only logs them.

pub mod http;

use std::path::Path;
use uuid::Uuid;

use crate::domain::Book;

/// Capability interface over the remote account-backed store.
///
/// Every call carries the session token explicitly; the gateway holds no
/// session state of its own.
#[cfg_attr(test, mockall::automock)]
pub trait BookStorageGateway: Send + Sync {
    fn create_book(&self, auth_token: &str, book: &Book);
    fn delete_book(&self, auth_token: &str, uuid: Uuid);
    fn update_book(&self, auth_token: &str, book: &Book);

    /// Request full content; delivery arrives as `BookContentDownloaded`
    fn download_book(&self, auth_token: &str, uuid: Uuid);

    /// Request the account's book listing; delivery arrives as
    /// `RemoteBooksMetadataReady`
    fn get_books_metadata(&self, auth_token: &str);

    fn change_book_cover(&self, auth_token: &str, uuid: Uuid, cover_path: &Path);
    fn delete_book_cover(&self, auth_token: &str, uuid: Uuid);
}

pub use http::HttpBookStorageGateway;
