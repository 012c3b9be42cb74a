// src/integrations/http/client.rs
//
// HTTP implementation of the remote book store gateway.
//
// ARCHITECTURE:
// - JSON REST client over reqwest
// - Maps wire DTOs ↔ domain Book (no domain mutation here)
// - Fire-and-forget: every call spawns its request on the runtime handle and
//   returns immediately; completions are emitted as events on the bus
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Events are emitted from the runtime's thread; serialized delivery to the
//   core is the embedder's wiring responsibility
// - Request failures are logged, never raised

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use uuid::Uuid;

use crate::domain::{Book, PageDimensions, Tag};
use crate::events::{BookContentDownloaded, EventBus, RemoteBooksMetadataReady};
use crate::integrations::BookStorageGateway;

/// Wire representation of a book. Covers travel separately as raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub uuid: Uuid,
    pub title: String,
    pub author: String,
    pub file_path: String,
    pub creator: String,
    pub creation_date: Option<DateTime<Utc>>,
    pub format: String,
    pub document_size: u64,
    pub page_width: f64,
    pub page_height: f64,
    pub page_count: u32,
    pub added_to_library: DateTime<Utc>,
    pub last_opened: Option<DateTime<Utc>>,
    pub downloaded: bool,
    pub tags: Vec<String>,
}

impl BookDto {
    pub fn from_book(book: &Book) -> Self {
        Self {
            uuid: book.uuid,
            title: book.title.clone(),
            author: book.author.clone(),
            file_path: book.file_path.to_string_lossy().into_owned(),
            creator: book.creator.clone(),
            creation_date: book.creation_date,
            format: book.format.clone(),
            document_size: book.document_size,
            page_width: book.page_dimensions.width,
            page_height: book.page_dimensions.height,
            page_count: book.page_count,
            added_to_library: book.added_to_library,
            last_opened: book.last_opened,
            downloaded: book.downloaded,
            tags: book.tags.iter().map(|t| t.name().to_string()).collect(),
        }
    }

    pub fn into_book(self) -> Book {
        Book {
            uuid: self.uuid,
            title: self.title,
            author: self.author,
            file_path: PathBuf::from(self.file_path),
            creator: self.creator,
            creation_date: self.creation_date,
            format: self.format,
            document_size: self.document_size,
            page_dimensions: PageDimensions {
                width: self.page_width,
                height: self.page_height,
            },
            page_count: self.page_count,
            added_to_library: self.added_to_library,
            last_opened: self.last_opened,
            downloaded: self.downloaded,
            cover: None,
            tags: self
                .tags
                .into_iter()
                .filter_map(|name| Tag::new(name).ok())
                .collect(),
        }
    }
}

/// Remote book store client
pub struct HttpBookStorageGateway {
    base_url: String,
    http_client: Client,
    runtime: Handle,
    event_bus: Arc<EventBus>,
}

impl HttpBookStorageGateway {
    pub fn new(base_url: impl Into<String>, event_bus: Arc<EventBus>, runtime: Handle) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            http_client,
            runtime,
            event_bus,
        }
    }

    fn books_url(&self) -> String {
        format!("{}/api/books", self.base_url)
    }

    fn book_url(&self, uuid: Uuid) -> String {
        format!("{}/api/books/{}", self.base_url, uuid)
    }

    fn cover_url(&self, uuid: Uuid) -> String {
        format!("{}/api/books/{}/cover", self.base_url, uuid)
    }
}

impl BookStorageGateway for HttpBookStorageGateway {
    fn create_book(&self, auth_token: &str, book: &Book) {
        let request = self
            .http_client
            .post(self.books_url())
            .bearer_auth(auth_token)
            .json(&BookDto::from_book(book));

        self.runtime.spawn(async move {
            match request.send().await {
                Ok(resp) if !resp.status().is_success() => {
                    log::warn!("Remote create returned status {}", resp.status());
                }
                Ok(_) => {}
                Err(e) => log::warn!("Remote create failed: {}", e),
            }
        });
    }

    fn delete_book(&self, auth_token: &str, uuid: Uuid) {
        let request = self
            .http_client
            .delete(self.book_url(uuid))
            .bearer_auth(auth_token);

        self.runtime.spawn(async move {
            match request.send().await {
                Ok(resp) if !resp.status().is_success() => {
                    log::warn!("Remote delete returned status {}", resp.status());
                }
                Ok(_) => {}
                Err(e) => log::warn!("Remote delete failed: {}", e),
            }
        });
    }

    fn update_book(&self, auth_token: &str, book: &Book) {
        let request = self
            .http_client
            .put(self.book_url(book.uuid))
            .bearer_auth(auth_token)
            .json(&BookDto::from_book(book));

        self.runtime.spawn(async move {
            match request.send().await {
                Ok(resp) if !resp.status().is_success() => {
                    log::warn!("Remote update returned status {}", resp.status());
                }
                Ok(_) => {}
                Err(e) => log::warn!("Remote update failed: {}", e),
            }
        });
    }

    fn download_book(&self, auth_token: &str, uuid: Uuid) {
        let request = self
            .http_client
            .get(format!("{}/content", self.book_url(uuid)))
            .bearer_auth(auth_token);
        let bus = Arc::clone(&self.event_bus);

        self.runtime.spawn(async move {
            let response = match request.send().await {
                Ok(resp) if resp.status().is_success() => resp,
                Ok(resp) => {
                    log::warn!("Download of {} returned status {}", uuid, resp.status());
                    return;
                }
                Err(e) => {
                    log::warn!("Download of {} failed: {}", uuid, e);
                    return;
                }
            };

            match response.bytes().await {
                Ok(data) => bus.emit(BookContentDownloaded::new(uuid, data.to_vec())),
                Err(e) => log::warn!("Reading download body of {} failed: {}", uuid, e),
            }
        });
    }

    fn get_books_metadata(&self, auth_token: &str) {
        let request = self
            .http_client
            .get(self.books_url())
            .bearer_auth(auth_token);
        let bus = Arc::clone(&self.event_bus);

        self.runtime.spawn(async move {
            let response = match request.send().await {
                Ok(resp) if resp.status().is_success() => resp,
                Ok(resp) => {
                    log::warn!("Remote listing returned status {}", resp.status());
                    return;
                }
                Err(e) => {
                    log::warn!("Remote listing failed: {}", e);
                    return;
                }
            };

            match response.json::<Vec<BookDto>>().await {
                Ok(dtos) => {
                    let books = dtos.into_iter().map(BookDto::into_book).collect();
                    bus.emit(RemoteBooksMetadataReady::new(books));
                }
                Err(e) => log::warn!("Parsing remote listing failed: {}", e),
            }
        });
    }

    fn change_book_cover(&self, auth_token: &str, uuid: Uuid, cover_path: &Path) {
        let url = self.cover_url(uuid);
        let client = self.http_client.clone();
        let token = auth_token.to_string();
        let path = cover_path.to_path_buf();

        self.runtime.spawn(async move {
            let data = match tokio::fs::read(&path).await {
                Ok(data) => data,
                Err(e) => {
                    log::warn!("Reading cover file {} failed: {}", path.display(), e);
                    return;
                }
            };

            let result = client
                .put(url)
                .bearer_auth(token)
                .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
                .body(data)
                .send()
                .await;

            match result {
                Ok(resp) if !resp.status().is_success() => {
                    log::warn!("Remote cover change returned status {}", resp.status());
                }
                Ok(_) => {}
                Err(e) => log::warn!("Remote cover change failed: {}", e),
            }
        });
    }

    fn delete_book_cover(&self, auth_token: &str, uuid: Uuid) {
        let request = self
            .http_client
            .delete(self.cover_url(uuid))
            .bearer_auth(auth_token);

        self.runtime.spawn(async move {
            match request.send().await {
                Ok(resp) if !resp.status().is_success() => {
                    log::warn!("Remote cover delete returned status {}", resp.status());
                }
                Ok(_) => {}
                Err(e) => log::warn!("Remote cover delete failed: {}", e),
            }
        });
    }
}
