// src/error/types.rs
use crate::domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Book does not exist")]
    BookDoesNotExist,

    #[error("Tag already exists")]
    TagAlreadyExists,

    #[error("Tag does not exist")]
    TagDoesNotExist,

    #[error("Opening book failed")]
    OpeningBookFailed,

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("No library owner set")]
    NoLibraryOwner,

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<uuid::Error> for LibraryError {
    fn from(err: uuid::Error) -> Self {
        LibraryError::Other(format!("UUID error: {}", err))
    }
}

impl From<chrono::ParseError> for LibraryError {
    fn from(err: chrono::ParseError) -> Self {
        LibraryError::Other(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for LibraryError {
    fn from(err: r2d2::Error) -> Self {
        LibraryError::Pool(err.to_string())
    }
}

pub type LibraryResult<T> = Result<T, LibraryError>;
