use super::entity::Book;
use crate::domain::{DomainError, DomainResult};

/// Validates all Book invariants.
///
/// Called on books entering the system from foreign data (the tracked-book
/// store, remote listings) rather than constructed through `Book::new`.
pub fn validate_book(book: &Book) -> DomainResult<()> {
    validate_identity(book)?;
    validate_tags(book)?;
    Ok(())
}

fn validate_identity(book: &Book) -> DomainResult<()> {
    if book.uuid.is_nil() {
        return Err(DomainError::InvariantViolation(
            "Book identifier cannot be nil".to_string(),
        ));
    }
    Ok(())
}

/// Tag names are unique within a book and never blank
fn validate_tags(book: &Book) -> DomainResult<()> {
    for (i, tag) in book.tags.iter().enumerate() {
        if tag.name().trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "Tag name cannot be empty".to_string(),
            ));
        }
        if book.tags[..i].iter().any(|t| t.name() == tag.name()) {
            return Err(DomainError::InvariantViolation(format!(
                "Duplicate tag '{}'",
                tag.name()
            )));
        }
    }
    Ok(())
}
