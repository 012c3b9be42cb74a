pub mod entity;
pub mod invariants;

pub use entity::{
    Book, BookForDeletion, BookUpdate, CoverImage, PageDimensions, COVER_JPEG_QUALITY,
    MAX_COVER_HEIGHT, MAX_COVER_WIDTH,
};
pub use invariants::validate_book;
