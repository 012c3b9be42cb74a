pub mod client;

pub use client::{BookDto, HttpBookStorageGateway};
