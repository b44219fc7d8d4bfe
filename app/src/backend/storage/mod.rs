//! Storage layer: abstraction traits plus the JSON/file-backed implementation.

pub mod json;
pub mod traits;

pub use json::JsonConnection;
pub use traits::{AttachmentStorage, Connection, DocumentStorage};
