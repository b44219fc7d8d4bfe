//! # JSON Storage Module
//!
//! File-backed storage for the tracker: the persisted application document is
//! one pretty-printed JSON file, and attachments live in their own directory
//! as blob files plus a CSV metadata index.
//!
//! ## Layout
//!
//! ```text
//! <data dir>/
//!   document.json          the whole application document, replaced on every mutation
//!   attachments/
//!     index.csv            id,category_id,name,mime_type,size,created
//!     <attachment id>.bin  blob bytes, one file per attachment
//! ```

pub mod attachment_repository;
pub mod connection;
pub mod document_repository;

#[cfg(test)]
pub mod test_utils;

pub use attachment_repository::AttachmentRepository;
pub use connection::JsonConnection;
pub use document_repository::DocumentRepository;
