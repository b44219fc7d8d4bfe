//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use shared::{AppDocument, AttachmentRecord};

/// Trait defining the interface for persisted-document storage.
///
/// The whole application document lives under a single key and is always
/// read and replaced wholesale; there are no partial updates at this layer.
pub trait DocumentStorage: Send + Sync {
    /// Load the persisted document, if one exists.
    ///
    /// A document that fails to parse is treated as "no data present" so the
    /// caller can fall back to seed data.
    fn load_document(&self) -> Result<Option<AppDocument>>;

    /// Persist the whole document, replacing any previous contents
    fn save_document(&self, document: &AppDocument) -> Result<()>;

    /// Remove the persisted document entirely.
    /// Returns true if a document was present and removed.
    fn delete_document(&self) -> Result<bool>;
}

/// Trait defining the interface for the local attachment blob store.
///
/// Records are keyed by id with a secondary lookup by category. They are
/// never mutated in place, only added or deleted by key.
pub trait AttachmentStorage: Send + Sync {
    /// Store a new attachment record together with its blob bytes
    fn store_attachment(&self, record: &AttachmentRecord, bytes: &[u8]) -> Result<()>;

    /// Retrieve a specific attachment record by id
    fn get_attachment(&self, attachment_id: &str) -> Result<Option<AttachmentRecord>>;

    /// List all attachment records belonging to a category
    fn list_attachments_by_category(&self, category_id: &str) -> Result<Vec<AttachmentRecord>>;

    /// Read the blob bytes for an attachment id
    fn read_blob(&self, attachment_id: &str) -> Result<Option<Vec<u8>>>;

    /// Delete an attachment and its blob.
    /// Returns true if the attachment was found and deleted, false otherwise.
    fn delete_attachment(&self, attachment_id: &str) -> Result<bool>;
}

/// Trait defining the interface for storage connections.
///
/// This abstracts away the concrete storage location and provides factory
/// methods for creating repositories, so the domain layer can work with any
/// backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    /// The type of DocumentStorage this connection creates
    type DocumentRepository: DocumentStorage;

    /// The type of AttachmentStorage this connection creates
    type AttachmentRepository: AttachmentStorage;

    /// Create a new document repository for this connection
    fn create_document_repository(&self) -> Self::DocumentRepository;

    /// Create a new attachment repository for this connection.
    ///
    /// Opening the attachment store can fail (directory not writable, index
    /// unreadable); the failure disables attachment features only.
    fn create_attachment_repository(&self) -> Result<Self::AttachmentRepository>;
}
