//! Attachment domain logic: local files attached to a category.
//!
//! Attachments live entirely in the local blob store; they are never part of
//! the persisted document and never travel through export.

use anyhow::{bail, Result};
use chrono::Utc;
use log::info;
use shared::AttachmentRecord;
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::domain::commands::attachments::{
    AddAttachmentCommand, AddAttachmentResult, DeleteAttachmentCommand, DeleteAttachmentResult,
};
use crate::backend::storage::json::{AttachmentRepository, JsonConnection};
use crate::backend::storage::traits::AttachmentStorage;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Service for the local attachment store
#[derive(Clone)]
pub struct AttachmentService {
    attachment_repository: AttachmentRepository,
}

impl AttachmentService {
    /// Open the attachment store.
    ///
    /// Failure here means attachment features are unavailable; the caller
    /// decides how to degrade (the backend simply runs without them).
    pub fn new(connection: Arc<JsonConnection>) -> Result<Self> {
        let attachment_repository = AttachmentRepository::new(connection.as_ref().clone())?;
        Ok(Self {
            attachment_repository,
        })
    }

    /// Store a new attachment under a category
    pub fn add_attachment(&self, command: AddAttachmentCommand) -> Result<AddAttachmentResult> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            bail!("Attachment name cannot be empty");
        }

        let mime_type = if command.mime_type.trim().is_empty() {
            DEFAULT_MIME_TYPE.to_string()
        } else {
            command.mime_type
        };

        let record = AttachmentRecord {
            id: format!("attachment::{}", Uuid::new_v4()),
            category_id: command.category_id,
            name,
            mime_type,
            size: command.bytes.len() as u64,
            created: Utc::now().to_rfc3339(),
        };

        self.attachment_repository
            .store_attachment(&record, &command.bytes)?;

        info!(
            "📎 ATTACH: Stored '{}' ({} bytes) under category {}",
            record.name, record.size, record.category_id
        );
        Ok(AddAttachmentResult { record })
    }

    /// List the attachments belonging to a category
    pub fn list_by_category(&self, category_id: &str) -> Result<Vec<AttachmentRecord>> {
        self.attachment_repository
            .list_attachments_by_category(category_id)
    }

    /// Read the blob bytes for an attachment
    pub fn read_blob(&self, attachment_id: &str) -> Result<Option<Vec<u8>>> {
        self.attachment_repository.read_blob(attachment_id)
    }

    /// Delete an attachment and its blob
    pub fn delete_attachment(
        &self,
        command: DeleteAttachmentCommand,
    ) -> Result<DeleteAttachmentResult> {
        let deleted = self
            .attachment_repository
            .delete_attachment(&command.attachment_id)?;

        if deleted {
            info!("📎 ATTACH: Deleted attachment {}", command.attachment_id);
        }
        Ok(DeleteAttachmentResult { deleted })
    }
}
