//! Document lifecycle: seed load, save-after-mutation, reset, and the
//! import/export round-trip of the whole application state.

use anyhow::{Context, Result};
use log::{info, warn};
use shared::AppDocument;
use std::sync::Arc;

use crate::backend::domain::commands::document::{
    ExportDocumentResult, ImportDocumentCommand, ImportDocumentResult,
};
use crate::backend::domain::models::document::{detect_version, ImportError};
use crate::backend::storage::json::{DocumentRepository, JsonConnection};
use crate::backend::storage::traits::DocumentStorage;

/// Fixed filename for exported documents
pub const EXPORT_FILENAME: &str = "homebuild-tracker-export.json";

/// Embedded default document: the initial state on first run and the reset
/// target
const SEED_DOCUMENT: &str = include_str!("../../../assets/seed-data.json");

/// Service owning the persisted-document lifecycle
#[derive(Clone)]
pub struct DocumentService {
    document_repository: DocumentRepository,
}

impl DocumentService {
    /// Create a new DocumentService
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        let document_repository = DocumentRepository::new(connection.as_ref().clone());
        Self {
            document_repository,
        }
    }

    fn seed_document(&self) -> Result<AppDocument> {
        serde_json::from_str(SEED_DOCUMENT).context("embedded seed document is malformed")
    }

    /// Load the persisted document, seeding the store on first run.
    ///
    /// A persisted document that fails to parse counts as no data present,
    /// so a corrupted file falls back to the seed instead of wedging the app.
    pub fn load_or_seed(&self) -> Result<AppDocument> {
        if let Some(document) = self.document_repository.load_document()? {
            info!("Loaded persisted {} document", document.version());
            return Ok(document);
        }

        info!("No persisted document; loading seed data");
        let seed = self.seed_document()?;
        self.document_repository.save_document(&seed)?;
        Ok(seed)
    }

    /// Persist the whole document. Called after every mutation.
    pub fn save(&self, document: &AppDocument) -> Result<()> {
        self.document_repository.save_document(document)
    }

    /// Replace the persisted document with the seed wholesale
    pub fn reset(&self) -> Result<AppDocument> {
        warn!("Resetting document store to seed data");
        let seed = self.seed_document()?;
        self.document_repository.save_document(&seed)?;
        Ok(seed)
    }

    /// Validate and apply an uploaded document.
    ///
    /// All-or-nothing: on any parse or shape failure the persisted state is
    /// left untouched and the error carries a user-presentable message.
    pub fn import(&self, command: ImportDocumentCommand) -> Result<ImportDocumentResult> {
        info!(
            "📥 IMPORT: Validating uploaded document ({} bytes)",
            command.content.len()
        );

        let document = Self::validate_import(&command.content)?;
        let version = document.version();

        // Only a fully validated document reaches the store
        self.document_repository.save_document(&document)?;

        info!("📥 IMPORT: Accepted {} document", version);
        Ok(ImportDocumentResult { document, version })
    }

    /// Parse and shape-check an uploaded document without touching the store
    pub fn validate_import(content: &str) -> Result<AppDocument, ImportError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        detect_version(&value)?;
        let document: AppDocument = serde_json::from_value(value)?;
        Ok(document)
    }

    /// Serialize the current document for download.
    ///
    /// Attachment blobs are local-store-only and are not part of the export.
    pub fn export(&self, document: &AppDocument) -> Result<ExportDocumentResult> {
        let json = serde_json::to_string_pretty(document)
            .context("failed to serialize document for export")?;

        info!(
            "📄 EXPORT: Prepared {} ({} bytes)",
            EXPORT_FILENAME,
            json.len()
        );
        Ok(ExportDocumentResult {
            json,
            filename: EXPORT_FILENAME.to_string(),
        })
    }
}
