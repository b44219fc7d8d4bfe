use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use super::attachment_repository::AttachmentRepository;
use super::document_repository::DocumentRepository;
use crate::backend::storage::traits::Connection;

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "HOMEBUILD_TRACKER_DATA_DIR";

/// File-backed storage connection.
///
/// Owns the data directory and hands out the per-store paths; repositories
/// never compute paths themselves.
#[derive(Debug, Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a connection rooted at the given directory, creating it if needed
    pub fn new(base_directory: impl Into<PathBuf>) -> Result<Self> {
        let base_directory = base_directory.into();
        std::fs::create_dir_all(&base_directory).with_context(|| {
            format!(
                "failed to create data directory {}",
                base_directory.display()
            )
        })?;
        info!("Using data directory: {}", base_directory.display());
        Ok(Self { base_directory })
    }

    /// Resolve the default data directory: the `HOMEBUILD_TRACKER_DATA_DIR`
    /// environment variable wins, otherwise the platform project directory.
    pub fn default_location() -> Result<PathBuf> {
        if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            if !custom.trim().is_empty() {
                return Ok(PathBuf::from(custom));
            }
        }
        let project_dirs = directories::ProjectDirs::from("", "", "homebuild-tracker")
            .context("could not determine a home directory for application data")?;
        Ok(project_dirs.data_dir().to_path_buf())
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the single persisted application document
    pub fn document_path(&self) -> PathBuf {
        self.base_directory.join("document.json")
    }

    /// Directory holding attachment blobs and their index
    pub fn attachments_directory(&self) -> PathBuf {
        self.base_directory.join("attachments")
    }

    /// Path of the attachment metadata index
    pub fn attachment_index_path(&self) -> PathBuf {
        self.attachments_directory().join("index.csv")
    }

    /// Path of the blob file for one attachment
    pub fn blob_path(&self, attachment_id: &str) -> PathBuf {
        self.attachments_directory()
            .join(format!("{}.bin", attachment_id))
    }

    pub fn ensure_attachments_directory_exists(&self) -> Result<()> {
        let directory = self.attachments_directory();
        std::fs::create_dir_all(&directory).with_context(|| {
            format!(
                "failed to create attachments directory {}",
                directory.display()
            )
        })
    }
}

impl Connection for JsonConnection {
    type DocumentRepository = DocumentRepository;
    type AttachmentRepository = AttachmentRepository;

    fn create_document_repository(&self) -> DocumentRepository {
        DocumentRepository::new(self.clone())
    }

    fn create_attachment_repository(&self) -> Result<AttachmentRepository> {
        AttachmentRepository::new(self.clone())
    }
}
