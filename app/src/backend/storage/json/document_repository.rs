use anyhow::{Context, Result};
use log::warn;
use shared::AppDocument;
use std::fs;

use super::connection::JsonConnection;
use crate::backend::storage::traits::DocumentStorage;

/// JSON document repository: one file holding the whole application document
#[derive(Clone)]
pub struct DocumentRepository {
    connection: JsonConnection,
}

impl DocumentRepository {
    /// Create a new document repository
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

impl DocumentStorage for DocumentRepository {
    fn load_document(&self) -> Result<Option<AppDocument>> {
        let path = self.connection.document_path();
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read document file {}", path.display()))?;

        match serde_json::from_str::<AppDocument>(&raw) {
            Ok(document) => Ok(Some(document)),
            Err(e) => {
                warn!(
                    "Persisted document at {} failed to parse ({}); treating as no data present",
                    path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn save_document(&self, document: &AppDocument) -> Result<()> {
        let path = self.connection.document_path();
        let json =
            serde_json::to_string_pretty(document).context("failed to serialize document")?;

        // Write to a sibling temp file first so a crash mid-write never
        // leaves a torn document behind.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .with_context(|| format!("failed to write document file {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("failed to replace document file {}", path.display()))?;

        Ok(())
    }

    fn delete_document(&self) -> Result<bool> {
        let path = self.connection.document_path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| format!("failed to delete document file {}", path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::json::test_utils::temp_connection;
    use shared::{AppStateV1, TaskGroups};

    fn sample_document() -> AppDocument {
        AppDocument::V1(AppStateV1 {
            budget: Vec::new(),
            tasks: TaskGroups::new(),
        })
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, connection) = temp_connection();
        let repository = DocumentRepository::new(connection);

        assert!(repository.load_document().unwrap().is_none());

        let document = sample_document();
        repository.save_document(&document).unwrap();

        let loaded = repository.load_document().unwrap().unwrap();
        assert_eq!(loaded, document);
    }

    #[test]
    fn corrupt_file_counts_as_no_data() {
        let (_dir, connection) = temp_connection();
        let repository = DocumentRepository::new(connection.clone());

        std::fs::write(connection.document_path(), "{ not json at all").unwrap();

        assert!(repository.load_document().unwrap().is_none());
    }

    #[test]
    fn delete_reports_whether_a_document_existed() {
        let (_dir, connection) = temp_connection();
        let repository = DocumentRepository::new(connection);

        assert!(!repository.delete_document().unwrap());
        repository.save_document(&sample_document()).unwrap();
        assert!(repository.delete_document().unwrap());
        assert!(repository.load_document().unwrap().is_none());
    }
}
