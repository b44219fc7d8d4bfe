use anyhow::{Context, Result};
use csv::{Reader, Writer};
use log::{info, warn};
use shared::AttachmentRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::JsonConnection;
use crate::backend::storage::traits::AttachmentStorage;

const INDEX_HEADER: [&str; 6] = ["id", "category_id", "name", "mime_type", "size", "created"];

/// CSV-indexed attachment repository.
///
/// Metadata lives in `attachments/index.csv`; every blob gets its own file
/// next to it. The index is rewritten wholesale on every change, the same way
/// the document store replaces its file.
#[derive(Clone)]
pub struct AttachmentRepository {
    connection: JsonConnection,
}

impl AttachmentRepository {
    /// Open the repository, creating the attachments directory and index.
    /// Failure here means attachment features are unavailable.
    pub fn new(connection: JsonConnection) -> Result<Self> {
        connection.ensure_attachments_directory_exists()?;
        let repository = Self { connection };
        repository.ensure_index_exists()?;
        Ok(repository)
    }

    fn ensure_index_exists(&self) -> Result<()> {
        let path = self.connection.attachment_index_path();
        if path.exists() {
            return Ok(());
        }

        let file = File::create(&path)
            .with_context(|| format!("failed to create attachment index {}", path.display()))?;
        let mut csv_writer = Writer::from_writer(BufWriter::new(file));
        csv_writer.write_record(INDEX_HEADER)?;
        csv_writer.flush()?;
        Ok(())
    }

    /// Read every record from the index
    fn read_index(&self) -> Result<Vec<AttachmentRecord>> {
        let path = self.connection.attachment_index_path();
        let file = File::open(&path)
            .with_context(|| format!("failed to open attachment index {}", path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            records.push(AttachmentRecord {
                id: record.get(0).unwrap_or("").to_string(),
                category_id: record.get(1).unwrap_or("").to_string(),
                name: record.get(2).unwrap_or("").to_string(),
                mime_type: record.get(3).unwrap_or("").to_string(),
                size: record.get(4).unwrap_or("0").parse::<u64>().unwrap_or(0),
                created: record.get(5).unwrap_or("").to_string(),
            });
        }
        Ok(records)
    }

    /// Rewrite the whole index
    fn write_index(&self, records: &[AttachmentRecord]) -> Result<()> {
        let path = self.connection.attachment_index_path();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("failed to open attachment index {}", path.display()))?;

        let mut csv_writer = Writer::from_writer(BufWriter::new(file));
        csv_writer.write_record(INDEX_HEADER)?;
        for record in records {
            csv_writer.write_record(&[
                &record.id,
                &record.category_id,
                &record.name,
                &record.mime_type,
                &record.size.to_string(),
                &record.created,
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl AttachmentStorage for AttachmentRepository {
    fn store_attachment(&self, record: &AttachmentRecord, bytes: &[u8]) -> Result<()> {
        self.connection.ensure_attachments_directory_exists()?;

        let blob_path = self.connection.blob_path(&record.id);
        std::fs::write(&blob_path, bytes)
            .with_context(|| format!("failed to write blob file {}", blob_path.display()))?;

        let mut records = self.read_index()?;
        records.push(record.clone());
        self.write_index(&records)?;

        info!(
            "Stored attachment {} ({} bytes) for category {}",
            record.id, record.size, record.category_id
        );
        Ok(())
    }

    fn get_attachment(&self, attachment_id: &str) -> Result<Option<AttachmentRecord>> {
        let records = self.read_index()?;
        Ok(records.into_iter().find(|r| r.id == attachment_id))
    }

    fn list_attachments_by_category(&self, category_id: &str) -> Result<Vec<AttachmentRecord>> {
        let records = self.read_index()?;
        Ok(records
            .into_iter()
            .filter(|r| r.category_id == category_id)
            .collect())
    }

    fn read_blob(&self, attachment_id: &str) -> Result<Option<Vec<u8>>> {
        if self.get_attachment(attachment_id)?.is_none() {
            return Ok(None);
        }

        let blob_path = self.connection.blob_path(attachment_id);
        if !blob_path.exists() {
            warn!(
                "Attachment {} is indexed but its blob file is missing",
                attachment_id
            );
            return Ok(None);
        }

        let bytes = std::fs::read(&blob_path)
            .with_context(|| format!("failed to read blob file {}", blob_path.display()))?;
        Ok(Some(bytes))
    }

    fn delete_attachment(&self, attachment_id: &str) -> Result<bool> {
        let mut records = self.read_index()?;
        let before = records.len();
        records.retain(|r| r.id != attachment_id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_index(&records)?;

        let blob_path = self.connection.blob_path(attachment_id);
        if blob_path.exists() {
            std::fs::remove_file(&blob_path)
                .with_context(|| format!("failed to delete blob file {}", blob_path.display()))?;
        }

        info!("Deleted attachment {}", attachment_id);
        Ok(true)
    }
}
