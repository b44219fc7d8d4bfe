use shared::{AppDocument, DocumentVersion};

#[derive(Debug, Clone)]
pub struct ImportDocumentCommand {
    /// Raw text of the uploaded file
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ImportDocumentResult {
    pub document: AppDocument,
    pub version: DocumentVersion,
}

#[derive(Debug, Clone)]
pub struct ExportDocumentResult {
    /// Pretty-printed JSON, byte-for-byte what the download contains
    pub json: String,
    pub filename: String,
}
