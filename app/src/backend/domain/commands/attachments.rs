use shared::AttachmentRecord;

#[derive(Debug, Clone)]
pub struct AddAttachmentCommand {
    pub category_id: String,
    /// Original file name
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct AddAttachmentResult {
    pub record: AttachmentRecord,
}

#[derive(Debug, Clone)]
pub struct DeleteAttachmentCommand {
    pub attachment_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteAttachmentResult {
    pub deleted: bool,
}
