use shared::DocumentVersion;
use thiserror::Error;

/// Why an uploaded document was rejected.
///
/// Import is all-or-nothing: any of these leaves the current state untouched.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("file must contain a JSON object at the top level")]
    NotAnObject,
    #[error("file is missing the required collections (budget+tasks or categories+events)")]
    MissingCollections,
}

/// Determine which schema version a raw import matches from its top-level keys
pub fn detect_version(value: &serde_json::Value) -> Result<DocumentVersion, ImportError> {
    let object = value.as_object().ok_or(ImportError::NotAnObject)?;

    if object.contains_key("categories") && object.contains_key("events") {
        return Ok(DocumentVersion::V2);
    }
    if object.contains_key("budget") && object.contains_key("tasks") {
        return Ok(DocumentVersion::V1);
    }
    Err(ImportError::MissingCollections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_both_schema_versions() {
        let v1: serde_json::Value =
            serde_json::from_str(r#"{"budget": [], "tasks": {}}"#).unwrap();
        assert_eq!(detect_version(&v1).unwrap(), DocumentVersion::V1);

        let v2: serde_json::Value =
            serde_json::from_str(r#"{"categories": [], "events": []}"#).unwrap();
        assert_eq!(detect_version(&v2).unwrap(), DocumentVersion::V2);
    }

    #[test]
    fn rejects_wrong_shapes() {
        let not_object: serde_json::Value = serde_json::from_str("[1, 2, 3]").unwrap();
        assert!(matches!(
            detect_version(&not_object),
            Err(ImportError::NotAnObject)
        ));

        let missing: serde_json::Value =
            serde_json::from_str(r#"{"budget": [], "events": []}"#).unwrap();
        assert!(matches!(
            detect_version(&missing),
            Err(ImportError::MissingCollections)
        ));
    }
}
