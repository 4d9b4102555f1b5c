//! Utility functions for the document index repository.

use crate::errors::SearchIndexError;

/// Validate a document identifier supplied by the caller.
///
/// Identifiers are opaque to this crate; the only requirement is that they are
/// not blank, since a blank id would address the index itself.
///
/// # Example
///
/// ```
/// use document_index_repository::validate_document_id;
///
/// assert!(validate_document_id("AWx3-9f").is_ok());
/// assert!(validate_document_id("  ").is_err());
/// ```
pub fn validate_document_id(id: &str) -> Result<(), SearchIndexError> {
    if id.trim().is_empty() {
        return Err(SearchIndexError::validation("Document id is required"));
    }
    Ok(())
}

/// Validate an index or field name.
pub fn validate_name(kind: &str, name: &str) -> Result<(), SearchIndexError> {
    if name.trim().is_empty() {
        return Err(SearchIndexError::validation(format!("{} is required", kind)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_document_id() {
        assert!(validate_document_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_document_id("42").is_ok());
    }

    #[test]
    fn test_validate_document_id_blank() {
        for id in ["", " ", "\t"] {
            let result = validate_document_id(id);
            assert!(matches!(
                result.unwrap_err(),
                SearchIndexError::ValidationError(_)
            ));
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Index name", "shops").is_ok());
        let err = validate_name("Geo field", "").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Geo field is required");
    }
}
