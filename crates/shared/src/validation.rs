//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of an account or record identifier.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validates that a string contains at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a server-assigned identifier such as `STU001`.
///
/// Identifiers end up as URL path segments, so they must be non-blank,
/// free of control characters and at most 128 characters long.
pub fn validate_identifier(id: &str) -> Result<(), ValidationError> {
    validate_not_blank(id)?;

    if id.chars().count() > MAX_IDENTIFIER_LENGTH {
        let mut err = ValidationError::new("identifier_length");
        err.message = Some("Identifier must be at most 128 characters".into());
        return Err(err);
    }

    if id.chars().any(char::is_control) {
        let mut err = ValidationError::new("identifier_chars");
        err.message = Some("Identifier must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}
