//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted team or player name, in characters.
pub const MAX_NAME_LENGTH: usize = 64;

/// Validates that a display name is not blank and at most [`MAX_NAME_LENGTH`] characters.
///
/// # Examples
///
/// ```ignore
/// validate_display_name("Hawks") // Ok
/// validate_display_name("   ")   // Err - blank
/// ```
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Name must not be blank".into());
        return Err(err);
    }

    let length = name.chars().count();
    if length > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("name_length");
        err.message = Some(
            format!("Name must be at most {MAX_NAME_LENGTH} characters (got {length})").into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_display_name_valid() {
        assert!(validate_display_name("Hawks").is_ok());
        assert!(validate_display_name("Ana María").is_ok());
        assert!(validate_display_name(&"é".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_display_name_blank() {
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("  \t").is_err());
    }

    #[test]
    fn test_validate_display_name_too_long() {
        assert!(validate_display_name(&"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }
}
