//! Room naming rules and secret join key generation.

use rand::Rng;

use crate::error::CoreError;

/// Number of characters in a generated secret join key.
pub const SECRET_KEY_LENGTH: usize = 12;

/// Maximum length of a room name (characters).
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length of a room description (characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

/// Generate a random alphanumeric join key.
///
/// Uniqueness is enforced by `uq_rooms_secret_key`; callers retry on conflict.
pub fn generate_secret_key() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SECRET_KEY_LENGTH)
        .map(char::from)
        .collect()
}

/// Validate a room name.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Room name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Room name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional room description.
pub fn validate_description(description: Option<&str>) -> Result<(), CoreError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => Err(CoreError::Validation(
            format!("Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"),
        )),
        _ => Ok(()),
    }
}
