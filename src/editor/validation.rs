//! Username normalization and commit-time validation rules

use thiserror::Error;

use crate::constants::{messages, username};

/// User-facing validation failures. `Display` is the exact message shown in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Seed-time notice: no username was ever committed
    #[error("{}", messages::MISSING_USERNAME)]
    MissingUsername,

    /// Commit-time failure: normalized username below the minimum length
    #[error("{}", messages::USERNAME_TOO_SHORT)]
    UsernameTooShort { len: usize, min: usize },
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Drop every character outside `[A-Za-z0-9_]`
pub fn strip_non_word(raw: &str) -> String {
    raw.chars().filter(|&c| is_word_char(c)).collect()
}

/// Strip non-word characters and truncate to the maximum username length.
/// Total over all inputs: invalid characters are discarded, never rejected.
pub fn normalize_username(raw: &str) -> String {
    let mut value = strip_non_word(raw);
    // Only ASCII survives the filter, so byte length == char count
    value.truncate(username::MAX_LENGTH);
    value
}

/// Commit-time rule: the normalized username must reach the minimum length
pub fn validate_username(normalized: &str) -> Result<(), ValidationError> {
    if normalized.len() < username::MIN_LENGTH {
        return Err(ValidationError::UsernameTooShort {
            len: normalized.len(),
            min: username::MIN_LENGTH,
        });
    }
    Ok(())
}

/// Seed-time rule: an empty committed username pre-populates the missing-username notice
pub fn seed_notice(committed_username: &str) -> Option<ValidationError> {
    committed_username
        .is_empty()
        .then_some(ValidationError::MissingUsername)
}
