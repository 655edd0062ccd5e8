//! Share-token validation
//!
//! Compares a presented token against the stored one. A mismatch reveals
//! nothing about the correct value.

use crate::error::AuthError;

/// Validates a presented share token against the currently stored token.
pub fn validate_share_token(presented: &str, stored: Option<&str>) -> Result<(), AuthError> {
    match stored {
        None => Err(AuthError::TokenUnset),
        Some(current) if current == presented => Ok(()),
        Some(_) => Err(AuthError::InvalidToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_token_accepted() {
        assert!(validate_share_token("secret123", Some("secret123")).is_ok());
    }

    #[test]
    fn test_mismatched_token_rejected() {
        assert!(matches!(
            validate_share_token("wrong", Some("secret123")),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_unset_token_rejects_everything() {
        assert!(matches!(
            validate_share_token("anything", None),
            Err(AuthError::TokenUnset)
        ));
    }
}
