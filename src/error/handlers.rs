//! Error handlers
//!
//! Maps vault server errors onto HTTP status codes.

use crate::error::types::VaultError;
use crate::error::types::RemoteError;
use log::error;

/// Log a vault server error
pub fn handle_error(err: &VaultError) {
    error!("Vault server error: {}", err);
}

/// Convert an error to the HTTP status code it should surface as
pub fn error_to_status(err: &VaultError) -> u16 {
    match err {
        VaultError::Auth(_) => 403,
        VaultError::Remote(RemoteError::FileNotFound(_)) => 404,
        VaultError::Remote(_) => 500,
        VaultError::Action(_) => 500,
        VaultError::State(_) => 500,
        VaultError::IoError(_) => 500,
    }
}
