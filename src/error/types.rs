//! Error types
//!
//! Defines domain-specific error types for each module of the vault server.

use std::fmt;
use std::io;

/// Share-token authentication errors
#[derive(Debug)]
pub enum AuthError {
    InvalidToken,
    TokenUnset,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidToken => write!(f, "Presented share token does not match"),
            AuthError::TokenUnset => write!(f, "No share token has been issued"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Key-value state store errors
#[derive(Debug)]
pub enum StateError {
    InvalidKey(String),
    IoError(io::Error),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::InvalidKey(k) => write!(f, "Invalid state key: {}", k),
            StateError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StateError {}

impl From<io::Error> for StateError {
    fn from(error: io::Error) -> Self {
        StateError::IoError(error)
    }
}

/// Remote file store errors
#[derive(Debug)]
pub enum RemoteError {
    /// The remote store answered a named action with a non-success status.
    Status { action: &'static str, status: u16 },
    /// Both the primary API and the raw mirror failed to produce the file.
    FileNotFound(String),
    /// Transport-level failure before any response was received.
    Unreachable(String),
    /// The remote store answered with a body we could not decode.
    Decode(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Status { action, status } => {
                write!(f, "{} failed: {}", action, status)
            }
            RemoteError::FileNotFound(p) => write!(f, "File not found: {}", p),
            RemoteError::Unreachable(e) => write!(f, "Remote store unreachable: {}", e),
            RemoteError::Decode(e) => write!(f, "Malformed remote response: {}", e),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        RemoteError::Unreachable(error.to_string())
    }
}

/// File-action decoding and validation errors
#[derive(Debug)]
pub enum ActionError {
    MalformedJson(String),
    MissingField(&'static str),
    MissingFilename,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::MalformedJson(e) => write!(f, "Malformed action payload: {}", e),
            ActionError::MissingField(field) => {
                write!(f, "Action is missing required field: {}", field)
            }
            ActionError::MissingFilename => write!(f, "Action is missing a filename"),
        }
    }
}

impl std::error::Error for ActionError {}

/// General vault server error that encompasses all error types
#[derive(Debug)]
pub enum VaultError {
    Auth(AuthError),
    State(StateError),
    Remote(RemoteError),
    Action(ActionError),
    IoError(io::Error),
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultError::Auth(e) => write!(f, "Authentication error: {}", e),
            VaultError::State(e) => write!(f, "State store error: {}", e),
            VaultError::Remote(e) => write!(f, "Remote store error: {}", e),
            VaultError::Action(e) => write!(f, "Action error: {}", e),
            VaultError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for VaultError {}

// Implement conversions from specific errors to VaultError
impl From<AuthError> for VaultError {
    fn from(error: AuthError) -> Self {
        VaultError::Auth(error)
    }
}

impl From<StateError> for VaultError {
    fn from(error: StateError) -> Self {
        VaultError::State(error)
    }
}

impl From<RemoteError> for VaultError {
    fn from(error: RemoteError) -> Self {
        VaultError::Remote(error)
    }
}

impl From<ActionError> for VaultError {
    fn from(error: ActionError) -> Self {
        VaultError::Action(error)
    }
}

impl From<io::Error> for VaultError {
    fn from(error: io::Error) -> Self {
        VaultError::IoError(error)
    }
}
