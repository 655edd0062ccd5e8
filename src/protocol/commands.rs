//! Admin command parsing
//!
//! The admin POST body is decoded exactly once, here, into a typed command.
//! Nothing downstream ever inspects the raw body again.

use serde::Deserialize;

use crate::error::ActionError;
use crate::remote::WriteAction;

const TOKEN_PREFIX: &str = "token:";
const ACTION_PREFIX: &str = "github:";

/// A decoded admin POST body.
#[derive(Debug, PartialEq)]
pub enum AdminCommand {
    /// Replace the stored note with the full body.
    SaveNote(String),
    /// Store a share token; `None` means generate a random one.
    GenerateToken(Option<String>),
    /// Apply a file action to the remote store.
    FileAction(FileActionRequest),
}

/// Client-submitted file action payload.
#[derive(Debug, PartialEq, Deserialize)]
pub struct FileActionRequest {
    pub action: WriteAction,
    pub filename: String,
    pub content: Option<String>,
    pub sha: Option<String>,
}

impl FileActionRequest {
    /// Checks field presence against the action's requirements.
    fn validate(&self) -> Result<(), ActionError> {
        if self.filename.is_empty() {
            return Err(ActionError::MissingFilename);
        }
        match self.action {
            WriteAction::Create => {
                if self.content.is_none() {
                    return Err(ActionError::MissingField("content"));
                }
            }
            WriteAction::Update => {
                if self.content.is_none() {
                    return Err(ActionError::MissingField("content"));
                }
                if self.sha.is_none() {
                    return Err(ActionError::MissingField("sha"));
                }
            }
            WriteAction::Delete => {
                if self.sha.is_none() {
                    return Err(ActionError::MissingField("sha"));
                }
            }
        }
        Ok(())
    }
}

/// Parses a raw admin POST body into an `AdminCommand`.
///
/// A `token:` prefix generates or stores a share token, a `github:` prefix
/// carries a JSON file action, and anything else is the new note body.
pub fn parse_command(body: &str) -> Result<AdminCommand, ActionError> {
    if let Some(value) = body.strip_prefix(TOKEN_PREFIX) {
        let value = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        return Ok(AdminCommand::GenerateToken(value));
    }

    if let Some(payload) = body.strip_prefix(ACTION_PREFIX) {
        let request: FileActionRequest = serde_json::from_str(payload)
            .map_err(|e| ActionError::MalformedJson(e.to_string()))?;
        request.validate()?;
        return Ok(AdminCommand::FileAction(request));
    }

    Ok(AdminCommand::SaveNote(body.to_string()))
}
