//! Admin command handlers
//!
//! Dispatches a decoded admin command to the state store or the remote file
//! store and produces a transport-independent result for the HTTP layer.

use log::{error, info};

use crate::auth::generate_share_token;
use crate::protocol::commands::{AdminCommand, FileActionRequest};
use crate::protocol::responses::{self, NOTE_SAVED};
use crate::remote::RemoteStore;
use crate::state::{KvStore, NOTE_KEY, SHARE_TOKEN_KEY};

/// Outcome status of executing an admin command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
}

/// Body encoding of a command result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadKind {
    PlainText,
    Json,
}

/// Full result of an admin command execution.
pub struct CommandResult {
    pub status: CommandStatus,
    pub kind: PayloadKind,
    pub body: String,
}

/// Dispatches a decoded admin command to its corresponding handler.
pub async fn handle_admin_command(
    kv: &dyn KvStore,
    remote: &RemoteStore,
    command: AdminCommand,
) -> CommandResult {
    match command {
        AdminCommand::GenerateToken(value) => handle_cmd_token(kv, value),
        AdminCommand::FileAction(request) => handle_cmd_file_action(remote, request).await,
        AdminCommand::SaveNote(body) => handle_cmd_save_note(kv, body),
    }
}

/// Stores the share token, generating one when the client sent no value.
///
/// The new token fully replaces the previous one, invalidating every link
/// distributed before this call.
fn handle_cmd_token(kv: &dyn KvStore, value: Option<String>) -> CommandResult {
    let token = value.unwrap_or_else(generate_share_token);
    match kv.put(SHARE_TOKEN_KEY, &token) {
        Ok(()) => {
            info!("Share token replaced");
            CommandResult {
                status: CommandStatus::Success,
                kind: PayloadKind::PlainText,
                body: token,
            }
        }
        Err(e) => {
            error!("Failed to store share token: {}", e);
            CommandResult {
                status: CommandStatus::Failure(e.to_string()),
                kind: PayloadKind::PlainText,
                body: "Failed to store share token".to_string(),
            }
        }
    }
}

/// Overwrites the stored note with the submitted body.
fn handle_cmd_save_note(kv: &dyn KvStore, body: String) -> CommandResult {
    match kv.put(NOTE_KEY, &body) {
        Ok(()) => CommandResult {
            status: CommandStatus::Success,
            kind: PayloadKind::PlainText,
            body: NOTE_SAVED.to_string(),
        },
        Err(e) => {
            error!("Failed to store note: {}", e);
            CommandResult {
                status: CommandStatus::Failure(e.to_string()),
                kind: PayloadKind::PlainText,
                body: "Failed to store note".to_string(),
            }
        }
    }
}

/// Relays a file action to the remote store.
///
/// The store's JSON result passes through verbatim, augmented with the
/// `autoExpand` hint the editor uses to reopen the listing after a reload.
/// Errors come back as a JSON error object; the store's rejection (stale
/// hash, existing file) is surfaced, never retried.
async fn handle_cmd_file_action(remote: &RemoteStore, request: FileActionRequest) -> CommandResult {
    match remote
        .write_file(
            request.action,
            &request.filename,
            request.content.as_deref(),
            request.sha.as_deref(),
        )
        .await
    {
        Ok(mut result) => {
            if let Some(fields) = result.as_object_mut() {
                fields.insert("autoExpand".to_string(), serde_json::Value::Bool(true));
            }
            CommandResult {
                status: CommandStatus::Success,
                kind: PayloadKind::Json,
                body: result.to_string(),
            }
        }
        Err(e) => {
            error!(
                "{} action on {} failed: {}",
                request.action.name(),
                request.filename,
                e
            );
            CommandResult {
                status: CommandStatus::Failure(e.to_string()),
                kind: PayloadKind::Json,
                body: responses::error_body(&e.to_string()),
            }
        }
    }
}
