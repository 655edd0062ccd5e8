//! Request envelope and admin command dispatch
//!
//! Decodes the admin POST body into a typed command at the boundary and
//! routes it to the state store or the remote file store.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{AdminCommand, FileActionRequest, parse_command};
pub use handlers::{CommandResult, CommandStatus, PayloadKind, handle_admin_command};
