//! Well-known state keys
//!
//! The vault keeps exactly two single-valued records: the note body and the
//! current share token.

/// Key holding the note body
pub const NOTE_KEY: &str = "notes.txt";

/// Key holding the active share token
pub const SHARE_TOKEN_KEY: &str = "SHARE_TOKEN";
