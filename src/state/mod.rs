//! Transient vault state
//!
//! Wraps the flat key-value store holding the note body and share token.

pub mod keys;
pub mod store;

pub use keys::{NOTE_KEY, SHARE_TOKEN_KEY};
pub use store::{FsKvStore, KvStore};
