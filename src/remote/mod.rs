//! Remote file store client
//!
//! Wraps the hosted version-control file API and its raw-content mirror:
//! read with fallback, list with best-effort timestamp enrichment, and
//! create/update/delete writes guarded by the store's content-hash
//! precondition.

pub mod client;
pub mod operations;
pub mod types;

pub use client::RemoteStore;
pub use types::{ContentSource, EntryType, FetchedFile, RemoteFile, WriteAction};
