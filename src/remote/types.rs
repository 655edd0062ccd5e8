//! Remote file store data types
//!
//! Shapes of the contents-API and commits-API payloads this server consumes,
//! plus the write-action vocabulary.

use serde::Deserialize;

/// Metadata for one entry in the backing repository.
///
/// `last_modified` is not part of the contents payload; it is filled in
/// best-effort from the commit history and stays `None` when that lookup
/// fails.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFile {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(skip)]
    pub last_modified: Option<String>,
}

impl RemoteFile {
    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }
}

/// Entry kind as reported by the contents API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    #[serde(other)]
    Other,
}

/// A write against the backing repository.
///
/// Create and update share the upsert verb and differ only in whether a
/// content hash precondition is attached; delete uses the remove verb and
/// always requires the hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteAction {
    Create,
    Update,
    Delete,
}

impl WriteAction {
    /// Action name used in error labels and the wire payload.
    pub fn name(&self) -> &'static str {
        match self {
            WriteAction::Create => "create",
            WriteAction::Update => "update",
            WriteAction::Delete => "delete",
        }
    }

    /// Verb used in the generated commit message.
    pub fn commit_verb(&self) -> &'static str {
        match self {
            WriteAction::Create => "Create",
            WriteAction::Update => "Update",
            WriteAction::Delete => "Delete",
        }
    }
}

/// Where a passthrough read was ultimately served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Api,
    Mirror,
}

impl ContentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentSource::Api => "github-api",
            ContentSource::Mirror => "github-raw",
        }
    }
}

/// A successfully fetched file body plus its source.
#[derive(Debug)]
pub struct FetchedFile {
    pub content: String,
    pub source: ContentSource,
}

/// One entry of the commits-API response; only the committer date matters.
#[derive(Debug, Deserialize)]
pub struct CommitEntry {
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetail {
    pub committer: Option<CommitSignature>,
}

#[derive(Debug, Deserialize)]
pub struct CommitSignature {
    pub date: String,
}
