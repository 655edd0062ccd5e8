//! Remote store operations
//!
//! Read, list, and write operations against the backing repository. Every
//! remote call is a single attempt; failures surface to the caller instead of
//! being retried, since the user-facing actions are cheap to re-trigger.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{error, info, warn};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::RemoteError;
use crate::remote::client::{ACCEPT_JSON, ACCEPT_RAW, RemoteStore};
use crate::remote::types::{CommitEntry, ContentSource, FetchedFile, RemoteFile, WriteAction};

/// Body of a contents-API write request.
#[derive(Serialize)]
struct ContentsWriteBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

impl RemoteStore {
    /// Fetches a file body, trying the contents API first and falling back to
    /// the raw mirror.
    ///
    /// The API path is authenticated and never stale but rate-limited; the
    /// mirror is unauthenticated but eventually consistent, so its URL gets a
    /// throwaway query parameter to defeat intermediary caches. `force`
    /// switches that parameter to a timestamp.
    pub async fn read_file(&self, path: &str, force: bool) -> Result<FetchedFile, RemoteError> {
        match self
            .api_get(&self.contents_url(path), ACCEPT_RAW)
            .send()
            .await
        {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                let content = response.text().await?;
                return Ok(FetchedFile {
                    content,
                    source: ContentSource::Api,
                });
            }
            Ok(response) => {
                info!(
                    "Contents API returned {} for {}, trying raw mirror",
                    response.status(),
                    path
                );
            }
            Err(e) => {
                warn!("Contents API request for {} failed: {}", path, e);
            }
        }

        let url = self.raw_url(path, &cache_buster(force));
        match self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache, max-age=0")
            .send()
            .await
        {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                let content = response.text().await?;
                Ok(FetchedFile {
                    content,
                    source: ContentSource::Mirror,
                })
            }
            Ok(response) => {
                info!("Raw mirror returned {} for {}", response.status(), path);
                Err(RemoteError::FileNotFound(path.to_string()))
            }
            Err(e) => {
                warn!("Raw mirror request for {} failed: {}", path, e);
                Err(RemoteError::FileNotFound(path.to_string()))
            }
        }
    }

    /// Lists the repository root with per-file last-modified timestamps.
    ///
    /// The timestamp lookups are a bounded concurrent fan-out and strictly
    /// best-effort: a failed lookup leaves that entry's timestamp unset and
    /// never fails the listing.
    pub async fn list_files(&self) -> Result<Vec<RemoteFile>, RemoteError> {
        let response = self
            .api_get(&self.contents_url(""), ACCEPT_JSON)
            .send()
            .await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(RemoteError::Status {
                action: "list",
                status: status.as_u16(),
            });
        }

        let files: Vec<RemoteFile> = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        info!("Listed {} repository entries", files.len());
        Ok(self.enrich_timestamps(files).await)
    }

    async fn enrich_timestamps(&self, files: Vec<RemoteFile>) -> Vec<RemoteFile> {
        let limit = Arc::new(Semaphore::new(self.config.list_fanout));
        let count = files.len();
        let mut tasks = JoinSet::new();

        for (index, mut file) in files.into_iter().enumerate() {
            let store = self.clone();
            let limit = Arc::clone(&limit);
            tasks.spawn(async move {
                if !file.is_file() {
                    return (index, file);
                }
                let _permit = match limit.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (index, file),
                };
                match store.latest_commit_date(&file.path).await {
                    Ok(date) => file.last_modified = date,
                    Err(e) => {
                        warn!("Failed to fetch commit info for {}: {}", file.name, e);
                    }
                }
                (index, file)
            });
        }

        let mut enriched: Vec<Option<RemoteFile>> =
            std::iter::repeat_with(|| None).take(count).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, file)) => enriched[index] = Some(file),
                Err(e) => error!("Timestamp lookup task failed: {}", e),
            }
        }
        enriched.into_iter().flatten().collect()
    }

    async fn latest_commit_date(&self, path: &str) -> Result<Option<String>, RemoteError> {
        let response = self
            .api_get(&self.commits_url(path), ACCEPT_JSON)
            .send()
            .await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(RemoteError::Status {
                action: "commits",
                status: status.as_u16(),
            });
        }

        let commits: Vec<CommitEntry> = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        Ok(commits
            .into_iter()
            .next()
            .and_then(|entry| entry.commit.committer)
            .map(|signature| signature.date))
    }

    /// Applies a write action to the repository and relays the store's
    /// response verbatim.
    ///
    /// Content travels base64-encoded. Update and delete attach the caller's
    /// content hash; a stale hash is the store's rejection to make, and it
    /// comes back as a status error, never a retry.
    pub async fn write_file(
        &self,
        action: WriteAction,
        path: &str,
        content: Option<&str>,
        sha: Option<&str>,
    ) -> Result<serde_json::Value, RemoteError> {
        let url = self.contents_url(path);
        let message = format!("{} file: {}", action.commit_verb(), path);

        let (builder, body) = match action {
            WriteAction::Delete => (
                self.authorized(self.client.delete(&url)),
                ContentsWriteBody {
                    message,
                    content: None,
                    sha: sha.map(str::to_string),
                },
            ),
            WriteAction::Create | WriteAction::Update => (
                self.authorized(self.client.put(&url)),
                ContentsWriteBody {
                    message,
                    content: Some(BASE64.encode(content.unwrap_or_default())),
                    sha: sha.map(str::to_string),
                },
            ),
        };

        let response = builder
            .header(reqwest::header::ACCEPT, ACCEPT_JSON)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                action: action.name(),
                status: status.as_u16(),
            });
        }

        info!("{} applied to {}", action.name(), path);
        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

/// Query string that defeats intermediary caching on the raw mirror.
fn cache_buster(force: bool) -> String {
    if force {
        format!("t={}", chrono::Utc::now().timestamp_millis())
    } else {
        const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        let tag: String = (0..6)
            .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
            .collect();
        format!("nocache={}", tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_buster_random_form() {
        let buster = cache_buster(false);
        let tag = buster.strip_prefix("nocache=").unwrap();
        assert_eq!(tag.len(), 6);
        assert!(
            tag.bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        );
    }

    #[test]
    fn test_cache_buster_forced_form() {
        let buster = cache_buster(true);
        let millis = buster.strip_prefix("t=").unwrap();
        assert!(millis.parse::<i64>().is_ok());
    }

    #[test]
    fn test_write_body_omits_absent_fields() {
        let body = ContentsWriteBody {
            message: "Delete file: a.txt".to_string(),
            content: None,
            sha: Some("abc".to_string()),
        };
        let encoded = serde_json::to_string(&body).unwrap();
        assert!(!encoded.contains("content"));
        assert!(encoded.contains("\"sha\":\"abc\""));
    }

    #[test]
    fn test_content_is_base64() {
        assert_eq!(BASE64.encode("hi"), "aGk=");
    }
}
