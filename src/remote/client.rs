//! Remote store HTTP plumbing
//!
//! Builds the shared outbound client and the contents/commits/mirror URLs.
//! Every call carries an explicit User-Agent; the access token is attached
//! when configured.

use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL};
use std::sync::Arc;

use crate::config::StartupConfig;
use crate::error::RemoteError;

pub(crate) const ACCEPT_RAW: &str = "application/vnd.github.v3.raw";
pub(crate) const ACCEPT_JSON: &str = "application/vnd.github.v3+json";

const USER_AGENT: &str = concat!("textvault/", env!("CARGO_PKG_VERSION"));

/// Client for the hosted version-control file store.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct RemoteStore {
    pub(crate) client: reqwest::Client,
    pub(crate) config: Arc<StartupConfig>,
}

impl RemoteStore {
    pub fn new(config: Arc<StartupConfig>) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Contents URL for a repository-relative path; empty path lists the root.
    pub(crate) fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.github_api_base, self.config.github_owner, self.config.github_repo, path
        )
    }

    /// Commits URL restricted to the most recent commit touching a path.
    pub(crate) fn commits_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/commits?path={}&per_page=1",
            self.config.github_api_base, self.config.github_owner, self.config.github_repo, path
        )
    }

    /// Raw-mirror URL with a cache-defeating query string appended.
    pub(crate) fn raw_url(&self, path: &str, buster: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}?{}",
            self.config.github_raw_base,
            self.config.github_owner,
            self.config.github_repo,
            self.config.github_branch,
            path,
            buster
        )
    }

    /// GET against the contents/commits API with the given Accept mode.
    pub(crate) fn api_get(&self, url: &str, accept: &'static str) -> reqwest::RequestBuilder {
        self.authorized(self.client.get(url))
            .header(ACCEPT, accept)
            .header(CACHE_CONTROL, "no-cache")
    }

    pub(crate) fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.github_token {
            Some(token) => builder.header(AUTHORIZATION, format!("token {}", token)),
            None => builder,
        }
    }
}
