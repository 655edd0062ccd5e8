//! End-to-end tests
//!
//! Boots the vault server on an ephemeral port against a faked GitHub
//! upstream (contents, commits, and raw-mirror routes served by a local axum
//! app) and drives the public HTTP surface with a real client.

use axum::Router;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use textvault::Server;
use textvault::config::StartupConfig;

const OWNER: &str = "octo";
const REPO: &str = "vault";
const BRANCH: &str = "main";
const COMMIT_DATE: &str = "2024-05-06T07:08:09Z";

struct StoredFile {
    content: String,
    sha: String,
}

/// In-memory stand-in for the hosted file store.
#[derive(Default)]
struct FakeRepo {
    files: Mutex<HashMap<String, StoredFile>>,
    broken_commit_paths: Mutex<HashSet<String>>,
    request_log: Mutex<Vec<String>>,
    sha_counter: AtomicUsize,
}

impl FakeRepo {
    fn seed(&self, name: &str, content: &str) -> String {
        let sha = self.next_sha();
        self.files.lock().unwrap().insert(
            name.to_string(),
            StoredFile {
                content: content.to_string(),
                sha: sha.clone(),
            },
        );
        sha
    }

    fn next_sha(&self) -> String {
        format!("sha-{}", self.sha_counter.fetch_add(1, Ordering::SeqCst))
    }

    fn content_of(&self, name: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(name)
            .map(|f| f.content.clone())
    }

    fn requests(&self) -> Vec<String> {
        self.request_log.lock().unwrap().clone()
    }
}

async fn fake_github(
    State(repo): State<Arc<FakeRepo>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    repo.request_log
        .lock()
        .unwrap()
        .push(format!("{} {}", method, path));

    let commits_route = format!("/repos/{}/{}/commits", OWNER, REPO);
    if path == commits_route {
        let target = uri
            .query()
            .unwrap_or_default()
            .split('&')
            .find_map(|pair| pair.strip_prefix("path="))
            .unwrap_or_default()
            .to_string();
        if repo.broken_commit_paths.lock().unwrap().contains(&target) {
            return (StatusCode::INTERNAL_SERVER_ERROR, "commit lookup down").into_response();
        }
        let exists = repo.files.lock().unwrap().contains_key(&target);
        let commits = if exists {
            serde_json::json!([{ "commit": { "committer": { "date": COMMIT_DATE } } }])
        } else {
            serde_json::json!([])
        };
        return axum::Json(commits).into_response();
    }

    let contents_prefix = format!("/repos/{}/{}/contents/", OWNER, REPO);
    if let Some(rest) = path.strip_prefix(contents_prefix.as_str()) {
        let rest = rest.to_string();
        return contents_api(&repo, method, rest, body);
    }

    let raw_prefix = format!("/{}/{}/{}/", OWNER, REPO, BRANCH);
    if let Some(rest) = path.strip_prefix(raw_prefix.as_str()) {
        return match repo.content_of(rest) {
            Some(content) => content.into_response(),
            None => (StatusCode::NOT_FOUND, "404: Not Found").into_response(),
        };
    }

    (StatusCode::NOT_FOUND, "unhandled route").into_response()
}

fn contents_api(repo: &FakeRepo, method: Method, rest: String, body: String) -> Response {
    if method == Method::GET && rest.is_empty() {
        let files = repo.files.lock().unwrap();
        let mut names: Vec<_> = files.keys().cloned().collect();
        names.sort();
        let entries: Vec<_> = names
            .iter()
            .map(|name| {
                serde_json::json!({
                    "name": name,
                    "path": name,
                    "sha": files[name].sha,
                    "size": files[name].content.len(),
                    "type": "file"
                })
            })
            .collect();
        return axum::Json(serde_json::Value::Array(entries)).into_response();
    }

    match method {
        Method::GET => match repo.content_of(&rest) {
            Some(content) => content.into_response(),
            None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        },
        Method::PUT => {
            let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
            let provided_sha = payload
                .get("sha")
                .and_then(|v| v.as_str())
                .map(str::to_string);

            let mut files = repo.files.lock().unwrap();
            match (files.get(&rest), provided_sha.as_deref()) {
                (Some(_), None) => {
                    return (StatusCode::UNPROCESSABLE_ENTITY, "\"sha\" wasn't supplied")
                        .into_response();
                }
                (Some(existing), Some(given)) if existing.sha != given => {
                    return (StatusCode::CONFLICT, "does not match").into_response();
                }
                (None, Some(_)) => {
                    return (StatusCode::UNPROCESSABLE_ENTITY, "no file to update")
                        .into_response();
                }
                _ => {}
            }

            let encoded = payload
                .get("content")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            let content = String::from_utf8(BASE64.decode(encoded).unwrap()).unwrap();
            let sha = repo.next_sha();
            files.insert(
                rest.clone(),
                StoredFile {
                    content: content.clone(),
                    sha: sha.clone(),
                },
            );

            axum::Json(serde_json::json!({
                "content": {
                    "name": rest,
                    "path": rest,
                    "sha": sha,
                    "size": content.len(),
                    "type": "file"
                },
                "commit": { "message": payload.get("message").cloned().unwrap_or_default() }
            }))
            .into_response()
        }
        Method::DELETE => {
            let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
            let provided_sha = payload.get("sha").and_then(|v| v.as_str());

            let mut files = repo.files.lock().unwrap();
            let decision = match files.get(&rest) {
                None => Err(StatusCode::NOT_FOUND),
                Some(existing) if provided_sha != Some(existing.sha.as_str()) => {
                    Err(StatusCode::CONFLICT)
                }
                Some(_) => Ok(()),
            };
            match decision {
                Err(status) => (status, "delete rejected").into_response(),
                Ok(()) => {
                    files.remove(&rest);
                    axum::Json(serde_json::json!({
                        "content": null,
                        "commit": { "message": payload.get("message").cloned().unwrap_or_default() }
                    }))
                    .into_response()
                }
            }
        }
        _ => (StatusCode::METHOD_NOT_ALLOWED, "unsupported").into_response(),
    }
}

async fn spawn_fake_github(repo: Arc<FakeRepo>) -> SocketAddr {
    let app = Router::new().fallback(fake_github).with_state(repo);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

struct TestVault {
    addr: SocketAddr,
    repo: Arc<FakeRepo>,
    _state_dir: tempfile::TempDir,
}

impl TestVault {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn admin_url(&self) -> String {
        self.url("/admin")
    }
}

async fn spawn_vault(token: Option<&str>) -> TestVault {
    let repo = Arc::new(FakeRepo::default());
    let github = spawn_fake_github(Arc::clone(&repo)).await;
    let base = format!("http://{}", github);
    spawn_vault_with(repo, base.clone(), base, token).await
}

/// Boots the vault against explicit API/mirror base URLs.
async fn spawn_vault_with(
    repo: Arc<FakeRepo>,
    api_base: String,
    raw_base: String,
    token: Option<&str>,
) -> TestVault {
    let state_dir = tempfile::tempdir().unwrap();
    let config = StartupConfig {
        bind_address: "127.0.0.1".to_string(),
        port: 0,
        admin_path: "admin".to_string(),
        github_owner: OWNER.to_string(),
        github_repo: REPO.to_string(),
        github_branch: BRANCH.to_string(),
        github_token: token.map(str::to_string),
        github_api_base: api_base,
        github_raw_base: raw_base,
        state_dir: state_dir.path().to_string_lossy().to_string(),
        request_timeout_secs: 5,
        list_fanout: 4,
    };

    let server = Server::new(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move {
        server.start().await.unwrap();
    });

    TestVault {
        addr,
        repo,
        _state_dir: state_dir,
    }
}

/// An address nothing listens on, for exercising the mirror fallback.
fn dead_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[tokio::test]
async fn test_note_roundtrip_via_share_link() {
    let vault = spawn_vault(None).await;
    let client = reqwest::Client::new();

    let response = client
        .post(vault.admin_url())
        .body("hello vault ✓")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");

    let response = client
        .post(vault.admin_url())
        .body("token:secret123")
        .send()
        .await
        .unwrap();
    assert_eq!(response.text().await.unwrap(), "secret123");

    let response = client
        .get(vault.url("/s?token=secret123"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "hello vault ✓");
}

#[tokio::test]
async fn test_new_token_invalidates_old_links() {
    let vault = spawn_vault(None).await;
    let client = reqwest::Client::new();

    client
        .post(vault.admin_url())
        .body("token:alpha")
        .send()
        .await
        .unwrap();
    client
        .post(vault.admin_url())
        .body("token:beta")
        .send()
        .await
        .unwrap();

    let response = client
        .get(vault.url("/s?token=alpha"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
    assert_eq!(response.text().await.unwrap(), "Invalid token");

    let response = client
        .get(vault.url("/s?token=beta"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_empty_token_request_generates_random_token() {
    let vault = spawn_vault(None).await;
    let client = reqwest::Client::new();

    let token = client
        .post(vault.admin_url())
        .body("token:")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(token.len(), 8);
    assert!(
        token
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    );

    let response = client
        .get(vault.url(&format!("/s?token={}", token)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_share_without_token_parameter_is_not_found() {
    let vault = spawn_vault(None).await;
    let client = reqwest::Client::new();

    let response = client.get(vault.url("/s")).send().await.unwrap();
    assert_eq!(response.status(), 404);

    let response = client.get(vault.url("/s?token=")).send().await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_share_before_any_token_issued_is_forbidden() {
    let vault = spawn_vault(None).await;
    let client = reqwest::Client::new();

    let response = client
        .get(vault.url("/s?token=guess"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
    assert_eq!(response.text().await.unwrap(), "Invalid token");
}

#[tokio::test]
async fn test_passthrough_serves_file_with_cache_bypass_headers() {
    let vault = spawn_vault(None).await;
    vault.repo.seed("free.txt", "hello from the repo");
    let client = reqwest::Client::new();

    let response = client.get(vault.url("/free.txt")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let headers = response.headers().clone();
    let header = |name: &str| headers.get(name).unwrap().to_str().unwrap().to_string();
    assert_eq!(
        header("cache-control"),
        "no-cache, no-store, must-revalidate, max-age=0"
    );
    assert_eq!(header("pragma"), "no-cache");
    assert_eq!(header("access-control-allow-origin"), "*");
    assert_eq!(header("x-content-source"), "github-api");
    assert!(headers.contains_key("x-content-freshness"));
    assert!(
        headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );

    assert_eq!(response.text().await.unwrap(), "hello from the repo");
}

#[tokio::test]
async fn test_passthrough_falls_back_to_mirror_when_api_is_down() {
    let repo = Arc::new(FakeRepo::default());
    let github = spawn_fake_github(Arc::clone(&repo)).await;
    let vault = spawn_vault_with(
        repo,
        format!("http://{}", dead_address()),
        format!("http://{}", github),
        None,
    )
    .await;
    vault.repo.seed("free.txt", "mirror copy");
    let client = reqwest::Client::new();

    let response = client.get(vault.url("/free.txt")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("x-content-source")
            .unwrap()
            .to_str()
            .unwrap(),
        "github-raw"
    );
    assert_eq!(response.text().await.unwrap(), "mirror copy");
}

#[tokio::test]
async fn test_missing_file_tries_both_paths_before_404() {
    let vault = spawn_vault(None).await;
    let client = reqwest::Client::new();

    let response = client.get(vault.url("/nope.txt")).send().await.unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), "文件未找到: nope.txt");

    let requests = vault.repo.requests();
    assert!(
        requests
            .iter()
            .any(|r| r == &format!("GET /repos/{}/{}/contents/nope.txt", OWNER, REPO))
    );
    assert!(
        requests
            .iter()
            .any(|r| r == &format!("GET /{}/{}/{}/nope.txt", OWNER, REPO, BRANCH))
    );
}

#[tokio::test]
async fn test_admin_page_lists_files_despite_enrichment_failure() {
    let vault = spawn_vault(Some("testtoken")).await;
    vault.repo.seed("a.txt", "aaa");
    vault.repo.seed("b.txt", "bbb");
    vault
        .repo
        .broken_commit_paths
        .lock()
        .unwrap()
        .insert("b.txt".to_string());
    let client = reqwest::Client::new();

    let page = client
        .get(vault.admin_url())
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    // Both entries survive; only the broken one degrades to the placeholder.
    assert!(page.contains("2 files"));
    assert!(page.contains("a.txt"));
    assert!(page.contains("b.txt"));
    assert!(page.contains("2024-05-06 07:08"));
    assert!(page.contains("unknown"));
}

#[tokio::test]
async fn test_admin_page_without_credential_renders_placeholder() {
    let vault = spawn_vault(None).await;
    vault.repo.seed("a.txt", "aaa");
    let client = reqwest::Client::new();

    let response = client.get(vault.admin_url()).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let page = response.text().await.unwrap();
    assert!(page.contains("File listing unavailable"));

    // The listing was skipped outright, not attempted and swallowed.
    let requests = vault.repo.requests();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_root_and_index_alias_the_admin_page() {
    let vault = spawn_vault(None).await;
    let client = reqwest::Client::new();

    for path in ["/", "/index.html"] {
        let response = client.get(vault.url(path)).send().await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.text().await.unwrap().contains("id=\"editor\""));
    }
}

#[tokio::test]
async fn test_note_content_is_escaped_in_page() {
    let vault = spawn_vault(None).await;
    let client = reqwest::Client::new();

    client
        .post(vault.admin_url())
        .body("<script>alert(1)</script>")
        .send()
        .await
        .unwrap();

    let page = client
        .get(vault.admin_url())
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
}

#[tokio::test]
async fn test_create_action_and_duplicate_create() {
    let vault = spawn_vault(Some("testtoken")).await;
    let client = reqwest::Client::new();

    let response = client
        .post(vault.admin_url())
        .body(r#"github:{"action":"create","filename":"a.txt","content":"hi"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let result: serde_json::Value = response.json().await.unwrap();
    assert_eq!(result["autoExpand"], true);
    assert_eq!(result["content"]["name"], "a.txt");
    assert_eq!(vault.repo.content_of("a.txt").as_deref(), Some("hi"));

    // The store rejects a second create for the same path; the rejection is
    // relayed, not retried.
    let response = client
        .post(vault.admin_url())
        .body(r#"github:{"action":"create","filename":"a.txt","content":"hi"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let result: serde_json::Value = response.json().await.unwrap();
    assert_eq!(result["error"], "create failed: 422");
}

#[tokio::test]
async fn test_update_with_stale_sha_fails_without_mutation() {
    let vault = spawn_vault(Some("testtoken")).await;
    vault.repo.seed("a.txt", "original");
    let client = reqwest::Client::new();

    let response = client
        .post(vault.admin_url())
        .body(r#"github:{"action":"update","filename":"a.txt","content":"new","sha":"stale"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let result: serde_json::Value = response.json().await.unwrap();
    assert_eq!(result["error"], "update failed: 409");
    assert_eq!(vault.repo.content_of("a.txt").as_deref(), Some("original"));
}

#[tokio::test]
async fn test_update_with_current_sha_succeeds() {
    let vault = spawn_vault(Some("testtoken")).await;
    let sha = vault.repo.seed("a.txt", "original");
    let client = reqwest::Client::new();

    let body = format!(
        r#"github:{{"action":"update","filename":"a.txt","content":"revised","sha":"{}"}}"#,
        sha
    );
    let response = client
        .post(vault.admin_url())
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(vault.repo.content_of("a.txt").as_deref(), Some("revised"));
}

#[tokio::test]
async fn test_delete_action() {
    let vault = spawn_vault(Some("testtoken")).await;
    let sha = vault.repo.seed("a.txt", "doomed");
    let client = reqwest::Client::new();

    let body = format!(
        r#"github:{{"action":"delete","filename":"a.txt","sha":"{}"}}"#,
        sha
    );
    let response = client
        .post(vault.admin_url())
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(vault.repo.content_of("a.txt"), None);

    // Deleting an absent path surfaces the store's own error.
    let response = client
        .post(vault.admin_url())
        .body(r#"github:{"action":"delete","filename":"a.txt","sha":"whatever"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let result: serde_json::Value = response.json().await.unwrap();
    assert_eq!(result["error"], "delete failed: 404");
}

#[tokio::test]
async fn test_malformed_action_json_is_caught() {
    let vault = spawn_vault(None).await;
    let client = reqwest::Client::new();

    let response = client
        .post(vault.admin_url())
        .body("github:{this is not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let result: serde_json::Value = response.json().await.unwrap();
    assert!(
        result["error"]
            .as_str()
            .unwrap()
            .contains("Malformed action payload")
    );

    // The handler survives; the next request still works.
    let response = client
        .post(vault.admin_url())
        .body("still alive")
        .send()
        .await
        .unwrap();
    assert_eq!(response.text().await.unwrap(), "OK");
}
