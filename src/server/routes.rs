//! Request routing
//!
//! Selects exactly one handling branch per request, in order: admin page or
//! admin command, share fetch, raw file passthrough, 404. The share path has
//! a fixed route; everything else goes through the fallback because the admin
//! path is a configured secret segment.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::any;
use log::{info, warn};
use std::collections::HashMap;

use crate::auth::validate_share_token;
use crate::config::StartupConfig;
use crate::error::handlers::{error_to_status, handle_error};
use crate::error::{RemoteError, VaultError};
use crate::middleware::log_request;
use crate::protocol::responses::{INVALID_TOKEN, NOT_FOUND, error_body, missing_file_message};
use crate::protocol::{CommandStatus, PayloadKind, handle_admin_command, parse_command};
use crate::remote::FetchedFile;
use crate::render::{render_admin_page, render_file_list};
use crate::server::core::AppContext;
use crate::state::{NOTE_KEY, SHARE_TOKEN_KEY};

/// Builds the request router around the shared context.
pub fn build_router(context: AppContext) -> Router {
    Router::new()
        .route("/s", any(share_note))
        .fallback(route_request)
        .layer(middleware::from_fn(log_request))
        .with_state(context)
}

/// Share fetch: return the note to anyone presenting the current token.
///
/// A missing or empty token parameter is not a failed validation, it is an
/// unmatched route. A wrong token is a plain 403 that leaks nothing.
async fn share_note(
    State(context): State<AppContext>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let presented = params.get("token").map(String::as_str).unwrap_or_default();
    if presented.is_empty() {
        return not_found_response();
    }

    let stored = match context.kv.get(SHARE_TOKEN_KEY) {
        Ok(value) => value,
        Err(e) => return internal_error(VaultError::from(e)),
    };

    match validate_share_token(presented, stored.as_deref()) {
        Ok(()) => match context.kv.get(NOTE_KEY) {
            Ok(note) => plain_text(StatusCode::OK, note.unwrap_or_default()),
            Err(e) => internal_error(VaultError::from(e)),
        },
        Err(e) => {
            info!("Share request rejected: {}", e);
            plain_text(StatusCode::FORBIDDEN, INVALID_TOKEN.to_string())
        }
    }
}

/// Fallback dispatch for every path without a fixed route.
async fn route_request(
    State(context): State<AppContext>,
    method: Method,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> Response {
    let path = uri.path();

    if is_admin_path(&context.config, path) {
        if method == Method::POST {
            return admin_command(&context, body).await;
        }
        return admin_page(&context).await;
    }

    let filename = path.trim_start_matches('/');
    if filename.is_empty() {
        return not_found_response();
    }

    let force = params.contains_key("force");
    passthrough_file(&context, filename, force).await
}

/// Admin page: note body from the state store, listing from the remote store.
///
/// The listing is best-effort. Without a credential it is skipped outright,
/// and a remote failure degrades it to the placeholder section instead of
/// failing the page load.
async fn admin_page(context: &AppContext) -> Response {
    let note = match context.kv.get(NOTE_KEY) {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => return internal_error(VaultError::from(e)),
    };

    let file_list_html = if context.config.github_token.is_some() {
        match context.remote.list_files().await {
            Ok(files) => render_file_list(&files),
            Err(e) => {
                warn!("File listing unavailable: {}", e);
                String::new()
            }
        }
    } else {
        String::new()
    };

    Html(render_admin_page(&note, &file_list_html)).into_response()
}

/// Admin POST: decode the body once into a typed command and dispatch it.
async fn admin_command(context: &AppContext, body: String) -> Response {
    let command = match parse_command(&body) {
        Ok(command) => command,
        Err(e) => {
            let err = VaultError::from(e);
            handle_error(&err);
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body(&err.to_string()),
            );
        }
    };

    let result = handle_admin_command(context.kv.as_ref(), &context.remote, command).await;
    let status = match result.status {
        CommandStatus::Success => StatusCode::OK,
        CommandStatus::Failure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    match result.kind {
        PayloadKind::PlainText => plain_text(status, result.body),
        PayloadKind::Json => json_response(status, result.body),
    }
}

/// Raw file passthrough with cache-defeating headers.
async fn passthrough_file(context: &AppContext, filename: &str, force: bool) -> Response {
    match context.remote.read_file(filename, force).await {
        Ok(fetched) => file_response(fetched),
        Err(e) => {
            let err = VaultError::from(e);
            handle_error(&err);
            let body = match &err {
                VaultError::Remote(RemoteError::FileNotFound(_)) => missing_file_message(filename),
                _ => err.to_string(),
            };
            let status = StatusCode::from_u16(error_to_status(&err))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            plain_text(status, body)
        }
    }
}

fn is_admin_path(config: &StartupConfig, path: &str) -> bool {
    path == "/" || path == "/index.html" || path == config.admin_route()
}

/// File-read response: cache-disabling directives, permissive CORS, and
/// source/freshness headers. All advisory; the mirror is eventually
/// consistent, so every intermediary is told not to hold on to the body.
fn file_response(fetched: FetchedFile) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate, max-age=0"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        HeaderName::from_static("x-content-source"),
        HeaderValue::from_static(fetched.source.as_str()),
    );
    if let Ok(freshness) = HeaderValue::from_str(&chrono::Utc::now().to_rfc3339()) {
        headers.insert(HeaderName::from_static("x-content-freshness"), freshness);
    }

    (StatusCode::OK, headers, fetched.content).into_response()
}

fn plain_text(status: StatusCode, body: String) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    (status, headers, body).into_response()
}

fn json_response(status: StatusCode, body: String) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    (status, headers, body).into_response()
}

fn not_found_response() -> Response {
    plain_text(StatusCode::NOT_FOUND, NOT_FOUND.to_string())
}

fn internal_error(err: VaultError) -> Response {
    handle_error(&err);
    plain_text(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}
