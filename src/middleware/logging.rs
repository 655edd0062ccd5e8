//! Logging middleware
//!
//! Provides request logging functionality.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::info;

/// Log every handled request with its resulting status
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!("{} {} -> {}", method, path, response.status().as_u16());
    response
}
