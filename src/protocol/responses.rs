//! Fixed response bodies
//!
//! The handful of literal bodies the HTTP surface promises.

/// Body returned after a successful note save
pub const NOTE_SAVED: &str = "OK";

/// Body returned for a share request with a wrong token
pub const INVALID_TOKEN: &str = "Invalid token";

/// Body returned when no routing branch matched
pub const NOT_FOUND: &str = "Not found";

/// Body returned when a proxied file exists on neither read path
pub fn missing_file_message(filename: &str) -> String {
    format!("文件未找到: {}", filename)
}

/// JSON error object for a failed file action
pub fn error_body(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
