//! Text Vault
//!
//! A small HTTP service serving a single-note web editor backed by a
//! key-value state store, proxying and managing plain-text files in a GitHub
//! repository.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod protocol;
pub mod remote;
pub mod render;
pub mod server;
pub mod state;

pub use server::Server;
