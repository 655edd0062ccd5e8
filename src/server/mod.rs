//! HTTP server
//!
//! Binds the listener, builds the router, and serves requests.

pub mod core;
pub mod routes;

pub use core::{AppContext, Server};
