//! Dropbox API module.
//!
//! This module provides:
//! - HTTP client for the Dropbox v2 RPC and content endpoints
//! - Access token lookup
//! - API request and response types

pub mod auth;
pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod test_server;

pub use auth::{get_access_token, resolve_access_token, DEFAULT_TOKEN_KEY};
pub use client::DropboxApi;
pub use types::*;
