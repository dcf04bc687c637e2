//! dropboxdol - dict-like access to Dropbox.
//!
//! This library lets application code treat Dropbox as a key-value store and
//! provides helpers for working with a local Dropbox folder.
//!
//! # Features
//!
//! - Byte and text stores over a Dropbox folder, keyed by relative path
//! - A read-only store over shared links
//! - Local path resolution against the Dropbox mirror root
//! - Local-to-Dropbox path mapping
//! - Shared link creation and `dl` flag normalization
//!
//! # Example
//!
//! ```no_run
//! use dropboxdol::{DropboxApi, DropboxTextFiles, KvStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = DropboxApi::from_token_key("DROPBOX_ACCESS_TOKEN")?;
//!     let store = DropboxTextFiles::new(api, "/apps/notes");
//!
//!     store.set("todo.md", "- write docs".to_string()).await?;
//!     for key in store.keys().await? {
//!         println!("{}: {}", key, store.get(&key).await?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod output;
pub mod sharing;
pub mod store;

// Re-exports for convenience
pub use api::{get_access_token, DropboxApi};
pub use config::Config;
pub use error::{Error, Result};
pub use fs::{compute_remote_path, resolve_local_path};
pub use sharing::{dropbox_link, set_download_flag, DownloadFlag};
pub use store::{DropboxBackend, DropboxFiles, DropboxLinkReader, DropboxTextFiles, KvStore};
