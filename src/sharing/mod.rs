//! Shared links.
//!
//! Provides:
//! - `dl` flag normalization for shared-link URLs
//! - Link creation for files in the local Dropbox mirror

pub mod flag;
pub mod link;

pub use flag::{set_download_flag, DownloadFlag};
pub use link::dropbox_link;
