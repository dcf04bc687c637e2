//! Filesystem module.
//!
//! Provides:
//! - Local path resolution against the Dropbox mirror root
//! - Local-to-Dropbox path mapping

pub mod paths;

pub use paths::{compute_remote_path, resolve_local_path, ROOT_MARKER};
