//! Shared links for files in the local Dropbox mirror.

use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::fs::{compute_remote_path, resolve_local_path};
use crate::sharing::flag::set_download_flag;
use crate::store::DropboxBackend;

/// Get a shared link for a file in the local Dropbox folder.
///
/// `local_path` is resolved against `root_directory` (or the root is inferred
/// from a `Dropbox` path component), mapped to its Dropbox path, shared, and
/// the returned URL gets `dl={flag}`.
pub async fn dropbox_link<B: DropboxBackend + ?Sized>(
    backend: &B,
    local_path: impl AsRef<Path>,
    root_directory: Option<&Path>,
    flag: impl fmt::Display,
) -> Result<String> {
    let (full_path, root) = resolve_local_path(local_path, root_directory)?;
    let remote_path = compute_remote_path(&full_path, &root)?;
    tracing::debug!("Sharing {} as {}", full_path.display(), remote_path);

    let url = backend.shared_link_url(&remote_path).await?;
    Ok(set_download_flag(&url, flag))
}
