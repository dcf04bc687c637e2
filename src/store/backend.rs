//! The slice of the Dropbox API the stores are built on.

use async_trait::async_trait;

use crate::api::{DropboxApi, Metadata};
use crate::error::Result;

/// Remote file operations used by the key-value stores.
///
/// [`DropboxApi`] is the real implementation.
#[async_trait]
pub trait DropboxBackend: Send + Sync {
    /// Paths of every file under `root`, recursively. Folders are skipped.
    async fn list_files(&self, root: &str) -> Result<Vec<String>>;

    async fn download(&self, path: &str) -> Result<Vec<u8>>;

    async fn upload(&self, path: &str, contents: Vec<u8>) -> Result<()>;

    async fn delete(&self, path: &str) -> Result<()>;

    /// Whether a file (not a folder) lives at `path`.
    async fn file_exists(&self, path: &str) -> Result<bool>;

    /// URL of a public shared link to `path`, creating one if needed.
    async fn shared_link_url(&self, path: &str) -> Result<String>;

    async fn get_shared_link_file(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl DropboxBackend for DropboxApi {
    async fn list_files(&self, root: &str) -> Result<Vec<String>> {
        let entries = match self.list_folder(root, true).await {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => {
                tracing::debug!("Store root {} does not exist yet", root);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        Ok(entries
            .iter()
            .filter_map(Metadata::as_file)
            .filter_map(|f| f.path_display.clone().or_else(|| f.path_lower.clone()))
            .collect())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        DropboxApi::download(self, path).await
    }

    async fn upload(&self, path: &str, contents: Vec<u8>) -> Result<()> {
        DropboxApi::upload(self, path, contents).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        DropboxApi::delete(self, path).await?;
        Ok(())
    }

    async fn file_exists(&self, path: &str) -> Result<bool> {
        match self.get_metadata(path).await {
            Ok(metadata) => Ok(metadata.as_file().is_some()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn shared_link_url(&self, path: &str) -> Result<String> {
        Ok(self.create_shared_link(path).await?.url)
    }

    async fn get_shared_link_file(&self, url: &str) -> Result<Vec<u8>> {
        DropboxApi::get_shared_link_file(self, url).await
    }
}
