//! Read-only store over Dropbox shared links.

use async_trait::async_trait;
use url::Url;

use crate::api::DropboxApi;
use crate::error::{Error, Result};
use crate::store::{DropboxBackend, KvStore};

/// Read the files behind shared links. Keys are the link URLs.
///
/// The store cannot enumerate links, so `keys()` is always empty, and it
/// cannot be written to.
pub struct DropboxLinkReader<B = DropboxApi> {
    backend: B,
}

impl<B: DropboxBackend> DropboxLinkReader<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl DropboxLinkReader<DropboxApi> {
    /// Reader authenticated with the token found through `token_key`.
    pub fn with_token_key(token_key: &str) -> Result<Self> {
        Ok(Self::new(DropboxApi::from_token_key(token_key)?))
    }
}

fn read_only() -> Error {
    Error::InvalidInput("the shared-link store is read-only".to_string())
}

#[async_trait]
impl<B: DropboxBackend> KvStore for DropboxLinkReader<B> {
    type Value = Vec<u8>;

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        Url::parse(key)?;
        tracing::debug!("Fetching shared link {}", key);
        self.backend
            .get_shared_link_file(key)
            .await
            .map_err(|e| match e {
                Error::KeyNotFound(_) => Error::KeyNotFound(key.to_string()),
                other => other,
            })
    }

    async fn set(&self, _key: &str, _value: Vec<u8>) -> Result<()> {
        Err(read_only())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(read_only())
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        if Url::parse(key).is_err() {
            return Ok(false);
        }
        match self.get(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryBackend;

    const LINK: &str = "https://www.dropbox.com/scl/fi/xyz/report.csv?rlkey=k&dl=0";

    fn reader() -> DropboxLinkReader<MemoryBackend> {
        let backend = MemoryBackend::default();
        backend.add_link(LINK, b"a,b\n1,2\n");
        DropboxLinkReader::new(backend)
    }

    #[tokio::test]
    async fn test_get_link_contents() {
        let reader = reader();
        assert_eq!(reader.get(LINK).await.unwrap(), b"a,b\n1,2\n");
        assert!(reader.contains(LINK).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_link() {
        let reader = reader();
        let other = "https://www.dropbox.com/s/nope/x.txt?dl=0";

        let err = reader.get(other).await.unwrap_err();
        assert!(matches!(err, Error::KeyNotFound(ref k) if k == other));
        assert!(!reader.contains(other).await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_non_urls() {
        let reader = reader();
        assert!(matches!(
            reader.get("not a url").await,
            Err(Error::UrlParse(_))
        ));
        assert!(!reader.contains("not a url").await.unwrap());
    }

    #[tokio::test]
    async fn test_read_only() {
        let reader = reader();
        assert!(matches!(
            reader.set(LINK, b"x".to_vec()).await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(reader.delete(LINK).await, Err(Error::InvalidInput(_))));
        assert!(reader.keys().await.unwrap().is_empty());
    }
}
