//! Key-value views of a Dropbox folder.

use async_trait::async_trait;

use crate::api::DropboxApi;
use crate::error::{Error, Result};
use crate::store::{DropboxBackend, KvStore};

/// Files under a Dropbox folder, keyed by their path relative to that folder.
///
/// Values are raw bytes. Setting a key uploads (overwriting), deleting a key
/// deletes the remote file.
pub struct DropboxFiles<B = DropboxApi> {
    backend: B,
    root: String,
}

impl<B: DropboxBackend> DropboxFiles<B> {
    /// Create a store rooted at the Dropbox folder `root` (`/` for the whole
    /// account).
    pub fn new(backend: B, root: &str) -> Self {
        Self {
            backend,
            root: normalize_root(root),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Store root as a Dropbox path, `/` for the account root.
    pub fn root(&self) -> &str {
        if self.root.is_empty() {
            "/"
        } else {
            &self.root
        }
    }

    /// Dropbox path holding `key`.
    pub fn path_of(&self, key: &str) -> Result<String> {
        let key = key.trim_start_matches('/');
        if key.is_empty() {
            return Err(Error::InvalidInput("store keys cannot be empty".to_string()));
        }
        Ok(format!("{}/{}", self.root, key))
    }

    /// Key for a Dropbox path, or `None` if it lies outside the store root.
    ///
    /// The root is matched case-insensitively because listings may report
    /// paths in a different case than the one the store was created with.
    pub fn key_of(&self, path: &str) -> Option<String> {
        let mut rest = path;
        for expected in self.root.chars() {
            let mut chars = rest.chars();
            let actual = chars.next()?;
            if !actual.to_lowercase().eq(expected.to_lowercase()) {
                return None;
            }
            rest = chars.as_str();
        }
        let key = rest.strip_prefix('/')?;
        if key.is_empty() {
            return None;
        }
        Some(key.to_string())
    }
}

/// Leading slash, no trailing slash, and the account root as "".
fn normalize_root(root: &str) -> String {
    let trimmed = root.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Swap the backend's path-level not-found for one naming the key.
fn key_not_found(key: &str) -> impl FnOnce(Error) -> Error + '_ {
    move |e| match e {
        Error::KeyNotFound(_) => Error::KeyNotFound(key.to_string()),
        other => other,
    }
}

#[async_trait]
impl<B: DropboxBackend> KvStore for DropboxFiles<B> {
    type Value = Vec<u8>;

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_of(key)?;
        self.backend.download(&path).await.map_err(key_not_found(key))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let path = self.path_of(key)?;
        tracing::info!("Writing {} bytes to {}", value.len(), path);
        self.backend.upload(&path, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_of(key)?;
        tracing::info!("Deleting {}", path);
        self.backend.delete(&path).await.map_err(key_not_found(key))
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        let path = self.path_of(key)?;
        self.backend.file_exists(&path).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let paths = self.backend.list_files(self.root()).await?;
        let mut keys: Vec<String> = paths.iter().filter_map(|p| self.key_of(p)).collect();
        keys.sort();
        Ok(keys)
    }
}

/// Text files under a Dropbox folder. Values are UTF-8 strings.
pub struct DropboxTextFiles<B = DropboxApi> {
    files: DropboxFiles<B>,
}

impl<B: DropboxBackend> DropboxTextFiles<B> {
    pub fn new(backend: B, root: &str) -> Self {
        Self {
            files: DropboxFiles::new(backend, root),
        }
    }

    /// The underlying bytes store.
    pub fn files(&self) -> &DropboxFiles<B> {
        &self.files
    }
}

impl<B: DropboxBackend> From<DropboxFiles<B>> for DropboxTextFiles<B> {
    fn from(files: DropboxFiles<B>) -> Self {
        Self { files }
    }
}

#[async_trait]
impl<B: DropboxBackend> KvStore for DropboxTextFiles<B> {
    type Value = String;

    async fn get(&self, key: &str) -> Result<String> {
        let bytes = self.files.get(key).await?;
        String::from_utf8(bytes).map_err(|e| Error::Encoding(format!("{}: {}", key, e)))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.files.set(key, value.into_bytes()).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.files.delete(key).await
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        self.files.contains(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.files.keys().await
    }
}

/// Old name of [`DropboxFiles`].
#[deprecated(note = "use DropboxFiles instead")]
pub type DropboxBinaryStore<B = DropboxApi> = DropboxFiles<B>;

/// Old name of [`DropboxTextFiles`].
#[deprecated(note = "use DropboxTextFiles instead")]
pub type DropboxTextStore<B = DropboxApi> = DropboxTextFiles<B>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryBackend;

    fn sample_backend() -> MemoryBackend {
        MemoryBackend::with_files(&[
            ("/apps/data/a.txt", &b"alpha"[..]),
            ("/apps/data/sub/b.bin", &[0xff, 0x00, 0x10][..]),
            ("/apps/other/c.txt", &b"not in store"[..]),
        ])
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize_root("/"), "");
        assert_eq!(normalize_root(""), "");
        assert_eq!(normalize_root("apps/data/"), "/apps/data");
        assert_eq!(normalize_root("/apps/data"), "/apps/data");
    }

    #[test]
    fn test_path_and_key_mapping() {
        let store = DropboxFiles::new(MemoryBackend::default(), "/apps/data/");
        assert_eq!(store.root(), "/apps/data");
        assert_eq!(store.path_of("x/y.txt").unwrap(), "/apps/data/x/y.txt");
        assert_eq!(store.path_of("/x.txt").unwrap(), "/apps/data/x.txt");
        assert!(matches!(store.path_of(""), Err(Error::InvalidInput(_))));

        assert_eq!(store.key_of("/apps/data/x/y.txt").as_deref(), Some("x/y.txt"));
        assert_eq!(store.key_of("/Apps/Data/x.txt").as_deref(), Some("x.txt"));
        assert_eq!(store.key_of("/apps/database/x.txt"), None);
        assert_eq!(store.key_of("/apps/data"), None);

        for key in ["k.txt", "deep/er/k.txt"] {
            let path = store.path_of(key).unwrap();
            assert_eq!(store.key_of(&path).as_deref(), Some(key));
        }
    }

    #[test]
    fn test_key_of_non_ascii_root() {
        let store = DropboxFiles::new(MemoryBackend::default(), "/Ünïcode");
        assert_eq!(store.key_of("/ünÏcode/a.txt").as_deref(), Some("a.txt"));
        assert_eq!(store.key_of("/Ünïcodex/a.txt"), None);

        // KELVIN SIGN is three bytes but lowercases to a one-byte 'k'.
        let store = DropboxFiles::new(MemoryBackend::default(), "/k");
        assert_eq!(store.key_of("/\u{212A}/a.txt").as_deref(), Some("a.txt"));
        assert_eq!(store.key_of("/\u{212A}"), None);
        assert_eq!(store.key_of("/é/a.txt"), None);
    }

    #[test]
    fn test_account_root_mapping() {
        let store = DropboxFiles::new(MemoryBackend::default(), "/");
        assert_eq!(store.root(), "/");
        assert_eq!(store.path_of("a.txt").unwrap(), "/a.txt");
        assert_eq!(store.key_of("/folder/a.txt").as_deref(), Some("folder/a.txt"));
    }

    #[tokio::test]
    async fn test_keys_are_relative_and_scoped() {
        let store = DropboxFiles::new(sample_backend(), "/apps/data");
        let keys = store.keys().await.unwrap();
        assert_eq!(keys, vec!["a.txt".to_string(), "sub/b.bin".to_string()]);
        assert_eq!(store.len().await.unwrap(), 2);
        assert!(!store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_set_delete() {
        let store = DropboxFiles::new(sample_backend(), "/apps/data");

        assert_eq!(store.get("a.txt").await.unwrap(), b"alpha");
        assert_eq!(store.get("sub/b.bin").await.unwrap(), vec![0xff, 0x00, 0x10]);

        store.set("new.txt", b"fresh".to_vec()).await.unwrap();
        assert!(store.contains("new.txt").await.unwrap());
        assert!(store
            .backend()
            .paths()
            .contains(&"/apps/data/new.txt".to_string()));

        store.delete("new.txt").await.unwrap();
        assert!(!store.contains("new.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_key_names_the_key() {
        let store = DropboxFiles::new(sample_backend(), "/apps/data");

        let err = store.get("missing.txt").await.unwrap_err();
        assert!(matches!(err, Error::KeyNotFound(ref k) if k == "missing.txt"));

        let err = store.delete("missing.txt").await.unwrap_err();
        assert!(matches!(err, Error::KeyNotFound(ref k) if k == "missing.txt"));
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = DropboxFiles::new(sample_backend(), "/nowhere");
        assert!(store.keys().await.unwrap().is_empty());
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_text_files() {
        let store = DropboxTextFiles::new(sample_backend(), "/apps/data");

        assert_eq!(store.get("a.txt").await.unwrap(), "alpha");

        store.set("note.md", "# héllo".to_string()).await.unwrap();
        assert_eq!(store.get("note.md").await.unwrap(), "# héllo");
        assert_eq!(
            store.files().get("note.md").await.unwrap(),
            "# héllo".as_bytes()
        );

        let err = store.get("sub/b.bin").await.unwrap_err();
        assert!(matches!(err, Error::Encoding(ref m) if m.starts_with("sub/b.bin")));
    }

    #[test]
    #[allow(deprecated)]
    fn test_deprecated_aliases() {
        let store: DropboxBinaryStore<MemoryBackend> =
            DropboxFiles::new(sample_backend(), "/apps/data");
        let text: DropboxTextStore<MemoryBackend> = store.into();
        let keys = tokio_test::block_on(text.keys()).unwrap();
        assert_eq!(keys.len(), 2);
    }
}
