//! In-memory backend for store tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::store::DropboxBackend;

#[derive(Default)]
pub struct MemoryBackend {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    links: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn with_files(files: &[(&str, &[u8])]) -> Self {
        let backend = Self::default();
        {
            let mut map = backend.files.lock().unwrap();
            for (path, contents) in files {
                map.insert(path.to_string(), contents.to_vec());
            }
        }
        backend
    }

    pub fn add_link(&self, url: &str, contents: &[u8]) {
        self.links
            .lock()
            .unwrap()
            .insert(url.to_string(), contents.to_vec());
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl DropboxBackend for MemoryBackend {
    async fn list_files(&self, root: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", root.trim_end_matches('/'));
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|path| path.starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(format!("path/not_found/{}", path)))
    }

    async fn upload(&self, path: &str, contents: Vec<u8>) -> Result<()> {
        self.files.lock().unwrap().insert(path.to_string(), contents);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Error::KeyNotFound(format!("path_lookup/not_found/{}", path)))
    }

    async fn file_exists(&self, path: &str) -> Result<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    async fn shared_link_url(&self, path: &str) -> Result<String> {
        if !self.files.lock().unwrap().contains_key(path) {
            return Err(Error::KeyNotFound(format!("path/not_found/{}", path)));
        }
        Ok(format!("https://www.dropbox.com/scl/fi/test{}?rlkey=abc&dl=0", path))
    }

    async fn get_shared_link_file(&self, url: &str) -> Result<Vec<u8>> {
        self.links
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound("shared_link_not_found/".to_string()))
    }
}
