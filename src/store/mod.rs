//! Dict-like access to Dropbox.
//!
//! This module provides:
//! - The [`KvStore`] trait shared by all stores
//! - Byte and text stores over a Dropbox folder
//! - A read-only store over shared links

pub mod backend;
pub mod files;
pub mod link_reader;

#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub use backend::DropboxBackend;
#[allow(deprecated)]
pub use files::{DropboxBinaryStore, DropboxTextStore};
pub use files::{DropboxFiles, DropboxTextFiles};
pub use link_reader::DropboxLinkReader;

/// A mapping from string keys to values held in Dropbox.
#[async_trait]
pub trait KvStore: Send + Sync {
    type Value: Send;

    /// Value for `key`; `Error::KeyNotFound` if absent.
    async fn get(&self, key: &str) -> Result<Self::Value>;

    async fn set(&self, key: &str, value: Self::Value) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    async fn contains(&self, key: &str) -> Result<bool>;

    /// All keys, sorted.
    async fn keys(&self) -> Result<Vec<String>>;

    async fn len(&self) -> Result<usize> {
        Ok(self.keys().await?.len())
    }

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
