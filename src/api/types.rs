//! Dropbox API request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a file, folder, or deleted entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = ".tag", rename_all = "lowercase")]
pub enum Metadata {
    File(FileMetadata),
    Folder(FolderMetadata),
    Deleted(DeletedMetadata),
}

impl Metadata {
    /// Display-cased path, falling back to the lower-cased one.
    pub fn path(&self) -> Option<&str> {
        let (display, lower) = match self {
            Metadata::File(m) => (&m.path_display, &m.path_lower),
            Metadata::Folder(m) => (&m.path_display, &m.path_lower),
            Metadata::Deleted(m) => (&m.path_display, &m.path_lower),
        };
        display.as_deref().or(lower.as_deref())
    }

    pub fn as_file(&self) -> Option<&FileMetadata> {
        match self {
            Metadata::File(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileMetadata {
    pub name: String,
    pub id: String,
    pub path_lower: Option<String>,
    pub path_display: Option<String>,
    pub size: u64,
    pub server_modified: DateTime<Utc>,
    pub client_modified: Option<DateTime<Utc>>,
    pub rev: String,
    pub content_hash: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FolderMetadata {
    pub name: String,
    pub id: String,
    pub path_lower: Option<String>,
    pub path_display: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeletedMetadata {
    pub name: String,
    pub path_lower: Option<String>,
    pub path_display: Option<String>,
}

/// Page of entries from `files/list_folder` or its continuation.
#[derive(Debug, Deserialize)]
pub struct ListFolderResult {
    #[serde(default)]
    pub entries: Vec<Metadata>,
    pub cursor: String,
    pub has_more: bool,
}

/// `files/delete_v2` response.
#[derive(Debug, Deserialize)]
pub struct DeleteResult {
    pub metadata: Metadata,
}

/// A shared link as returned by the sharing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SharedLink {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path_lower: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListSharedLinksResult {
    #[serde(default)]
    pub links: Vec<SharedLink>,
}

/// Body of a 409 endpoint error.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error_summary: String,
}

// Request arguments

#[derive(Debug, Serialize)]
pub struct PathArg<'a> {
    pub path: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ListFolderArg<'a> {
    pub path: &'a str,
    pub recursive: bool,
}

#[derive(Debug, Serialize)]
pub struct ListFolderContinueArg<'a> {
    pub cursor: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UploadArg<'a> {
    pub path: &'a str,
    pub mode: &'static str,
    pub autorename: bool,
    pub mute: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateSharedLinkArg<'a> {
    pub path: &'a str,
    pub settings: SharedLinkSettings,
}

#[derive(Debug, Serialize)]
pub struct SharedLinkSettings {
    pub requested_visibility: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ListSharedLinksArg<'a> {
    pub path: &'a str,
    pub direct_only: bool,
}

#[derive(Debug, Serialize)]
pub struct SharedLinkFileArg<'a> {
    pub url: &'a str,
}
