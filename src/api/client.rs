//! Dropbox API HTTP client.

use std::fmt::Write as _;

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::auth::{bearer, get_access_token};
use crate::api::types::*;
use crate::error::{Error, Result};

/// Base URL for RPC-style endpoints (JSON in, JSON out).
const RPC_BASE: &str = "https://api.dropboxapi.com/2";

/// Base URL for content endpoints (argument in a header, bytes in the body).
const CONTENT_BASE: &str = "https://content.dropboxapi.com/2";

const API_ARG_HEADER: &str = "Dropbox-API-Arg";

/// Seconds to wait when a 429 carries no Retry-After header.
const DEFAULT_RETRY_AFTER: u64 = 60;

/// Dropbox API client authenticated with a bearer token.
#[derive(Clone)]
pub struct DropboxApi {
    client: Client,
    token: String,
    rpc_base: String,
    content_base: String,
}

impl std::fmt::Debug for DropboxApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropboxApi")
            .field("rpc_base", &self.rpc_base)
            .field("content_base", &self.content_base)
            .finish_non_exhaustive()
    }
}

impl DropboxApi {
    /// Create a client for an access token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dropboxdol/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: token.into(),
            rpc_base: RPC_BASE.to_string(),
            content_base: CONTENT_BASE.to_string(),
        })
    }

    /// Create a client whose token is looked up through `token_key`.
    ///
    /// See [`get_access_token`] for the lookup rules.
    pub fn from_token_key(token_key: &str) -> Result<Self> {
        Self::new(get_access_token(token_key))
    }

    /// Point the client at different RPC and content hosts.
    pub fn with_base_urls(mut self, rpc_base: &str, content_base: &str) -> Self {
        self.rpc_base = rpc_base.trim_end_matches('/').to_string();
        self.content_base = content_base.trim_end_matches('/').to_string();
        self
    }

    /// Call an RPC endpoint and decode its JSON result.
    async fn rpc<A, T>(&self, endpoint: &str, arg: &A) -> Result<T>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.rpc_base, endpoint);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, bearer(&self.token))
            .json(arg)
            .send()
            .await?;

        let response = check_response(response).await?;
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse {} response: {} - Response: {}",
                endpoint,
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Call a content endpoint, optionally uploading `body`.
    async fn content<A>(&self, endpoint: &str, arg: &A, body: Option<Vec<u8>>) -> Result<Response>
    where
        A: Serialize + ?Sized,
    {
        let url = format!("{}/{}", self.content_base, endpoint);
        tracing::debug!("POST {}", url);

        let mut request = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, bearer(&self.token))
            .header(API_ARG_HEADER, header_safe_json(arg)?);

        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/octet-stream")
                .body(body);
        }

        let response = request.send().await?;
        check_response(response).await
    }

    /// List a folder, following continuation cursors until exhausted.
    ///
    /// `path` is a Dropbox path; `/` and the empty string both mean the root.
    pub async fn list_folder(&self, path: &str, recursive: bool) -> Result<Vec<Metadata>> {
        let path = api_path(path);
        let mut page: ListFolderResult = self
            .rpc("files/list_folder", &ListFolderArg { path, recursive })
            .await?;

        let mut entries = std::mem::take(&mut page.entries);
        while page.has_more {
            tracing::debug!(
                "Continuing listing of '{}' ({} entries so far)",
                path,
                entries.len()
            );
            let cursor = std::mem::take(&mut page.cursor);
            page = self
                .rpc(
                    "files/list_folder/continue",
                    &ListFolderContinueArg { cursor: &cursor },
                )
                .await?;
            entries.append(&mut page.entries);
        }

        Ok(entries)
    }

    /// Get metadata for a file or folder.
    pub async fn get_metadata(&self, path: &str) -> Result<Metadata> {
        self.rpc("files/get_metadata", &PathArg { path }).await
    }

    /// Start downloading a file, leaving the body unread for streaming.
    pub async fn download_response(&self, path: &str) -> Result<Response> {
        self.content("files/download", &PathArg { path }, None).await
    }

    /// Download a file's full contents.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.download_response(path).await?;
        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes from {}", bytes.len(), path);
        Ok(bytes.to_vec())
    }

    /// Upload `contents` to `path`, overwriting any existing file.
    pub async fn upload(&self, path: &str, contents: Vec<u8>) -> Result<FileMetadata> {
        let size = contents.len();
        let arg = UploadArg {
            path,
            mode: "overwrite",
            autorename: false,
            mute: true,
        };
        let response = self.content("files/upload", &arg, Some(contents)).await?;
        let text = response.text().await?;
        tracing::debug!("Uploaded {} bytes to {}", size, path);

        serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse upload response: {} - Response: {}",
                e, text
            ))
        })
    }

    /// Delete a file or folder.
    pub async fn delete(&self, path: &str) -> Result<Metadata> {
        let result: DeleteResult = self.rpc("files/delete_v2", &PathArg { path }).await?;
        Ok(result.metadata)
    }

    /// Create a public shared link for `path`, or return the existing one.
    pub async fn create_shared_link(&self, path: &str) -> Result<SharedLink> {
        let arg = CreateSharedLinkArg {
            path,
            settings: SharedLinkSettings {
                requested_visibility: "public",
            },
        };

        let created: Result<SharedLink> = self
            .rpc("sharing/create_shared_link_with_settings", &arg)
            .await;

        match created {
            Err(Error::Api(summary)) if summary.starts_with("shared_link_already_exists") => {
                tracing::debug!("Shared link for {} already exists, fetching it", path);
                self.list_shared_links(path)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        Error::Api(format!("No shared link found for existing share {}", path))
                    })
            }
            other => other,
        }
    }

    /// List the direct shared links of `path`.
    pub async fn list_shared_links(&self, path: &str) -> Result<Vec<SharedLink>> {
        let arg = ListSharedLinksArg {
            path,
            direct_only: true,
        };
        let result: ListSharedLinksResult = self.rpc("sharing/list_shared_links", &arg).await?;
        Ok(result.links)
    }

    /// Download the file behind a shared link.
    pub async fn get_shared_link_file(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .content("sharing/get_shared_link_file", &SharedLinkFileArg { url }, None)
            .await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// The API spells the root folder as the empty string.
fn api_path(path: &str) -> &str {
    if path == "/" {
        ""
    } else {
        path
    }
}

/// Turn non-success responses into errors.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok());
    let body = response.text().await.unwrap_or_default();

    Err(classify_error(status, retry_after, &body))
}

/// Map an error status and body onto our error type.
fn classify_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> Error {
    match status {
        StatusCode::BAD_REQUEST => Error::BadRequest(body.to_string()),
        StatusCode::UNAUTHORIZED => {
            tracing::error!("Auth error response: {}", body);
            Error::Authentication(format!(
                "HTTP {}: {}",
                status,
                if body.is_empty() {
                    "Authentication failed"
                } else {
                    body
                }
            ))
        }
        StatusCode::FORBIDDEN => Error::AccessDenied(body.to_string()),
        StatusCode::CONFLICT => match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(err) if err.error_summary.contains("not_found") => {
                Error::KeyNotFound(err.error_summary)
            }
            Ok(err) => Error::Api(err.error_summary),
            Err(_) => Error::Api(format!("HTTP {}: {}", status, body)),
        },
        StatusCode::TOO_MANY_REQUESTS => {
            Error::RateLimited(retry_after.unwrap_or(DEFAULT_RETRY_AFTER))
        }
        _ => Error::Api(format!("HTTP {}: {}", status, body)),
    }
}

/// JSON for the `Dropbox-API-Arg` header, with non-ASCII and DEL escaped as
/// `\uXXXX`.
fn header_safe_json<A: Serialize + ?Sized>(arg: &A) -> Result<String> {
    let json = serde_json::to_string(arg)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && c != '\x7f' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{:04x}", unit);
            }
        }
    }
    Ok(out)
}
