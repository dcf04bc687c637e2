//! Local path resolution and local-to-Dropbox path mapping.

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Folder name that marks the local Dropbox mirror root.
pub const ROOT_MARKER: &str = "Dropbox";

/// Determine the absolute local path of a file and the local Dropbox root.
///
/// With `root_directory` given, a relative `path` is joined onto it and an
/// absolute one is kept as is. Without it, `path` must be absolute and have a
/// component named exactly [`ROOT_MARKER`]; the root is everything up to and
/// including the first such component.
///
/// The resolved path must exist.
pub fn resolve_local_path(
    path: impl AsRef<Path>,
    root_directory: Option<&Path>,
) -> Result<(PathBuf, PathBuf)> {
    let path = path.as_ref();

    let (full_path, root) = match root_directory {
        Some(root) => {
            let full_path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            };
            (full_path, root.to_path_buf())
        }
        None => {
            if !path.is_absolute() {
                return Err(Error::InvalidInput(format!(
                    "'{}' is not absolute and no Dropbox root directory was given. \
                     Please supply the root directory.",
                    path.display()
                )));
            }
            let root = infer_root(path).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Could not infer the Dropbox folder from '{}' (no '{}' component). \
                     Please supply the root directory.",
                    path.display(),
                    ROOT_MARKER
                ))
            })?;
            (path.to_path_buf(), root)
        }
    };

    if !full_path.exists() {
        return Err(Error::NotFound(full_path));
    }

    Ok((full_path, root))
}

/// Prefix of `path` ending at the first component equal to [`ROOT_MARKER`].
fn infer_root(path: &Path) -> Option<PathBuf> {
    let mut root = PathBuf::new();
    for component in path.components() {
        root.push(component);
        if let Component::Normal(name) = component {
            if name == OsStr::new(ROOT_MARKER) {
                return Some(root);
            }
        }
    }
    None
}

/// Compute the Dropbox path of a local file given the local Dropbox root.
///
/// The result is the relative path from `root_directory` to `local_path`,
/// `/`-separated and prefixed with a single `/`. Paths outside the root come
/// out with leading `..` segments.
///
/// ```
/// use dropboxdol::fs::compute_remote_path;
///
/// let remote = compute_remote_path("/path/to/Dropbox/folder/file.txt", "/path/to/Dropbox").unwrap();
/// assert_eq!(remote, "/folder/file.txt");
/// ```
pub fn compute_remote_path(
    local_path: impl AsRef<Path>,
    root_directory: impl AsRef<Path>,
) -> Result<String> {
    let local_path = local_path.as_ref();
    let root_directory = root_directory.as_ref();

    let fail = |reason: String| Error::Computation {
        local: local_path.to_path_buf(),
        root: root_directory.to_path_buf(),
        reason,
    };

    if local_path.as_os_str().is_empty() {
        return Err(fail("no path specified".to_string()));
    }

    let local = LexicalPath::new(local_path).map_err(|e| fail(e.to_string()))?;
    let root = LexicalPath::new(root_directory).map_err(|e| fail(e.to_string()))?;

    if local.anchor != root.anchor {
        return Err(fail(format!(
            "path is on root '{}', start on root '{}'",
            local.anchor.display(),
            root.anchor.display()
        )));
    }

    let common = local
        .parts
        .iter()
        .zip(&root.parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    segments.extend(std::iter::repeat("..".to_string()).take(root.parts.len() - common));
    segments.extend(
        local.parts[common..]
            .iter()
            .map(|part| part.to_string_lossy().into_owned()),
    );

    if segments.is_empty() {
        return Ok("/.".to_string());
    }

    Ok(format!("/{}", segments.join("/")))
}

/// An absolute path split into its anchor (prefix and root) and its
/// normalized segments, with `.` dropped and `..` collapsed lexically.
struct LexicalPath {
    anchor: PathBuf,
    parts: Vec<OsString>,
}

impl LexicalPath {
    fn new(path: &Path) -> std::io::Result<Self> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let mut anchor = PathBuf::new();
        let mut parts: Vec<OsString> = Vec::new();
        for component in absolute.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => anchor.push(component),
                Component::CurDir => {}
                Component::ParentDir => {
                    parts.pop();
                }
                Component::Normal(name) => parts.push(name.to_os_string()),
            }
        }

        Ok(Self { anchor, parts })
    }
}
