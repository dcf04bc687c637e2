//! Shared-link URL normalization.

use std::fmt;

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

/// Value of the `dl` query parameter on a Dropbox shared link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFlag {
    /// `dl=0`: open the in-browser preview.
    #[default]
    Preview,
    /// `dl=1`: force a download.
    Download,
}

impl DownloadFlag {
    pub fn as_digit(self) -> u8 {
        match self {
            DownloadFlag::Preview => 0,
            DownloadFlag::Download => 1,
        }
    }
}

impl From<bool> for DownloadFlag {
    fn from(download: bool) -> Self {
        if download {
            DownloadFlag::Download
        } else {
            DownloadFlag::Preview
        }
    }
}

impl fmt::Display for DownloadFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_digit())
    }
}

/// Make sure a shared-link URL carries `dl={flag}`.
///
/// An existing `dl=<digit>` is rewritten in place; otherwise the parameter is
/// appended with `&` or `?` depending on whether the URL already has a query.
/// The flag is written verbatim, nothing else in the URL is touched.
///
/// ```
/// use dropboxdol::sharing::set_download_flag;
///
/// assert_eq!(
///     set_download_flag("https://www.dropbox.com/s/abc123/file.txt?dl=0", 1),
///     "https://www.dropbox.com/s/abc123/file.txt?dl=1"
/// );
/// ```
pub fn set_download_flag(url: &str, flag: impl fmt::Display) -> String {
    if url.contains("dl=") {
        let dl_pattern = Regex::new(r"dl=\d").unwrap();
        let replacement = format!("dl={}", flag);
        return dl_pattern
            .replace_all(url, NoExpand(&replacement))
            .into_owned();
    }

    let delimiter = if url.contains('?') { '&' } else { '?' };
    format!("{}{}dl={}", url, delimiter, flag)
}
