//! Command-line argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// Dict-like access to Dropbox files.
#[derive(Parser, Debug)]
#[command(
    name = "dropboxdol",
    version,
    about = "Read, write and share Dropbox files by key",
    long_about = "Treat a Dropbox folder as a key-value store: list, read, write and delete \
                  files by their path relative to the store root.\n\n\
                  Also maps local Dropbox-folder paths to Dropbox paths and creates shared links."
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Environment variable holding the access token, or the token itself.
    #[arg(short, long, global = true, env = "DROPBOXDOL_TOKEN")]
    pub token: Option<String>,

    /// Dropbox folder the store keys live under.
    #[arg(short, long, global = true)]
    pub root: Option<String>,

    /// Local folder mirroring the Dropbox root.
    #[arg(long, global = true)]
    pub local_root: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the keys in the store.
    Ls,

    /// Print a text file.
    Cat { key: String },

    /// Download a file to stdout or a local file.
    Get {
        key: String,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload a local file under a key.
    Put { key: String, file: PathBuf },

    /// Delete a key.
    Rm { key: String },

    /// Print a shared link for a file in the local Dropbox folder.
    Link {
        path: PathBuf,

        /// Make the link force a download instead of a preview.
        #[arg(long)]
        download: bool,
    },

    /// Print the Dropbox path of a file in the local Dropbox folder.
    RemotePath { path: PathBuf },
}

impl Args {
    /// Config file to read: `--config`, else the per-user default.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Config::default_path)
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(token) = &self.token {
            config.account.access_token_key = token.clone();
        }

        if let Some(root) = &self.root {
            config.store.root = root.clone();
        }

        if let Some(local_root) = &self.local_root {
            config.store.local_root = Some(local_root.clone());
        }

        if let Command::Link { download: true, .. } = self.command {
            config.link.download = true;
        }
    }
}
