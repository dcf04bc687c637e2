//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_token_key(&config.account.access_token_key)?;
    validate_store_root(&config.store.root)?;

    if let Some(local_root) = &config.store.local_root {
        if !local_root.is_absolute() {
            return Err(Error::ConfigValidation {
                field: "store.local_root".to_string(),
                message: format!("'{}' must be an absolute path", local_root.display()),
            });
        }
    }

    Ok(())
}

/// Validate the access token key (env var name or literal token).
pub fn validate_token_key(token_key: &str) -> Result<()> {
    if token_key.trim().is_empty() {
        return Err(Error::MissingConfig("account.access_token_key".to_string()));
    }

    // Check for placeholder values
    let lower = token_key.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_token") {
        return Err(Error::ConfigValidation {
            field: "account.access_token_key".to_string(),
            message: "Token key appears to be a placeholder. Provide an environment variable \
                      name or your Dropbox access token."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the Dropbox folder used as the store root.
pub fn validate_store_root(root: &str) -> Result<()> {
    if !root.starts_with('/') {
        return Err(Error::ConfigValidation {
            field: "store.root".to_string(),
            message: format!("'{}' must start with '/'", root),
        });
    }

    let parent_segment = Regex::new(r"(^|/)\.\.(/|$)").unwrap();
    if parent_segment.is_match(root) {
        return Err(Error::ConfigValidation {
            field: "store.root".to_string(),
            message: format!("'{}' must not contain '..' segments", root),
        });
    }

    Ok(())
}
