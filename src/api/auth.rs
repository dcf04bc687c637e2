//! Access token lookup.

/// Environment variable consulted when no other token key is configured.
pub const DEFAULT_TOKEN_KEY: &str = "DROPBOX_ACCESS_TOKEN";

/// Get the Dropbox access token for `token_key`.
///
/// The key is first looked up as an environment variable. If it is unset or
/// empty, the key itself is taken to be the token, so callers can pass either
/// a variable name or a literal token.
pub fn get_access_token(token_key: &str) -> String {
    resolve_access_token(token_key, |key| std::env::var(key).ok())
}

/// [`get_access_token`] with the environment lookup supplied by the caller.
pub fn resolve_access_token<F>(token_key: &str, lookup: F) -> String
where
    F: FnOnce(&str) -> Option<String>,
{
    match lookup(token_key) {
        Some(token) if !token.is_empty() => {
            tracing::debug!("Using access token from environment variable {}", token_key);
            token
        }
        _ => token_key.to_string(),
    }
}

/// Build the `Authorization` header value for a token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
