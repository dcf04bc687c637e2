//! Configuration module for dropboxdol.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{AccountConfig, Config, LinkConfig, StoreConfig};
pub use validation::validate_config;
