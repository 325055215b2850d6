//! Error types for the menu core.
use thiserror::Error;

/// Errors raised by index-based accessors.
///
/// Value lookups never produce an error; a missing value is reported as `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MenuError {
    #[error("item position {position} is out of range (menu has {len} items)")]
    OutOfRange { position: usize, len: usize },
}

/// Errors raised while loading a menu configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
}
