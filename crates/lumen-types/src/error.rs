//! Error types for Lumen.

use std::io;

/// Errors produced by Lumen host services and configuration.
#[derive(Debug, thiserror::Error)]
pub enum LumenError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LumenError>;
