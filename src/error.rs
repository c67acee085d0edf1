//! Crate error type
//!
//! Drawing never fails; only buffer loading, configuration and the host
//! boundary report errors.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Image source could not be found
    #[error("image not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Image data could not be parsed into RGBA pixels
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// A requested engine dimension was zero
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file error: {0}")]
    Config(#[from] serde_json::Error),

    /// Window / presentation failure reported by a host
    #[error("host error: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, Error>;
