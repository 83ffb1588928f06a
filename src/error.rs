//! Error types for cardeck operations.

use thiserror::Error;

/// Errors that can occur while composing or exporting a deck.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("SVG error: {0}")]
    Svg(String),

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Archive generation failed: {0}")]
    Archive(String),

    #[error("Missing asset: {0}")]
    MissingAsset(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "bridge")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "bridge")]
    #[error("Bridge error: {0}")]
    Bridge(String),

    #[cfg(feature = "bridge")]
    #[error("Unauthorized")]
    Unauthorized,
}

pub type Result<T> = std::result::Result<T, Error>;
