//! Error types for asset loading and strategy configuration
//!
//! Compositing itself never fails: degenerate geometry resolves to "leave the
//! frame unchanged". Only loading assets and configuring animation speed can
//! produce an error a caller has to check.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading overlay assets or configuring strategies
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    #[error("Failed to decode {}: {source}", path.display())]
    AssetDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Overlay image must have an alpha channel: {}", .0.display())]
    MissingAlphaChannel(PathBuf),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid sprite sheet: {0}")]
    InvalidSpriteSheet(String),

    #[error("Invalid fps: {0} (must be greater than zero)")]
    InvalidFps(u32),

    #[error("Failed to write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
