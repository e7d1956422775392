use super::types::Placement;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("No images selected")]
    NoInput,

    #[error("Output directory {path:?} is not usable: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load {placement} watermark from {path:?}: {source}")]
    AssetLoad {
        placement: Placement,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{path:?}: {source}")]
    ItemProcess {
        path: PathBuf,
        #[source]
        source: ItemError,
    },
}

/// Failure of a single image within a batch
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid file name")]
    InvalidFileName,

    #[error("Output would overwrite the source image")]
    OverwritesSource,
}
