use std::io;
use std::path::PathBuf;

use thiserror::Error;

use maskplan_core::TilingError;

// ── Errors ────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tiling failed: {0}")]
    Tiling(#[from] TilingError),

    #[error("Job has no images to place")]
    NoImages,
}

impl IoError {
    pub(crate) fn at(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> IoError {
        let path = path.into();
        move |source| IoError::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, IoError>;
