//! Errors raised while producing the final document.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a report run.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF backend error: {0}")]
    Pdf(String),

    #[error("Failed to build image client: {0}")]
    ImageClient(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[cfg(feature = "bookmarks")]
    #[error("Failed to add bookmarks: {0}")]
    Bookmarks(#[from] crate::bookmarks::BookmarkError),
}

impl RenderError {
    pub(crate) fn pdf(err: impl std::fmt::Display) -> Self {
        Self::Pdf(err.to_string())
    }
}
