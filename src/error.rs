//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SortError>;

/// Failure kinds for scanning, classification, undo and playback.
///
/// Destination-name collisions have no variant on purpose: they are
/// resolved automatically with a numeric suffix and never surface.
#[derive(Debug, Error)]
pub enum SortError {
    /// The working directory could not be scanned at startup.
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The current image vanished from disk before it could be moved.
    /// Recovered by skipping to the next image.
    #[error("source file no longer exists: {0}")]
    SourceMissing(PathBuf),

    /// Both the rename and the copy-then-delete fallback failed.
    #[error("failed to move {from} to {to}: {source}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The recorded destination of the last move no longer exists.
    /// The ledger entry has already been consumed when this is returned.
    #[error("file to restore not found: {0}")]
    UndoTargetMissing(PathBuf),

    /// The image could not be decoded. The caller skips past it.
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Settings file problems. Non-fatal; callers fall back to defaults.
    #[error("settings error: {0}")]
    Config(String),

    /// A folder with this name already exists.
    #[error("folder already exists: {0}")]
    FolderExists(String),

    /// The named folder is not a known classification target.
    #[error("unknown folder: {0}")]
    UnknownFolder(String),

    /// Refused to delete the last remaining folder.
    #[error("cannot delete the last folder")]
    LastFolder,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
