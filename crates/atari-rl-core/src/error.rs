//! Error types for session operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, AtariError>;

/// Errors the session wrapper can recover from.
///
/// Engine-level failures (crashes, invalid handle use) are deliberately not
/// modeled here: they are integration defects, fatal to the process, and
/// must never be mapped into a recoverable variant.
#[derive(Debug, Error)]
pub enum AtariError {
    /// The ROM path does not name an existing file. No session is produced.
    #[error("ROM not found: {}", .path.display())]
    RomNotFound {
        /// Path that failed the existence check
        path: PathBuf,
    },

    /// The frame save destination could not be prepared or represented for
    /// the engine. The save is skipped; the session stays usable.
    #[error("cannot compute save path {}: {}", .path.display(), .reason)]
    CannotComputePath {
        /// Requested destination
        path: PathBuf,
        /// What went wrong preparing it
        reason: String,
    },
}
