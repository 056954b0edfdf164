//! Typed extraction failures.
//!
//! Most failures travel as [`anyhow::Error`] with context attached. The
//! conditions a caller may want to tell apart are raised as [`UnzipError`]
//! and can be recovered with [`anyhow::Error::downcast_ref`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors specific to archive extraction.
#[derive(Error, Debug)]
pub enum UnzipError {
    /// An entry would be written outside the destination directory.
    #[error("illegal file path: {}", path.display())]
    IllegalPath {
        /// The offending path (entry name or resolved destination).
        path: PathBuf,
    },

    /// Nested archives go deeper than the configured limit.
    #[error("nested archive {} exceeds the maximum depth of {max}", path.display())]
    DepthExceeded {
        /// The nested archive that would have been opened.
        path: PathBuf,
        /// Configured maximum depth.
        max: usize,
    },

    /// The entry uses a compression method this reader cannot decode.
    #[error("unsupported compression method {method} for {name}")]
    UnsupportedCompression {
        /// Entry name.
        name: String,
        /// Raw method id from the central directory.
        method: u16,
    },

    /// The entry is encrypted.
    #[error("encrypted entry {name} is not supported")]
    Encrypted {
        /// Entry name.
        name: String,
    },

    /// Archive structure is malformed.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),
}
