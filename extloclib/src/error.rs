//! Error types for extloclib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while counting lines
#[derive(Error, Debug)]
pub enum Error {
    /// Root path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Encoding label is not known
    #[error("unknown encoding '{0}'")]
    UnknownEncoding(String),

    /// A directory could not be listed during traversal
    #[error("failed to list directory '{path}': {source}")]
    DirectoryRead {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Failed to open or read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File content is not valid in the declared encoding
    #[error("file '{path}' is not valid {encoding}")]
    Decode { path: PathBuf, encoding: String },

    /// Counter created without an extension key
    #[error("files extension must not be absent")]
    MissingKey,
}

impl Error {
    /// Whether the error only concerns a single file's content.
    ///
    /// These are logged and skipped; every other kind ends the run.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Error::FileRead { .. } | Error::Decode { .. })
    }
}
