//! Error types for durable_blob

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for durable_blob operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing or reading a durable blob
#[derive(Error, Debug)]
pub enum Error {
    /// A filesystem operation failed. The underlying error is kept as-is.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Record is too short: {len} bytes, header alone needs {}", crate::HEADER_LEN)]
    TooShort { len: usize },

    #[error("Record does not start with the DataHash: marker")]
    MissingPrefixMarker,

    #[error("Record header is not terminated with ';'")]
    MissingTerminator,

    #[error("Checksum mismatch: header claims {expected}, payload hashes to {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a closure that attaches `path` to an I/O error, for use with `map_err`
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
        move |source| Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for the validation failures of a record read from disk
    pub fn is_corrupt_record(&self) -> bool {
        matches!(
            self,
            Error::TooShort { .. }
                | Error::MissingPrefixMarker
                | Error::MissingTerminator
                | Error::ChecksumMismatch { .. }
        )
    }

    /// True if the error is a filesystem "not found"
    pub fn is_not_found(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::NotFound)
    }

    /// Kind of the underlying I/O error, if this is one
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
