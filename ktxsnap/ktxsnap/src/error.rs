//! Error types for the ktxsnap crate.

use std::{fmt, path::Path};

/// Result type for ktxsnap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ktxsnap operations.
///
/// Per-file decode failures inside a batch are not errors; they become
/// placeholder entries. These variants cover environment failures.
#[derive(Debug)]
pub enum Error {
    /// Filesystem operation failed.
    Io {
        /// The path involved.
        path: String,
        /// The operation that failed.
        operation: &'static str,
        /// The error message.
        message: String,
    },
    /// Directory traversal failed.
    Walk {
        /// The root being walked.
        root: String,
        /// The error message.
        message: String,
    },
    /// Snapshot decoding failed.
    Decode(ktxsnap_decode::DecodeError),
    /// The placeholder image could not be loaded.
    Placeholder {
        /// Description of what was wrong.
        detail: String,
    },
    /// Writing the batch manifest failed.
    Manifest {
        /// The error message.
        message: String,
    },
}

impl Error {
    /// Build an [`Error::Io`] for a failed filesystem operation on `path`.
    pub fn io(operation: &'static str, path: &Path, err: &std::io::Error) -> Self {
        Error::Io {
            path: path.display().to_string(),
            operation,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io {
                path,
                operation,
                message,
            } => {
                write!(f, "failed to {operation} {path}: {message}")
            }
            Error::Walk { root, message } => {
                write!(f, "failed to walk {root}: {message}")
            }
            Error::Decode(e) => write!(f, "decode error: {e}"),
            Error::Placeholder { detail } => write!(f, "invalid placeholder: {detail}"),
            Error::Manifest { message } => write!(f, "failed to write manifest: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ktxsnap_decode::DecodeError> for Error {
    fn from(e: ktxsnap_decode::DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Manifest {
            message: e.to_string(),
        }
    }
}
