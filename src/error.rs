//! @acp:module "Errors"
//! @acp:summary "Error taxonomy for the template pipeline"
//! @acp:domain core
//! @acp:layer utility

use std::io;
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

use thiserror::Error;

/// Broad failure category, one per pipeline failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source archive missing, corrupt or unreadable
    ArchiveRead,
    /// Cannot create, read or delete workspace files
    Filesystem,
    /// Text payload absent after extraction
    PayloadMissing,
    /// Payload bytes are not valid UTF-8
    Encoding,
    /// Output archive cannot be created or written
    ArchiveWrite,
    /// Invalid configuration or substitution precondition
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::ArchiveRead => "archive-read",
            ErrorKind::Filesystem => "filesystem",
            ErrorKind::PayloadMissing => "payload-missing",
            ErrorKind::Encoding => "encoding",
            ErrorKind::ArchiveWrite => "archive-write",
            ErrorKind::Config => "config",
        };
        f.write_str(name)
    }
}

/// Main error type for docfill operations
#[derive(Error, Debug)]
pub enum DocfillError {
    #[error("Cannot read archive {}: {source}", path.display())]
    ArchiveRead {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive entry '{name}' escapes the destination directory")]
    UnsafeEntryName { name: String },

    #[error("Failed to {operation} {}: {source}", path.display())]
    Filesystem {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Payload not found at {}", path.display())]
    PayloadMissing { path: PathBuf },

    #[error("Payload {} is not valid UTF-8: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    #[error("Cannot write archive {}: {source}", path.display())]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Placeholder '{inner}' is a substring of '{outer}'; placeholders must be substring-disjoint")]
    OverlappingPlaceholders { outer: String, inner: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocfillError {
    /// Wrap an I/O error with the operation and path that produced it
    pub fn fs(operation: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        DocfillError::Filesystem {
            operation,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Failure category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocfillError::ArchiveRead { .. } | DocfillError::UnsafeEntryName { .. } => {
                ErrorKind::ArchiveRead
            }
            DocfillError::Filesystem { .. } => ErrorKind::Filesystem,
            DocfillError::PayloadMissing { .. } => ErrorKind::PayloadMissing,
            DocfillError::Encoding { .. } => ErrorKind::Encoding,
            DocfillError::ArchiveWrite { .. } => ErrorKind::ArchiveWrite,
            DocfillError::OverlappingPlaceholders { .. }
            | DocfillError::Config(_)
            | DocfillError::Json(_) => ErrorKind::Config,
        }
    }
}

/// Result type alias for docfill operations
pub type Result<T> = std::result::Result<T, DocfillError>;
