//! Error type for staging, archiving and copying artifacts.
//!
//! Messages are constant; the operation and path that failed travel as fields so
//! callers (and tests) can match on them without parsing strings.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for artifact generation and staging operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Errors produced while preparing the staging folder or generating artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// IO failures while interacting with the filesystem.
    #[error("artifact io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Directory traversal failures while collecting files for an archive.
    #[error("artifact walkdir failure")]
    Walkdir {
        operation: &'static str,
        path: PathBuf,
        source: walkdir::Error,
    },
    /// Zip archive failures.
    #[error("artifact zip failure")]
    Zip {
        operation: &'static str,
        path: PathBuf,
        source: zip::result::ZipError,
    },
    /// The declared input of an artifact does not exist.
    #[error("artifact input missing")]
    MissingInput {
        /// Path that was expected to exist.
        path: PathBuf,
    },
    /// Input validation failures.
    #[error("artifact invalid input")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// The staging folder holds a subdirectory and cannot be emptied.
    #[error("staging folder contains a directory")]
    NestedDirectory {
        /// The offending subdirectory.
        path: PathBuf,
    },
}

impl ArtifactError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walkdir(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: walkdir::Error,
    ) -> Self {
        Self::Walkdir {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn zip(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: zip::result::ZipError,
    ) -> Self {
        Self::Zip {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. }
            | Self::Walkdir { path, .. }
            | Self::Zip { path, .. }
            | Self::MissingInput { path }
            | Self::NestedDirectory { path } => Some(path),
            Self::InvalidInput { .. } => None,
        }
    }
}
