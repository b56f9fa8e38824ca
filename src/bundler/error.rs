//! Error types for bundling operations.
//!
//! Every stage of a bundling run fails fast with one of these variants. The
//! variants mirror the failure modes of the pipeline: metadata loading,
//! aggregation, serialization, filesystem work and verification.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while bundling model directories.
#[derive(Error, Debug)]
pub enum Error {
    /// An input directory has no `metadata.json` at its root.
    #[error("metadata file not found in {}", .0.display())]
    MissingMetadataFile(PathBuf),

    /// The descriptor exists but lacks required keys.
    #[error("missing required metadata entries in {directory}: {}", .missing.join(", "))]
    IncompleteMetadata {
        /// Directory name of the offending model
        directory: String,
        /// Keys that were absent or null
        missing: Vec<String>,
    },

    /// The descriptor has a required key with an unusable value.
    #[error("invalid metadata in {directory}: {reason}")]
    InvalidMetadata {
        /// Directory name of the offending model
        directory: String,
        /// What was wrong with the value
        reason: String,
    },

    /// Bidirectional validation found pairs without a reverse model.
    #[error("missing translation pairs: {}", .missing.join(", "))]
    MissingPairs {
        /// Every missing `target-source` label
        missing: Vec<String>,
    },

    /// The bundle manifest could not be written as JSON.
    #[error("failed to serialize bundle manifest: {0}")]
    SerializationError(#[source] serde_json::Error),

    /// An input directory name is not usable as an archive entry.
    #[error("invalid model directory name: {}", .0.display())]
    InvalidDirectoryName(PathBuf),

    /// Two inputs share the same directory name.
    #[error("duplicate model directory name '{0}' in inputs")]
    DuplicateModelDirectory(String),

    /// The derived or supplied bundle name cannot be used as a file name.
    #[error("invalid bundle name '{0}'")]
    InvalidBundleName(String),

    /// A published archive no longer matches its checksum sidecar.
    #[error("checksum mismatch: expected {expected}, found {actual}")]
    ChecksumMismatch {
        /// Digest recorded in the sidecar file
        expected: String,
        /// Digest of the archive on disk
        actual: String,
    },

    /// Filesystem operation failed on a specific path.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path the operation touched
        path: PathBuf,
        /// Underlying error
        #[source]
        error: std::io::Error,
    },

    /// Raw I/O error.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix error while relocating entries.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

/// Attaches operation and path context to I/O results.
pub trait ErrorExt<T> {
    /// Wraps an I/O error in [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Converts options and foreign results into [`Error::GenericError`].
pub trait Context<T> {
    /// Fails with `msg` when the value is absent or an error.
    fn context<C>(self, msg: C) -> Result<T>
    where
        C: std::fmt::Display;
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, msg: C) -> Result<T>
    where
        C: std::fmt::Display,
    {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, msg: C) -> Result<T>
    where
        C: std::fmt::Display,
    {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_operation() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = result.fs_context("reading model metadata", "/tmp/en-nl").unwrap_err();

        let message = err.to_string();
        assert!(message.contains("reading model metadata"));
        assert!(message.contains("/tmp/en-nl"));
        assert!(message.contains("gone"));
    }

    #[test]
    fn missing_pairs_lists_every_label() {
        let err = Error::MissingPairs {
            missing: vec!["nl-en".into(), "de-en".into()],
        };
        assert_eq!(err.to_string(), "missing translation pairs: nl-en, de-en");
    }

    #[test]
    fn option_context_produces_generic_error() {
        let value: Option<u8> = None;
        let err = value.context("version is required").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "version is required"));
    }
}
