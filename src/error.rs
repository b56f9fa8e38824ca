//! Top-level error types for the command line tool.
//!
//! Bundling failures come from [`crate::bundler::Error`]; this module wraps
//! them together with argument and I/O errors raised by the CLI layer.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all CLI operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundler errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// The version file could not be read
    #[error("Failed to read version file {path}: {reason}")]
    VersionFile {
        /// Path that was read
        path: String,
        /// Reason for the error
        reason: String,
    },
}
