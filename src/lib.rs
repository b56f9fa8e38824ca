//! Bundler for converted on-device ML models.
//!
//! Takes independently converted model directories (translation pairs, OCR
//! detector/recognizer sets, TTS voice packs), validates them as a set,
//! merges them under one generated `metadata.json`, and publishes a
//! deterministic `.tar.gz` archive with a SHA-256 sidecar for the client's
//! model download.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use bundler::{BundleDomain, BundledArtifact, Bundler, Settings, SettingsBuilder};
pub use error::{BundlerError, CliError, Result};
