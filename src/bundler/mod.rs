//! Bundling of converted model directories.
//!
//! A bundling run loads each model directory's `metadata.json`, validates the
//! set as a whole, merges the directories into a staging directory next to a
//! generated manifest, and publishes a `.tar.gz` archive with a SHA-256
//! sidecar.
//!
//! - [`builder`] - [`Bundler`] orchestrator, archiver, checksum and naming
//! - [`settings`] - [`Settings`] and [`SettingsBuilder`]
//! - [`utils`] - filesystem helpers used for merging and cleanup

pub mod builder;
pub mod error;
pub mod settings;
pub mod utils;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub use builder::{
    Bundler, bundle_files, bundle_name, calculate_sha256, checksum_path, verify, write_checksum,
};
pub use error::{Error, Result};
pub use settings::{Settings, SettingsBuilder};

/// Kind of models a bundle carries.
///
/// The domain fixes which keys a model's `metadata.json` must declare and
/// which aggregate fields the bundle manifest carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleDomain {
    /// Source/target translation models
    Translation,
    /// Text detection and recognition models
    Ocr,
    /// Text-to-speech voice packs
    Tts,
}

impl fmt::Display for BundleDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Translation => "translation",
            Self::Ocr => "ocr",
            Self::Tts => "tts",
        };
        f.write_str(name)
    }
}

/// The published result of a bundling run.
#[derive(Debug, Clone)]
pub struct BundledArtifact {
    /// Bundle name used for the staging directory and archive
    pub name: String,
    /// Path of the `.tar.gz` archive
    pub archive_path: PathBuf,
    /// Path of the checksum sidecar
    pub checksum_path: PathBuf,
    /// Lowercase hex SHA-256 of the archive
    pub checksum: String,
    /// Archive size in bytes
    pub size: u64,
}
