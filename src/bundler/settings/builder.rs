//! Builder for constructing Settings.

use super::Settings;
use crate::bundler::{BundleDomain, error::Context};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use model_bundler::bundler::{BundleDomain, SettingsBuilder};
///
/// # fn example() -> model_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new(BundleDomain::Ocr)
///     .input_dirs(["models/latin-detector", "models/latin-recognizer"])
///     .bundle_id("latin")
///     .version("0.3.1")
///     .keep_intermediates(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SettingsBuilder {
    domain: BundleDomain,
    input_dirs: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    version: Option<String>,
    bundle_id: Option<String>,
    bidirectional: bool,
    rewrite_paths: bool,
    keep_intermediates: bool,
    remove_inputs: bool,
}

impl SettingsBuilder {
    /// Creates a builder for the given domain.
    pub fn new(domain: BundleDomain) -> Self {
        Self {
            domain,
            input_dirs: Vec::new(),
            output_dir: None,
            version: None,
            bundle_id: None,
            bidirectional: true,
            rewrite_paths: false,
            keep_intermediates: false,
            remove_inputs: false,
        }
    }

    /// Sets the model directories to bundle, in order.
    ///
    /// # Required
    ///
    /// At least one directory is required for building.
    pub fn input_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.input_dirs = dirs.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
        self
    }

    /// Sets the output root.
    ///
    /// Default: `output`
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the bundle version.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets a unique identifier used as the bundle name and manifest `id`.
    pub fn bundle_id(mut self, id: impl Into<String>) -> Self {
        self.bundle_id = Some(id.into());
        self
    }

    /// Requires every translation pair to have its reverse.
    ///
    /// Default: true
    pub fn bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    /// Prefixes file paths in staged per-model metadata with the model directory.
    ///
    /// Default: false
    pub fn rewrite_paths(mut self, rewrite: bool) -> Self {
        self.rewrite_paths = rewrite;
        self
    }

    /// Keeps the staging directory after publishing.
    ///
    /// Default: false
    pub fn keep_intermediates(mut self, keep: bool) -> Self {
        self.keep_intermediates = keep;
        self
    }

    /// Deletes input directories after publishing.
    ///
    /// Default: false
    pub fn remove_inputs(mut self, remove: bool) -> Self {
        self.remove_inputs = remove;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `version` is missing or no input directory was given.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        let version = self.version.context("version is required")?;
        if version.trim().is_empty() {
            crate::bail!("version must not be empty");
        }
        if self.input_dirs.is_empty() {
            crate::bail!("at least one input directory is required");
        }

        if semver::Version::parse(version.trim()).is_err() {
            log::warn!("Bundle version '{}' is not a semantic version", version);
        }

        Ok(Settings::new(
            self.domain,
            self.input_dirs,
            self.output_dir.unwrap_or_else(|| PathBuf::from("output")),
            version.trim().to_string(),
            self.bundle_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            self.bidirectional,
            self.rewrite_paths,
            self.keep_intermediates,
            self.remove_inputs,
        ))
    }
}
