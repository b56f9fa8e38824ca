//! Core Settings struct and implementations.

use crate::bundler::BundleDomain;
use std::path::{Path, PathBuf};

/// Main settings for a bundling run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder).
///
/// # Examples
///
/// ```no_run
/// use model_bundler::bundler::{BundleDomain, SettingsBuilder};
///
/// # fn example() -> model_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new(BundleDomain::Translation)
///     .input_dirs(["models/en-nl", "models/nl-en"])
///     .output_dir("output")
///     .version("1.2.0")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    domain: BundleDomain,
    input_dirs: Vec<PathBuf>,
    output_dir: PathBuf,
    version: String,
    bundle_id: Option<String>,
    bidirectional: bool,
    rewrite_paths: bool,
    keep_intermediates: bool,
    remove_inputs: bool,
}

impl Settings {
    /// Returns the bundle domain.
    pub fn domain(&self) -> BundleDomain {
        self.domain
    }

    /// Returns the model directories in input order.
    pub fn input_dirs(&self) -> &[PathBuf] {
        &self.input_dirs
    }

    /// Returns the root under which staging, archive and sidecar are written.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the version string embedded in the manifest.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the caller-supplied bundle identifier, if any.
    pub fn bundle_id(&self) -> Option<&str> {
        self.bundle_id.as_deref()
    }

    /// Whether every translation pair must have its reverse.
    ///
    /// Always false outside the translation domain.
    pub fn bidirectional(&self) -> bool {
        self.domain == BundleDomain::Translation && self.bidirectional
    }

    /// Whether staged per-model file paths get the model directory prefix.
    pub fn rewrite_paths(&self) -> bool {
        self.rewrite_paths
    }

    /// Whether the staging directory survives a successful run.
    pub fn keep_intermediates(&self) -> bool {
        self.keep_intermediates
    }

    /// Whether input directories are deleted after a successful run.
    pub fn remove_inputs(&self) -> bool {
        self.remove_inputs
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        domain: BundleDomain,
        input_dirs: Vec<PathBuf>,
        output_dir: PathBuf,
        version: String,
        bundle_id: Option<String>,
        bidirectional: bool,
        rewrite_paths: bool,
        keep_intermediates: bool,
        remove_inputs: bool,
    ) -> Self {
        Self {
            domain,
            input_dirs,
            output_dir,
            version,
            bundle_id,
            bidirectional,
            rewrite_paths,
            keep_intermediates,
            remove_inputs,
        }
    }
}
