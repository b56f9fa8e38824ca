//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that runs every stage of
//! a bundling run in order and publishes the result.

use crate::{
    bail,
    bundler::{
        BundledArtifact, Result, Settings,
        error::{Error, ErrorExt},
        utils::fs,
    },
    metadata::{self, BundleManifest, METADATA_FILE},
};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{
    archive::bundle_files,
    checksum::{calculate_sha256, checksum_path},
    naming::{archive_file_name, bundle_name},
};

/// Main bundler orchestrator.
///
/// Runs the stages of a bundling run strictly in sequence:
///
/// 1. Load and validate every model's `metadata.json`
/// 2. Check bidirectional pairs (translation bundles that ask for it)
/// 3. Merge model directories into `<output>/<name>/`
/// 4. Optionally prefix file paths in staged per-model metadata
/// 5. Write the bundle manifest
/// 6. Archive and hash into temporary files, then publish both
/// 7. Clean up staging and, if asked, the inputs
///
/// The first failure aborts the run. Nothing is published unless every stage
/// before publishing succeeded; the staging directory of a failed run is left
/// on disk.
///
/// # Examples
///
/// ```no_run
/// use model_bundler::bundler::{BundleDomain, Bundler, SettingsBuilder};
///
/// # fn example() -> model_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new(BundleDomain::Translation)
///     .input_dirs(["models/en-nl", "models/nl-en"])
///     .version("1.0.0")
///     .build()?;
///
/// let artifact = Bundler::new(settings).bundle()?;
/// println!("{} ({})", artifact.archive_path.display(), artifact.checksum);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Executes a full bundling run.
    pub fn bundle(&self) -> Result<BundledArtifact> {
        let settings = &self.settings;
        let domain = settings.domain();
        log::info!(
            "Bundling {} {} model(s), version {}",
            settings.input_dirs().len(),
            domain,
            settings.version()
        );

        let records = metadata::load_many(domain, settings.input_dirs())?;

        if settings.bidirectional() {
            metadata::validate_bidirectional(&records)?;
        }

        let preview = BundleManifest::new(
            domain,
            settings.version(),
            settings.bundle_id(),
            settings.bidirectional(),
            &records,
        );
        let name = bundle_name(settings.bundle_id(), &preview)?;
        log::info!("Bundle name: {}", name);

        fs::create_dir_all(settings.output_dir(), false)?;
        let staging_dir = settings.output_dir().join(&name);
        self.check_staging_disjoint(&staging_dir)?;

        fs::create_dir_all(&staging_dir, true)?;
        let staged = fs::merge_dirs(settings.input_dirs(), &staging_dir)?;

        if settings.rewrite_paths() {
            for (dir, record) in staged.iter().zip(&records) {
                metadata::paths::prefix_file_paths(&dir.join(METADATA_FILE), record.directory())?;
            }
        }

        metadata::generate(
            domain,
            settings.version(),
            &staging_dir,
            settings.bundle_id(),
            settings.bidirectional(),
            &records,
        )?;

        let entries = list_entries(&staging_dir)?;
        let archive_path = settings.output_dir().join(archive_file_name(&name));
        let artifact = publish(&name, &entries, &archive_path)?;

        self.cleanup(&staging_dir)?;

        log::info!(
            "Created {} ({} bytes, sha256 {})",
            artifact.archive_path.display(),
            artifact.size,
            artifact.checksum
        );
        Ok(artifact)
    }

    /// Refuses a staging directory that overlaps an input directory, since
    /// staging is erased before merging.
    fn check_staging_disjoint(&self, staging_dir: &Path) -> Result<()> {
        let staging = absolute(staging_dir)?;
        for input in self.settings.input_dirs() {
            let input_abs = absolute(input)?;
            if staging.starts_with(&input_abs) || input_abs.starts_with(&staging) {
                bail!(
                    "staging directory {} overlaps input directory {}; choose another output directory or bundle id",
                    staging_dir.display(),
                    input.display()
                );
            }
        }
        Ok(())
    }

    fn cleanup(&self, staging_dir: &Path) -> Result<()> {
        if self.settings.keep_intermediates() {
            log::info!("Keeping intermediates in {}", staging_dir.display());
        } else {
            fs::remove_dir_all(staging_dir)?;
            log::info!("Intermediate files cleaned");
        }

        if self.settings.remove_inputs() {
            for input in self.settings.input_dirs() {
                fs::remove_dir_all(input)?;
            }
            log::info!("Removed {} input directories", self.settings.input_dirs().len());
        }

        Ok(())
    }
}

/// Top-level entries of the staging directory, sorted by name.
fn list_entries(staging_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(staging_dir)
        .fs_context("reading staging directory", staging_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .fs_context("reading staging directory", staging_dir)?;
    entries.sort();
    Ok(entries)
}

/// Writes archive and sidecar to temporary files next to their final paths
/// and renames both into place only once both are complete.
fn publish(name: &str, entries: &[PathBuf], archive_path: &Path) -> Result<BundledArtifact> {
    let output_dir = archive_path
        .parent()
        .ok_or_else(|| Error::GenericError(format!("{} has no parent", archive_path.display())))?;

    let temp_archive = tempfile::Builder::new()
        .prefix(".bundle-")
        .suffix(".tar.gz.part")
        .tempfile_in(output_dir)
        .fs_context("creating temporary archive", output_dir)?;
    bundle_files(entries, temp_archive.path())?;
    make_world_readable(temp_archive.path())?;

    let checksum = calculate_sha256(temp_archive.path())?;
    let size = std::fs::metadata(temp_archive.path())
        .fs_context("reading archive metadata", temp_archive.path())?
        .len();

    let mut temp_checksum = tempfile::Builder::new()
        .prefix(".bundle-")
        .suffix(".sha256.part")
        .tempfile_in(output_dir)
        .fs_context("creating temporary checksum file", output_dir)?;
    temp_checksum
        .write_all(checksum.as_bytes())
        .fs_context("writing checksum file", temp_checksum.path())?;
    temp_checksum
        .as_file()
        .sync_all()
        .fs_context("syncing checksum file", temp_checksum.path())?;
    make_world_readable(temp_checksum.path())?;

    // A sidecar from an earlier run must not outlive the archive it described
    let checksum_path = checksum_path(archive_path);
    remove_stale_file(&checksum_path)?;
    temp_archive
        .persist(archive_path)
        .map_err(|e| e.error)
        .fs_context("publishing archive", archive_path)?;
    temp_checksum
        .persist(&checksum_path)
        .map_err(|e| e.error)
        .fs_context("publishing checksum", &checksum_path)?;

    Ok(BundledArtifact {
        name: name.to_string(),
        archive_path: archive_path.to_path_buf(),
        checksum_path,
        checksum,
        size,
    })
}

fn remove_stale_file(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::debug!("Removed previous {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Fs {
            context: "removing previous checksum file",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Temporary files are created owner-only; published artifacts should not be.
#[cfg(unix)]
fn make_world_readable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))
        .fs_context("setting permissions", path)
}

#[cfg(not(unix))]
fn make_world_readable(_path: &Path) -> Result<()> {
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        // Not created yet: resolve the parent and re-attach the name
        Err(_) => match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
                Ok(absolute(parent)?.join(name))
            }
            _ => std::path::absolute(path).fs_context("resolving path", path),
        },
    }
}
