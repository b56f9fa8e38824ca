//! Bundle-level `metadata.json`.

use super::{METADATA_FILE, ModelRecord, extract_languages, extract_modules};
use crate::bundler::{
    BundleDomain,
    error::{Error, ErrorExt, Result},
};
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Aggregate view of every model in a bundle.
///
/// `languages` and `modules` are derived from `metadata` by
/// [`BundleManifest::new`] and never set by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Caller-supplied unique identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Caller-supplied version string
    pub version: String,

    /// Sorted languages, or `["*"]`
    #[serde(default)]
    pub languages: Vec<String>,

    /// Sorted OCR module names (OCR bundles only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<String>>,

    /// Whether pairs were validated as bidirectional (translation bundles only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidirectional: Option<bool>,

    /// Per-model records in input order
    pub metadata: Vec<ModelRecord>,
}

impl BundleManifest {
    /// Builds a manifest, recomputing every derived field from `records`.
    pub fn new(
        domain: BundleDomain,
        version: &str,
        id: Option<&str>,
        bidirectional: bool,
        records: &[ModelRecord],
    ) -> Self {
        Self {
            id: id.map(str::to_string),
            version: version.to_string(),
            languages: extract_languages(records),
            modules: (domain == BundleDomain::Ocr).then(|| extract_modules(records)),
            bidirectional: (domain == BundleDomain::Translation).then_some(bidirectional),
            metadata: records.to_vec(),
        }
    }

    /// Reads a manifest previously written by [`generate`].
    pub fn read(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).fs_context("reading bundle manifest", path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::GenericError(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Writes the manifest to `path`, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(self, path, "writing bundle manifest")
    }
}

/// Writes `value` as JSON indented by four spaces, with a trailing newline.
///
/// Both the bundle manifest and rewritten per-model descriptors go through
/// here so every `metadata.json` in a bundle shares one layout.
pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path, context: &'static str) -> Result<()> {
    let file = std::fs::File::create(path).fs_context(context, path)?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value.serialize(&mut serializer).map_err(|e| {
        if e.is_io() {
            Error::Fs {
                context,
                path: path.to_path_buf(),
                error: e.into(),
            }
        } else {
            Error::SerializationError(e)
        }
    })?;

    writer.write_all(b"\n").fs_context(context, path)?;
    writer.flush().fs_context(context, path)?;
    Ok(())
}

/// Writes the bundle manifest into `destination/metadata.json`.
///
/// Languages and modules are recomputed from `records` here, so the written
/// manifest can never drift from the models it describes.
pub fn generate(
    domain: BundleDomain,
    version: &str,
    destination: &Path,
    id: Option<&str>,
    bidirectional: bool,
    records: &[ModelRecord],
) -> Result<PathBuf> {
    let manifest = BundleManifest::new(domain, version, id, bidirectional, records);
    let manifest_path = destination.join(METADATA_FILE);

    manifest.write(&manifest_path)?;
    log::info!(
        "Wrote bundle manifest for {} model(s): {}",
        manifest.metadata.len(),
        manifest_path.display()
    );

    Ok(manifest_path)
}
