//! Bundle naming.
//!
//! One rule names every bundle: the caller's identifier if given, else the
//! aggregated languages, else the model directories.

use crate::bundler::error::{Error, Result};
use crate::metadata::{BundleManifest, WILDCARD_LANGUAGE};

/// Name used for the wildcard language in file names.
const WILDCARD_NAME: &str = "all";

/// Derives the bundle name for a manifest.
///
/// 1. `bundle_id`, when supplied
/// 2. the manifest languages joined with `-` (`*` becomes `all`)
/// 3. the model directory names joined with `-`
///
/// # Errors
///
/// [`Error::InvalidBundleName`] if the result is empty or not a plain file name.
pub fn bundle_name(bundle_id: Option<&str>, manifest: &BundleManifest) -> Result<String> {
    let name = match bundle_id {
        Some(id) => id.trim().to_string(),
        None if !manifest.languages.is_empty() => manifest
            .languages
            .iter()
            .map(|l| if l == WILDCARD_LANGUAGE { WILDCARD_NAME } else { l.as_str() })
            .collect::<Vec<_>>()
            .join("-"),
        None => manifest
            .metadata
            .iter()
            .map(|record| record.directory())
            .collect::<Vec<_>>()
            .join("-"),
    };

    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);
    if invalid {
        return Err(Error::InvalidBundleName(name));
    }

    Ok(name)
}

/// File name of the archive for a bundle.
pub fn archive_file_name(name: &str) -> String {
    format!("{name}-bundle.tar.gz")
}
