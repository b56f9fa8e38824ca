//! Relocation of file references inside staged per-model metadata.
//!
//! Converters record model files relative to their own directory, e.g.
//! `"encoder": "encoder.onnx"`. Once a model sits under
//! `<staging>/<directory>/`, those references only resolve from the bundle
//! root if they carry the directory as a prefix.

use super::manifest::write_json;
use crate::bundler::error::{Error, ErrorExt, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Key of the object that holds file references.
const FILES_KEY: &str = "files";

/// Prefixes every file path under `files` in the descriptor at `metadata_file`.
///
/// Returns the number of rewritten values. A descriptor without a `files`
/// object is left untouched.
pub fn prefix_file_paths(metadata_file: &Path, prefix: &str) -> Result<usize> {
    let content = std::fs::read_to_string(metadata_file)
        .fs_context("reading staged model metadata", metadata_file)?;
    let mut data: Value = serde_json::from_str(&content).map_err(|e| {
        Error::GenericError(format!("failed to parse {}: {e}", metadata_file.display()))
    })?;

    let Some(Value::Object(files)) = data.get_mut(FILES_KEY) else {
        log::debug!("No '{}' section in {}", FILES_KEY, metadata_file.display());
        return Ok(0);
    };
    let rewritten = prefix_in_object(files, prefix);

    write_json(&data, metadata_file, "writing staged model metadata")?;

    log::debug!(
        "Prefixed {} file path(s) with '{}' in {}",
        rewritten,
        prefix,
        metadata_file.display()
    );
    Ok(rewritten)
}

fn prefix_in_object(object: &mut Map<String, Value>, prefix: &str) -> usize {
    let mut rewritten = 0;
    for value in object.values_mut() {
        match value {
            Value::Object(nested) => rewritten += prefix_in_object(nested, prefix),
            Value::String(path) if looks_like_file(path.as_str()) => {
                *path = format!("{prefix}/{path}");
                rewritten += 1;
            }
            _ => {}
        }
    }
    rewritten
}

/// A string names a file when its last component has an extension.
fn looks_like_file(value: &str) -> bool {
    Path::new(value).extension().is_some()
}
