//! Per-model metadata loading.
//!
//! Every converted model directory carries a `metadata.json` written by its
//! converter. The loader reads the keys the bundle domain requires and turns
//! them into a closed [`ModelRecord`]; everything else in the file is left to
//! the copied per-model descriptor.

pub mod language;
pub mod manifest;
pub mod paths;

use crate::bundler::{
    BundleDomain,
    error::{Error, ErrorExt, Result},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use language::{extract_languages, extract_modules, validate_bidirectional};
pub use manifest::{BundleManifest, generate};

/// File name of model and bundle descriptors.
pub const METADATA_FILE: &str = "metadata.json";

/// Sentinel language meaning "all languages".
pub const WILDCARD_LANGUAGE: &str = "*";

/// OCR pipeline stage a model implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrModule {
    /// Locates text regions
    Detector,
    /// Reads text inside a region
    Recognizer,
}

impl OcrModule {
    /// Returns the name used in metadata files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detector => "detector",
            Self::Recognizer => "recognizer",
        }
    }
}

impl fmt::Display for OcrModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OcrModule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "detector" => Ok(Self::Detector),
            "recognizer" => Ok(Self::Recognizer),
            other => Err(format!(
                "unknown module '{other}' (expected detector or recognizer)"
            )),
        }
    }
}

/// Facts declared by one translation model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationRecord {
    /// Name of the model directory
    pub directory: String,
    /// Language translated from
    pub source_language: String,
    /// Language translated into
    pub target_language: String,
}

/// Facts declared by one OCR model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OcrRecord {
    /// Name of the model directory
    pub directory: String,
    /// Supported languages; may contain [`WILDCARD_LANGUAGE`]
    pub languages: Vec<String>,
    /// Pipeline stage
    pub module: OcrModule,
}

/// A text-to-speech voice pack, identified only by its directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtsRecord {
    /// Name of the model directory
    pub directory: String,
}

/// One converted model's declared facts.
///
/// Serializes flat, so a translation record becomes
/// `{"directory": ..., "source_language": ..., "target_language": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelRecord {
    /// Translation model
    Translation(TranslationRecord),
    /// OCR model
    Ocr(OcrRecord),
    /// TTS voice pack
    Tts(TtsRecord),
}

impl ModelRecord {
    /// Returns the model directory name.
    pub fn directory(&self) -> &str {
        match self {
            Self::Translation(r) => &r.directory,
            Self::Ocr(r) => &r.directory,
            Self::Tts(r) => &r.directory,
        }
    }

    /// Returns the domain this record belongs to.
    pub fn domain(&self) -> BundleDomain {
        match self {
            Self::Translation(_) => BundleDomain::Translation,
            Self::Ocr(_) => BundleDomain::Ocr,
            Self::Tts(_) => BundleDomain::Tts,
        }
    }
}

/// Keys a model descriptor must carry for the given domain.
pub fn required_keys(domain: BundleDomain) -> &'static [&'static str] {
    match domain {
        BundleDomain::Translation => &["source_language", "target_language"],
        BundleDomain::Ocr => &["module"],
        BundleDomain::Tts => &[],
    }
}

/// Loads and validates `metadata.json` from a model directory.
///
/// # Errors
///
/// - [`Error::MissingMetadataFile`] if the descriptor does not exist
/// - [`Error::IncompleteMetadata`] if a required key is absent or null
/// - [`Error::InvalidMetadata`] if the file is not a JSON object or a value has the wrong type
pub fn load(domain: BundleDomain, model_dir: &Path) -> Result<ModelRecord> {
    let metadata_file = model_dir.join(METADATA_FILE);
    if !metadata_file.is_file() {
        return Err(Error::MissingMetadataFile(model_dir.to_path_buf()));
    }

    let directory = directory_name(model_dir)?;
    let content = std::fs::read_to_string(&metadata_file)
        .fs_context("reading model metadata", &metadata_file)?;

    let value: Value = serde_json::from_str(&content).map_err(|e| Error::InvalidMetadata {
        directory: directory.clone(),
        reason: format!("{METADATA_FILE} is not valid JSON: {e}"),
    })?;
    let Value::Object(data) = value else {
        return Err(Error::InvalidMetadata {
            directory,
            reason: format!("{METADATA_FILE} must contain a JSON object"),
        });
    };

    let missing: Vec<String> = required_keys(domain)
        .iter()
        .filter(|key| data.get(**key).is_none_or(Value::is_null))
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::IncompleteMetadata { directory, missing });
    }

    let record = match domain {
        BundleDomain::Translation => ModelRecord::Translation(TranslationRecord {
            source_language: string_field(&data, "source_language", &directory)?,
            target_language: string_field(&data, "target_language", &directory)?,
            directory,
        }),
        BundleDomain::Ocr => {
            let module = string_field(&data, "module", &directory)?
                .parse()
                .map_err(|reason| Error::InvalidMetadata {
                    directory: directory.clone(),
                    reason,
                })?;
            ModelRecord::Ocr(OcrRecord {
                languages: languages_field(&data, &directory)?,
                module,
                directory,
            })
        }
        BundleDomain::Tts => ModelRecord::Tts(TtsRecord { directory }),
    };

    log::debug!("Loaded {} metadata for {}", domain, record.directory());
    Ok(record)
}

/// Loads every model directory in order, stopping at the first failure.
///
/// Also rejects inputs whose directory names collide, since they would land
/// on the same path in the staging directory.
pub fn load_many<P: AsRef<Path>>(domain: BundleDomain, model_dirs: &[P]) -> Result<Vec<ModelRecord>> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(model_dirs.len());

    for dir in model_dirs {
        let record = load(domain, dir.as_ref())?;
        if !seen.insert(record.directory().to_string()) {
            return Err(Error::DuplicateModelDirectory(record.directory().to_string()));
        }
        records.push(record);
    }

    log::info!("Loaded metadata for {} {} model(s)", records.len(), domain);
    Ok(records)
}

/// Final path component of a model directory, as UTF-8.
pub fn directory_name(model_dir: &Path) -> Result<String> {
    let name = match model_dir.file_name() {
        Some(name) => name.to_os_string(),
        // `.` or `..` has no file name of its own
        None => model_dir
            .canonicalize()
            .fs_context("resolving model directory", model_dir)?
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| Error::InvalidDirectoryName(model_dir.to_path_buf()))?,
    };

    name.into_string()
        .map_err(|_| Error::InvalidDirectoryName(PathBuf::from(model_dir)))
}

fn string_field(data: &Map<String, Value>, key: &str, directory: &str) -> Result<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidMetadata {
            directory: directory.to_string(),
            reason: format!("'{key}' must be a string"),
        })
}

fn languages_field(data: &Map<String, Value>, directory: &str) -> Result<Vec<String>> {
    let invalid = || Error::InvalidMetadata {
        directory: directory.to_string(),
        reason: "'languages' must be a list of strings".to_string(),
    };

    match data.get("languages") {
        None => Ok(Vec::new()),
        // Present but null counts as a missing entry, unlike an absent key
        Some(Value::Null) => Err(Error::IncompleteMetadata {
            directory: directory.to_string(),
            missing: vec!["languages".to_string()],
        }),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        Some(_) => Err(invalid()),
    }
}
