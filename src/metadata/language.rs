//! Collection-level facts derived from a set of model records.
//!
//! Derived sets are always sorted lexicographically and deduplicated; only
//! the per-model record list keeps input order.

use super::{ModelRecord, WILDCARD_LANGUAGE};
use crate::bundler::error::{Error, Result};
use std::collections::{BTreeSet, HashSet};

/// Returns the sorted, deduplicated languages covered by `records`.
///
/// Translation records contribute their source and target language. If any
/// OCR record declares the wildcard, the result is exactly `["*"]`: one
/// wildcard model makes the bundle cover every language, and the explicit
/// languages of the other models are dropped.
pub fn extract_languages(records: &[ModelRecord]) -> Vec<String> {
    let has_wildcard = records.iter().any(|record| match record {
        ModelRecord::Ocr(ocr) => ocr.languages.iter().any(|l| l == WILDCARD_LANGUAGE),
        _ => false,
    });
    if has_wildcard {
        return vec![WILDCARD_LANGUAGE.to_string()];
    }

    let mut languages = BTreeSet::new();
    for record in records {
        match record {
            ModelRecord::Translation(t) => {
                languages.insert(t.source_language.as_str());
                languages.insert(t.target_language.as_str());
            }
            ModelRecord::Ocr(ocr) => languages.extend(ocr.languages.iter().map(String::as_str)),
            ModelRecord::Tts(_) => {}
        }
    }

    languages.into_iter().map(str::to_string).collect()
}

/// Returns the sorted, deduplicated OCR module names in `records`.
///
/// Records without a module (non-OCR records) are skipped.
pub fn extract_modules(records: &[ModelRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| match record {
            ModelRecord::Ocr(ocr) => Some(ocr.module.as_str()),
            _ => None,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Checks that every translation pair has its reverse.
///
/// # Errors
///
/// [`Error::MissingPairs`] listing the reverse pair, as `target-source`, of
/// every record that lacks one. The list has one entry per one-sided record
/// so all gaps can be fixed in a single pass.
pub fn validate_bidirectional(records: &[ModelRecord]) -> Result<()> {
    let pairs: Vec<(&str, &str)> = records
        .iter()
        .filter_map(|record| match record {
            ModelRecord::Translation(t) => {
                Some((t.source_language.as_str(), t.target_language.as_str()))
            }
            _ => None,
        })
        .collect();
    let existing: HashSet<(&str, &str)> = pairs.iter().copied().collect();

    let missing: Vec<String> = pairs
        .iter()
        .filter(|(source, target)| !existing.contains(&(*target, *source)))
        .map(|(source, target)| format!("{target}-{source}"))
        .collect();

    if missing.is_empty() {
        log::debug!("All {} translation pair(s) are bidirectional", pairs.len());
        Ok(())
    } else {
        Err(Error::MissingPairs { missing })
    }
}
