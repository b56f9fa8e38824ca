//! Common test utilities for bundler integration tests

use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory holding converted model directories and bundle output
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Default output root inside the workspace
    pub fn output(&self) -> PathBuf {
        self.path.join("output")
    }

    /// Create a model directory with the given metadata.json and one weights file
    pub fn create_model(&self, name: &str, metadata: &str) -> PathBuf {
        let dir = self.path.join("models").join(name);
        std::fs::create_dir_all(&dir).expect("Failed to create model directory");
        std::fs::write(dir.join("metadata.json"), metadata).expect("Failed to write metadata");
        std::fs::write(dir.join("model.onnx"), format!("weights of {name}"))
            .expect("Failed to write model file");
        dir
    }

    /// Create a translation model directory
    pub fn create_translation(&self, source: &str, target: &str) -> PathBuf {
        self.create_model(
            &format!("{source}-{target}"),
            &format!(
                r#"{{
    "source_language": "{source}",
    "target_language": "{target}",
    "architectures": ["MarianMTModel"],
    "files": {{
        "tokenizer": {{"vocabulary": "vocab.spm"}},
        "inference": {{"encoder": "encoder.onnx", "decoder": "decoder.onnx"}}
    }}
}}"#
            ),
        )
    }

    /// Create an OCR model directory
    pub fn create_ocr(&self, name: &str, languages: &[&str], module: &str) -> PathBuf {
        let languages = serde_json::to_string(languages).expect("Failed to encode languages");
        self.create_model(
            name,
            &format!(r#"{{"languages": {languages}, "module": "{module}", "files": {{"inference": {{"model": "model.onnx"}}}}}}"#),
        )
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }
}

/// Extract an archive into a fresh directory under `into`
#[allow(dead_code)]
pub fn extract(archive: &Path, into: &Path) -> PathBuf {
    let target = into.join("extracted");
    let file = std::fs::File::open(archive).expect("Failed to open archive");
    tar::Archive::new(GzDecoder::new(file))
        .unpack(&target)
        .expect("Failed to unpack archive");
    target
}

/// Names of the top-level entries in a directory
#[allow(dead_code)]
pub fn top_level(dir: &Path) -> BTreeSet<String> {
    std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|e| e.expect("Failed to read entry").file_name().to_string_lossy().to_string())
        .collect()
}
