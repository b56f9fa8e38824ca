//! Model Bundler - packages converted ML model directories.
//!
//! This binary bundles translation, OCR and TTS model directories into a
//! versioned `.tar.gz` archive with a SHA-256 sidecar.

use std::process;

fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match model_bundler::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
