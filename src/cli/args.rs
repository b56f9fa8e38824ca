//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap and the conversion
//! of parsed arguments into bundler [`Settings`].

use crate::bundler::{BundleDomain, Settings, SettingsBuilder};
use crate::error::{CliError, Result};
use clap::{ArgAction, ArgGroup, Parser, Subcommand, builder::BoolishValueParser};
use std::path::PathBuf;

/// Bundler for converted on-device ML models
#[derive(Parser, Debug)]
#[command(
    name = "model_bundler",
    version,
    about = "Bundles converted ML model directories into a verifiable archive",
    long_about = "Bundles converted translation, OCR or TTS model directories into a single
versioned .tar.gz archive with a SHA-256 sidecar, ready for the app's model download.

Each input directory must contain the metadata.json written by its converter.

Usage:
  model_bundler translation -i models/en-nl models/nl-en --bundle-version 1.2.0
  model_bundler ocr -i models/det models/latin-rec --id latin --version-file version.txt
  model_bundler tts -i voices/en_US-amy-medium --bundle-version 1.0.0
  model_bundler verify --archive output/en-nl-bundle.tar.gz

Exit code 0 = archive and checksum guaranteed to exist in the output directory."
)]
pub struct Args {
    /// Print detailed progress
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Bundling and verification operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bundle translation models, usually both directions of a language pair
    Translation {
        #[command(flatten)]
        bundle: BundleArgs,

        /// Require a reverse model for every source-target pair
        #[arg(
            long,
            value_name = "BOOL",
            action = ArgAction::Set,
            value_parser = BoolishValueParser::new(),
            num_args = 0..=1,
            default_value_t = true,
            default_missing_value = "true"
        )]
        bidirectional: bool,
    },

    /// Bundle OCR models of any module type (detector and/or recognizer)
    Ocr {
        #[command(flatten)]
        bundle: BundleArgs,
    },

    /// Bundle a text-to-speech voice pack
    Tts {
        #[command(flatten)]
        bundle: BundleArgs,
    },

    /// Check an archive against its .sha256 sidecar
    Verify {
        /// Archive to verify
        #[arg(short, long, value_name = "PATH")]
        archive: PathBuf,
    },
}

/// Arguments shared by every bundling subcommand.
#[derive(clap::Args, Debug)]
#[command(group(
    ArgGroup::new("version_source")
        .required(true)
        .args(["bundle_version", "version_file"])
))]
pub struct BundleArgs {
    /// Model directories to bundle, each containing a metadata.json
    #[arg(short = 'i', long = "input-dir", value_name = "DIR", num_args = 1.., required = true)]
    pub input_dirs: Vec<PathBuf>,

    /// Directory receiving the staging directory, archive and checksum
    #[arg(short = 'o', long, value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Version string embedded in the bundle manifest
    #[arg(long, value_name = "VERSION")]
    pub bundle_version: Option<String>,

    /// File whose trimmed content is the bundle version
    #[arg(long, value_name = "PATH")]
    pub version_file: Option<PathBuf>,

    /// Unique bundle identifier; also used as the bundle name
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Prefix file paths in each staged model's metadata with its directory
    #[arg(long)]
    pub prefix_paths: bool,

    /// Keep the staging directory after bundling
    #[arg(long)]
    pub keep_intermediates: bool,

    /// Delete the input directories after a successful run
    #[arg(long)]
    pub remove_input: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl BundleArgs {
    /// Resolves the bundle version from `--bundle-version` or `--version-file`.
    pub fn resolve_version(&self) -> Result<String> {
        if let Some(version) = &self.bundle_version {
            return Ok(version.clone());
        }

        let path = self.version_file.as_ref().ok_or_else(|| CliError::InvalidArguments {
            reason: "either --bundle-version or --version-file is required".to_string(),
        })?;
        let content = std::fs::read_to_string(path).map_err(|e| CliError::VersionFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(content.trim().to_string())
    }

    /// Builds bundler settings for the given domain.
    pub fn to_settings(&self, domain: BundleDomain, bidirectional: bool) -> Result<Settings> {
        let mut builder = SettingsBuilder::new(domain)
            .input_dirs(&self.input_dirs)
            .output_dir(&self.output_dir)
            .version(self.resolve_version()?)
            .bidirectional(bidirectional)
            .rewrite_paths(self.prefix_paths)
            .keep_intermediates(self.keep_intermediates)
            .remove_inputs(self.remove_input);

        if let Some(id) = &self.id {
            builder = builder.bundle_id(id.clone());
        }

        Ok(builder.build()?)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for styled terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("model_bundler").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn translation_defaults_to_bidirectional() {
        let args = parse(&["translation", "-i", "en-nl", "nl-en", "--bundle-version", "1.0.0"]);
        match args.command {
            Command::Translation { bundle, bidirectional } => {
                assert!(bidirectional);
                assert_eq!(bundle.input_dirs, vec![PathBuf::from("en-nl"), PathBuf::from("nl-en")]);
                assert_eq!(bundle.output_dir, PathBuf::from("output"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bidirectional_accepts_boolish_values() {
        for (value, expected) in [("no", false), ("0", false), ("yes", true), ("false", false)] {
            let args = parse(&[
                "translation", "-i", "en-nl", "--bundle-version", "1", "--bidirectional", value,
            ]);
            let Command::Translation { bidirectional, .. } = args.command else {
                panic!("expected translation command");
            };
            assert_eq!(bidirectional, expected, "value {value}");
        }
    }

    #[test]
    fn a_version_source_is_required() {
        let result = Args::try_parse_from(["model_bundler", "tts", "-i", "amy"]);
        assert!(result.is_err());
    }

    #[test]
    fn version_sources_are_exclusive() {
        let result = Args::try_parse_from([
            "model_bundler", "tts", "-i", "amy", "--bundle-version", "1", "--version-file", "v.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn version_file_is_trimmed() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("version.txt");
        std::fs::write(&file, "0.4.2\n").unwrap();

        let args = parse(&["ocr", "-i", "det", "--version-file", file.to_str().unwrap()]);
        let Command::Ocr { bundle } = args.command else {
            panic!("expected ocr command");
        };
        assert_eq!(bundle.resolve_version().unwrap(), "0.4.2");
    }
}
