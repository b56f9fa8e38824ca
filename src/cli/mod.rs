//! Command line interface for the model bundler.
//!
//! This module provides argument parsing, command execution and
//! user-facing output.

mod args;
pub mod commands;
mod output;

pub use args::{Args, BundleArgs, Command, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::BundleDomain;
use crate::error::Result;

/// Main CLI entry point
pub fn run() -> Result<i32> {
    let args = Args::parse_args();
    let runtime_config = RuntimeConfig::from(&args);
    execute(&args.command, &runtime_config)
}

/// Executes a parsed command.
pub fn execute(command: &Command, runtime_config: &RuntimeConfig) -> Result<i32> {
    match command {
        Command::Translation {
            bundle,
            bidirectional,
        } => commands::run_bundle(
            BundleDomain::Translation,
            bundle,
            *bidirectional,
            runtime_config,
        ),
        Command::Ocr { bundle } => {
            commands::run_bundle(BundleDomain::Ocr, bundle, false, runtime_config)
        }
        Command::Tts { bundle } => {
            commands::run_bundle(BundleDomain::Tts, bundle, false, runtime_config)
        }
        Command::Verify { archive } => commands::run_verify(archive, runtime_config),
    }
}
