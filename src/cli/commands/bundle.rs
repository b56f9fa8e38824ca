//! Bundling command.

use crate::bundler::{BundleDomain, Bundler};
use crate::cli::{RuntimeConfig, args::BundleArgs};
use crate::error::Result;

/// Runs a full bundling run and reports the published artifact.
pub fn run_bundle(
    domain: BundleDomain,
    args: &BundleArgs,
    bidirectional: bool,
    runtime_config: &RuntimeConfig,
) -> Result<i32> {
    let settings = args.to_settings(domain, bidirectional)?;

    runtime_config.progress(&format!(
        "Bundling {} {} model(s) into {}",
        settings.input_dirs().len(),
        domain,
        settings.output_dir().display()
    ))?;
    for dir in settings.input_dirs() {
        runtime_config.verbose_println(&format!("  input: {}", dir.display()))?;
    }

    let artifact = Bundler::new(settings).bundle()?;

    runtime_config.success(&format!("Created {}", artifact.archive_path.display()))?;
    runtime_config.indent(&format!("checksum: {}", artifact.checksum_path.display()))?;
    runtime_config.indent(&format!("sha256:   {}", artifact.checksum))?;
    runtime_config.verbose_println(&format!("  size:     {} bytes", artifact.size))?;

    if args.remove_input {
        runtime_config
            .output()
            .warn(&format!("Removed {} input directories", args.input_dirs.len()))?;
    }

    Ok(0)
}
