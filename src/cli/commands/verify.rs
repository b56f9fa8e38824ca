//! Archive verification command.

use crate::bundler;
use crate::cli::RuntimeConfig;
use crate::error::Result;
use std::path::Path;

/// Checks an archive against its sidecar.
pub fn run_verify(archive: &Path, runtime_config: &RuntimeConfig) -> Result<i32> {
    runtime_config.verbose_println(&format!(
        "Checking {} against {}",
        archive.display(),
        bundler::checksum_path(archive).display()
    ))?;

    let digest = bundler::verify(archive)?;
    runtime_config.success(&format!("{} OK", archive.display()))?;
    runtime_config.indent(&format!("sha256: {digest}"))?;

    Ok(0)
}
