//! Bundle building stages and their orchestration.
//!
//! - [`archive`] - deterministic `.tar.gz` packaging
//! - [`checksum`] - SHA-256 digests and `.sha256` sidecars
//! - [`naming`] - the bundle naming rule
//! - [`orchestrator`] - [`Bundler`], which runs a whole bundling run

pub mod archive;
pub mod checksum;
pub mod naming;
mod orchestrator;

pub use archive::bundle_files;
pub use checksum::{calculate_sha256, checksum_path, verify, write_checksum};
pub use naming::{archive_file_name, bundle_name};
pub use orchestrator::Bundler;
