//! Command execution functions for bundler operations.

mod bundle;
mod verify;

pub use bundle::run_bundle;
pub use verify::run_verify;
