//! Configuration for bundling runs.
//!
//! [`Settings`] carries everything a run needs, including the bundle version,
//! so no stage reads process-wide state. Construct it with [`SettingsBuilder`].

mod builder;
mod core;

pub use builder::SettingsBuilder;
pub use core::Settings;
