//! Run configuration.
//!
//! [`Settings`] is assembled with [`SettingsBuilder`], optionally seeded from
//! a TOML [`SettingsFile`] and then overridden by command line flags.

mod builder;
mod core;
mod file;
mod prerequisite;

pub use builder::SettingsBuilder;
pub use self::core::Settings;
pub use file::{PublishSection, SettingsFile};
pub use prerequisite::PrerequisiteSource;
