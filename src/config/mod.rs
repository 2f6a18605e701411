//! Configuration loading and application.
pub(crate) mod apply;
mod loader;
pub mod types;

#[cfg(test)]
mod tests;

pub use apply::{build_targets, suite_pause};
pub use loader::{DEFAULT_CONFIG_FILES, load_config};

#[cfg(test)]
pub(crate) use loader::load_config_file;
