pub mod build;
pub mod config;
pub mod render;
pub mod setup;

use anyhow::{Context, Result};
use perfkit_domain::config::HarnessConfig;
use perfkit_kernel::config::load_config;
use std::path::{Path, PathBuf};

/// The directory the operator runs `perfkit` from.
pub fn workspace() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to determine the current directory")
}

/// Loads the layered configuration rooted at the current directory.
pub fn load(extra: Option<&Path>) -> Result<HarnessConfig> {
    let base = workspace()?;
    load_config(&base, extra).context("Failed to load configuration")
}
