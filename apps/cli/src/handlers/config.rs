use super::load;
use anyhow::{Context, Result};
use std::path::Path;

/// Prints the merged configuration.
///
/// # Errors
/// Returns an error if loading or encoding fails.
pub fn show_config(config: Option<&Path>) -> Result<()> {
    let cfg = load(config)?;
    let encoded = toml::to_string_pretty(&cfg).context("Failed to encode configuration")?;
    print!("{encoded}");
    Ok(())
}
