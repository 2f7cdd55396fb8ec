use super::{load, workspace};
use anyhow::{Context, Result};
use perfkit_toolchain::SystemRunner;
use std::path::Path;

/// Builds the native library and publishes it into the destination tree.
///
/// # Errors
/// Returns an error if configuration loading, the build or any copy fails.
pub fn run_build(config: Option<&Path>) -> Result<()> {
    let cfg = load(config)?;
    let report =
        perfkit_deploy::run(&cfg.build, &workspace()?, &SystemRunner).context("Build failed")?;

    println!("Library:         {}", report.library);
    println!("Manifest lines:  {}", report.patched_lines);
    for path in &report.copied {
        println!("Copied:          {}", path.display());
    }
    Ok(())
}
