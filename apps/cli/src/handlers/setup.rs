use super::{load, workspace};
use anyhow::{Context, Result};
use perfkit_bootstrap::BootstrapOptions;
use perfkit_toolchain::SystemRunner;
use std::path::{Path, PathBuf};

/// Bootstraps the current directory.
///
/// # Errors
/// Returns an error if configuration loading or any bootstrap step fails.
pub fn run_setup(
    config: Option<&Path>,
    native_src_dir: PathBuf,
    profiler_scripts_dir: PathBuf,
) -> Result<()> {
    let cfg = load(config)?;
    let opts = BootstrapOptions { workspace: workspace()?, native_src_dir, profiler_scripts_dir };

    let report = perfkit_bootstrap::run(&cfg, &opts, &SystemRunner).context("Setup failed")?;

    println!("Host:            {}", report.host);
    println!("Certificate:     {}", report.certificate.cert.display());
    println!("Server configs:  {}", report.server_configs.len());
    for script in &report.scripts {
        println!("Script:          {}", script.display());
    }
    println!("Local config:    {}", report.local_config.display());
    Ok(())
}
