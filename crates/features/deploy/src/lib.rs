//! # Deploy
//!
//! Builds the native networking library for every configured architecture,
//! then publishes it into the destination tree:
//!
//! * the build driver runs once per architecture (`<driver> -C <out_dir> <target>`),
//! * the versioned library is located by glob in the first architecture's output,
//! * every reference to it in the destination manifest is rewritten to the new name,
//! * the library of each architecture and the packaged archives, if any, are copied over.
//!
//! A failing build aborts before anything is copied. There is no rollback for
//! a failure later in the sequence.

mod error;

pub use crate::error::DeployError;

use perfkit_domain::config::{Architecture, BuildConfig};
use perfkit_template::LinePatch;
use perfkit_template::fsops::{copy_into, ensure_dir};
use perfkit_toolchain::{CommandRunner, CommandSpec, FilePattern};
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of a deploy run.
#[derive(Debug, Clone)]
pub struct DeployReport {
    /// Library file name discovered after the build.
    pub library: String,
    /// Manifest lines that referenced the library.
    pub patched_lines: usize,
    pub copied: Vec<PathBuf>,
}

/// Runs the build driver for one architecture.
///
/// # Errors
/// Returns [`DeployError::Tool`] if the driver cannot be started or fails.
pub fn build_architecture<R: CommandRunner + ?Sized>(
    cfg: &BuildConfig,
    source_dir: &Path,
    arch: &Architecture,
    runner: &R,
) -> Result<(), DeployError> {
    let cmd = CommandSpec::new(&cfg.driver)
        .arg("-C")
        .arg(source_dir.join(&arch.out_dir))
        .arg(&cfg.target);
    runner.run(&cmd)?;
    Ok(())
}

/// Locates the built library in the output of `arch`.
///
/// When several files match, the first one in name order is used.
///
/// # Errors
/// Returns [`DeployError::Tool`] if nothing matches or the directory cannot be read.
pub fn locate_library(
    cfg: &BuildConfig,
    source_dir: &Path,
    arch: &Architecture,
) -> Result<PathBuf, DeployError> {
    let dir = source_dir.join(&arch.out_dir).join(&cfg.library_subdir);
    let library = FilePattern::new(&cfg.library_glob)?.find_first(&dir)?;
    info!(library = %library.display(), "Located native library");
    Ok(library)
}

/// Builds every architecture and publishes the results under `workspace`.
///
/// # Errors
/// Returns the error of the first failing step.
pub fn run<R: CommandRunner + ?Sized>(
    cfg: &BuildConfig,
    workspace: &Path,
    runner: &R,
) -> Result<DeployReport, DeployError> {
    let source_dir = cfg.source_dir.as_deref().ok_or(DeployError::MissingSourceDir)?;
    let primary = cfg.architectures.first().ok_or(DeployError::NoArchitectures)?;

    for arch in &cfg.architectures {
        build_architecture(cfg, source_dir, arch, runner)?;
    }

    let library_path = locate_library(cfg, source_dir, primary)?;
    let library = library_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| DeployError::FileName { path: library_path.clone() })?
        .to_owned();

    let destination = workspace.join(&cfg.destination);
    let patched_lines = LinePatch::new(&cfg.manifest_pattern, library.as_str())?
        .apply_to_file(&destination.join(&cfg.manifest))?;

    let mut copied = Vec::with_capacity(cfg.architectures.len() + 1);
    for arch in &cfg.architectures {
        let built = source_dir.join(&arch.out_dir).join(&cfg.library_subdir).join(&library);
        let abi_dir = destination.join(&arch.abi);
        ensure_dir(&abi_dir)?;
        copied.push(copy_into(&built, &abi_dir)?);
    }

    let archive_dir = source_dir.join(&primary.out_dir).join(&cfg.archive_subdir);
    if archive_dir.is_dir() {
        for archive in FilePattern::new(&cfg.archive_glob)?.find_in(&archive_dir)? {
            copied.push(copy_into(&archive, &destination)?);
        }
    } else {
        info!(dir = %archive_dir.display(), "No packaged archives to copy");
    }

    info!(library, patched_lines, copied = copied.len(), "Deploy complete");
    Ok(DeployReport { library, patched_lines, copied })
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfkit_toolchain::testing::RecordingRunner;

    fn config(source_dir: &Path) -> BuildConfig {
        BuildConfig { source_dir: Some(source_dir.to_path_buf()), ..BuildConfig::default() }
    }

    #[test]
    fn driver_runs_in_the_architecture_output() {
        let runner = RecordingRunner::new();
        let cfg = config(Path::new("/src"));

        build_architecture(&cfg, Path::new("/src"), &cfg.architectures[1], &runner).unwrap();

        assert_eq!(
            runner.command_lines(),
            ["autoninja -C /src/out/cronetspeedtest_armeabi-v7a cronet_package"]
        );
    }

    #[test]
    fn missing_source_dir_fails_before_building() {
        let runner = RecordingRunner::new();
        let err = run(&BuildConfig::default(), Path::new("."), &runner).unwrap_err();

        assert!(matches!(err, DeployError::MissingSourceDir));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn empty_architecture_list_is_rejected() {
        let cfg = BuildConfig { architectures: Vec::new(), ..config(Path::new("/src")) };
        let err = run(&cfg, Path::new("."), &RecordingRunner::new()).unwrap_err();
        assert!(matches!(err, DeployError::NoArchitectures));
    }
}
