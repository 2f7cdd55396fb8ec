//! Small filesystem steps shared by the procedures.

use crate::error::{Result, TemplateError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute bits for owner, group and other.
pub const EXECUTE_BITS: u32 = 0o111;

/// Creates `path` and its parents when missing.
///
/// # Errors
/// Returns [`TemplateError::Io`] if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(TemplateError::io("create directory", path))
}

/// Removes a file, treating a missing file as success.
///
/// Returns `true` if a file was removed.
///
/// # Errors
/// Returns [`TemplateError::Io`] for any failure other than "not found".
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(TemplateError::Io { action: "remove", path: path.to_path_buf(), source }),
    }
}

/// Adds the execute bits to the current mode of `path`.
///
/// # Errors
/// Returns [`TemplateError::Io`] if the metadata cannot be read or the mode cannot be set.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms =
        fs::metadata(path).map_err(TemplateError::io("inspect", path))?.permissions();
    perms.set_mode(perms.mode() | EXECUTE_BITS);
    fs::set_permissions(path, perms).map_err(TemplateError::io("set permissions on", path))
}

/// Non-unix platforms have no execute bits; only checks that `path` exists.
///
/// # Errors
/// Returns [`TemplateError::Io`] if the file does not exist.
#[cfg(not(unix))]
pub fn make_executable(path: &Path) -> Result<()> {
    fs::metadata(path).map(|_| ()).map_err(TemplateError::io("inspect", path))
}

/// Copies `src` to `dst`; when `dst` is a directory the file keeps its name.
///
/// Returns the final destination path.
///
/// # Errors
/// Returns [`TemplateError::Io`] if `src` has no file name or the copy fails.
pub fn copy_into(src: &Path, dst: &Path) -> Result<PathBuf> {
    let target = if dst.is_dir() {
        let name = src.file_name().ok_or_else(|| TemplateError::Io {
            action: "copy",
            path: src.to_path_buf(),
            source: std::io::Error::new(ErrorKind::InvalidInput, "source has no file name"),
        })?;
        dst.join(name)
    } else {
        dst.to_path_buf()
    };

    fs::copy(src, &target).map_err(TemplateError::io("copy", src))?;
    info!("Copied {} to {}", src.display(), target.display());
    Ok(target)
}
