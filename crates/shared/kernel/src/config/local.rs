use super::{ConfigError, LOCAL_CONFIG_FILE};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::info;

/// Records the native source tree in `perfkit.local.toml` inside `dir`.
///
/// Other keys already present in the file are kept.
///
/// # Errors
/// Returns an error if the existing file cannot be read or parsed, or the
/// updated file cannot be written.
pub fn persist_source_dir(dir: &Path, source_dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = dir.join(LOCAL_CONFIG_FILE);

    let mut table = match fs::read_to_string(&path) {
        Ok(raw) => toml::from_str::<Table>(&raw)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?,
        Err(e) if e.kind() == ErrorKind::NotFound => Table::new(),
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    let Value::Table(build) = table.entry("build").or_insert(Value::Table(Table::new())) else {
        return Err(ConfigError::Invalid {
            field: "build",
            message: format!("expected a table in {}", path.display()),
        });
    };
    build.insert("source_dir".to_owned(), Value::String(source_dir.to_string_lossy().into_owned()));

    let encoded = toml::to_string_pretty(&table)?;
    fs::write(&path, encoded).map_err(|source| ConfigError::Io { path: path.clone(), source })?;

    info!(path = %path.display(), "Recorded native source tree");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_file_with_build_section() {
        let dir = tempdir().unwrap();
        let path = persist_source_dir(dir.path(), Path::new("/src/chromium")).unwrap();

        let table: Table = toml::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(table["build"]["source_dir"].as_str(), Some("/src/chromium"));
    }

    #[test]
    fn keeps_unrelated_keys() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(LOCAL_CONFIG_FILE),
            "[host]\nname = \"bench-01\"\n\n[build]\ndriver = \"ninja\"\nsource_dir = \"/old\"\n",
        )
        .unwrap();

        persist_source_dir(dir.path(), Path::new("/new")).unwrap();

        let raw = fs::read_to_string(dir.path().join(LOCAL_CONFIG_FILE)).unwrap();
        let table: Table = toml::from_str(&raw).unwrap();
        assert_eq!(table["host"]["name"].as_str(), Some("bench-01"));
        assert_eq!(table["build"]["driver"].as_str(), Some("ninja"));
        assert_eq!(table["build"]["source_dir"].as_str(), Some("/new"));
    }

    #[test]
    fn non_table_build_key_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(LOCAL_CONFIG_FILE), "build = 3\n").unwrap();

        let err = persist_source_dir(dir.path(), Path::new("/src")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "build", .. }));
    }
}
