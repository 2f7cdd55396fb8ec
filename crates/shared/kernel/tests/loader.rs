use perfkit_kernel::config::{ConfigLoader, LOCAL_CONFIG_FILE, persist_source_dir};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn persisted_source_dir_is_picked_up_by_loader() {
    let dir = tempdir().unwrap();
    persist_source_dir(dir.path(), Path::new("/work/chromium/src")).unwrap();
    assert!(dir.path().join(LOCAL_CONFIG_FILE).exists());

    let cfg = ConfigLoader::new(dir.path()).env_source(Default::default()).load().unwrap();
    assert_eq!(cfg.build.source_dir.as_deref(), Some(Path::new("/work/chromium/src")));
    assert_eq!(cfg.build.driver, "autoninja");
}

#[test]
fn architectures_table_replaces_defaults() {
    let dir = tempdir().unwrap();
    let extra = dir.path().join("x86.toml");
    fs::write(
        &extra,
        "[[build.architectures]]\nout_dir = \"out/x64\"\nabi = \"x86_64\"\n",
    )
    .unwrap();

    let cfg = ConfigLoader::new(dir.path())
        .file(&extra)
        .env_source(Default::default())
        .load()
        .unwrap();
    assert_eq!(cfg.build.architectures.len(), 1);
    assert_eq!(cfg.build.architectures[0].abi, "x86_64");
}
