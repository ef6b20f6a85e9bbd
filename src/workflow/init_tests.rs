use super::init_data_dir;
use crate::config::{load_config, DataDirPaths};
use crate::service::JsonFileService;

#[test]
fn init_writes_config_and_seeded_store() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let paths = DataDirPaths::new(dir.path().join("data"));
    init_data_dir(&paths, false).expect("init");

    let config = load_config(&paths).expect("load config");
    assert_eq!(config.steps.len(), 5);
    let data = JsonFileService::new(paths.store_path())
        .load()
        .expect("load store");
    assert_eq!(data.users.len(), 3);
    assert!(data.processes.is_empty());
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let paths = DataDirPaths::new(dir.path().to_path_buf());
    init_data_dir(&paths, false).expect("first init");
    let err = init_data_dir(&paths, false).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    init_data_dir(&paths, true).expect("forced init");
}
