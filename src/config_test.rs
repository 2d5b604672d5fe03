use std::io::Write;

use crate::test_utils;
use crate::CacheConfig;

/// # Case 1: defaults
#[test]
fn test_defaults_case1() {
    test_utils::enable_logger();

    let config = CacheConfig::default();
    assert!(config.snapshots_enabled);
    assert_eq!(0, config.initial_revision);

    let loaded = temp_env::with_vars_unset(
        vec!["WATCHCACHE_SNAPSHOTS_ENABLED", "WATCHCACHE_INITIAL_REVISION"],
        || CacheConfig::load(None).expect("should load"),
    );
    assert!(loaded.snapshots_enabled);
    assert_eq!(0, loaded.initial_revision);
}

/// # Case 2: config file overrides defaults
#[test]
fn test_file_overrides_case2() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("watchcache.toml");
    let mut file = std::fs::File::create(&path).expect("should create file");
    writeln!(file, "snapshots_enabled = false").expect("should write");
    writeln!(file, "initial_revision = 42").expect("should write");

    let loaded = temp_env::with_vars_unset(
        vec!["WATCHCACHE_SNAPSHOTS_ENABLED", "WATCHCACHE_INITIAL_REVISION"],
        || {
            CacheConfig::load(Some(path.to_str().expect("utf-8 path"))).expect("should load")
        },
    );
    assert!(!loaded.snapshots_enabled);
    assert_eq!(42, loaded.initial_revision);
}

/// # Case 3: environment variables win over the file
#[test]
fn test_env_overrides_case3() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("watchcache.toml");
    let mut file = std::fs::File::create(&path).expect("should create file");
    writeln!(file, "initial_revision = 42").expect("should write");

    let loaded = temp_env::with_var("WATCHCACHE_INITIAL_REVISION", Some("7"), || {
        CacheConfig::load(Some(path.to_str().expect("utf-8 path"))).expect("should load")
    });
    assert_eq!(7, loaded.initial_revision);
    assert!(loaded.snapshots_enabled);
}
