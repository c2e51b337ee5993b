// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Filesystem config store round-trips.
#![allow(clippy::expect_used)]

use probe_align::{RegistrationConfig, CONFIG_KEY};
use probe_config::{ConfigError, ConfigService, ConfigStore, FsConfigStore};

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FsConfigStore::at(dir.path()).expect("store");
    assert!(matches!(store.load_raw("nope"), Err(ConfigError::NotFound)));
}

#[test]
fn registration_round_trips_through_json_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let svc = ConfigService::new(FsConfigStore::at(dir.path()).expect("store"));
    let cfg = RegistrationConfig::default()
        .with_min_shared_points(4)
        .with_revalidate_all(false);
    svc.save_registration(&cfg).expect("save");

    let path = dir.path().join(format!("{CONFIG_KEY}.json"));
    assert_eq!(svc.store().path_for(CONFIG_KEY), path);
    let text = std::fs::read_to_string(&path).expect("read");
    assert!(text.contains("\"min_shared_points\": 4"));
    assert!(text.contains("\"revalidate_all\": false"));

    let reopened = ConfigService::new(FsConfigStore::at(dir.path()).expect("store"));
    assert_eq!(reopened.load_registration().expect("load"), cfg);
}

#[test]
fn nested_directory_is_created() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("a").join("b");
    let store = FsConfigStore::at(&nested).expect("store");
    assert!(nested.is_dir());
    assert_eq!(store.base(), nested.as_path());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("registration.json"), "{ not json").expect("write");
    let svc = ConfigService::new(FsConfigStore::at(dir.path()).expect("store"));
    assert!(matches!(svc.load_registration(), Err(ConfigError::Serde(_))));
}
