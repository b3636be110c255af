/*
 * Integration tests for devicefp
 *
 * These tests verify options loading from the user config file and the
 * environment, and the application-level entry points.
 */

use devicefp::config::{
    config_path, load_options, load_options_from, ENV_CACHE, ENV_COMPONENTS, ENV_DEBUG,
    ENV_TIMEOUT_MS,
};
use devicefp::{
    DeviceFingerprint, FingerprintError, Platform, PlatformSnapshot, SignalCategory,
};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

const OVERRIDE_VARS: [&str; 4] = [ENV_DEBUG, ENV_CACHE, ENV_TIMEOUT_MS, ENV_COMPONENTS];

/// Point XDG_CONFIG_HOME at a temp dir and clear every override
fn isolated_config() -> TempDir {
    let dir = TempDir::new().unwrap();
    env::set_var("XDG_CONFIG_HOME", dir.path());
    for var in OVERRIDE_VARS {
        env::remove_var(var);
    }
    dir
}

fn write_user_config(dir: &TempDir, content: &str) {
    let path = dir.path().join("devicefp").join("config.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
#[serial]
fn test_config_path_follows_xdg() {
    let dir = isolated_config();
    assert_eq!(config_path(), dir.path().join("devicefp").join("config.json"));
}

#[test]
#[serial]
fn test_missing_config_gives_defaults() {
    let _dir = isolated_config();
    let options = load_options().unwrap();
    assert!(options.cache);
    assert!(!options.debug);
    assert_eq!(options.timeout, 5000);
    assert_eq!(options.components, None);
}

#[test]
#[serial]
fn test_config_file_then_env_overrides() {
    let dir = isolated_config();
    write_user_config(&dir, r#"{"timeout": 800, "components": ["basic", "screen"], "debug": true}"#);

    let options = load_options().unwrap();
    assert_eq!(options.timeout, 800);
    assert!(options.debug);
    assert_eq!(
        options.components,
        Some(vec![SignalCategory::Basic, SignalCategory::Screen])
    );

    env::set_var(ENV_TIMEOUT_MS, "1500");
    env::set_var(ENV_COMPONENTS, "device");
    env::set_var(ENV_DEBUG, "false");
    let options = load_options().unwrap();
    assert_eq!(options.timeout, 1500);
    assert!(!options.debug);
    assert_eq!(options.components, Some(vec![SignalCategory::Device]));

    for var in OVERRIDE_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_zero_timeout_override_rejected() {
    let _dir = isolated_config();
    env::set_var(ENV_TIMEOUT_MS, "0");
    let err = load_options().unwrap_err();
    env::remove_var(ENV_TIMEOUT_MS);
    assert!(matches!(err, FingerprintError::InvalidConfig { .. }));
}

#[test]
#[serial]
fn test_malformed_config_is_an_error() {
    let dir = isolated_config();
    write_user_config(&dir, "{ not json");
    assert!(matches!(load_options(), Err(FingerprintError::JsonParse(_))));
}

#[test]
fn test_load_options_from_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("options.json");
    fs::write(&path, r#"{"cache": false}"#).unwrap();

    let options = load_options_from(&path).unwrap();
    assert!(!options.cache);
    assert_eq!(options.timeout, 5000);

    let missing = dir.path().join("absent.json");
    assert!(matches!(
        load_options_from(&missing),
        Err(FingerprintError::FileRead { .. })
    ));
}

#[tokio::test]
async fn test_snapshot_file_through_options_file() {
    let dir = TempDir::new().unwrap();
    let options_path = dir.path().join("options.json");
    fs::write(&options_path, r#"{"components": ["screen", "device"]}"#).unwrap();
    let snapshot_path = dir.path().join("snapshot.json");
    fs::write(
        &snapshot_path,
        r#"{"userAgent": "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0) Mobile/15E148",
            "screenWidth": 390, "screenHeight": 844, "colorDepth": 32}"#,
    )
    .unwrap();

    let options = load_options_from(&options_path).unwrap();
    let platform = Platform::snapshot(PlatformSnapshot::load(&snapshot_path).unwrap());
    let fp = DeviceFingerprint::with_platform(options, platform).unwrap();
    let digest = fp.generate().await.unwrap();
    assert_eq!(fp.cached(), Some(digest));

    let components = fp.get_components();
    assert_eq!(
        components.categories(),
        vec![SignalCategory::Screen, SignalCategory::Device]
    );
    assert_eq!(components.screen().unwrap().resolution, "390x844");
    assert_eq!(components.screen().unwrap().orientation, "unknown");
    assert_eq!(components.device().unwrap().device_type.as_str(), "mobile");
}

#[test]
#[serial]
fn test_shared_instance_is_reused() {
    let _dir = isolated_config();
    let a = devicefp::shared().unwrap();
    let b = devicefp::shared().unwrap();
    assert!(std::ptr::eq(a, b));
    assert!(a.options().timeout > 0);
}
