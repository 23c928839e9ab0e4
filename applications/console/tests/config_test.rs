/// Configuration loading from TOML files
use sona_console::{ConsoleError, SonaConfig};
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("sona.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_file_values_override_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[catalog]
api_key = "file-key"
region = "JP"

[storage]
rank_root = "/var/lib/sona"

[playback]
idle_timeout_secs = 120
max_retries = 1

[playback.sampler]
max_duration_secs = 600

[console]
community = "living-room"
speed = 2.5
"#,
    );

    let config = SonaConfig::load(Some(&path)).unwrap();
    config.validate().unwrap();

    assert_eq!(config.catalog.api_key, "file-key");
    assert_eq!(config.youtube().region_code.as_deref(), Some("JP"));
    assert_eq!(config.storage.rank_root, PathBuf::from("/var/lib/sona"));
    assert_eq!(config.storage.rank_prefix, "song_rank");
    assert_eq!(config.playback.idle_timeout_secs, 120);
    assert_eq!(config.playback.max_retries, 1);
    assert_eq!(config.playback.history_size, 50);
    assert_eq!(config.playback.sampler.min_duration_secs, 60);
    assert_eq!(config.playback.sampler.max_duration_secs, 600);
    assert_eq!(config.console.community, "living-room");
    assert_eq!(config.console.user, "listener");
    assert!((config.console.speed - 2.5).abs() < f64::EPSILON);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = SonaConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConsoleError::Config(_))));
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[playback]\nmax_retries = \"many\"\n");
    assert!(matches!(
        SonaConfig::load(Some(&path)),
        Err(ConsoleError::Config(_))
    ));
}
