//! Loading settings from a config file

use explayer_cli::PlayerSettings;
use std::time::Duration;

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("explayer.toml");
    std::fs::write(
        &path,
        r#"
[storage]
database_url = "sqlite:///var/lib/explayer/tracks.db"

[playback]
volume = 35
restore_playback = false
"#,
    )
    .unwrap();

    let settings = PlayerSettings::load(Some(&path)).unwrap();
    settings.validate().unwrap();

    assert_eq!(settings.storage.database_url, "sqlite:///var/lib/explayer/tracks.db");
    assert!(settings.storage.session_file.ends_with("session.json"));
    assert_eq!(settings.playback.volume, 35);
    assert_eq!(settings.playback.position_save_interval_secs, 5);

    let config = settings.player_config();
    assert_eq!(config.volume, 35);
    assert_eq!(config.position_save_interval, Duration::from_secs(5));
    assert!(!config.restore_playback);
}

#[test]
fn out_of_range_volume_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loud.toml");
    std::fs::write(&path, "[playback]\nvolume = 200\n").unwrap();

    let settings = PlayerSettings::load(Some(&path)).unwrap();
    assert!(settings.validate().is_err());
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(PlayerSettings::load(Some(&dir.path().join("absent.toml"))).is_err());
}
