/// Player configuration
use crate::error::{CliError, Result};
use explayer_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "explayer.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub volume: u8,

    #[serde(default = "default_position_save_interval_secs")]
    pub position_save_interval_secs: u64,

    #[serde(default = "default_restore_playback")]
    pub restore_playback: bool,
}

impl PlayerSettings {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `explayer.toml` in the working
    /// directory is used if present. Environment variables prefixed with
    /// `EXPLAYER_` override file values, with `__` between nested keys
    /// (`EXPLAYER_PLAYBACK__VOLUME=40`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("EXPLAYER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.volume > 100 {
            return Err(CliError::Config(format!(
                "playback.volume must be 0-100, got {}",
                self.playback.volume
            )));
        }

        if self.storage.database_url.is_empty() {
            return Err(CliError::Config(
                "storage.database_url is required".to_string(),
            ));
        }

        Ok(())
    }

    /// Playback settings as the player takes them
    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            volume: self.playback.volume,
            position_save_interval: Duration::from_secs(self.playback.position_save_interval_secs),
            restore_playback: self.playback.restore_playback,
        }
    }
}

impl StorageSettings {
    /// Filesystem path of the database, if the URL names one
    pub fn database_path(&self) -> Option<PathBuf> {
        let path = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        let path = path.split('?').next().unwrap_or(path);

        if path.is_empty() || path == ":memory:" {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}

// Default values
fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("explayer")
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        session_file: default_session_file(),
    }
}

fn default_database_url() -> String {
    format!("sqlite://{}", data_dir().join("explayer.db").display())
}

fn default_session_file() -> PathBuf {
    data_dir().join("session.json")
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        volume: default_volume(),
        position_save_interval_secs: default_position_save_interval_secs(),
        restore_playback: default_restore_playback(),
    }
}

fn default_volume() -> u8 {
    100
}

fn default_position_save_interval_secs() -> u64 {
    5
}

fn default_restore_playback() -> bool {
    true
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            playback: default_playback(),
        }
    }
}
