/// Site configuration
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serenade_playback::{DriverConfig, FadeTimings, PlaybackConfig, Playlist, Track};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "serenade.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default = "default_playlist")]
    pub playlist: Vec<Track>,

    #[serde(default = "default_player")]
    pub player: PlayerSettings,

    #[serde(default = "default_content")]
    pub content: ContentSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    /// Volume used until the visitor moves the slider (0-100)
    #[serde(default = "default_volume")]
    pub default_volume: u8,

    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    #[serde(default = "default_fades")]
    pub fades: FadeSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FadeSettings {
    #[serde(default = "default_play_ms")]
    pub play_ms: u64,

    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    #[serde(default = "default_pause_stop_ms")]
    pub pause_stop_ms: u64,

    #[serde(default = "default_crossfade_ms")]
    pub crossfade_ms: u64,

    #[serde(default = "default_volume_ms")]
    pub volume_ms: u64,

    #[serde(default = "default_autoplay_ms")]
    pub autoplay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentSettings {
    #[serde(default = "default_photos_path")]
    pub photos_path: PathBuf,

    #[serde(default = "default_messages_path")]
    pub messages_path: PathBuf,

    #[serde(default = "default_preferences_path")]
    pub preferences_path: PathBuf,
}

impl SiteConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit path must exist; otherwise `serenade.toml` is used when
    /// present. Environment variables prefixed `SERENADE_` override both,
    /// with `__` between nested keys (`SERENADE_PLAYER__DEFAULT_VOLUME=40`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("SERENADE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(AppError::Config(
                "playlist must contain at least one track".to_string(),
            ));
        }

        if self.player.default_volume > 100 {
            return Err(AppError::Config(format!(
                "default_volume must be 0-100, got {}",
                self.player.default_volume
            )));
        }

        if self.player.frame_interval_ms == 0 {
            return Err(AppError::Config(
                "frame_interval_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn playlist(&self) -> Result<Playlist> {
        Ok(Playlist::new(self.playlist.clone())?)
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        let fades = &self.player.fades;
        PlaybackConfig {
            default_volume: self.player.default_volume,
            timings: FadeTimings {
                play: Duration::from_millis(fades.play_ms),
                pause: Duration::from_millis(fades.pause_ms),
                pause_stop: Duration::from_millis(fades.pause_stop_ms),
                crossfade: Duration::from_millis(fades.crossfade_ms),
                volume: Duration::from_millis(fades.volume_ms),
                autoplay: Duration::from_millis(fades.autoplay_ms),
            },
        }
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            frame_interval: Duration::from_millis(self.player.frame_interval_ms),
        }
    }
}

// Default values
fn default_playlist() -> Vec<Track> {
    Playlist::default().tracks().to_vec()
}

fn default_player() -> PlayerSettings {
    PlayerSettings {
        default_volume: default_volume(),
        frame_interval_ms: default_frame_interval_ms(),
        fades: default_fades(),
    }
}

fn default_volume() -> u8 {
    PlaybackConfig::default().default_volume
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_fades() -> FadeSettings {
    FadeSettings {
        play_ms: default_play_ms(),
        pause_ms: default_pause_ms(),
        pause_stop_ms: default_pause_stop_ms(),
        crossfade_ms: default_crossfade_ms(),
        volume_ms: default_volume_ms(),
        autoplay_ms: default_autoplay_ms(),
    }
}

fn default_play_ms() -> u64 {
    700
}

fn default_pause_ms() -> u64 {
    600
}

fn default_pause_stop_ms() -> u64 {
    610
}

fn default_crossfade_ms() -> u64 {
    1300
}

fn default_volume_ms() -> u64 {
    400
}

fn default_autoplay_ms() -> u64 {
    1600
}

fn default_content() -> ContentSettings {
    ContentSettings {
        photos_path: default_photos_path(),
        messages_path: default_messages_path(),
        preferences_path: default_preferences_path(),
    }
}

fn default_photos_path() -> PathBuf {
    PathBuf::from("photos.json")
}

fn default_messages_path() -> PathBuf {
    PathBuf::from("messages.json")
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("./data/preferences.json")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            playlist: default_playlist(),
            player: default_player(),
            content: default_content(),
        }
    }
}
