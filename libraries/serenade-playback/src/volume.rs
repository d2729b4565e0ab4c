//! Volume preference
//!
//! The slider works in whole percent (0-100) and maps linearly to output
//! gain. The chosen level is persisted as a string under [`VOLUME_PREFERENCE_KEY`].

use crate::error::{PlaybackError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key the volume level is stored under
pub const VOLUME_PREFERENCE_KEY: &str = "bgVolume";

/// User-selected volume level (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VolumeLevel(u8);

impl VolumeLevel {
    /// Create a level, clamping to 100
    pub fn new(level: u8) -> Self {
        Self(level.min(100))
    }

    /// Parse a persisted value ("0".."100")
    ///
    /// Out-of-range integers are clamped; anything non-numeric is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        let parsed: i64 = value.trim().parse().ok()?;
        Some(Self(parsed.clamp(0, 100) as u8))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Linear gain multiplier (0.0 to 1.0)
    pub fn gain(&self) -> f32 {
        f32::from(self.0) / 100.0
    }

    /// String form written to the preference store
    pub fn encode(&self) -> String {
        self.0.to_string()
    }
}

impl Default for VolumeLevel {
    fn default() -> Self {
        Self::new(60)
    }
}

/// Key/value storage for user preferences
///
/// Stands in for the browser's local storage.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory preference store
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one value already set
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preference store backed by a JSON object file
///
/// The whole file is rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFilePreferenceStore {
    /// Open (or lazily create) the store at `path`
    ///
    /// A missing file is an empty store. A corrupt file is logged and
    /// treated as empty; it is replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Ignoring unreadable preference file {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, contents)?;
        debug!("Wrote preferences to {:?}", self.path);
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    /// Writes synchronously on the caller's thread; the file is a few bytes.
    /// Setting the value already stored skips the write, so repeated slider
    /// events at one level do not touch the disk.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
            .map_err(|e| PlaybackError::Preference(format!("{}: {}", self.path.display(), e)))
    }
}

/// Read the stored volume level, falling back to `default`
pub fn load_volume(store: &dyn PreferenceStore, default: VolumeLevel) -> VolumeLevel {
    match store.get(VOLUME_PREFERENCE_KEY) {
        Ok(Some(value)) => VolumeLevel::parse(&value).unwrap_or_else(|| {
            warn!("Stored volume {:?} is not a number, using {}", value, default.level());
            default
        }),
        Ok(None) => default,
        Err(e) => {
            warn!("Failed to read volume preference: {}", e);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = VolumeLevel::new(80);
        assert_eq!(vol.level(), 80);
        assert!((vol.gain() - 0.8).abs() < 0.001);

        // Clamp to 100
        assert_eq!(VolumeLevel::new(150).level(), 100);
    }

    #[test]
    fn parse_persisted_values() {
        assert_eq!(VolumeLevel::parse("45"), Some(VolumeLevel::new(45)));
        assert_eq!(VolumeLevel::parse(" 7 "), Some(VolumeLevel::new(7)));
        assert_eq!(VolumeLevel::parse("250"), Some(VolumeLevel::new(100)));
        assert_eq!(VolumeLevel::parse("-3"), Some(VolumeLevel::new(0)));
        assert_eq!(VolumeLevel::parse("loud"), None);
        assert_eq!(VolumeLevel::parse(""), None);
    }

    #[test]
    fn encode_is_plain_integer() {
        assert_eq!(VolumeLevel::new(0).encode(), "0");
        assert_eq!(VolumeLevel::new(100).encode(), "100");
    }

    #[test]
    fn load_volume_falls_back_to_default() {
        let default = VolumeLevel::new(60);

        let empty = MemoryPreferenceStore::new();
        assert_eq!(load_volume(&empty, default), default);

        let garbage = MemoryPreferenceStore::with_value(VOLUME_PREFERENCE_KEY, "abc");
        assert_eq!(load_volume(&garbage, default), default);

        let stored = MemoryPreferenceStore::with_value(VOLUME_PREFERENCE_KEY, "25");
        assert_eq!(load_volume(&stored, default), VolumeLevel::new(25));
    }

    #[test]
    fn json_file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("preferences.json");

        let mut store = JsonFilePreferenceStore::open(&path).unwrap();
        assert_eq!(store.get(VOLUME_PREFERENCE_KEY).unwrap(), None);
        store.set(VOLUME_PREFERENCE_KEY, "33").unwrap();

        let reopened = JsonFilePreferenceStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(VOLUME_PREFERENCE_KEY).unwrap().as_deref(),
            Some("33")
        );
    }

    #[test]
    fn json_file_store_skips_unchanged_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let mut store = JsonFilePreferenceStore::open(&path).unwrap();
        store.set(VOLUME_PREFERENCE_KEY, "40").unwrap();
        std::fs::remove_file(&path).unwrap();

        store.set(VOLUME_PREFERENCE_KEY, "40").unwrap();
        assert!(!path.exists());

        store.set(VOLUME_PREFERENCE_KEY, "41").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn json_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFilePreferenceStore::open(&path).unwrap();
        assert_eq!(store.get(VOLUME_PREFERENCE_KEY).unwrap(), None);
    }
}
