use crate::app_dirs::AppDirs;
use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Shortest display, pause or feedback window a config may request.
pub const MIN_DURATION_MS: u64 = 100;
/// Largest magnitude allowed for a generated number.
pub const MAX_ABS_NUMBER: i64 = 1_000_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    CountTooSmall(&'static str),
    #[error("{field} cannot be more than {max}")]
    CountTooLarge { field: &'static str, max: u32 },
    #[error("Maximum number must not be less than minimum number")]
    InvertedRange,
    #[error("Numbers must stay between -{0} and {0}")]
    NumberOutOfRange(i64),
    #[error("{field} must be at least {floor}ms")]
    DurationTooShort { field: &'static str, floor: u64 },
    #[error("Bar width must be between {min} and {max}")]
    BarWidth { min: u16, max: u16 },
    #[error("config storage error: {0}")]
    Io(#[from] io::Error),
    #[error("config encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One editable setting as presented by the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub unit: &'static str,
}

impl FieldSpec {
    pub const fn new(
        label: &'static str,
        min: i64,
        max: i64,
        step: i64,
        unit: &'static str,
    ) -> Self {
        Self {
            label,
            min,
            max,
            step,
            unit,
        }
    }
}

/// A per-game tunable parameter set that lives in one storage slot.
pub trait GameConfig:
    Serialize + DeserializeOwned + Default + Clone + PartialEq + fmt::Debug
{
    const STORAGE_KEY: &'static str;

    fn validate(&self) -> Result<(), ConfigError>;

    /// Fields in the order the settings screen lists them.
    fn fields() -> &'static [FieldSpec];

    fn field(&self, index: usize) -> i64;

    /// Writes a field value; callers keep it within the field's bounds.
    fn set_field(&mut self, index: usize, value: i64);
}

pub(crate) fn check_count(field: &'static str, value: u32, max: u32) -> Result<(), ConfigError> {
    if value < 1 {
        return Err(ConfigError::CountTooSmall(field));
    }
    if value > max {
        return Err(ConfigError::CountTooLarge { field, max });
    }
    Ok(())
}

pub(crate) fn check_range(min: i64, max: i64) -> Result<(), ConfigError> {
    let limit = MAX_ABS_NUMBER.unsigned_abs();
    if min.unsigned_abs() > limit || max.unsigned_abs() > limit {
        return Err(ConfigError::NumberOutOfRange(MAX_ABS_NUMBER));
    }
    if max < min {
        return Err(ConfigError::InvertedRange);
    }
    Ok(())
}

pub(crate) fn check_duration(field: &'static str, ms: u64) -> Result<(), ConfigError> {
    if ms < MIN_DURATION_MS {
        return Err(ConfigError::DurationTooShort {
            field,
            floor: MIN_DURATION_MS,
        });
    }
    Ok(())
}

/// Raw key-value slots backing the saved configurations.
pub trait ConfigStore {
    fn read_slot(&self, key: &str) -> io::Result<Option<Vec<u8>>>;
    fn write_slot(&self, key: &str, data: &[u8]) -> io::Result<()>;
    fn remove_slot(&self, key: &str) -> io::Result<()>;
}

/// Stores each slot as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    dir: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let dir = AppDirs::config_dir().unwrap_or_else(|| PathBuf::from(".numdrill"));
        Self { dir }
    }

    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn read_slot(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.slot_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_slot(&self, key: &str, data: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.slot_path(key), data)
    }

    fn remove_slot(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.slot_path(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// In-memory slots; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    slots: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, key: &str) -> Option<Vec<u8>> {
        self.slots.borrow().get(key).cloned()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read_slot(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.slot(key))
    }

    fn write_slot(&self, key: &str, data: &[u8]) -> io::Result<()> {
        self.slots.borrow_mut().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> io::Result<()> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

/// Reads a config from its slot, falling back to defaults when the slot is
/// missing, unreadable, malformed or fails validation.
pub fn load_config<C, S>(store: &S) -> C
where
    C: GameConfig,
    S: ConfigStore + ?Sized,
{
    let bytes = match store.read_slot(C::STORAGE_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return C::default(),
        Err(e) => {
            warn!("could not read {} config, using defaults: {e}", C::STORAGE_KEY);
            return C::default();
        }
    };

    match serde_json::from_slice::<C>(&bytes) {
        Ok(cfg) => match cfg.validate() {
            Ok(()) => cfg,
            Err(e) => {
                warn!("saved {} config is invalid ({e}), using defaults", C::STORAGE_KEY);
                C::default()
            }
        },
        Err(e) => {
            warn!("saved {} config is corrupt ({e}), using defaults", C::STORAGE_KEY);
            C::default()
        }
    }
}

/// Validates and persists a config. Invalid configs are never written.
pub fn save_config<C, S>(store: &S, cfg: &C) -> Result<(), ConfigError>
where
    C: GameConfig,
    S: ConfigStore + ?Sized,
{
    cfg.validate()?;
    let data = serde_json::to_vec_pretty(cfg)?;
    store.write_slot(C::STORAGE_KEY, &data)?;
    Ok(())
}

pub fn reset_config<C, S>(store: &S) -> Result<(), ConfigError>
where
    C: GameConfig,
    S: ConfigStore + ?Sized,
{
    store.remove_slot(C::STORAGE_KEY)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::PositionConfig;
    use crate::sum::SumConfig;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn missing_slot_loads_defaults() {
        let store = MemoryConfigStore::new();
        let cfg: SumConfig = load_config(&store);
        assert_eq!(cfg, SumConfig::default());
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_dir(dir.path());
        let cfg = SumConfig {
            number_count: 7,
            min_number: 3,
            max_number: 40,
            display_duration_ms: 900,
            pause_duration_ms: 300,
        };
        save_config(&store, &cfg).unwrap();
        assert!(store.slot_path(SumConfig::STORAGE_KEY).exists());

        let loaded: SumConfig = load_config(&store);
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn corrupt_slot_falls_back_to_defaults() {
        let store = MemoryConfigStore::new();
        store
            .write_slot(PositionConfig::STORAGE_KEY, b"{ not json")
            .unwrap();
        let cfg: PositionConfig = load_config(&store);
        assert_eq!(cfg, PositionConfig::default());
    }

    #[test]
    fn invalid_saved_values_fall_back_to_defaults() {
        let store = MemoryConfigStore::new();
        store
            .write_slot(
                SumConfig::STORAGE_KEY,
                br#"{"numberCount":0,"minNumber":1,"maxNumber":10,"displayDuration":1500,"pauseDuration":500}"#,
            )
            .unwrap();
        let cfg: SumConfig = load_config(&store);
        assert_eq!(cfg, SumConfig::default());
    }

    #[test]
    fn save_rejects_invalid_config_without_writing() {
        let store = MemoryConfigStore::new();
        let cfg = SumConfig {
            min_number: 10,
            max_number: 2,
            ..SumConfig::default()
        };
        assert_matches!(save_config(&store, &cfg), Err(ConfigError::InvertedRange));
        assert_eq!(store.slot(SumConfig::STORAGE_KEY), None);
    }

    #[test]
    fn reset_removes_slot() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_dir(dir.path());
        save_config(&store, &PositionConfig::default()).unwrap();
        reset_config::<PositionConfig, _>(&store).unwrap();
        assert!(!store.slot_path(PositionConfig::STORAGE_KEY).exists());
        // removing an absent slot is not an error
        reset_config::<PositionConfig, _>(&store).unwrap();
    }

    #[test]
    fn slots_are_independent_per_game() {
        let store = MemoryConfigStore::new();
        let sum = SumConfig {
            number_count: 9,
            ..SumConfig::default()
        };
        save_config(&store, &sum).unwrap();
        let position: PositionConfig = load_config(&store);
        assert_eq!(position, PositionConfig::default());
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            ConfigError::CountTooSmall("Number count").to_string(),
            "Number count must be at least 1"
        );
        assert_eq!(
            ConfigError::DurationTooShort {
                field: "Display duration",
                floor: 100
            }
            .to_string(),
            "Display duration must be at least 100ms"
        );
    }
}
