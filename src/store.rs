#![warn(clippy::all, clippy::pedantic)]

//! Key/value persistence for the best score.

use bevy_ecs::prelude::*;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const BEST_SCORE_KEY: &str = "best_score";

// Fallback file used when no data directory is available
const STORE_FILE_PATH: &str = "reaction_speed_scores.toml";

/// Minimal get/set capability the game needs from durable storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, mostly for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// TOML file holding a flat table of string values.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => read_values(toml::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened score store at {}", path.display());
        Ok(Self { path, values })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = toml::to_string_pretty(&self.values)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

// Hand-edited files may hold bare numbers; other value types are skipped
fn read_values(table: toml::Table) -> BTreeMap<String, String> {
    table
        .into_iter()
        .filter_map(|(key, value)| match value {
            toml::Value::String(text) => Some((key, text)),
            toml::Value::Integer(number) => Some((key, number.to_string())),
            other => {
                warn!("Ignoring non-scalar score entry {key} = {other}");
                None
            }
        })
        .collect()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Where the score file lives unless the config says otherwise.
#[must_use]
pub fn default_store_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("reaction_speed").join("scores.toml")
    } else {
        PathBuf::from(STORE_FILE_PATH)
    }
}

/// Best score loaded once at startup and written back on new records.
#[derive(Resource)]
pub struct BestScore {
    value: u32,
    store: Box<dyn KeyValueStore>,
}

impl BestScore {
    /// Reads the persisted value; anything absent or unparseable counts as zero.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let value = store
            .get(BEST_SCORE_KEY)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(0);
        Self { value, store }
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Records `score` if it beats the current best. Returns whether it did.
    ///
    /// Persisting is best effort: a failed write is logged and the in-memory
    /// value still updates.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        if let Err(e) = self.store.set(BEST_SCORE_KEY, &score.to_string()) {
            warn!("Failed to persist best score {score}: {e:?}");
        }
        true
    }

    #[must_use]
    pub fn stored_value(&self) -> Option<String> {
        self.store.get(BEST_SCORE_KEY)
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Parse(err)
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::Serialize(err)
    }
}
