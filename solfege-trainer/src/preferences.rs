//! Key/value user preferences
//!
//! Two values are persisted across launches: the practice cursor and whether
//! onboarding tips were already seen. Reads are served from memory, so the
//! reducer may consult preferences without doing I/O.

use serde::{Deserialize, Serialize};
use solfege_common::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// File name used under the data folder
pub const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    /// Index of the last visited catalog level
    LatestPracticeCursor,
    /// Set once every onboarding tip has been dismissed
    HasSeenOnboarding,
}

impl PreferenceKey {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::LatestPracticeCursor => "practice.level.cursor",
            PreferenceKey::HasSeenOnboarding => "user.has.seen.onboarding",
        }
    }
}

/// Last-write-wins preference store
///
/// Setters may block on I/O; reads must not.
pub trait Preferences: Send + Sync {
    fn int(&self, key: PreferenceKey) -> Option<i64>;

    fn set_int(&self, key: PreferenceKey, value: i64) -> Result<()>;

    /// Missing values read as `false`
    fn bool(&self, key: PreferenceKey) -> bool;

    fn set_bool(&self, key: PreferenceKey, value: bool) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum PreferenceValue {
    Bool(bool),
    Int(i64),
}

type PreferenceMap = BTreeMap<String, PreferenceValue>;

fn read_int(values: &RwLock<PreferenceMap>, key: PreferenceKey) -> Option<i64> {
    let values = values.read().unwrap_or_else(PoisonError::into_inner);
    match values.get(key.as_str()) {
        Some(PreferenceValue::Int(value)) => Some(*value),
        _ => None,
    }
}

fn read_bool(values: &RwLock<PreferenceMap>, key: PreferenceKey) -> bool {
    let values = values.read().unwrap_or_else(PoisonError::into_inner);
    matches!(values.get(key.as_str()), Some(PreferenceValue::Bool(true)))
}

/// Preferences that live only as long as the process
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<PreferenceMap>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn int(&self, key: PreferenceKey) -> Option<i64> {
        read_int(&self.values, key)
    }

    fn set_int(&self, key: PreferenceKey, value: i64) -> Result<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.as_str().to_string(), PreferenceValue::Int(value));
        Ok(())
    }

    fn bool(&self, key: PreferenceKey) -> bool {
        read_bool(&self.values, key)
    }

    fn set_bool(&self, key: PreferenceKey, value: bool) -> Result<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.as_str().to_string(), PreferenceValue::Bool(value));
        Ok(())
    }
}

/// JSON-file preferences, cached in memory and written through on every set
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: RwLock<PreferenceMap>,
}

impl FilePreferences {
    /// Load `<data_dir>/preferences.json`
    ///
    /// A missing file starts empty. An unreadable or malformed file is logged
    /// and replaced on the next write.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let path = data_dir.as_ref().join(PREFERENCES_FILE);

        let values = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring malformed preferences file {}: {}", path.display(), e);
                PreferenceMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PreferenceMap::new(),
            Err(e) => {
                warn!("Could not read preferences file {}: {}", path.display(), e);
                PreferenceMap::new()
            }
        };

        debug!("Loaded {} preferences from {}", values.len(), path.display());

        Self {
            path,
            values: RwLock::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Update the cache and rewrite the whole file
    ///
    /// Blocks on file I/O while holding the cache lock. Async callers go
    /// through `spawn_blocking`.
    fn store(&self, key: PreferenceKey, value: PreferenceValue) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.as_str().to_string(), value);

        let json = serde_json::to_string_pretty(&*values)
            .map_err(|e| Error::Storage(format!("Failed to serialize preferences: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;

        Ok(())
    }
}

impl Preferences for FilePreferences {
    fn int(&self, key: PreferenceKey) -> Option<i64> {
        read_int(&self.values, key)
    }

    fn set_int(&self, key: PreferenceKey, value: i64) -> Result<()> {
        self.store(key, PreferenceValue::Int(value))
    }

    fn bool(&self, key: PreferenceKey) -> bool {
        read_bool(&self.values, key)
    }

    fn set_bool(&self, key: PreferenceKey, value: bool) -> Result<()> {
        self.store(key, PreferenceValue::Bool(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_defaults() {
        let preferences = MemoryPreferences::new();

        assert_eq!(preferences.int(PreferenceKey::LatestPracticeCursor), None);
        assert!(!preferences.bool(PreferenceKey::HasSeenOnboarding));
    }

    #[test]
    fn test_memory_last_write_wins() {
        let preferences = MemoryPreferences::new();

        preferences.set_int(PreferenceKey::LatestPracticeCursor, 4).unwrap();
        preferences.set_int(PreferenceKey::LatestPracticeCursor, 9).unwrap();
        preferences.set_bool(PreferenceKey::HasSeenOnboarding, true).unwrap();

        assert_eq!(preferences.int(PreferenceKey::LatestPracticeCursor), Some(9));
        assert!(preferences.bool(PreferenceKey::HasSeenOnboarding));
    }

    #[test]
    fn test_type_mismatch_reads_as_missing() {
        let preferences = MemoryPreferences::new();
        preferences.set_bool(PreferenceKey::LatestPracticeCursor, true).unwrap();

        assert_eq!(preferences.int(PreferenceKey::LatestPracticeCursor), None);
    }

    #[test]
    fn test_file_preferences_survive_reopen() {
        let dir = TempDir::new().unwrap();

        let preferences = FilePreferences::open(dir.path());
        preferences.set_int(PreferenceKey::LatestPracticeCursor, 17).unwrap();
        preferences.set_bool(PreferenceKey::HasSeenOnboarding, true).unwrap();

        let reopened = FilePreferences::open(dir.path());
        assert_eq!(reopened.int(PreferenceKey::LatestPracticeCursor), Some(17));
        assert!(reopened.bool(PreferenceKey::HasSeenOnboarding));

        let content = std::fs::read_to_string(reopened.path()).unwrap();
        assert!(content.contains("practice.level.cursor"));
        assert!(content.contains("user.has.seen.onboarding"));
    }

    #[test]
    fn test_file_preferences_ignore_malformed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(PREFERENCES_FILE), "{ not json").unwrap();

        let preferences = FilePreferences::open(dir.path());
        assert_eq!(preferences.int(PreferenceKey::LatestPracticeCursor), None);

        preferences.set_int(PreferenceKey::LatestPracticeCursor, 2).unwrap();
        assert_eq!(
            FilePreferences::open(dir.path()).int(PreferenceKey::LatestPracticeCursor),
            Some(2)
        );
    }
}
