//! File-backed save slots.
//!
//! Each slot is one pretty-printed JSON file holding a small envelope around
//! the snapshot. Writes go through a temporary file and a rename so a reader
//! never sees a half-written save.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::GameStorage;
use crate::calendar::DateRecord;
use crate::constants::{
    AUTOSAVE_FILE, DEFAULT_MANUAL_SLOTS, DEFAULT_SAVE_DIR, GAME_VERSION, SAVE_VERSION,
};
use crate::error::EngineError;
use crate::locations::format_location_name;
use crate::snapshot;
use crate::state::GameState;

/// Where a save lives: the rolling autosave or a numbered manual slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveSlot {
    Autosave,
    Manual(u8),
}

impl SaveSlot {
    /// Manual slot `number` if it lies within `1..=manual_slots`.
    #[must_use]
    pub fn manual(number: i64, manual_slots: u8) -> Option<Self> {
        match u8::try_from(number) {
            Ok(slot) if (1..=manual_slots).contains(&slot) => Some(Self::Manual(slot)),
            _ => {
                log::error!("invalid save slot {number}; expected autosave or 1..={manual_slots}");
                None
            }
        }
    }

    /// Parse `"autosave"` or a manual slot number.
    #[must_use]
    pub fn parse(raw: &str, manual_slots: u8) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("autosave") {
            return Some(Self::Autosave);
        }
        if let Ok(number) = raw.parse::<i64>() {
            Self::manual(number, manual_slots)
        } else {
            log::error!("invalid save slot `{raw}`; expected autosave or 1..={manual_slots}");
            None
        }
    }

    #[must_use]
    pub fn file_name(self) -> String {
        match self {
            Self::Autosave => AUTOSAVE_FILE.to_string(),
            Self::Manual(slot) => format!("save_slot_{slot}.json"),
        }
    }
}

impl fmt::Display for SaveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Autosave => f.write_str("autosave"),
            Self::Manual(slot) => write!(f, "slot {slot}"),
        }
    }
}

/// Save directory and slot count for [`FileStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub save_dir: PathBuf,
    pub manual_slots: u8,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            manual_slots: DEFAULT_MANUAL_SLOTS,
        }
    }
}

impl StorageConfig {
    #[must_use]
    pub fn with_save_dir(mut self, save_dir: impl Into<PathBuf>) -> Self {
        self.save_dir = save_dir.into();
        self
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("save slot {slot} is outside 1..={max}")]
    SlotOutOfRange { slot: u8, max: u8 },
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a valid save file: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} holds an unusable snapshot: {source}", .path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: EngineError,
    },
}

/// On-disk wrapper around a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SaveEnvelope {
    #[serde(default)]
    game_version: String,
    #[serde(default)]
    save_version: String,
    #[serde(default)]
    timestamp: String,
    game_state: Value,
}

/// Summary of a save read without restoring the full state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveMetadata {
    pub slot: SaveSlot,
    pub timestamp: String,
    /// In-game date as `month/day/year`.
    pub date: String,
    pub location: String,
    pub days_played: u32,
    pub treasury: i64,
}

#[derive(Debug, Deserialize)]
struct MetadataProbe {
    date: DateRecord,
    location: String,
    #[serde(default)]
    days_played: u32,
    #[serde(default)]
    treasury: i64,
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    config: StorageConfig,
}

impl FileStorage {
    #[must_use]
    pub const fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Slots this storage accepts, autosave first.
    #[must_use]
    pub fn slots(&self) -> Vec<SaveSlot> {
        std::iter::once(SaveSlot::Autosave)
            .chain((1..=self.config.manual_slots).map(SaveSlot::Manual))
            .collect()
    }

    /// Path of the file backing `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::SlotOutOfRange`] for a manual slot this storage
    /// was not configured with.
    pub fn path_for(&self, slot: SaveSlot) -> Result<PathBuf, StorageError> {
        if let SaveSlot::Manual(number) = slot
            && !(1..=self.config.manual_slots).contains(&number)
        {
            log::error!("invalid save slot {number}");
            return Err(StorageError::SlotOutOfRange {
                slot: number,
                max: self.config.manual_slots,
            });
        }
        Ok(self.config.save_dir.join(slot.file_name()))
    }

    #[must_use]
    pub fn save_exists(&self, slot: SaveSlot) -> bool {
        self.path_for(slot).is_ok_and(|path| path.exists())
    }

    /// Metadata for every occupied slot, autosave first. Unreadable files are
    /// logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when the save directory cannot be created.
    pub fn list_saves(&self) -> Result<Vec<SaveMetadata>, StorageError> {
        self.ensure_save_dir()?;
        Ok(self
            .slots()
            .into_iter()
            .filter_map(|slot| self.read_metadata(slot))
            .collect())
    }

    fn read_metadata(&self, slot: SaveSlot) -> Option<SaveMetadata> {
        let path = self.path_for(slot).ok()?;
        if !path.exists() {
            return None;
        }
        let envelope = match read_envelope(&path) {
            Ok(envelope) => envelope,
            Err(err) => {
                log::error!("failed to read metadata from {}: {err}", path.display());
                return None;
            }
        };
        let probe: MetadataProbe = match serde_json::from_value(envelope.game_state) {
            Ok(probe) => probe,
            Err(err) => {
                log::error!("failed to read metadata from {}: {err}", path.display());
                return None;
            }
        };
        Some(SaveMetadata {
            slot,
            timestamp: if envelope.timestamp.is_empty() {
                "Unknown".to_string()
            } else {
                envelope.timestamp
            },
            date: format!(
                "{}/{}/{}",
                probe.date.month, probe.date.day, probe.date.year
            ),
            location: format_location_name(&probe.location),
            days_played: probe.days_played,
            treasury: probe.treasury,
        })
    }

    fn ensure_save_dir(&self) -> Result<(), StorageError> {
        let dir = &self.config.save_dir;
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.clone(),
                source,
            })?;
            log::info!("created save directory {}", dir.display());
        }
        Ok(())
    }
}

impl GameStorage for FileStorage {
    type Error = StorageError;

    fn save_game(&self, slot: SaveSlot, game_state: &GameState) -> Result<(), Self::Error> {
        let path = self.path_for(slot)?;
        self.ensure_save_dir()?;

        let envelope = SaveEnvelope {
            game_version: GAME_VERSION.to_string(),
            save_version: SAVE_VERSION.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            game_state: snapshot::encode(game_state),
        };
        let payload = serde_json::to_vec_pretty(&envelope).map_err(|source| StorageError::Json {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, &payload)?;

        log::info!("game saved to {slot} ({})", path.display());
        Ok(())
    }

    fn load_game(&self, slot: SaveSlot) -> Result<Option<GameState>, Self::Error> {
        let path = self.path_for(slot)?;
        if !path.exists() {
            log::warn!("save file not found: {}", path.display());
            return Ok(None);
        }

        let envelope = read_envelope(&path)?;
        if envelope.save_version != SAVE_VERSION {
            log::warn!(
                "save file version mismatch: {} vs {SAVE_VERSION}; attempting to load anyway",
                if envelope.save_version.is_empty() {
                    "unknown"
                } else {
                    envelope.save_version.as_str()
                }
            );
        }

        let state = snapshot::decode(&envelope.game_state)
            .map_err(|source| StorageError::Snapshot { path, source })?;
        log::info!("game loaded from {slot}");
        Ok(Some(state))
    }

    fn delete_save(&self, slot: SaveSlot) -> Result<bool, Self::Error> {
        let path = self.path_for(slot)?;
        if !path.exists() {
            log::warn!("save file not found: {}", path.display());
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("deleted save file {}", path.display());
        Ok(true)
    }
}

fn read_envelope(path: &Path) -> Result<SaveEnvelope, StorageError> {
    let text = fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_atomic(path: &Path, payload: &[u8]) -> Result<(), StorageError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, payload).map_err(|source| StorageError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}
