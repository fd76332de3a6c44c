//! Save manager for inventory save files
//!
//! Manual and quick saves overwrite `slot_N.json`. Autosaves get a
//! timestamped name per slot and are pruned with `cleanup_autosaves`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, info, warn};

use super::saveable::Saveable;
use super::types::*;
use crate::inventory::PlayerInventory;
use crate::item::ItemCatalog;

/// Highest save slot; slots run from 1
pub const MAX_SAVE_SLOT: u8 = 5;

pub struct SaveManager {
    save_directory: PathBuf,
    current_save_slot: u8,
    autosave_interval: Duration,
    last_autosave: Option<SystemTime>,
}

impl SaveManager {
    /// Creates a new SaveManager, creating the directory if it doesn't exist
    pub fn new(save_directory: impl AsRef<Path>) -> Result<Self, SaveError> {
        let save_dir = save_directory.as_ref().to_path_buf();
        fs::create_dir_all(&save_dir)?;

        Ok(SaveManager {
            save_directory: save_dir,
            current_save_slot: 1,
            autosave_interval: Duration::from_secs(300),
            last_autosave: None,
        })
    }

    /// `<data dir>/satchel/saves`, or `./saves` without a data directory
    pub fn default_directory() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("satchel").join("saves"))
            .unwrap_or_else(|| PathBuf::from("./saves"))
    }

    pub fn directory(&self) -> &Path {
        &self.save_directory
    }

    /// Sets the current save slot (1-5)
    pub fn set_save_slot(&mut self, slot: u8) {
        self.current_save_slot = slot.clamp(1, MAX_SAVE_SLOT);
    }

    pub fn save_slot(&self) -> u8 {
        self.current_save_slot
    }

    pub fn set_autosave_interval(&mut self, interval: Duration) {
        self.autosave_interval = interval;
    }

    /// Writes a save file and returns where it went
    ///
    /// The slot in the metadata is clamped to 1-5 when naming the file.
    pub fn save(&mut self, save_file: &SaveFile) -> Result<PathBuf, SaveError> {
        let slot = save_file.metadata.save_slot.clamp(1, MAX_SAVE_SLOT);
        let filename = generate_filename(save_file.metadata.save_type, slot);
        let filepath = self.save_directory.join(&filename);

        let json = serde_json::to_string_pretty(save_file)?;
        fs::write(&filepath, json)?;

        if save_file.metadata.save_type == SaveType::Auto {
            self.last_autosave = Some(SystemTime::now());
        }

        info!("Inventory saved to {}", filepath.display());
        Ok(filepath)
    }

    /// Snapshots the inventory into the current slot
    pub fn save_inventory(
        &mut self,
        inventory: &PlayerInventory,
        save_type: SaveType,
        player_name: Option<String>,
    ) -> Result<PathBuf, SaveError> {
        let metadata = SaveMetadata {
            player_name,
            save_type,
            save_slot: self.current_save_slot,
        };
        self.save(&SaveFile::new(metadata, inventory.to_snapshot()))
    }

    /// Loads the manual save of a slot
    pub fn load(&self, slot: u8) -> Result<SaveFile, SaveError> {
        self.load_by_filename(&slot_filename(slot))
    }

    pub fn load_by_filename(&self, filename: &str) -> Result<SaveFile, SaveError> {
        let filepath = self.save_directory.join(filename);

        if !filepath.exists() {
            return Err(SaveError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Save file not found: {}", filename),
            )));
        }

        let json = fs::read_to_string(&filepath)?;
        let save_file: SaveFile = serde_json::from_str(&json)?;

        if save_file.version > CURRENT_SAVE_VERSION {
            return Err(SaveError::InvalidVersion(save_file.version));
        }

        debug!("Loaded save {} (version {})", filename, save_file.version);
        Ok(save_file)
    }

    /// Loads a slot and rebuilds its inventory against the catalog
    pub fn load_inventory(&self, slot: u8, catalog: &ItemCatalog) -> Result<PlayerInventory, SaveError> {
        let save_file = self.load(slot)?;
        PlayerInventory::from_snapshot(&save_file.inventory, catalog)
    }

    /// True when no autosave happened yet or the interval has passed
    pub fn should_autosave(&self) -> bool {
        match self.last_autosave {
            Some(last) => SystemTime::now()
                .duration_since(last)
                .map(|elapsed| elapsed >= self.autosave_interval)
                .unwrap_or(false),
            None => true,
        }
    }

    /// Every readable save in the directory, newest first
    pub fn list_saves(&self) -> Result<Vec<SaveFileInfo>, SaveError> {
        let mut saves = Vec::new();

        for entry in fs::read_dir(&self.save_directory)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };

            match self.load_by_filename(filename) {
                Ok(save_file) => saves.push(SaveFileInfo {
                    filename: filename.to_string(),
                    timestamp: save_file.timestamp,
                    metadata: save_file.metadata,
                }),
                Err(e) => warn!("Skipping unreadable save {}: {}", filename, e),
            }
        }

        saves.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(saves)
    }

    /// Deletes old autosaves, keeping the `keep_count` newest per slot
    ///
    /// Returns how many files were removed.
    pub fn cleanup_autosaves(&self, keep_count: usize) -> Result<usize, SaveError> {
        let mut removed = 0;

        for slot in 1..=MAX_SAVE_SLOT {
            let prefix = format!("autosave_slot{}_", slot);

            let mut autosaves: Vec<PathBuf> = fs::read_dir(&self.save_directory)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.starts_with(&prefix))
                })
                .collect();

            // Names embed the timestamp, so name order is age order
            autosaves.sort();
            autosaves.reverse();

            for path in autosaves.iter().skip(keep_count) {
                fs::remove_file(path)?;
                removed += 1;
            }
        }

        if removed > 0 {
            debug!("Removed {} old autosaves", removed);
        }
        Ok(removed)
    }

    /// Check if a manual save exists for a given slot
    pub fn save_exists(&self, slot: u8) -> bool {
        self.save_directory.join(slot_filename(slot)).exists()
    }
}

#[derive(Debug, Clone)]
pub struct SaveFileInfo {
    pub filename: String,
    pub timestamp: SystemTime,
    pub metadata: SaveMetadata,
}

fn slot_filename(slot: u8) -> String {
    format!("slot_{}.json", slot)
}

fn generate_filename(save_type: SaveType, slot: u8) -> String {
    match save_type {
        SaveType::Manual | SaveType::QuickSave => slot_filename(slot),
        SaveType::Auto => {
            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%6f");
            format!("autosave_slot{}_{}.json", slot, timestamp)
        }
    }
}
