//! Save data types
//!
//! Inventories are saved as plain (item id, quantity) pairs per slot, plus
//! the bag item and equipment slot of every equipped bag. Definitions are
//! never written; they are looked up in the catalog again on load.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inventory::InventoryError;

/// Current save file version
pub const CURRENT_SAVE_VERSION: u32 = 1;

/// Largest bag slot count a save may declare
pub const MAX_SAVED_BAG_SLOTS: usize = 256;

/// The root save file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub timestamp: SystemTime,
    pub metadata: SaveMetadata,
    pub inventory: InventorySnapshot,
}

impl SaveFile {
    /// Wraps an inventory snapshot with the current version and time
    pub fn new(metadata: SaveMetadata, inventory: InventorySnapshot) -> Self {
        SaveFile {
            version: CURRENT_SAVE_VERSION,
            timestamp: SystemTime::now(),
            metadata,
            inventory,
        }
    }
}

/// Metadata about the save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub player_name: Option<String>,
    pub save_type: SaveType,
    pub save_slot: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SaveType {
    Manual,
    Auto,
    QuickSave,
}

/// One stack: which item and how many
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSnapshot {
    pub item_id: String,
    pub quantity: u32,
}

/// Every slot of a container, empty slots included
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub slots: Vec<Option<StackSnapshot>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagSnapshot {
    pub equipment_slot: usize,
    pub bag_item_id: String,
    pub contents: ContainerSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub root: ContainerSnapshot,
    pub bag_slot_count: usize,
    pub bags: Vec<BagSnapshot>,
}

/// Error types for save/load operations
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid save version: {0}")]
    InvalidVersion(u32),

    #[error("Corrupted save data: {0}")]
    CorruptedData(String),

    /// A saved id or bag couldn't be restored against the catalog
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),
}
