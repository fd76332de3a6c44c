//! Save/Load system for inventories
//!
//! - JSON save files (human-readable, debuggable)
//! - Save slots 1-5 plus timestamped autosaves
//! - Snapshots store item ids only; loading resolves them through the catalog
//!
//! # Architecture
//!
//! - `types`: Snapshot structures, the save file and error types
//! - `saveable`: Saveable trait for stacks, containers and the inventory
//! - `manager`: SaveManager for file operations
//!
//! # Example Usage
//!
//! ```ignore
//! let mut save_manager = SaveManager::new(SaveManager::default_directory())?;
//! save_manager.save_inventory(&inventory, SaveType::Manual, None)?;
//!
//! let restored = save_manager.load_inventory(1, &catalog)?;
//! ```

pub mod manager;
pub mod saveable;
pub mod types;

pub use manager::{SaveFileInfo, SaveManager, MAX_SAVE_SLOT};
pub use saveable::{restore_contents, Saveable};
pub use types::*;
