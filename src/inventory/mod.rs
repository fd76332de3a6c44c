// Inventory module
//
// This module provides the storage engine, including:
// - Admission filters for containers
// - Fixed-size containers with merge-then-fill placement
// - Bags (items that become containers when equipped)
// - The player inventory aggregate (root container + bag slots)

pub mod bag;
pub mod container;
pub mod error;
pub mod filter;
pub mod player;

// Re-export main types
pub use bag::Bag;
pub use container::{Container, Refused};
pub use error::InventoryError;
pub use filter::{FilterMode, ItemFilter};
pub use player::{ContainerId, PlayerInventory, SlotAddress, UnequipOutcome};
