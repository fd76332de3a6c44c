//! Satchel: a tiered item storage engine
//!
//! Item definitions live in a shared catalog, stacks reference them, and a
//! player inventory chains a fixed root container with equippable bags.

pub mod config;
pub mod inventory;
pub mod item;
pub mod logging;
pub mod save;

pub use config::InventoryConfig;
pub use inventory::{Bag, Container, ContainerId, InventoryError, PlayerInventory, SlotAddress};
pub use item::{ItemCatalog, ItemDefinition, ItemStack};
