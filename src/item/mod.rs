// Item module
//
// This module provides the item layer of the storage engine:
// - Item definitions and categories
// - The item catalog (registry of definitions)
// - Item stacks for quantity management
// - Context actions available for an item

pub mod actions;
pub mod definition;
pub mod registry;
pub mod stack;

// Re-export main types for convenient access
pub use actions::{ItemAction, SlotKind, available_actions, primary_action};
pub use definition::{BagProperties, ItemCategory, ItemDefinition};
pub use registry::ItemCatalog;
pub use stack::ItemStack;
