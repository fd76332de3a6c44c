//! Saveable trait for inventory parts that can be saved/loaded
//!
//! Snapshots only hold ids and quantities, so restoring needs the catalog
//! to turn ids back into definitions.

use std::sync::Arc;

use super::types::*;
use crate::inventory::{Container, ContainerId, PlayerInventory};
use crate::item::{ItemCatalog, ItemStack};

/// Trait for values that can be converted to and from save snapshots
///
/// # Example
///
/// ```ignore
/// let snapshot = inventory.to_snapshot();
/// let restored = PlayerInventory::from_snapshot(&snapshot, &catalog)?;
/// ```
pub trait Saveable: Sized {
    type Snapshot;

    /// Capture the current state
    fn to_snapshot(&self) -> Self::Snapshot;

    /// Rebuild from a snapshot, resolving item ids through the catalog
    fn from_snapshot(snapshot: &Self::Snapshot, catalog: &ItemCatalog) -> Result<Self, SaveError>;
}

impl Saveable for ItemStack {
    type Snapshot = StackSnapshot;

    fn to_snapshot(&self) -> StackSnapshot {
        StackSnapshot {
            item_id: self.item_id().to_string(),
            quantity: self.quantity(),
        }
    }

    fn from_snapshot(snapshot: &StackSnapshot, catalog: &ItemCatalog) -> Result<Self, SaveError> {
        let definition = catalog.get(&snapshot.item_id)?;

        if snapshot.quantity == 0 || snapshot.quantity > definition.max_stack_size {
            return Err(SaveError::CorruptedData(format!(
                "stack of '{}' has quantity {} (max {})",
                snapshot.item_id, snapshot.quantity, definition.max_stack_size
            )));
        }

        Ok(ItemStack::new(Arc::clone(definition), snapshot.quantity))
    }
}

impl Saveable for Container {
    type Snapshot = ContainerSnapshot;

    fn to_snapshot(&self) -> ContainerSnapshot {
        ContainerSnapshot {
            slots: self
                .slots()
                .iter()
                .map(|slot| slot.as_ref().map(ItemStack::to_snapshot))
                .collect(),
        }
    }

    /// Restores into an unfiltered container; owners with a filter use `restore_contents`
    fn from_snapshot(snapshot: &ContainerSnapshot, catalog: &ItemCatalog) -> Result<Self, SaveError> {
        let mut container = Container::new(snapshot.slots.len());
        restore_contents(&mut container, snapshot, catalog)?;
        Ok(container)
    }
}

/// Fills an existing, empty container slot by slot from a snapshot
pub fn restore_contents(
    container: &mut Container,
    snapshot: &ContainerSnapshot,
    catalog: &ItemCatalog,
) -> Result<(), SaveError> {
    if snapshot.slots.len() != container.len() {
        return Err(SaveError::CorruptedData(format!(
            "expected {} slots, found {}",
            container.len(),
            snapshot.slots.len()
        )));
    }

    for (index, saved) in snapshot.slots.iter().enumerate() {
        let Some(saved) = saved else { continue };
        let stack = ItemStack::from_snapshot(saved, catalog)?;

        container
            .set_item(index, Some(stack))
            .map_err(|refused| SaveError::CorruptedData(refused.reason.to_string()))?;
    }

    Ok(())
}

/// Rejects bag layouts a real inventory can't have, before anything is allocated
fn check_bag_layout(snapshot: &InventorySnapshot) -> Result<(), SaveError> {
    if snapshot.bag_slot_count > MAX_SAVED_BAG_SLOTS {
        return Err(SaveError::CorruptedData(format!(
            "{} bag slots (at most {})",
            snapshot.bag_slot_count, MAX_SAVED_BAG_SLOTS
        )));
    }

    if snapshot.bags.len() > snapshot.bag_slot_count {
        return Err(SaveError::CorruptedData(format!(
            "{} bags saved for {} bag slots",
            snapshot.bags.len(),
            snapshot.bag_slot_count
        )));
    }

    for saved in &snapshot.bags {
        if saved.equipment_slot >= snapshot.bag_slot_count {
            return Err(SaveError::CorruptedData(format!(
                "bag '{}' saved in slot {} of {}",
                saved.bag_item_id, saved.equipment_slot, snapshot.bag_slot_count
            )));
        }
    }

    Ok(())
}

impl Saveable for PlayerInventory {
    type Snapshot = InventorySnapshot;

    fn to_snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            root: self.root().to_snapshot(),
            bag_slot_count: self.bag_slot_count(),
            bags: self
                .equipped_bags()
                .map(|(slot, bag)| BagSnapshot {
                    equipment_slot: slot,
                    bag_item_id: bag.id().to_string(),
                    contents: bag.container().to_snapshot(),
                })
                .collect(),
        }
    }

    fn from_snapshot(snapshot: &InventorySnapshot, catalog: &ItemCatalog) -> Result<Self, SaveError> {
        check_bag_layout(snapshot)?;

        let mut inventory = PlayerInventory::new(snapshot.root.slots.len(), snapshot.bag_slot_count);
        restore_contents(inventory.root_mut(), &snapshot.root, catalog)?;

        for saved in &snapshot.bags {
            let bag_item = catalog.create_stack(&saved.bag_item_id, 1)?;
            inventory.equip(&bag_item, saved.equipment_slot)?;

            if let Some(container) = inventory.container_mut(ContainerId::Bag(saved.equipment_slot)) {
                restore_contents(container, &saved.contents, catalog)?;
            }
        }

        Ok(inventory)
    }
}
