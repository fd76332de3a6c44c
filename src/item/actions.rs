use serde::{Serialize, Deserialize};

use super::definition::{ItemCategory, ItemDefinition};

/// Where a stack is currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    /// A slot of the root container or of an equipped bag
    Container,

    /// A bag equipment slot
    BagEquipment,
}

/// Actions a user can request for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemAction {
    Consume,
    Equip,
    Unequip,
    Split,
    Drop,
}

/// The action performed on double-click, if any
pub fn primary_action(definition: &ItemDefinition, slot: SlotKind) -> Option<ItemAction> {
    if slot == SlotKind::BagEquipment {
        return Some(ItemAction::Unequip);
    }

    if definition.consumable {
        return Some(ItemAction::Consume);
    }

    if definition.is_bag() {
        return Some(ItemAction::Equip);
    }

    match definition.category {
        ItemCategory::Weapon | ItemCategory::Armor | ItemCategory::Tool => Some(ItemAction::Equip),
        _ => None,
    }
}

/// All actions available for an item, primary action first and Drop last
pub fn available_actions(definition: &ItemDefinition, slot: SlotKind) -> Vec<ItemAction> {
    let mut actions = Vec::new();

    if let Some(primary) = primary_action(definition, slot) {
        actions.push(primary);
    }

    // Quantity checks happen at the call site; this only knows the item can stack
    if slot == SlotKind::Container && definition.is_stackable() {
        actions.push(ItemAction::Split);
    }

    actions.push(ItemAction::Drop);
    actions
}
