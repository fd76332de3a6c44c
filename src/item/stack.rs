use std::fmt;
use std::sync::Arc;

use super::definition::ItemDefinition;

/// An instance of an item with quantity
///
/// This represents a specific amount of an item type. It's stored
/// in container slots and can be split/merged with other stacks.
///
/// The quantity always stays within `0..=max_stack_size`: construction
/// and every mutation clamp into that range.
#[derive(Debug, Clone)]
pub struct ItemStack {
    definition: Arc<ItemDefinition>,
    quantity: u32,
}

impl ItemStack {
    /// Creates a new item stack, clamping the quantity to the max stack size
    pub fn new(definition: Arc<ItemDefinition>, quantity: u32) -> Self {
        let quantity = quantity.min(definition.max_stack_size);
        ItemStack { definition, quantity }
    }

    pub fn definition(&self) -> &Arc<ItemDefinition> {
        &self.definition
    }

    pub fn item_id(&self) -> &str {
        &self.definition.id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn max_stack_size(&self) -> u32 {
        self.definition.max_stack_size
    }

    /// Overwrites the quantity, clamped into range
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.min(self.max_stack_size());
    }

    /// Adds items to this stack
    ///
    /// Returns how many items couldn't fit (overflow)
    ///
    /// # Example
    /// ```
    /// # use std::sync::Arc;
    /// # use satchel::item::{ItemCategory, ItemDefinition, ItemStack};
    /// let def = Arc::new(ItemDefinition::new("stone", "Stone", "", ItemCategory::Material, 64));
    /// let mut stack = ItemStack::new(def, 50);
    /// let overflow = stack.add(20);
    /// assert_eq!(stack.quantity(), 64);
    /// assert_eq!(overflow, 6);
    /// ```
    pub fn add(&mut self, amount: u32) -> u32 {
        let absorbed = amount.min(self.remaining_space());
        self.quantity += absorbed;
        amount - absorbed
    }

    /// Takes up to `amount` items from this stack
    ///
    /// Returns how many items were actually removed
    pub fn remove(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.quantity);
        self.quantity -= removed;
        removed
    }

    /// Returns true if this stack can merge with another
    ///
    /// Stacks can merge if they're the same item type
    pub fn can_merge_with(&self, other: &ItemStack) -> bool {
        self.definition.id == other.definition.id
    }

    /// Merges another stack into this one
    ///
    /// Returns whatever couldn't fit, or the untouched stack if the two
    /// can't merge at all.
    pub fn merge(&mut self, mut other: ItemStack) -> Option<ItemStack> {
        if !self.can_merge_with(&other) {
            return Some(other);
        }

        let overflow = self.add(other.quantity);
        other.set_quantity(overflow);
        (!other.is_empty()).then_some(other)
    }

    /// Splits this stack into two
    ///
    /// Takes `amount` items from this stack and returns them as a new stack.
    /// Splitting zero items or the whole stack is refused: moving an
    /// entire stack is a different operation.
    ///
    /// # Example
    /// ```
    /// # use std::sync::Arc;
    /// # use satchel::item::{ItemCategory, ItemDefinition, ItemStack};
    /// let def = Arc::new(ItemDefinition::new("stone", "Stone", "", ItemCategory::Material, 64));
    /// let mut stack = ItemStack::new(def, 10);
    /// let split = stack.split(3).unwrap();
    /// assert_eq!(stack.quantity(), 7);
    /// assert_eq!(split.quantity(), 3);
    /// ```
    pub fn split(&mut self, amount: u32) -> Option<ItemStack> {
        if amount == 0 || amount >= self.quantity {
            return None;
        }

        self.quantity -= amount;

        Some(ItemStack::new(Arc::clone(&self.definition), amount))
    }

    /// Splits this stack in half, returning a new stack with half the quantity.
    /// This stack keeps the other half (and any remainder).
    /// Returns None if the stack has 1 or fewer items.
    pub fn split_half(&mut self) -> Option<ItemStack> {
        self.split(self.quantity / 2)
    }

    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    pub fn is_full(&self) -> bool {
        self.quantity >= self.max_stack_size()
    }

    /// How many more items this stack can absorb
    pub fn remaining_space(&self) -> u32 {
        self.max_stack_size().saturating_sub(self.quantity)
    }
}

impl PartialEq for ItemStack {
    fn eq(&self, other: &Self) -> bool {
        self.can_merge_with(other) && self.quantity == other.quantity
    }
}

impl Eq for ItemStack {}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.definition.name, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemCategory;

    fn stone(max: u32) -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::new("stone", "Stone", "", ItemCategory::Material, max))
    }

    #[test]
    fn test_new_clamps_quantity() {
        let stack = ItemStack::new(stone(10), 25);
        assert_eq!(stack.quantity(), 10);
        assert!(stack.is_full());
    }

    #[test]
    fn test_add_returns_overflow() {
        let mut stack = ItemStack::new(stone(10), 7);
        assert_eq!(stack.add(5), 2);
        assert_eq!(stack.quantity(), 10);
        assert_eq!(stack.add(3), 3);
    }

    #[test]
    fn test_remove_takes_what_exists() {
        let mut stack = ItemStack::new(stone(64), 5);
        assert_eq!(stack.remove(10), 5);
        assert!(stack.is_empty());
        assert_eq!(stack.remove(1), 0);
    }

    #[test]
    fn test_set_quantity_clamps() {
        let mut stack = ItemStack::new(stone(10), 1);
        stack.set_quantity(99);
        assert_eq!(stack.quantity(), 10);
        assert_eq!(stack.remaining_space(), 0);
    }

    #[test]
    fn test_split_rules() {
        let mut stack = ItemStack::new(stone(64), 4);

        assert!(stack.split(4).is_none());
        assert!(stack.split(0).is_none());
        assert!(stack.split(9).is_none());
        assert_eq!(stack.quantity(), 4);

        let split = stack.split(2).expect("split of 2 from 4");
        assert_eq!(split.quantity(), 2);
        assert_eq!(stack.quantity(), 2);
        assert!(split.can_merge_with(&stack));
    }

    #[test]
    fn test_split_half() {
        let mut stack = ItemStack::new(stone(64), 7);
        let half = stack.split_half().unwrap();
        assert_eq!(half.quantity(), 3);
        assert_eq!(stack.quantity(), 4);

        let mut single = ItemStack::new(stone(64), 1);
        assert!(single.split_half().is_none());
    }

    #[test]
    fn test_merge_conserves_quantity() {
        let mut target = ItemStack::new(stone(10), 6);
        let leftover = target.merge(ItemStack::new(stone(10), 7)).unwrap();
        assert_eq!(target.quantity(), 10);
        assert_eq!(leftover.quantity(), 3);

        let wood = Arc::new(ItemDefinition::new("wood", "Wood", "", ItemCategory::Material, 64));
        let refused = target.merge(ItemStack::new(wood, 2)).unwrap();
        assert_eq!(refused.item_id(), "wood");
        assert_eq!(refused.quantity(), 2);
    }
}
