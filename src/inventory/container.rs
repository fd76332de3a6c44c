use std::sync::Arc;

use tracing::{debug, warn};

use super::error::InventoryError;
use super::filter::ItemFilter;
use crate::item::{ItemDefinition, ItemStack};

/// A stack handed back by a raw slot write that could not be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refused {
    /// The stack the caller tried to write, returned untouched
    pub stack: Option<ItemStack>,
    pub reason: InventoryError,
}

/// Fixed-size slot storage behind an admission filter
///
/// This is the core storage structure used by the root inventory and by
/// every equipped bag. It owns the placement algorithm: existing stacks are
/// topped up before any empty slot is used, so stacks stay as few and as
/// full as possible.
#[derive(Debug, Clone)]
pub struct Container {
    /// Slots that can hold item stacks (None = empty)
    slots: Vec<Option<ItemStack>>,

    /// Fixed for the container's lifetime
    filter: ItemFilter,
}

impl Container {
    /// Creates a new empty container that accepts any item
    pub fn new(size: usize) -> Self {
        Self::with_filter(size, ItemFilter::allow_all())
    }

    pub fn with_filter(size: usize, filter: ItemFilter) -> Self {
        Container {
            slots: vec![None; size],
            filter,
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    pub fn accepts(&self, definition: &ItemDefinition) -> bool {
        self.filter.allows(definition)
    }

    /// Read-only view of every slot, in index order
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Gets the stack at a slot, or None for an empty or out-of-range slot
    pub fn get_item(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Returns an iterator over all non-empty item stacks
    pub fn iter_items(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Returns true if the container has no items
    pub fn is_empty(&self) -> bool {
        self.iter_items().all(ItemStack::is_empty)
    }

    /// Returns true if all slots are occupied
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Counts how many of a specific item are in the container
    pub fn count_item(&self, item_id: &str) -> u32 {
        self.iter_items()
            .filter(|stack| stack.item_id() == item_id)
            .map(ItemStack::quantity)
            .sum()
    }

    /// Finds the first empty slot index
    pub fn first_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn empty_slot_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Adds a stack to the container
    ///
    /// Returns whatever couldn't be placed, or None if everything fit.
    /// A stack the filter refuses comes back unchanged and no slot is touched.
    ///
    /// # Strategy
    /// 1. Top up existing stacks of the same item, in slot order
    /// 2. Create new stacks in empty slots, in slot order
    /// 3. Return the remainder if the container runs out of room
    pub fn add_item(&mut self, stack: ItemStack) -> Option<ItemStack> {
        if stack.is_empty() {
            return None;
        }

        if !self.filter.allows(stack.definition()) {
            warn!("container refused '{}'", stack.item_id());
            return Some(stack);
        }

        let mut remaining = stack;
        let offered = remaining.quantity();

        // Phase 1: Try to add to existing stacks
        for existing in self.slots.iter_mut().flatten() {
            if existing.can_merge_with(&remaining) && !existing.is_full() {
                let overflow = existing.add(remaining.quantity());
                remaining.set_quantity(overflow);

                if remaining.is_empty() {
                    debug!("placed {} x{} by merging", remaining.item_id(), offered);
                    return None;
                }
            }
        }

        // Phase 2: Create new stacks in empty slots
        for slot in self.slots.iter_mut().filter(|slot| slot.is_none()) {
            let to_place = remaining.quantity().min(remaining.max_stack_size());
            *slot = Some(ItemStack::new(Arc::clone(remaining.definition()), to_place));
            remaining.remove(to_place);

            if remaining.is_empty() {
                debug!("placed {} x{}", remaining.item_id(), offered);
                return None;
            }
        }

        debug!(
            "placed {} of {} x{}, {} left over",
            offered - remaining.quantity(),
            remaining.item_id(),
            offered,
            remaining.quantity()
        );
        Some(remaining)
    }

    /// Removes the whole stack from a slot
    ///
    /// Returns the removed stack, or None if the slot is empty or out of range.
    pub fn remove_item(&mut self, index: usize) -> Option<ItemStack> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Removes up to `amount` items from a slot
    ///
    /// Asking for the whole stack (or more) clears the slot; anything less
    /// splits the stack and leaves the rest in place. Zero removes nothing.
    pub fn remove_quantity(&mut self, index: usize, amount: u32) -> Option<ItemStack> {
        let stack = self.slots.get_mut(index)?.as_mut()?;

        if amount >= stack.quantity() {
            self.remove_item(index)
        } else {
            stack.split(amount)
        }
    }

    /// Raw slot write used for externally driven placement
    ///
    /// On success returns whatever the slot held before. The incoming stack is
    /// handed back inside `Refused` when the index is out of range or the
    /// filter disallows it; the slot is left untouched in both cases.
    pub fn set_item(&mut self, index: usize, stack: Option<ItemStack>) -> Result<Option<ItemStack>, Refused> {
        let len = self.len();
        if index >= len {
            return Err(Refused {
                stack,
                reason: InventoryError::InvalidSlot { index, len },
            });
        }

        if let Some(incoming) = &stack {
            if !self.filter.allows(incoming.definition()) {
                let item_id = incoming.item_id().to_string();
                warn!("slot {} refused '{}'", index, item_id);
                return Err(Refused {
                    stack,
                    reason: InventoryError::Rejected { item_id },
                });
            }
        }

        let stack = stack.filter(|incoming| !incoming.is_empty());
        Ok(std::mem::replace(&mut self.slots[index], stack))
    }

    /// Direct slot access for moves that were already checked against the filter
    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Option<ItemStack>> {
        self.slots.get_mut(index)
    }

    /// Checks if there's room for at least part of a stack
    ///
    /// True when the filter admits the item and either a matching stack has
    /// room or an empty slot exists. Nothing is mutated.
    pub fn has_space(&self, stack: &ItemStack) -> bool {
        if !self.filter.allows(stack.definition()) {
            return false;
        }

        let can_merge = self
            .iter_items()
            .any(|existing| existing.can_merge_with(stack) && !existing.is_full());

        can_merge || self.first_empty_slot().is_some()
    }

    /// Empties the container
    ///
    /// Returns every stack that was removed, in slot order.
    pub fn clear(&mut self) -> Vec<ItemStack> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemCategory;

    fn item(id: &str, max: u32) -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::new(id, id, "", ItemCategory::Material, max))
    }

    fn quantities(container: &Container) -> Vec<Option<u32>> {
        container
            .slots()
            .iter()
            .map(|slot| slot.as_ref().map(ItemStack::quantity))
            .collect()
    }

    #[test]
    fn test_add_merges_then_fills() {
        // Container of 2, max stack 10: 7 then 5 lands as 10 + 2
        let item_a = item("item_a", 10);
        let mut container = Container::new(2);

        assert!(container.add_item(ItemStack::new(Arc::clone(&item_a), 7)).is_none());
        assert!(container.add_item(ItemStack::new(Arc::clone(&item_a), 5)).is_none());

        assert_eq!(quantities(&container), vec![Some(10), Some(2)]);
    }

    #[test]
    fn test_merge_before_fill_leaves_empty_slot() {
        let stone = item("stone", 10);
        let mut container = Container::new(3);
        container.set_item(1, Some(ItemStack::new(Arc::clone(&stone), 4))).unwrap();

        assert!(container.add_item(ItemStack::new(Arc::clone(&stone), 6)).is_none());

        assert_eq!(quantities(&container), vec![None, Some(10), None]);
    }

    #[test]
    fn test_fill_uses_next_empty_slot() {
        let mut container = Container::new(4);

        assert!(container.add_item(ItemStack::new(item("wood", 64), 64)).is_none());

        assert!(container.add_item(ItemStack::new(item("stone", 10), 10)).is_none());
        assert!(container.add_item(ItemStack::new(item("stone", 10), 7)).is_none());

        assert_eq!(quantities(&container), vec![Some(64), Some(10), Some(7), None]);
        assert_eq!(container.count_item("stone"), 17);
    }

    #[test]
    fn test_remainder_when_full() {
        let stone = item("stone", 5);
        let mut container = Container::new(2);

        let remainder = container.add_item(ItemStack::new(Arc::clone(&stone), 5));
        assert!(remainder.is_none());
        let remainder = container.add_item(ItemStack::new(Arc::clone(&stone), 5));
        assert!(remainder.is_none());

        let remainder = container.add_item(ItemStack::new(Arc::clone(&stone), 3)).unwrap();
        assert_eq!(remainder.quantity(), 3);
        assert!(container.is_full());
        assert_eq!(container.count_item("stone"), 10);
    }

    #[test]
    fn test_filter_rejection_is_atomic() {
        let herb = Arc::new(ItemDefinition::new("herb", "Herb", "", ItemCategory::Resource, 32));
        let wood = item("wood", 64);
        let mut container = Container::with_filter(3, ItemFilter::allow_categories([ItemCategory::Resource]));
        container.add_item(ItemStack::new(Arc::clone(&herb), 5));
        let before = container.slots().to_vec();

        let returned = container.add_item(ItemStack::new(Arc::clone(&wood), 12)).unwrap();

        assert_eq!(returned.item_id(), "wood");
        assert_eq!(returned.quantity(), 12);
        assert_eq!(container.slots(), before.as_slice());
    }

    #[test]
    fn test_remove_item_and_partial_removal() {
        let stone = item("stone", 64);
        let mut container = Container::new(2);
        container.add_item(ItemStack::new(Arc::clone(&stone), 10));

        let part = container.remove_quantity(0, 4).unwrap();
        assert_eq!(part.quantity(), 4);
        assert_eq!(container.get_item(0).unwrap().quantity(), 6);

        let rest = container.remove_quantity(0, 50).unwrap();
        assert_eq!(rest.quantity(), 6);
        assert!(container.get_item(0).is_none());

        assert!(container.remove_quantity(0, 1).is_none());
    }

    #[test]
    fn test_out_of_range_removal_is_noop() {
        let mut container = Container::new(2);
        container.add_item(ItemStack::new(item("stone", 64), 3));

        assert!(container.remove_item(7).is_none());
        assert!(container.remove_quantity(7, 1).is_none());
        assert_eq!(container.count_item("stone"), 3);
    }

    #[test]
    fn test_set_item_respects_filter() {
        let herb = Arc::new(ItemDefinition::new("herb", "Herb", "", ItemCategory::Resource, 32));
        let mut container = Container::with_filter(2, ItemFilter::allow_items(["herb"]));

        let refused = container
            .set_item(0, Some(ItemStack::new(item("wood", 64), 2)))
            .unwrap_err();
        assert_eq!(refused.reason, InventoryError::Rejected { item_id: "wood".into() });
        assert_eq!(refused.stack.unwrap().quantity(), 2);
        assert!(container.get_item(0).is_none());

        let previous = container.set_item(0, Some(ItemStack::new(Arc::clone(&herb), 3))).unwrap();
        assert!(previous.is_none());

        let previous = container.set_item(0, None).unwrap();
        assert_eq!(previous.unwrap().quantity(), 3);

        let out_of_range = container.set_item(5, None).unwrap_err();
        assert_eq!(out_of_range.reason, InventoryError::InvalidSlot { index: 5, len: 2 });
    }

    #[test]
    fn test_has_space() {
        let stone = item("stone", 5);
        let mut container = Container::new(1);
        let probe = ItemStack::new(Arc::clone(&stone), 1);
        assert!(container.has_space(&probe));

        container.add_item(ItemStack::new(Arc::clone(&stone), 3));
        assert!(container.has_space(&probe));

        container.add_item(ItemStack::new(Arc::clone(&stone), 2));
        assert!(!container.has_space(&probe));
        assert!(!container.has_space(&ItemStack::new(item("wood", 64), 1)));
    }

    #[test]
    fn test_clear_returns_contents_in_order() {
        let mut container = Container::new(3);
        container.set_item(2, Some(ItemStack::new(item("wood", 64), 1))).unwrap();
        container.set_item(0, Some(ItemStack::new(item("stone", 64), 2))).unwrap();

        let drained = container.clear();
        let ids: Vec<&str> = drained.iter().map(ItemStack::item_id).collect();
        assert_eq!(ids, vec!["stone", "wood"]);
        assert!(container.is_empty());
        assert_eq!(container.empty_slot_count(), 3);
    }
}
