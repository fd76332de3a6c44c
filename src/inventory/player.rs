use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use super::bag::Bag;
use super::container::{Container, Refused};
use super::error::InventoryError;
use crate::config::InventoryConfig;
use crate::item::ItemStack;

/// Identifies one backing store of the inventory
///
/// Every slot the presentation layer shows lives in one of these. Resolving
/// it through `PlayerInventory::container` yields the same `Container`
/// capability whichever tier it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerId {
    Root,

    /// The bag equipped in this equipment slot
    Bag(usize),
}

/// A single slot anywhere in the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotAddress {
    pub container: ContainerId,
    pub index: usize,
}

impl SlotAddress {
    pub fn root(index: usize) -> Self {
        SlotAddress {
            container: ContainerId::Root,
            index,
        }
    }

    pub fn bag(bag_slot: usize, index: usize) -> Self {
        SlotAddress {
            container: ContainerId::Bag(bag_slot),
            index,
        }
    }
}

/// Result of forcibly removing an equipped bag
#[derive(Debug, Clone)]
pub struct UnequipOutcome {
    /// The bag itself, back in its item form
    pub bag: ItemStack,

    /// Contents that found no room elsewhere; the caller must place or drop them
    pub overflow: Vec<ItemStack>,
}

/// The player's complete inventory: a root container plus bag equipment slots
///
/// Placement always walks the tiers in the same order: the root container
/// first, then each equipped bag by equipment slot index.
///
/// Multi-tier operations read and write several containers in one call, so
/// the whole aggregate is one unit of exclusion if it is ever shared.
#[derive(Debug, Clone)]
pub struct PlayerInventory {
    root: Container,
    bags: Vec<Option<Bag>>,
}

impl PlayerInventory {
    /// Creates an inventory with `root_slots` slots and `bag_slots` empty equipment slots
    pub fn new(root_slots: usize, bag_slots: usize) -> Self {
        PlayerInventory {
            root: Container::new(root_slots),
            bags: (0..bag_slots).map(|_| None).collect(),
        }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::new(config.root_slots, config.bag_slots)
    }

    pub fn root(&self) -> &Container {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Container {
        &mut self.root
    }

    /// Number of bag equipment slots, occupied or not
    pub fn bag_slot_count(&self) -> usize {
        self.bags.len()
    }

    /// Gets the bag in an equipment slot, or None if empty or out of range
    pub fn bag(&self, slot: usize) -> Option<&Bag> {
        self.bags.get(slot).and_then(Option::as_ref)
    }

    pub fn bag_mut(&mut self, slot: usize) -> Option<&mut Bag> {
        self.bags.get_mut(slot).and_then(Option::as_mut)
    }

    /// Equipped bags with their equipment slot, in slot order
    pub fn equipped_bags(&self) -> impl Iterator<Item = (usize, &Bag)> {
        self.bags
            .iter()
            .enumerate()
            .filter_map(|(slot, bag)| bag.as_ref().map(|bag| (slot, bag)))
    }

    pub fn equipped_bag_count(&self) -> usize {
        self.equipped_bags().count()
    }

    /// Finds the first free equipment slot
    pub fn first_empty_bag_slot(&self) -> Option<usize> {
        self.bags.iter().position(Option::is_none)
    }

    /// Resolves a container id to its backing store
    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        match id {
            ContainerId::Root => Some(&self.root),
            ContainerId::Bag(slot) => self.bag(slot).map(Bag::container),
        }
    }

    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        match id {
            ContainerId::Root => Some(&mut self.root),
            ContainerId::Bag(slot) => self.bag_mut(slot).map(Bag::container_mut),
        }
    }

    /// All live containers in tier order
    pub fn tiers(&self) -> impl Iterator<Item = (ContainerId, &Container)> {
        let bags = self
            .equipped_bags()
            .map(|(slot, bag)| (ContainerId::Bag(slot), bag.container()));
        std::iter::once((ContainerId::Root, &self.root)).chain(bags)
    }

    fn tiers_mut(&mut self, skip_bag: Option<usize>) -> impl Iterator<Item = &mut Container> {
        let bags = self
            .bags
            .iter_mut()
            .enumerate()
            .filter(move |(slot, _)| Some(*slot) != skip_bag)
            .filter_map(|(_, bag)| bag.as_mut().map(Bag::container_mut));
        std::iter::once(&mut self.root).chain(bags)
    }

    /// Adds items to the inventory
    ///
    /// Tries the root container first, then every equipped bag in slot
    /// order. Returns whatever no tier could absorb, or None if everything
    /// fit. The remainder must be handled by the caller.
    pub fn add_item(&mut self, stack: ItemStack) -> Option<ItemStack> {
        self.add_item_skipping(stack, None)
    }

    fn add_item_skipping(&mut self, stack: ItemStack, skip_bag: Option<usize>) -> Option<ItemStack> {
        let mut remaining = stack;

        for container in self.tiers_mut(skip_bag) {
            match container.add_item(remaining) {
                Some(rest) => remaining = rest,
                None => return None,
            }
        }

        Some(remaining)
    }

    /// Raw write into any slot of the inventory
    ///
    /// See `Container::set_item`. Addressing an empty equipment slot is
    /// refused the same way an out-of-range index is.
    pub fn set_item(&mut self, at: SlotAddress, stack: Option<ItemStack>) -> Result<Option<ItemStack>, Refused> {
        match self.container_mut(at.container) {
            Some(container) => container.set_item(at.index, stack),
            None => Err(Refused {
                stack,
                reason: self.missing_container(at.container),
            }),
        }
    }

    /// Checks if there's room for at least part of a stack somewhere
    pub fn has_space(&self, stack: &ItemStack) -> bool {
        self.tiers().any(|(_, container)| container.has_space(stack))
    }

    fn has_space_skipping(&self, stack: &ItemStack, skip_bag: usize) -> bool {
        self.tiers()
            .filter(|(id, _)| *id != ContainerId::Bag(skip_bag))
            .any(|(_, container)| container.has_space(stack))
    }

    /// Returns true if no tier has an empty slot
    pub fn is_full(&self) -> bool {
        self.empty_slot_count() == 0
    }

    /// Total number of slots across root and all equipped bags
    pub fn total_slot_count(&self) -> usize {
        self.tiers().map(|(_, container)| container.len()).sum()
    }

    /// Number of empty slots across root and all equipped bags
    pub fn empty_slot_count(&self) -> usize {
        self.tiers().map(|(_, container)| container.empty_slot_count()).sum()
    }

    /// Counts an item across root and all equipped bags
    pub fn count_item(&self, item_id: &str) -> u32 {
        self.tiers().map(|(_, container)| container.count_item(item_id)).sum()
    }

    /// Every stack held anywhere, in tier order then slot order
    pub fn iter_items(&self) -> impl Iterator<Item = &ItemStack> {
        self.tiers().flat_map(|(_, container)| container.iter_items())
    }

    // ======================================================================
    // Bag Equipment
    // ======================================================================

    /// Equips a bag item into an equipment slot
    ///
    /// The stack is only read: removing it from where it came from is part
    /// of the same move and belongs to the caller. `equip_from` does both.
    pub fn equip(&mut self, stack: &ItemStack, bag_slot: usize) -> Result<(), InventoryError> {
        self.check_bag_slot_free(bag_slot)?;
        let bag = Bag::equip(stack)?;

        info!("equipped '{}' in bag slot {}", bag.id(), bag_slot);
        self.bags[bag_slot] = Some(bag);
        Ok(())
    }

    /// Moves a bag item out of a slot and equips it, as one step
    ///
    /// Everything is checked before anything changes, so a failure leaves
    /// both the source slot and the equipment slot as they were.
    pub fn equip_from(&mut self, source: SlotAddress, bag_slot: usize) -> Result<(), InventoryError> {
        self.check_bag_slot_free(bag_slot)?;

        let container = self
            .container(source.container)
            .ok_or_else(|| self.missing_container(source.container))?;
        let stack = container.get_item(source.index).ok_or(InventoryError::EmptySlot)?;
        let bag = Bag::equip(stack)?;

        if let Some(container) = self.container_mut(source.container) {
            container.remove_quantity(source.index, 1);
        }

        info!("equipped '{}' in bag slot {} from {:?}", bag.id(), bag_slot, source);
        self.bags[bag_slot] = Some(bag);
        Ok(())
    }

    /// Unequips an empty bag, returning it as an item
    ///
    /// A bag that still holds items is refused with `BagNotEmpty` and stays
    /// equipped, untouched.
    pub fn unequip_bag_strict(&mut self, bag_slot: usize) -> Result<ItemStack, InventoryError> {
        let bag = self.take_bag(bag_slot)?;

        match bag.unequip() {
            Ok(stack) => {
                info!("unequipped '{}' from bag slot {}", stack.item_id(), bag_slot);
                Ok(stack)
            }
            Err(bag) => {
                warn!("bag '{}' in slot {} still holds items", bag.id(), bag_slot);
                self.bags[bag_slot] = Some(bag);
                Err(InventoryError::BagNotEmpty(bag_slot))
            }
        }
    }

    /// Forcibly unequips a bag, moving its contents into the rest of the inventory
    ///
    /// Every stack is drained out of the bag and offered to the remaining
    /// tiers (root, then the other equipped bags). Stacks that still don't
    /// fit are returned in `overflow`; nothing is ever discarded. The bag's
    /// slot is freed only after it has been emptied.
    pub fn unequip_bag(&mut self, bag_slot: usize) -> Result<UnequipOutcome, InventoryError> {
        let drained = match self.bags.get_mut(bag_slot) {
            Some(Some(bag)) => bag.drain(),
            Some(None) => return Err(InventoryError::BagSlotEmpty(bag_slot)),
            None => return Err(self.invalid_bag_slot(bag_slot)),
        };

        let mut overflow = Vec::new();
        for stack in drained {
            debug!("redistributing {}", stack);
            if let Some(rest) = self.add_item_skipping(stack, Some(bag_slot)) {
                overflow.push(rest);
            }
        }

        let bag = self.unequip_bag_strict(bag_slot)?;

        if !overflow.is_empty() {
            warn!(
                "removing bag slot {} left {} stack(s) without room",
                bag_slot,
                overflow.len()
            );
        }

        Ok(UnequipOutcome { bag, overflow })
    }

    /// Unequips an empty bag and puts it into the rest of the inventory
    ///
    /// Refused with `NoSpace` before anything changes when no other tier
    /// can take the bag item.
    pub fn stow_bag(&mut self, bag_slot: usize) -> Result<(), InventoryError> {
        let bag = self
            .bag(bag_slot)
            .ok_or_else(|| self.missing_container(ContainerId::Bag(bag_slot)))?;

        if !bag.is_empty() {
            return Err(InventoryError::BagNotEmpty(bag_slot));
        }

        let probe = ItemStack::new(bag.definition().clone(), 1);
        if !self.has_space_skipping(&probe, bag_slot) {
            warn!("no room to stow bag from slot {}", bag_slot);
            return Err(InventoryError::NoSpace);
        }

        let stack = self.unequip_bag_strict(bag_slot)?;
        if let Some(rest) = self.add_item(stack) {
            // has_space said otherwise; put the bag back rather than lose it
            self.bags[bag_slot] = Some(Bag::equip(&rest)?);
            return Err(InventoryError::NoSpace);
        }

        Ok(())
    }

    /// Swaps the bags (or emptiness) of two equipment slots
    pub fn swap_bag_slots(&mut self, a: usize, b: usize) -> Result<(), InventoryError> {
        for slot in [a, b] {
            if slot >= self.bags.len() {
                return Err(self.invalid_bag_slot(slot));
            }
        }

        self.bags.swap(a, b);
        debug!("swapped bag slots {} and {}", a, b);
        Ok(())
    }

    // ======================================================================
    // Slot Transfers
    // ======================================================================

    /// Moves the stack at `from` onto `to`
    ///
    /// - empty target: the stack moves
    /// - same item: the target is topped up and any overflow stays at `from`
    /// - different item: the two stacks swap places
    ///
    /// Both filters are checked before any slot changes.
    pub fn transfer(&mut self, from: SlotAddress, to: SlotAddress) -> Result<(), InventoryError> {
        if from == to {
            return Ok(());
        }

        let source = self.checked_slot(from)?.cloned().ok_or(InventoryError::EmptySlot)?;
        let target = self.checked_slot(to)?.cloned();

        self.check_accepts(to.container, &source)?;
        if let Some(target) = &target {
            if !target.can_merge_with(&source) {
                self.check_accepts(from.container, target)?;
            }
        }

        let source = self.take_slot(from);
        let target = self.take_slot(to);

        match (source, target) {
            (Some(source), None) => {
                self.put_slot(to, Some(source));
            }
            (Some(source), Some(mut target)) if target.can_merge_with(&source) => {
                let leftover = target.merge(source);
                self.put_slot(to, Some(target));
                self.put_slot(from, leftover);
            }
            (source, target) => {
                self.put_slot(to, source);
                self.put_slot(from, target);
            }
        }

        debug!("transferred {:?} -> {:?}", from, to);
        Ok(())
    }

    /// Splits `amount` items off a stack into the first empty slot of the same container
    ///
    /// Returns where the new stack went. Splitting nothing or the whole
    /// stack is refused with `InvalidSplit`, and `NoSpace` is returned when
    /// the container has no empty slot. Nothing changes on failure.
    pub fn split_stack(&mut self, at: SlotAddress, amount: u32) -> Result<SlotAddress, InventoryError> {
        let available = self
            .checked_slot(at)?
            .map(ItemStack::quantity)
            .ok_or(InventoryError::EmptySlot)?;

        if amount == 0 || amount >= available {
            return Err(InventoryError::InvalidSplit {
                requested: amount,
                available,
            });
        }

        let container = self
            .container_mut(at.container)
            .ok_or(InventoryError::EmptySlot)?;
        let target = container.first_empty_slot().ok_or(InventoryError::NoSpace)?;

        if let Some(split) = container.remove_quantity(at.index, amount) {
            if let Some(slot) = container.slot_mut(target) {
                *slot = Some(split);
            }
        }

        debug!("split {} from {:?} into slot {}", amount, at, target);
        Ok(SlotAddress {
            container: at.container,
            index: target,
        })
    }

    // ======================================================================
    // Helpers
    // ======================================================================

    fn checked_slot(&self, at: SlotAddress) -> Result<Option<&ItemStack>, InventoryError> {
        let container = self
            .container(at.container)
            .ok_or_else(|| self.missing_container(at.container))?;

        if at.index >= container.len() {
            return Err(InventoryError::InvalidSlot {
                index: at.index,
                len: container.len(),
            });
        }

        Ok(container.get_item(at.index))
    }

    fn check_accepts(&self, id: ContainerId, stack: &ItemStack) -> Result<(), InventoryError> {
        let accepted = self
            .container(id)
            .is_some_and(|container| container.accepts(stack.definition()));

        if accepted {
            Ok(())
        } else {
            Err(InventoryError::Rejected {
                item_id: stack.item_id().to_string(),
            })
        }
    }

    fn take_slot(&mut self, at: SlotAddress) -> Option<ItemStack> {
        self.container_mut(at.container)
            .and_then(|container| container.slot_mut(at.index))
            .and_then(Option::take)
    }

    fn put_slot(&mut self, at: SlotAddress, stack: Option<ItemStack>) {
        if let Some(slot) = self
            .container_mut(at.container)
            .and_then(|container| container.slot_mut(at.index))
        {
            *slot = stack;
        }
    }

    fn take_bag(&mut self, bag_slot: usize) -> Result<Bag, InventoryError> {
        match self.bags.get_mut(bag_slot) {
            Some(slot) => slot.take().ok_or(InventoryError::BagSlotEmpty(bag_slot)),
            None => Err(self.invalid_bag_slot(bag_slot)),
        }
    }

    fn check_bag_slot_free(&self, bag_slot: usize) -> Result<(), InventoryError> {
        match self.bags.get(bag_slot) {
            Some(None) => Ok(()),
            Some(Some(_)) => Err(InventoryError::BagSlotOccupied(bag_slot)),
            None => Err(self.invalid_bag_slot(bag_slot)),
        }
    }

    fn missing_container(&self, id: ContainerId) -> InventoryError {
        match id {
            ContainerId::Bag(slot) if slot >= self.bags.len() => self.invalid_bag_slot(slot),
            ContainerId::Bag(slot) => InventoryError::BagSlotEmpty(slot),
            ContainerId::Root => InventoryError::EmptySlot,
        }
    }

    fn invalid_bag_slot(&self, index: usize) -> InventoryError {
        InventoryError::InvalidBagSlot {
            index,
            len: self.bags.len(),
        }
    }
}

impl Default for PlayerInventory {
    fn default() -> Self {
        Self::from_config(&InventoryConfig::default())
    }
}
