use std::sync::Arc;

use super::container::Container;
use super::error::InventoryError;
use super::filter::ItemFilter;
use crate::item::{ItemDefinition, ItemStack};

/// An equipped bag: a live container created from a bag item
///
/// A bag exists in one of two shapes. Stored inside a container it is just
/// an `ItemStack` of its definition (quantity 1, no contents). Equipped it
/// is a `Bag` with its own `Container`. `Bag::equip` and `Bag::unequip`
/// are the only ways between the two, so a value is never both at once.
///
/// Because the stored shape carries no contents, any bag stack found in a
/// container is an empty bag. That is what lets one bag hold another.
#[derive(Debug, Clone)]
pub struct Bag {
    definition: Arc<ItemDefinition>,
    container: Container,
}

impl Bag {
    /// Turns a bag item into a live bag with an empty container
    ///
    /// The source stack is only read. Taking it out of wherever it came from
    /// is the caller's job and has to happen together with the equip.
    pub fn equip(stack: &ItemStack) -> Result<Bag, InventoryError> {
        let definition = stack.definition();
        let properties = definition
            .bag
            .as_ref()
            .ok_or_else(|| InventoryError::NotABag(definition.id.clone()))?;

        if properties.capacity == 0 {
            return Err(InventoryError::InvalidBagCapacity(definition.id.clone()));
        }

        let container = Container::with_filter(properties.capacity as usize, properties.filter.clone());
        Ok(Bag {
            definition: Arc::clone(definition),
            container,
        })
    }

    /// Collapses the bag back into a single item
    ///
    /// A bag that still holds anything is handed back unchanged, since its
    /// contents would have nowhere to go.
    pub fn unequip(self) -> Result<ItemStack, Bag> {
        if !self.container.is_empty() {
            return Err(self);
        }

        Ok(ItemStack::new(self.definition, 1))
    }

    pub fn definition(&self) -> &Arc<ItemDefinition> {
        &self.definition
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn icon(&self) -> Option<&str> {
        self.definition.icon.as_deref()
    }

    /// Number of slots this bag provides
    pub fn capacity(&self) -> usize {
        self.container.len()
    }

    pub fn filter(&self) -> &ItemFilter {
        self.container.filter()
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    /// Bags can only contain other bags if those are empty
    pub fn can_accept_bag(&self, other: &Bag) -> bool {
        other.is_empty()
    }

    /// Adds a stack to the bag's container, returning the remainder
    pub fn add_item(&mut self, stack: ItemStack) -> Option<ItemStack> {
        self.container.add_item(stack)
    }

    /// Takes every stack out of the bag, in slot order
    pub fn drain(&mut self) -> Vec<ItemStack> {
        self.container.clear()
    }
}
