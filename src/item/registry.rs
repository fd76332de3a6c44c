use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::definition::{BagProperties, ItemCategory, ItemDefinition};
use super::stack::ItemStack;
use crate::inventory::{InventoryError, ItemFilter};

/// Central catalog of all item definitions
///
/// This is the single source of truth for what items exist. Stacks,
/// bags and saves all refer back to definitions registered here.
///
/// The catalog is filled during bootstrap through `&mut self` and then
/// shared read-only (typically behind an `Arc`), which makes it safe to
/// read from any number of threads afterwards.
#[derive(Debug, Default)]
pub struct ItemCatalog {
    items: HashMap<String, Arc<ItemDefinition>>,
}

impl ItemCatalog {
    /// Creates a new empty catalog
    pub fn new() -> Self {
        ItemCatalog {
            items: HashMap::new(),
        }
    }

    /// Creates a catalog with the built-in items pre-registered
    pub fn create_default() -> Self {
        let mut catalog = Self::new();

        for definition in base_items() {
            let id = definition.id.clone();
            if let Err(err) = catalog.register(definition) {
                tracing::error!("skipping base item '{}': {}", id, err);
            }
        }

        info!("Registered {} base items", catalog.len());
        catalog
    }

    /// Registers a new item definition
    ///
    /// Returns the shared handle on success, or `DuplicateDefinition` if an
    /// item with this ID already exists. Bags whose max stack size isn't 1
    /// are refused with `StackableBag`.
    pub fn register(&mut self, definition: ItemDefinition) -> Result<Arc<ItemDefinition>, InventoryError> {
        if self.items.contains_key(&definition.id) {
            return Err(InventoryError::DuplicateDefinition(definition.id));
        }

        if definition.is_bag() && definition.max_stack_size != 1 {
            return Err(InventoryError::StackableBag(definition.id));
        }

        let definition = Arc::new(definition);
        self.items.insert(definition.id.clone(), Arc::clone(&definition));
        Ok(definition)
    }

    /// Gets an item definition by ID
    pub fn get(&self, id: &str) -> Result<&Arc<ItemDefinition>, InventoryError> {
        self.items
            .get(id)
            .ok_or_else(|| InventoryError::DefinitionNotFound(id.to_string()))
    }

    /// Returns true if an item with this ID exists
    pub fn exists(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over every registered definition in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemDefinition>> {
        self.items.values()
    }

    /// Creates a stack of `quantity` items, clamped to the max stack size
    pub fn create_stack(&self, id: &str, quantity: u32) -> Result<ItemStack, InventoryError> {
        let definition = self.get(id)?;
        Ok(ItemStack::new(Arc::clone(definition), quantity))
    }

    /// Creates a full stack of the given item
    pub fn create_max_stack(&self, id: &str) -> Result<ItemStack, InventoryError> {
        let definition = self.get(id)?;
        Ok(ItemStack::new(Arc::clone(definition), definition.max_stack_size))
    }
}

// ======================================================================
// Base Items
// ======================================================================

/// Built-in items. Add new items here.
fn base_items() -> Vec<ItemDefinition> {
    vec![
        ItemDefinition::new(
            "wood",
            "Wood",
            "A piece of wood from a branch.",
            ItemCategory::Material,
            64,
        )
        .with_icon("items/resource/branch.png"),
        ItemDefinition::new(
            "stone",
            "Stone",
            "A small stone. Useful for crafting.",
            ItemCategory::Material,
            99,
        ),
        ItemDefinition::new(
            "health_potion",
            "Health Potion",
            "Restores health when consumed.",
            ItemCategory::Consumable,
            10,
        ),
        ItemDefinition::new(
            "herb",
            "Herb",
            "A fragrant herb.",
            ItemCategory::Resource,
            32,
        ),
        ItemDefinition::new(
            "bag",
            "Traveler's Bag",
            "A simple bag for carrying items. Can hold 12 items.",
            ItemCategory::Bag,
            1,
        )
        .with_bag(BagProperties::new(12))
        .with_icon("items/object/bag.png"),
        ItemDefinition::new(
            "herb_pouch",
            "Herb Pouch",
            "A small pouch that only holds herbs and resources.",
            ItemCategory::Bag,
            1,
        )
        .with_bag(BagProperties::with_filter(
            6,
            ItemFilter::allow_categories([ItemCategory::Resource]),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut catalog = ItemCatalog::new();
        catalog
            .register(ItemDefinition::new("wood", "Wood", "", ItemCategory::Material, 64))
            .unwrap();

        assert!(catalog.exists("wood"));
        assert_eq!(catalog.get("wood").unwrap().max_stack_size, 64);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut catalog = ItemCatalog::new();
        catalog
            .register(ItemDefinition::new("wood", "Wood", "", ItemCategory::Material, 64))
            .unwrap();

        let err = catalog
            .register(ItemDefinition::new("wood", "Other Wood", "", ItemCategory::Material, 8))
            .unwrap_err();
        assert_eq!(err, InventoryError::DuplicateDefinition("wood".to_string()));
        assert_eq!(catalog.get("wood").unwrap().name, "Wood");
    }

    #[test]
    fn test_stackable_bag_is_refused() {
        let mut catalog = ItemCatalog::new();
        let mut sack = ItemDefinition::new("sack", "Sack", "", ItemCategory::Bag, 1)
            .with_bag(BagProperties::new(2));
        sack.max_stack_size = 5;

        assert_eq!(
            catalog.register(sack).unwrap_err(),
            InventoryError::StackableBag("sack".to_string())
        );
        assert!(!catalog.exists("sack"));
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let catalog = ItemCatalog::new();
        assert_eq!(
            catalog.get("ghost").unwrap_err(),
            InventoryError::DefinitionNotFound("ghost".to_string())
        );
        assert!(catalog.create_stack("ghost", 1).is_err());
    }

    #[test]
    fn test_stack_factories() {
        let catalog = ItemCatalog::create_default();

        let potions = catalog.create_stack("health_potion", 50).unwrap();
        assert_eq!(potions.quantity(), 10);

        let stone = catalog.create_max_stack("stone").unwrap();
        assert_eq!(stone.quantity(), 99);
    }

    #[test]
    fn test_default_catalog_contents() {
        let catalog = ItemCatalog::create_default();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get("bag").unwrap().bag_capacity(), Some(12));
        assert_eq!(catalog.get("herb_pouch").unwrap().bag_capacity(), Some(6));
        assert!(catalog.iter().all(|def| def.max_stack_size >= 1));
    }

    #[test]
    fn test_catalog_is_shareable_across_threads() {
        let catalog = Arc::new(ItemCatalog::create_default());
        let reader = Arc::clone(&catalog);

        let handle = std::thread::spawn(move || reader.exists("wood"));
        assert!(handle.join().unwrap());
    }
}
