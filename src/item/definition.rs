use serde::{Serialize, Deserialize};
use crate::inventory::ItemFilter;

/// Broad grouping used by admission filters and item actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Consumable,
    Weapon,
    Armor,
    Tool,
    Material,
    Resource,
    Quest,
    Bag,
    Misc,
}

/// Container-capable half of a definition
///
/// Only items that carry this can be equipped into a bag slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagProperties {
    /// Number of slots the live bag exposes once equipped
    pub capacity: u32,

    /// What the bag accepts while equipped
    #[serde(default)]
    pub filter: ItemFilter,
}

impl BagProperties {
    pub fn new(capacity: u32) -> Self {
        BagProperties {
            capacity,
            filter: ItemFilter::allow_all(),
        }
    }

    pub fn with_filter(capacity: u32, filter: ItemFilter) -> Self {
        BagProperties { capacity, filter }
    }
}

/// The blueprint for an item type
///
/// Definitions are shared by every stack of the same item and never
/// change after they have been registered in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique identifier (used for lookups and saves)
    pub id: String,

    /// Display name shown in UI
    pub name: String,

    /// Description shown in tooltips
    pub description: String,

    pub category: ItemCategory,

    /// Maximum stack size (1 = non-stackable, 64 = typical)
    pub max_stack_size: u32,

    /// Present when the item can be equipped as a bag
    #[serde(default)]
    pub bag: Option<BagProperties>,

    #[serde(default)]
    pub consumable: bool,

    /// Opaque icon reference, resolved by the presentation layer
    #[serde(default)]
    pub icon: Option<String>,
}

impl ItemDefinition {
    /// Creates a new item definition
    ///
    /// A max stack size of zero is raised to one so every definition can
    /// hold at least a single item.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: ItemCategory,
        max_stack_size: u32,
    ) -> Self {
        ItemDefinition {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category,
            max_stack_size: max_stack_size.max(1),
            bag: None,
            consumable: category == ItemCategory::Consumable,
            icon: None,
        }
    }

    /// Marks this definition as container-capable
    ///
    /// Bags never stack, so the max stack size is forced to 1.
    pub fn with_bag(mut self, bag: BagProperties) -> Self {
        self.bag = Some(bag);
        self.max_stack_size = 1;
        self
    }

    pub fn with_consumable(mut self, consumable: bool) -> Self {
        self.consumable = consumable;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Returns true if more than one of this item fits in a slot
    pub fn is_stackable(&self) -> bool {
        self.max_stack_size > 1
    }

    pub fn is_bag(&self) -> bool {
        self.bag.is_some()
    }

    pub fn bag_capacity(&self) -> Option<u32> {
        self.bag.as_ref().map(|bag| bag.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_max_stack_is_raised() {
        let def = ItemDefinition::new("pebble", "Pebble", "", ItemCategory::Material, 0);
        assert_eq!(def.max_stack_size, 1);
        assert!(!def.is_stackable());
    }

    #[test]
    fn test_bag_capacity_marks_container_capable() {
        let plain = ItemDefinition::new("wood", "Wood", "", ItemCategory::Material, 64);
        assert!(!plain.is_bag());
        assert_eq!(plain.bag_capacity(), None);

        let bag = ItemDefinition::new("bag", "Bag", "", ItemCategory::Bag, 1)
            .with_bag(BagProperties::new(12));
        assert!(bag.is_bag());
        assert_eq!(bag.bag_capacity(), Some(12));
    }

    #[test]
    fn test_bag_is_never_stackable() {
        let sack = ItemDefinition::new("sack", "Sack", "", ItemCategory::Bag, 5)
            .with_bag(BagProperties::new(2));
        assert_eq!(sack.max_stack_size, 1);
        assert!(!sack.is_stackable());
    }

    #[test]
    fn test_consumable_follows_category() {
        let potion = ItemDefinition::new("potion", "Potion", "", ItemCategory::Consumable, 10);
        assert!(potion.consumable);

        let odd = ItemDefinition::new("odd", "Odd", "", ItemCategory::Misc, 1).with_consumable(true);
        assert!(odd.consumable);
    }
}
