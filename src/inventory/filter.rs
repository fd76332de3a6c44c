use std::collections::HashSet;

use serde::{Serialize, Deserialize};

use crate::item::{ItemCategory, ItemDefinition};

/// How the listed categories and ids are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Everything except the listed entries is admitted
    #[default]
    Blocklist,

    /// Only the listed entries are admitted
    Allowlist,
}

/// Admission rule for a container
///
/// A filter with no listed categories or ids admits everything,
/// whatever its mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    #[serde(default)]
    categories: HashSet<ItemCategory>,

    #[serde(default)]
    item_ids: HashSet<String>,

    #[serde(default)]
    mode: FilterMode,
}

impl ItemFilter {
    /// Admits every item
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn allow_categories(categories: impl IntoIterator<Item = ItemCategory>) -> Self {
        ItemFilter {
            categories: categories.into_iter().collect(),
            item_ids: HashSet::new(),
            mode: FilterMode::Allowlist,
        }
    }

    pub fn allow_items<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        ItemFilter {
            categories: HashSet::new(),
            item_ids: ids.into_iter().map(Into::into).collect(),
            mode: FilterMode::Allowlist,
        }
    }

    pub fn block_categories(categories: impl IntoIterator<Item = ItemCategory>) -> Self {
        ItemFilter {
            categories: categories.into_iter().collect(),
            item_ids: HashSet::new(),
            mode: FilterMode::Blocklist,
        }
    }

    pub fn block_items<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        ItemFilter {
            categories: HashSet::new(),
            item_ids: ids.into_iter().map(Into::into).collect(),
            mode: FilterMode::Blocklist,
        }
    }

    /// Adds ids to the list without changing the mode
    pub fn with_items<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.item_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Checks if an item may be placed in a container using this filter
    pub fn allows(&self, definition: &ItemDefinition) -> bool {
        if self.categories.is_empty() && self.item_ids.is_empty() {
            return true;
        }

        let listed = self.categories.contains(&definition.category)
            || self.item_ids.contains(&definition.id);

        match self.mode {
            FilterMode::Allowlist => listed,
            FilterMode::Blocklist => !listed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: &str, category: ItemCategory) -> ItemDefinition {
        ItemDefinition::new(id, id, "", category, 10)
    }

    #[test]
    fn test_allow_all() {
        let filter = ItemFilter::allow_all();
        assert!(filter.allows(&def("wood", ItemCategory::Material)));
        assert!(filter.allows(&def("bag", ItemCategory::Bag)));
    }

    #[test]
    fn test_allowlist_by_category_or_id() {
        let filter = ItemFilter::allow_categories([ItemCategory::Resource]).with_items(["stone"]);
        assert_eq!(filter.mode(), FilterMode::Allowlist);
        assert!(filter.allows(&def("herb", ItemCategory::Resource)));
        assert!(filter.allows(&def("stone", ItemCategory::Material)));
        assert!(!filter.allows(&def("wood", ItemCategory::Material)));
    }

    #[test]
    fn test_blocklist() {
        let filter = ItemFilter::block_categories([ItemCategory::Bag]);
        assert!(!filter.allows(&def("bag", ItemCategory::Bag)));
        assert!(filter.allows(&def("wood", ItemCategory::Material)));

        let filter = ItemFilter::block_items(["cursed_idol"]);
        assert!(!filter.allows(&def("cursed_idol", ItemCategory::Misc)));
        assert!(filter.allows(&def("idol", ItemCategory::Misc)));
    }

    #[test]
    fn test_filter_from_toml() {
        let filter: ItemFilter = toml::from_str(
            r#"
            categories = ["Resource"]
            mode = "Allowlist"
            "#,
        )
        .unwrap();
        assert!(filter.allows(&def("herb", ItemCategory::Resource)));
        assert!(!filter.allows(&def("wood", ItemCategory::Material)));
    }
}
