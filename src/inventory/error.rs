use thiserror::Error;

/// Errors that can occur during catalog and inventory operations
///
/// Nothing here is fatal. Filter refusals during `add_item` are not errors
/// at all: the stack simply comes back as the remainder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Item ID doesn't exist in the catalog
    #[error("unknown item id: {0}")]
    DefinitionNotFound(String),

    /// Item ID was already registered
    #[error("item '{0}' already registered")]
    DuplicateDefinition(String),

    /// Container slot index out of bounds
    #[error("invalid slot index {index} (container has {len} slots)")]
    InvalidSlot { index: usize, len: usize },

    /// Bag equipment slot index out of bounds
    #[error("invalid bag slot {index} (inventory has {len} bag slots)")]
    InvalidBagSlot { index: usize, len: usize },

    #[error("bag slot {0} is already occupied")]
    BagSlotOccupied(usize),

    #[error("bag slot {0} is empty")]
    BagSlotEmpty(usize),

    /// Item can't be equipped because it has no bag capacity
    #[error("item '{0}' is not a bag")]
    NotABag(String),

    #[error("bag '{0}' declares no usable capacity")]
    InvalidBagCapacity(String),

    /// Bag definition whose item form could stack
    #[error("bag '{0}' must have a max stack size of 1")]
    StackableBag(String),

    /// Strict unequip of a bag that still holds items
    #[error("bag in slot {0} must be empty first")]
    BagNotEmpty(usize),

    /// Source slot of a move or equip holds nothing
    #[error("slot is empty")]
    EmptySlot,

    /// Admission filter refused the item on a raw write
    #[error("item '{item_id}' is not allowed in this container")]
    Rejected { item_id: String },

    #[error("no space left to place the item")]
    NoSpace,

    #[error("cannot split {requested} from a stack of {available}")]
    InvalidSplit { requested: u32, available: u32 },
}

impl InventoryError {
    /// True for refused state changes the caller can simply retry differently
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            InventoryError::BagSlotOccupied(_)
                | InventoryError::BagSlotEmpty(_)
                | InventoryError::NotABag(_)
                | InventoryError::InvalidBagCapacity(_)
                | InventoryError::BagNotEmpty(_)
                | InventoryError::EmptySlot
                | InventoryError::InvalidSplit { .. }
        )
    }
}
