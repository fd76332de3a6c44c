use std::env;

use anyhow::{Context, Result};
use tracing::{info, warn};

use satchel::config::InventoryConfig;
use satchel::inventory::{ContainerId, PlayerInventory, SlotAddress};
use satchel::item::{available_actions, ItemCatalog, SlotKind};
use satchel::logging::init_logger;
use satchel::save::{SaveManager, SaveType};

const DEFAULT_CONFIG_PATH: &str = "satchel.toml";

fn main() -> Result<()> {
    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = InventoryConfig::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path))?;

    init_logger(&config.log_level);
    info!(
        "Starting with {} root slots and {} bag slots",
        config.root_slots, config.bag_slots
    );

    let catalog = ItemCatalog::create_default();
    let mut inventory = PlayerInventory::from_config(&config);

    // Pick up a bag and some loot
    for (item_id, quantity) in [("bag", 1), ("wood", 40), ("stone", 60), ("herb", 20)] {
        let stack = catalog.create_stack(item_id, quantity)?;
        if let Some(leftover) = inventory.add_item(stack) {
            warn!("No room for {}, left on the ground", leftover);
        }
    }

    let bag_index = inventory
        .root()
        .slots()
        .iter()
        .position(|slot| slot.as_ref().is_some_and(|stack| stack.definition().is_bag()))
        .context("picked-up bag is missing from the root container")?;

    if let Some(bag_item) = inventory.root().get_item(bag_index) {
        let actions = available_actions(bag_item.definition(), SlotKind::Container);
        info!("Actions for {}: {:?}", bag_item, actions);
    }

    let bag_slot = inventory
        .first_empty_bag_slot()
        .context("no free bag equipment slot")?;
    inventory.equip_from(SlotAddress::root(bag_index), bag_slot)?;
    info!(
        "Equipped bag in slot {}, {} slots total",
        bag_slot,
        inventory.total_slot_count()
    );

    // Fill the root so the bag's contents can't all come back
    for _ in 0..config.root_slots {
        let stack = catalog.create_max_stack("stone")?;
        if let Some(leftover) = inventory.add_item(stack) {
            info!("Inventory full, {} stays behind", leftover);
            break;
        }
    }

    if let Some(bag) = inventory.container(ContainerId::Bag(bag_slot)) {
        info!("Bag holds {} stacks before unequipping", bag.iter_items().count());
    }

    let outcome = inventory.unequip_bag(bag_slot)?;
    if let Some(leftover) = inventory.add_item(outcome.bag) {
        warn!("Dropping {} into the world", leftover);
    }
    for stack in &outcome.overflow {
        warn!("Dropping {} into the world", stack);
    }

    info!(
        "Carrying {} wood, {} stone, {} herb",
        inventory.count_item("wood"),
        inventory.count_item("stone"),
        inventory.count_item("herb")
    );

    let mut save_manager = SaveManager::new(config.save_directory())?;
    let path = save_manager.save_inventory(&inventory, SaveType::Manual, None)?;
    save_manager.cleanup_autosaves(config.autosave_keep)?;
    info!("Session saved to {}", path.display());

    Ok(())
}
