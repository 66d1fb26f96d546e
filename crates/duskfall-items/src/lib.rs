//! Duskfall Items - item catalog, inventories, and crafting
//!
//! The [`InventoryEngine`] is the sole mutation authority for every
//! container in the game; stores only answer slot queries. Change
//! notifications go through an event queue drained by the presentation
//! layer, and recipe lookup is an exact match on canonicalized ingredient
//! sets.

pub mod catalog;
pub mod crafting;
pub mod engine;
pub mod events;
pub mod inventory;
pub mod item;

pub use catalog::{CatalogError, ItemCatalog};
pub use crafting::{Recipe, RecipeBook, RecipeBookError, RecipeKey, RECIPE_SLOTS};
pub use engine::{InventoryEngine, InventoryId, WorldSpawner};
pub use events::{InventoryEvent, SlotAddr};
pub use inventory::{Inventory, ItemStack, MAX_INVENTORY_SIZE};
pub use item::{ItemKind, ItemKindId, SpawnRef, DEFAULT_MAX_STACK};
