//! Inventory engine — sole authority for inventory mutation
//!
//! Owns every container in an arena addressed by [`InventoryId`] handles, so
//! cross-inventory transfers take two handles instead of two aliased maps.
//! Every mutation is reported through an internal event queue that the
//! presentation layer drains once per frame. Rejected operations return
//! `false` and leave all state untouched; bad handles are defensive no-ops
//! with a logged warning, never panics.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::warn;

use crate::catalog::ItemCatalog;
use crate::crafting::{RecipeBook, RECIPE_SLOTS};
use crate::events::InventoryEvent;
use crate::inventory::{Inventory, ItemStack};
use crate::item::{ItemKindId, SpawnRef};

/// Handle to a container owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InventoryId(pub usize);

/// World-spawn collaborator: turns removed stacks into world objects.
pub trait WorldSpawner {
    /// Instantiate the world representation of a dropped stack.
    fn spawn_item(&mut self, spawn: &SpawnRef, stack: ItemStack);

    /// Instantiate a chest seeded with the contents of a destroyed
    /// container (death/destruction flow).
    fn spawn_chest(&mut self, contents: Vec<ItemStack>);
}

/// Owns all inventories and enforces the stacking and capacity invariants.
pub struct InventoryEngine {
    catalog: Arc<ItemCatalog>,
    inventories: Vec<Inventory>,
    events: VecDeque<InventoryEvent>,
}

impl InventoryEngine {
    pub fn new(catalog: Arc<ItemCatalog>) -> Self {
        Self {
            catalog,
            inventories: Vec::new(),
            events: VecDeque::new(),
        }
    }

    /// Create a new empty container with `capacity` slots.
    pub fn create_inventory(&mut self, capacity: usize) -> InventoryId {
        let id = InventoryId(self.inventories.len());
        self.inventories.push(Inventory::with_capacity(capacity));
        id
    }

    /// Read access to a container.
    pub fn inventory(&self, id: InventoryId) -> Option<&Inventory> {
        self.inventories.get(id.0)
    }

    /// Drain all queued change notifications, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = InventoryEvent> + '_ {
        self.events.drain(..)
    }

    /// Number of queued, undrained events.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Add one unit of `kind`, topping up the lowest understacked slot of the
    /// same kind before opening the lowest empty slot. Fails when full.
    pub fn add_item(&mut self, inv: InventoryId, kind: ItemKindId) -> bool {
        let limit = self.catalog.stack_limit(kind);
        let Some(inventory) = self.inventories.get_mut(inv.0) else {
            warn!(inventory = inv.0, "add_item on unknown inventory handle");
            return false;
        };

        if let Some(slot) = inventory.first_slot_with_headroom(kind, limit) {
            if let Some(stack) = inventory.get_mut(slot) {
                stack.amount += 1;
            }
            self.events.push_back(InventoryEvent::ItemAdded {
                inventory: inv,
                kind,
                slot,
            });
            return true;
        }

        let Some(slot) = inventory.first_empty_slot() else {
            return false;
        };
        inventory.insert(slot, ItemStack { kind, amount: 1 });
        self.events.push_back(InventoryEvent::ItemAdded {
            inventory: inv,
            kind,
            slot,
        });
        true
    }

    /// Remove one unit of `kind` from the lowest slot holding it.
    pub fn remove_item(&mut self, inv: InventoryId, kind: ItemKindId) -> bool {
        let Some(slot) = self
            .inventories
            .get(inv.0)
            .and_then(|inventory| inventory.first_slot_of(kind))
        else {
            return false;
        };
        self.remove_from_slot(inv, slot, 1)
    }

    /// Remove `amount` units from `slot`, deleting the entry when it empties.
    /// Always emits `ItemRemoved` with the slot and the kind it held.
    pub fn remove_from_slot(&mut self, inv: InventoryId, slot: u32, amount: u32) -> bool {
        let Some(inventory) = self.inventories.get_mut(inv.0) else {
            warn!(inventory = inv.0, "remove_from_slot on unknown inventory handle");
            return false;
        };
        let Some(stack) = inventory.get_mut(slot) else {
            return false;
        };
        let kind = stack.kind;
        if stack.amount > amount {
            stack.amount -= amount;
        } else {
            inventory.remove(slot);
        }
        self.events.push_back(InventoryEvent::ItemRemoved {
            inventory: inv,
            kind,
            slot,
        });
        true
    }

    /// Transfer between two slot addresses, merging same-kind stacks up to
    /// the stack limit and swapping otherwise.
    ///
    /// The tie-break policy:
    /// - same inventory and same slot is a successful no-op (a refresh event
    ///   is still emitted for the view layer)
    /// - an empty source fails
    /// - merging never overfills the target; with distinct inventories a
    ///   leftover relocates to the target's first empty slot, otherwise it
    ///   stays in the source slot
    /// - a full same-kind target, or a different kind, swaps the two stacks
    pub fn try_move_item(
        &mut self,
        src: InventoryId,
        src_slot: u32,
        dst: InventoryId,
        dst_slot: u32,
    ) -> bool {
        if self.inventories.get(src.0).is_none() || self.inventories.get(dst.0).is_none() {
            warn!(
                source = src.0,
                target = dst.0,
                "try_move_item on unknown inventory handle"
            );
            return false;
        }

        if src == dst && src_slot == dst_slot {
            self.events.push_back(InventoryEvent::ItemMoved {
                from: (src, src_slot),
                to: (dst, dst_slot),
            });
            return true;
        }

        let Some(source) = self.inventories[src.0].get(src_slot).copied() else {
            return false;
        };
        let target = self.inventories[dst.0].get(dst_slot).copied();

        let Some(target) = target else {
            // Empty target: relocate the whole stack.
            self.inventories[src.0].remove(src_slot);
            self.inventories[dst.0].insert(dst_slot, source);
            self.events.push_back(InventoryEvent::ItemMoved {
                from: (src, src_slot),
                to: (dst, dst_slot),
            });
            return true;
        };

        if target.kind == source.kind {
            let limit = self.catalog.stack_limit(source.kind);
            let space_left = limit.saturating_sub(target.amount);
            if space_left > 0 {
                let moved = space_left.min(source.amount);
                let leftover = source.amount - moved;
                if let Some(stack) = self.inventories[dst.0].get_mut(dst_slot) {
                    stack.amount += moved;
                }
                self.events.push_back(InventoryEvent::ItemMoved {
                    from: (src, src_slot),
                    to: (dst, dst_slot),
                });

                if leftover == 0 {
                    self.inventories[src.0].remove(src_slot);
                } else if src != dst {
                    // Cross-inventory leftovers try to land in the target.
                    if let Some(empty) = self.inventories[dst.0].first_empty_slot() {
                        self.inventories[src.0].remove(src_slot);
                        self.inventories[dst.0].insert(
                            empty,
                            ItemStack {
                                kind: source.kind,
                                amount: leftover,
                            },
                        );
                        self.events.push_back(InventoryEvent::ItemMoved {
                            from: (src, src_slot),
                            to: (dst, empty),
                        });
                    } else if let Some(stack) = self.inventories[src.0].get_mut(src_slot) {
                        stack.amount = leftover;
                    }
                } else if let Some(stack) = self.inventories[src.0].get_mut(src_slot) {
                    stack.amount = leftover;
                }
                return true;
            }
            // Target already at the limit: fall through to swap.
        }

        self.swap_slots(src, src_slot, dst, dst_slot);
        true
    }

    /// Unconditionally overwrite `slot`. An `amount` of 0 clears the slot
    /// instead. No stacking or capacity check; the caller is responsible.
    pub fn force_set_slot(&mut self, inv: InventoryId, slot: u32, kind: ItemKindId, amount: u32) {
        let Some(inventory) = self.inventories.get_mut(inv.0) else {
            warn!(inventory = inv.0, "force_set_slot on unknown inventory handle");
            return;
        };
        if amount == 0 {
            if let Some(previous) = inventory.remove(slot) {
                self.events.push_back(InventoryEvent::ItemRemoved {
                    inventory: inv,
                    kind: previous.kind,
                    slot,
                });
            }
            return;
        }
        inventory.insert(slot, ItemStack { kind, amount });
        self.events.push_back(InventoryEvent::ItemAdded {
            inventory: inv,
            kind,
            slot,
        });
    }

    /// Spawn the world representation of the stack in `slot` and clear the
    /// slot. Logged no-op when the slot is empty or the kind has no world
    /// representation.
    pub fn drop_item(
        &mut self,
        inv: InventoryId,
        slot: u32,
        spawner: &mut dyn WorldSpawner,
    ) -> bool {
        let Some(inventory) = self.inventories.get_mut(inv.0) else {
            warn!(inventory = inv.0, "drop_item on unknown inventory handle");
            return false;
        };
        let Some(stack) = inventory.get(slot).copied() else {
            warn!(inventory = inv.0, slot, "drop_item on empty slot");
            return false;
        };
        let Some(kind) = self.catalog.get(stack.kind) else {
            warn!(kind = stack.kind.0, "drop_item for unknown item kind");
            return false;
        };
        let Some(spawn) = kind.spawn_ref.clone() else {
            warn!(name = %kind.name, "item kind has no world representation to drop");
            return false;
        };

        inventory.remove(slot);
        spawner.spawn_item(&spawn, stack);
        self.events.push_back(InventoryEvent::ItemRemoved {
            inventory: inv,
            kind: stack.kind,
            slot,
        });
        true
    }

    /// Empty a destroyed container into a chest spawned by the collaborator.
    pub fn dump_container(&mut self, inv: InventoryId, spawner: &mut dyn WorldSpawner) {
        let Some(inventory) = self.inventories.get_mut(inv.0) else {
            warn!(inventory = inv.0, "dump_container on unknown inventory handle");
            return;
        };
        let contents = inventory.drain();
        if contents.is_empty() {
            return;
        }
        for (slot, stack) in &contents {
            self.events.push_back(InventoryEvent::ItemRemoved {
                inventory: inv,
                kind: stack.kind,
                slot: *slot,
            });
        }
        spawner.spawn_chest(contents.into_iter().map(|(_, stack)| stack).collect());
    }

    /// Crafting-station flow: read the kinds in `ingredient_slots`, look the
    /// set up in `book`, consume one unit from each slot, and place one unit
    /// of the result in `output_slot`. Fails without mutation when there is
    /// no matching recipe or the output slot is occupied.
    pub fn try_craft(
        &mut self,
        inv: InventoryId,
        ingredient_slots: &[u32],
        output_slot: u32,
        book: &RecipeBook,
    ) -> bool {
        let Some(inventory) = self.inventories.get(inv.0) else {
            warn!(inventory = inv.0, "try_craft on unknown inventory handle");
            return false;
        };
        if ingredient_slots.len() > RECIPE_SLOTS {
            warn!(
                slots = ingredient_slots.len(),
                "try_craft with more ingredient slots than a recipe holds"
            );
            return false;
        }
        if ingredient_slots.contains(&output_slot) || inventory.get(output_slot).is_some() {
            return false;
        }

        let mut kinds = [None; RECIPE_SLOTS];
        for (i, slot) in ingredient_slots.iter().enumerate() {
            kinds[i] = inventory.get(*slot).map(|stack| stack.kind);
        }
        let Some(recipe) = book.find(&kinds) else {
            return false;
        };
        let output = recipe.output;

        for slot in ingredient_slots {
            if self.inventories[inv.0].get(*slot).is_some() {
                self.remove_from_slot(inv, *slot, 1);
            }
        }
        self.force_set_slot(inv, output_slot, output, 1);
        true
    }

    fn swap_slots(&mut self, a_inv: InventoryId, a_slot: u32, b_inv: InventoryId, b_slot: u32) {
        let a = self.inventories[a_inv.0].remove(a_slot);
        let b = self.inventories[b_inv.0].remove(b_slot);
        if let Some(stack) = a {
            self.inventories[b_inv.0].insert(b_slot, stack);
        }
        if let Some(stack) = b {
            self.inventories[a_inv.0].insert(a_slot, stack);
        }
        self.events.push_back(InventoryEvent::ItemSwapped {
            a: (a_inv, a_slot),
            b: (b_inv, b_slot),
        });
    }
}
