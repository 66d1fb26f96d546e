//! Inventory container — a sparse slot map with stacking and capacity limits
//!
//! The store only answers slot queries; all mutation policy (stacking rules,
//! transfer semantics, events) lives in the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::item::ItemKindId;

/// Default number of slots in a container. Two of them are "equipped hand"
/// slots by external convention; the store does not treat them specially.
pub const MAX_INVENTORY_SIZE: usize = 20;

/// A quantity of one kind held in a single slot. Amount is at least 1 while
/// stored; the slot entry is removed when it reaches 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub kind: ItemKindId,
    pub amount: u32,
}

/// Slot-indexed storage for one container (player, chest, crafting station).
///
/// Only occupied slots are stored; slot indices run 0..capacity.
#[derive(Debug, Clone)]
pub struct Inventory {
    slots: BTreeMap<u32, ItemStack>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Create an empty inventory with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(MAX_INVENTORY_SIZE)
    }

    /// Create an empty inventory with an explicit slot count.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: BTreeMap::new(),
            capacity,
        }
    }

    /// Stack at `slot`, if occupied.
    pub fn get(&self, slot: u32) -> Option<&ItemStack> {
        self.slots.get(&slot)
    }

    pub(crate) fn get_mut(&mut self, slot: u32) -> Option<&mut ItemStack> {
        self.slots.get_mut(&slot)
    }

    pub(crate) fn insert(&mut self, slot: u32, stack: ItemStack) {
        self.slots.insert(slot, stack);
    }

    pub(crate) fn remove(&mut self, slot: u32) -> Option<ItemStack> {
        self.slots.remove(&slot)
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Slot count of this container.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lowest unoccupied slot index, or `None` when full.
    pub fn first_empty_slot(&self) -> Option<u32> {
        (0..self.capacity as u32).find(|slot| !self.slots.contains_key(slot))
    }

    /// Lowest slot holding `kind`.
    pub fn first_slot_of(&self, kind: ItemKindId) -> Option<u32> {
        self.slots
            .iter()
            .find(|(_, stack)| stack.kind == kind)
            .map(|(slot, _)| *slot)
    }

    /// Lowest slot holding `kind` with room left under `limit`.
    pub fn first_slot_with_headroom(&self, kind: ItemKindId, limit: u32) -> Option<u32> {
        self.slots
            .iter()
            .find(|(_, stack)| stack.kind == kind && stack.amount < limit)
            .map(|(slot, _)| *slot)
    }

    /// Total units of `kind` across all slots.
    pub fn count_of(&self, kind: ItemKindId) -> u32 {
        self.slots
            .values()
            .filter(|stack| stack.kind == kind)
            .map(|stack| stack.amount)
            .sum()
    }

    /// Iterate occupied slots in ascending slot order.
    pub fn slots(&self) -> impl Iterator<Item = (u32, &ItemStack)> {
        self.slots.iter().map(|(slot, stack)| (*slot, stack))
    }

    /// Empty the container, returning its contents in slot order.
    pub(crate) fn drain(&mut self) -> Vec<(u32, ItemStack)> {
        std::mem::take(&mut self.slots).into_iter().collect()
    }
}
