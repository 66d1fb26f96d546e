//! Inventory change notifications
//!
//! The engine queues one event per mutation; the presentation layer drains
//! the queue once per frame, after all mutations and before rendering.

use crate::engine::InventoryId;
use crate::item::ItemKindId;

/// A slot address: which inventory, which slot.
pub type SlotAddr = (InventoryId, u32);

/// One inventory mutation, as seen by subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryEvent {
    ItemAdded {
        inventory: InventoryId,
        kind: ItemKindId,
        slot: u32,
    },
    /// Emitted for every removal, including when the stack is deleted
    /// outright; `kind` is the kind the slot held.
    ItemRemoved {
        inventory: InventoryId,
        kind: ItemKindId,
        slot: u32,
    },
    ItemMoved {
        from: SlotAddr,
        to: SlotAddr,
    },
    ItemSwapped {
        a: SlotAddr,
        b: SlotAddr,
    },
}
