//! Item definitions — immutable, content-authored kinds

use serde::{Deserialize, Serialize};

/// Stack limit used when a stackable kind does not override it.
pub const DEFAULT_MAX_STACK: u32 = 99;

/// Unique identifier for an item kind.
///
/// The ordering on the raw id is the stable total order used to
/// canonicalize recipe keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ItemKindId(pub u32);

/// Opaque handle into the world-spawn collaborator: names the asset that
/// represents this kind when it is dropped into the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRef(pub String);

/// Immutable definition of an item kind. Authored at content time,
/// read-only at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemKind {
    pub id: ItemKindId,
    pub name: String,
    #[serde(default)]
    pub stackable: bool,
    /// Per-kind stack limit; `None` falls back to [`DEFAULT_MAX_STACK`].
    #[serde(default)]
    pub max_stack: Option<u32>,
    #[serde(default)]
    pub consumable: bool,
    /// World representation used by the drop flow, if any.
    #[serde(default)]
    pub spawn_ref: Option<SpawnRef>,
}

impl ItemKind {
    /// Effective stack limit: 1 for unstackable kinds, otherwise the
    /// per-kind override or the global default.
    pub fn stack_limit(&self) -> u32 {
        if self.stackable {
            self.max_stack.unwrap_or(DEFAULT_MAX_STACK)
        } else {
            1
        }
    }
}
