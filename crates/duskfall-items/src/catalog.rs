//! Item catalog — the authored set of item kinds, built once at load time

use std::collections::HashMap;

use tracing::warn;

use crate::item::{ItemKind, ItemKindId, DEFAULT_MAX_STACK};

/// Errors raised while building a catalog from authored content.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate item kind id {0:?} ({1})")]
    DuplicateKind(ItemKindId, String),

    #[error("failed to parse item definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only registry of every item kind in the game.
#[derive(Debug)]
pub struct ItemCatalog {
    kinds: HashMap<ItemKindId, ItemKind>,
}

impl ItemCatalog {
    /// Build a catalog from a definition list. Duplicate ids are rejected.
    pub fn new(kinds: Vec<ItemKind>) -> Result<Self, CatalogError> {
        let mut map = HashMap::with_capacity(kinds.len());
        for kind in kinds {
            let id = kind.id;
            if let Some(previous) = map.insert(id, kind) {
                return Err(CatalogError::DuplicateKind(id, previous.name));
            }
        }
        Ok(Self { kinds: map })
    }

    /// Build a catalog from a JSON array of item definitions.
    pub fn load_from_json(json: &str) -> Result<Self, CatalogError> {
        let kinds: Vec<ItemKind> = serde_json::from_str(json)?;
        Self::new(kinds)
    }

    /// Look up a kind by id.
    pub fn get(&self, id: ItemKindId) -> Option<&ItemKind> {
        self.kinds.get(&id)
    }

    /// Stack limit for `id`. Unknown kinds fall back to the global default.
    pub fn stack_limit(&self, id: ItemKindId) -> u32 {
        match self.kinds.get(&id) {
            Some(kind) => kind.stack_limit(),
            None => {
                warn!(kind = id.0, "stack limit requested for unknown item kind");
                DEFAULT_MAX_STACK
            }
        }
    }

    /// Number of kinds in the catalog.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Iterate over all kinds, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = &ItemKind> {
        self.kinds.values()
    }
}
