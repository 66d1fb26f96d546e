//! Recipe matching — order-independent ingredient keys and the recipe book

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::item::ItemKindId;

/// Ingredient slots per recipe. Two-ingredient recipes use the same shape
/// with two empty slots.
pub const RECIPE_SLOTS: usize = 4;

/// Canonical, order-independent key for an ingredient set.
///
/// Canonicalization sorts the four options by the kind-id total order, with
/// empty slots lowest, so every permutation of one ingredient multiset maps
/// to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeKey([Option<ItemKindId>; RECIPE_SLOTS]);

impl RecipeKey {
    pub fn new(mut ingredients: [Option<ItemKindId>; RECIPE_SLOTS]) -> Self {
        ingredients.sort();
        Self(ingredients)
    }

    /// Key for a two-ingredient recipe.
    pub fn pair(a: ItemKindId, b: ItemKindId) -> Self {
        Self::new([Some(a), Some(b), None, None])
    }

    /// The ingredient kinds in canonical order.
    pub fn ingredients(&self) -> impl Iterator<Item = ItemKindId> + '_ {
        self.0.iter().flatten().copied()
    }
}

/// A crafting recipe. Each match consumes exactly one unit of every listed
/// ingredient and produces one unit of the output; there is no quantity
/// scaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub ingredients: [Option<ItemKindId>; RECIPE_SLOTS],
    pub output: ItemKindId,
}

impl Recipe {
    /// Canonical lookup key for this recipe.
    pub fn key(&self) -> RecipeKey {
        RecipeKey::new(self.ingredients)
    }
}

/// Errors raised while building a recipe book from authored content.
#[derive(Debug, thiserror::Error)]
pub enum RecipeBookError {
    /// Two recipes canonicalize to the same ingredient set. Rejected at
    /// build time rather than letting the later recipe win silently.
    #[error("two recipes share the ingredient set {0:?}")]
    DuplicateKey(RecipeKey),

    #[error("recipe for {output:?} has {found} ingredients, need at least 2")]
    TooFewIngredients { output: ItemKindId, found: usize },

    #[error("failed to parse recipe definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Exact-match recipe lookup table, built once from the authored list.
#[derive(Debug)]
pub struct RecipeBook {
    recipes: HashMap<RecipeKey, Recipe>,
}

impl RecipeBook {
    /// Build the lookup table. Duplicate ingredient sets and degenerate
    /// recipes are build-time errors.
    pub fn new(recipes: Vec<Recipe>) -> Result<Self, RecipeBookError> {
        let mut map = HashMap::with_capacity(recipes.len());
        for recipe in recipes {
            let key = recipe.key();
            let found = key.ingredients().count();
            if found < 2 {
                return Err(RecipeBookError::TooFewIngredients {
                    output: recipe.output,
                    found,
                });
            }
            if map.insert(key, recipe).is_some() {
                return Err(RecipeBookError::DuplicateKey(key));
            }
        }
        Ok(Self { recipes: map })
    }

    /// Build a recipe book from a JSON array of recipe definitions.
    pub fn load_from_json(json: &str) -> Result<Self, RecipeBookError> {
        let recipes: Vec<Recipe> = serde_json::from_str(json)?;
        Self::new(recipes)
    }

    /// Exact-match lookup; no partial or fuzzy matching.
    pub fn find(&self, ingredients: &[Option<ItemKindId>; RECIPE_SLOTS]) -> Option<&Recipe> {
        self.recipes.get(&RecipeKey::new(*ingredients))
    }

    /// Two-ingredient convenience lookup.
    pub fn find_pair(&self, a: ItemKindId, b: ItemKindId) -> Option<&Recipe> {
        self.recipes.get(&RecipeKey::pair(a, b))
    }

    /// Number of recipes in the book.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the book is empty.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
