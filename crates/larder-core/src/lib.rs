//! Larder Core - Recipe records, shopping list, favorites and pagination.
//!
//! This crate contains the domain logic for the Larder recipe client. It has
//! no dependencies on other Larder crates.

pub mod error;
pub mod favorites;
pub mod ids;
pub mod ingredient;
pub mod pagination;
pub mod recipe;
pub mod shopping;
pub mod storage;
pub mod validation;

// Re-exports for convenience
pub use error::{CoreError, FetchError, PreconditionError, StorageError, ValidationError};
pub use favorites::{FavoritesStore, LikedRecipe, LIKES_KEY};
pub use ids::ItemId;
pub use ingredient::parse_ingredient;
pub use pagination::{paginate, total_pages, Affordances, PageWindow, DEFAULT_PAGE_SIZE};
pub use recipe::{
    IngredientLine, RecipeDetail, RecipeRecord, RecipeSummary, ServingsChange, DEFAULT_SERVINGS,
};
pub use shopping::{ShoppingList, ShoppingListItem};
pub use storage::KeyValueStore;
pub use validation::Validator;

#[cfg(any(test, feature = "test-utils"))]
pub use storage::memory::InMemoryKeyValueStore;
