use std::time::Duration;

use thiserror::Error;

use crate::ids::ItemId;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Failures from the recipe data source, including records that cannot be
/// normalized.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Could not parse ingredient: {0}")]
    Parse(String),

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// A handler was invoked in a state it can never legitimately be invoked in.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreconditionError {
    #[error("No recipe is currently loaded")]
    NoActiveRecipe,

    #[error("No search has completed")]
    NoActiveSearch,

    #[error("Shopping list item not found: {0}")]
    ListItemNotFound(ItemId),

    #[error("Recipe already liked: {0}")]
    AlreadyLiked(String),

    #[error("Recipe not liked: {0}")]
    NotLiked(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Search query too long: {0} characters (max 256)")]
    QueryTooLong(usize),

    #[error("Recipe id is empty")]
    EmptyRecipeId,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Stored value is corrupt: {0}")]
    Corrupt(String),
}
