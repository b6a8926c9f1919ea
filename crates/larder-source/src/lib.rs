//! Larder Source - The recipe catalog the client searches and reads from.

pub mod protocol;
pub mod source;

pub use protocol::{GetResponse, SearchResponse, WireRecipe, WireSummary};
pub use source::{HttpRecipeSource, RecipeSource};
