use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::ingredient::parse_ingredient;

/// Servings assumed for a freshly fetched recipe; the provider does not report them.
pub const DEFAULT_SERVINGS: u32 = 4;

/// Minutes of preparation per started group of three ingredients.
const MINUTES_PER_PERIOD: u32 = 15;
const INGREDIENTS_PER_PERIOD: usize = 3;

/// One entry of a search result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub publisher: String,
}

/// A recipe as the provider returns it, ingredients still free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub image_url: String,
    pub source_url: String,
    pub ingredients: Vec<String>,
}

/// A normalized ingredient line. Quantity and unit are genuinely optional:
/// "salt to taste" has neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub name: String,
}

impl IngredientLine {
    pub fn new(quantity: Option<f64>, unit: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            quantity,
            unit: unit.map(str::to_string),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingsChange {
    Increase,
    Decrease,
}

/// The recipe currently on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: String,
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub source_url: String,
    /// Always >= 1.
    pub servings: u32,
    pub prep_time_minutes: u32,
    pub ingredients: Vec<IngredientLine>,
}

impl RecipeDetail {
    /// Normalize a provider record into a displayable recipe.
    pub fn from_record(record: RecipeRecord) -> Result<Self, FetchError> {
        let ingredients = record
            .ingredients
            .iter()
            .map(|line| parse_ingredient(line))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: record.id,
            title: record.title,
            author: record.publisher,
            image_url: record.image_url,
            source_url: record.source_url,
            servings: DEFAULT_SERVINGS,
            prep_time_minutes: prep_time_for(ingredients.len()),
            ingredients,
        })
    }

    /// Apply a one-step servings change.
    /// Returns false, leaving everything untouched, when a decrease would go below 1.
    pub fn update_servings(&mut self, change: ServingsChange) -> bool {
        let target = match change {
            ServingsChange::Increase => self.servings.saturating_add(1),
            ServingsChange::Decrease if self.servings <= 1 => return false,
            ServingsChange::Decrease => self.servings - 1,
        };
        self.set_servings(target)
    }

    /// Rescale every present quantity by `servings / self.servings`.
    /// Returns false for `servings == 0`, which is never accepted.
    pub fn set_servings(&mut self, servings: u32) -> bool {
        if servings == 0 {
            return false;
        }
        let old = f64::from(self.servings);
        let new = f64::from(servings);
        for quantity in self.ingredients.iter_mut().filter_map(|i| i.quantity.as_mut()) {
            *quantity = *quantity * new / old;
        }
        self.servings = servings;
        true
    }
}

/// Estimated preparation time: 15 minutes for every started group of three ingredients.
pub fn prep_time_for(ingredient_count: usize) -> u32 {
    let periods = ingredient_count.div_ceil(INGREDIENTS_PER_PERIOD);
    u32::try_from(periods)
        .unwrap_or(u32::MAX)
        .saturating_mul(MINUTES_PER_PERIOD)
}
