use serde::{Deserialize, Serialize};

use crate::error::PreconditionError;
use crate::ids::ItemId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: ItemId,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub name: String,
}

/// Ingredient lines collected for shopping, in insertion order.
///
/// Items are never merged: adding the same ingredient twice gives two
/// entries with their own ids.
#[derive(Debug, Clone, Default)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new item under a freshly generated id.
    pub fn add_item(
        &mut self,
        quantity: Option<f64>,
        unit: Option<String>,
        name: impl Into<String>,
    ) -> ShoppingListItem {
        let item = ShoppingListItem {
            id: ItemId::generate(),
            quantity,
            unit,
            name: name.into(),
        };
        self.items.push(item.clone());
        item
    }

    pub fn delete_item(&mut self, id: ItemId) -> Result<ShoppingListItem, PreconditionError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(PreconditionError::ListItemNotFound(id))?;
        Ok(self.items.remove(index))
    }

    /// Replace the stored quantity. The value is taken as given, NaN included.
    pub fn update_count(&mut self, id: ItemId, quantity: f64) -> Result<(), PreconditionError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(PreconditionError::ListItemNotFound(id))?;
        item.quantity = Some(quantity);
        Ok(())
    }

    pub fn get(&self, id: ItemId) -> Option<&ShoppingListItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
