use std::sync::Arc;

use larder_core::{
    FavoritesStore, KeyValueStore, RecipeDetail, RecipeSummary, ShoppingList,
};

/// Identity of one search or recipe submission. A fetch result is only
/// applied while its ticket is still the pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A completed search: the query and its results in provider order.
#[derive(Debug, Clone)]
pub struct SearchSession {
    pub ticket: Ticket,
    pub query: String,
    pub results: Vec<RecipeSummary>,
    /// Page last shown, 1-based.
    pub page: usize,
}

impl SearchSession {
    pub fn new(ticket: Ticket, query: String, results: Vec<RecipeSummary>) -> Self {
        Self {
            ticket,
            query,
            results,
            page: 1,
        }
    }
}

/// The recipe currently displayed.
#[derive(Debug, Clone)]
pub struct RecipeSession {
    pub ticket: Ticket,
    pub recipe: RecipeDetail,
}

/// Application state owned by the controller.
pub struct AppState<K: KeyValueStore> {
    pub search: Option<SearchSession>,
    pub recipe: Option<RecipeSession>,
    /// Created on first "add to list" and kept for the rest of the run.
    pub list: Option<ShoppingList>,
    pub likes: FavoritesStore<K>,
    /// Last identifier received from navigation, whether or not it loaded.
    pub current_recipe_id: Option<String>,
    pub pending_search: Option<Ticket>,
    pub pending_recipe: Option<Ticket>,
    next_ticket: u64,
}

impl<K: KeyValueStore> AppState<K> {
    pub fn new(store: Arc<K>) -> Self {
        Self {
            search: None,
            recipe: None,
            list: None,
            likes: FavoritesStore::new(store),
            current_recipe_id: None,
            pending_search: None,
            pending_recipe: None,
            next_ticket: 0,
        }
    }

    /// Hand out a ticket never issued before in this run.
    pub fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }
}
