use serde::Serialize;

use larder_core::{
    paginate, Affordances, ItemId, LikedRecipe, RecipeDetail, RecipeSummary, ShoppingListItem,
};

use crate::state::SearchSession;

/// Screen area that can show a loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Search,
    Recipe,
}

/// One page of search results, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub query: String,
    pub page: usize,
    pub total_pages: usize,
    pub results: Vec<RecipeSummary>,
    pub affordances: Affordances,
    /// Result to mark as selected, if it is on this page.
    pub selected: Option<String>,
}

impl SearchPage {
    /// Window `session` at its current page.
    pub fn from_session(
        session: &SearchSession,
        page_size: usize,
        selected: Option<&str>,
    ) -> Self {
        let window = paginate(&session.results, session.page, page_size);
        let selected = selected
            .filter(|id| window.items.iter().any(|r| r.id == *id))
            .map(str::to_string);

        Self {
            query: session.query.clone(),
            page: window.page,
            total_pages: window.total_pages,
            results: window.items.to_vec(),
            affordances: window.affordances,
            selected,
        }
    }
}

/// Receives plain snapshots to draw. Implementations hold no application state.
pub trait PresentationSink: Send + Sync {
    fn show_loader(&self, region: Region);
    fn clear_loader(&self, region: Region);

    fn clear_results(&self);
    fn render_results(&self, page: &SearchPage);
    fn highlight_selected(&self, id: &str);

    fn clear_recipe(&self);
    fn render_recipe(&self, recipe: &RecipeDetail, liked: bool);
    fn update_servings(&self, recipe: &RecipeDetail);

    fn render_list_item(&self, item: &ShoppingListItem);
    fn delete_list_item(&self, id: ItemId);

    fn toggle_like_button(&self, liked: bool);
    fn render_like(&self, like: &LikedRecipe);
    fn delete_like(&self, id: &str);
    fn toggle_like_menu(&self, num_likes: usize);

    /// Non-blocking notification for a failed flow.
    fn show_error(&self, message: &str);
}
