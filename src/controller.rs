use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use larder_core::{
    total_pages, CoreError, FetchError, ItemId, KeyValueStore, PreconditionError, RecipeDetail,
    ServingsChange, ShoppingList, ValidationError, Validator, DEFAULT_PAGE_SIZE,
};
use larder_source::RecipeSource;

use crate::events::AppEvent;
use crate::sink::{PresentationSink, Region, SearchPage};
use crate::state::{AppState, RecipeSession, SearchSession};

pub const SEARCH_ERROR_MESSAGE: &str = "Something went wrong with the search...";
pub const RECIPE_ERROR_MESSAGE: &str = "Error processing recipe!";

/// Tunables for the controller.
#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    pub page_size: usize,
    /// Upper bound on a single fetch before it counts as failed.
    pub fetch_timeout: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Routes interaction events to the search, recipe, list, like and servings
/// flows and owns the application state they mutate.
///
/// The state lock is never held across a fetch. Each fetch carries the ticket
/// issued when it started and its result is dropped if a newer submission
/// has replaced it in the meantime.
pub struct AppController<S, K, V>
where
    S: RecipeSource,
    K: KeyValueStore,
    V: PresentationSink,
{
    state: Arc<Mutex<AppState<K>>>,
    source: Arc<S>,
    sink: Arc<V>,
    settings: ControllerSettings,
}

impl<S, K, V> Clone for AppController<S, K, V>
where
    S: RecipeSource,
    K: KeyValueStore,
    V: PresentationSink,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            source: self.source.clone(),
            sink: self.sink.clone(),
            settings: self.settings,
        }
    }
}

impl<S, K, V> AppController<S, K, V>
where
    S: RecipeSource,
    K: KeyValueStore,
    V: PresentationSink,
{
    pub fn new(source: Arc<S>, store: Arc<K>, sink: Arc<V>, settings: ControllerSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState::new(store))),
            source,
            sink,
            settings,
        }
    }

    /// Restore liked recipes, draw them, then load `initial_recipe` if given.
    ///
    /// The initial recipe is loaded even when the store cannot be read; that
    /// failure is returned afterwards.
    pub async fn start(&self, initial_recipe: Option<&str>) -> Result<(), CoreError> {
        let restored = {
            let mut state = self.state.lock().await;
            let restored = state.likes.restore();
            if let Err(e) = &restored {
                tracing::error!("Could not restore liked recipes: {}", e);
            }
            self.sink.toggle_like_menu(state.likes.num_likes());
            for like in state.likes.likes() {
                self.sink.render_like(like);
            }
            tracing::info!("Restored {} liked recipes", state.likes.num_likes());
            restored
        };

        self.navigate(initial_recipe).await?;
        restored?;
        Ok(())
    }

    /// Handle one event. Fetch failures are shown to the user and never
    /// returned; anything returned is a caller bug or a storage failure.
    pub async fn dispatch(&self, event: AppEvent) -> Result<(), CoreError> {
        tracing::debug!("Dispatching {}", event.name());
        match event {
            AppEvent::SubmitSearch(query) => self.submit_search(&query).await,
            AppEvent::GotoPage(page) => self.goto_page(page).await,
            AppEvent::Navigate(fragment) => self.navigate(fragment.as_deref()).await,
            AppEvent::ToggleServings(change) => self.change_servings(change).await,
            AppEvent::AddToList => self.add_to_list().await,
            AppEvent::DeleteListItem(id) => self.delete_list_item(id).await,
            AppEvent::UpdateListItem { id, quantity } => self.update_list_item(id, quantity).await,
            AppEvent::ToggleLike => self.toggle_like().await,
        }
    }

    /// Search flow. An empty query does nothing.
    pub async fn submit_search(&self, query: &str) -> Result<(), CoreError> {
        let query = match Validator::validate_query(query) {
            Ok(q) => q.to_string(),
            Err(ValidationError::EmptyQuery) => return Ok(()),
            Err(e) => {
                self.sink.show_error(&e.to_string());
                return Ok(());
            }
        };

        let ticket = {
            let mut state = self.state.lock().await;
            state.search = None;
            let ticket = state.issue_ticket();
            state.pending_search = Some(ticket);
            self.sink.clear_results();
            self.sink.show_loader(Region::Search);
            ticket
        };
        tracing::info!("Searching for {:?} ({})", query, ticket);

        let outcome = self.fetch(self.source.search_recipes(&query)).await;

        let mut state = self.state.lock().await;
        if state.pending_search != Some(ticket) {
            tracing::warn!("Ignoring stale search result for {:?} ({})", query, ticket);
            return Ok(());
        }
        state.pending_search = None;
        self.sink.clear_loader(Region::Search);

        match outcome {
            Ok(results) => {
                tracing::info!("Search {:?} returned {} recipes", query, results.len());
                let session = SearchSession::new(ticket, query, results);
                let page = SearchPage::from_session(
                    &session,
                    self.settings.page_size,
                    state.current_recipe_id.as_deref(),
                );
                state.search = Some(session);
                self.sink.render_results(&page);
            }
            Err(e) => {
                tracing::error!("Search {:?} failed: {}", query, e);
                self.sink.show_error(SEARCH_ERROR_MESSAGE);
            }
        }
        Ok(())
    }

    /// Redraw the current results at `page` without fetching again. Pages past
    /// the end show the last page.
    pub async fn goto_page(&self, page: usize) -> Result<(), CoreError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let session = state
            .search
            .as_mut()
            .ok_or(PreconditionError::NoActiveSearch)?;

        let last_page = total_pages(session.results.len(), self.settings.page_size).max(1);
        session.page = page.clamp(1, last_page);
        let snapshot = SearchPage::from_session(
            session,
            self.settings.page_size,
            state.current_recipe_id.as_deref(),
        );
        self.sink.clear_results();
        self.sink.render_results(&snapshot);
        Ok(())
    }

    /// Recipe flow, triggered by a navigation change. No identifier does nothing.
    ///
    /// On failure the previously loaded recipe, if any, stays current and is
    /// drawn again.
    pub async fn navigate(&self, fragment: Option<&str>) -> Result<(), CoreError> {
        let Some(id) = fragment.and_then(|f| Validator::validate_recipe_id(f).ok()) else {
            return Ok(());
        };
        let id = id.to_string();

        let ticket = {
            let mut state = self.state.lock().await;
            state.current_recipe_id = Some(id.clone());
            let ticket = state.issue_ticket();
            state.pending_recipe = Some(ticket);
            self.sink.clear_recipe();
            self.sink.show_loader(Region::Recipe);
            if state.search.is_some() {
                self.sink.highlight_selected(&id);
            }
            ticket
        };
        tracing::info!("Loading recipe {} ({})", id, ticket);

        let outcome = self
            .fetch(self.source.get_recipe(&id))
            .await
            .and_then(RecipeDetail::from_record);

        let mut state = self.state.lock().await;
        if state.pending_recipe != Some(ticket) {
            tracing::warn!("Ignoring stale recipe result for {} ({})", id, ticket);
            return Ok(());
        }
        state.pending_recipe = None;
        self.sink.clear_loader(Region::Recipe);

        match outcome {
            Ok(recipe) => {
                let liked = state.likes.is_liked(&recipe.id);
                self.sink.render_recipe(&recipe, liked);
                tracing::info!(
                    "Loaded recipe {} with {} ingredients",
                    recipe.id,
                    recipe.ingredients.len()
                );
                state.recipe = Some(RecipeSession { ticket, recipe });
            }
            Err(e) => {
                tracing::error!("Recipe {} failed: {}", id, e);
                self.sink.show_error(RECIPE_ERROR_MESSAGE);

                // Put the recipe that is still current back on screen
                let state = &mut *state;
                if let Some(prior) = &state.recipe {
                    state.current_recipe_id = Some(prior.recipe.id.clone());
                    if state.search.is_some() {
                        self.sink.highlight_selected(&prior.recipe.id);
                    }
                    let liked = state.likes.is_liked(&prior.recipe.id);
                    self.sink.render_recipe(&prior.recipe, liked);
                }
            }
        }
        Ok(())
    }

    /// Servings flow. A decrease that would go below one serving is ignored.
    pub async fn change_servings(&self, change: ServingsChange) -> Result<(), CoreError> {
        let mut state = self.state.lock().await;
        let session = state
            .recipe
            .as_mut()
            .ok_or(PreconditionError::NoActiveRecipe)?;

        if session.recipe.update_servings(change) {
            self.sink.update_servings(&session.recipe);
        } else {
            tracing::debug!("Rejected {:?} at {} servings", change, session.recipe.servings);
        }
        Ok(())
    }

    /// List flow: one new list item per ingredient line of the current recipe.
    pub async fn add_to_list(&self) -> Result<(), CoreError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let session = state
            .recipe
            .as_ref()
            .ok_or(PreconditionError::NoActiveRecipe)?;
        let list = state.list.get_or_insert_with(ShoppingList::new);

        for line in &session.recipe.ingredients {
            let item = list.add_item(line.quantity, line.unit.clone(), line.name.clone());
            self.sink.render_list_item(&item);
        }
        tracing::debug!(
            "Added {} items from {}, list now has {}",
            session.recipe.ingredients.len(),
            session.recipe.id,
            list.len()
        );
        Ok(())
    }

    pub async fn delete_list_item(&self, id: ItemId) -> Result<(), CoreError> {
        let mut state = self.state.lock().await;
        state
            .list
            .as_mut()
            .ok_or(PreconditionError::ListItemNotFound(id))?
            .delete_item(id)?;
        self.sink.delete_list_item(id);
        Ok(())
    }

    pub async fn update_list_item(&self, id: ItemId, quantity: f64) -> Result<(), CoreError> {
        let mut state = self.state.lock().await;
        state
            .list
            .as_mut()
            .ok_or(PreconditionError::ListItemNotFound(id))?
            .update_count(id, quantity)?;
        Ok(())
    }

    /// Like flow: like the current recipe, or unlike it if already liked.
    pub async fn toggle_like(&self) -> Result<(), CoreError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let recipe = &state
            .recipe
            .as_ref()
            .ok_or(PreconditionError::NoActiveRecipe)?
            .recipe;

        if !state.likes.is_liked(&recipe.id) {
            let like = state.likes.add_like(
                recipe.id.clone(),
                recipe.title.clone(),
                recipe.author.clone(),
                recipe.image_url.clone(),
            )?;
            self.sink.toggle_like_button(true);
            self.sink.render_like(&like);
        } else {
            state.likes.delete_like(&recipe.id)?;
            self.sink.toggle_like_button(false);
            self.sink.delete_like(&recipe.id);
        }
        self.sink.toggle_like_menu(state.likes.num_likes());
        Ok(())
    }

    /// Run `f` against the current state.
    pub async fn inspect<R>(&self, f: impl FnOnce(&AppState<K>) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    async fn fetch<T>(
        &self,
        request: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        match tokio::time::timeout(self.settings.fetch_timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.settings.fetch_timeout)),
        }
    }
}
