use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;

use larder::{
    AppController, AppEvent, ControllerSettings, PresentationSink, Region, SearchPage,
    RECIPE_ERROR_MESSAGE, SEARCH_ERROR_MESSAGE,
};
use larder_core::{
    Affordances, CoreError, FetchError, InMemoryKeyValueStore, ItemId, KeyValueStore,
    LikedRecipe, PreconditionError, RecipeDetail, RecipeRecord, RecipeSummary, ServingsChange,
    ShoppingListItem, StorageError, LIKES_KEY,
};
use larder_source::RecipeSource;

// ============================================================================
// Test doubles
// ============================================================================

/// Data source answering from canned responses. A gated key does not
/// resolve until its gate is opened.
#[derive(Default)]
struct ScriptedSource {
    searches: Mutex<HashMap<String, Result<Vec<RecipeSummary>, FetchError>>>,
    recipes: Mutex<HashMap<String, Result<RecipeRecord, FetchError>>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    search_calls: AtomicUsize,
    recipe_calls: AtomicUsize,
}

impl ScriptedSource {
    fn search_result(&self, query: &str, result: Result<Vec<RecipeSummary>, FetchError>) {
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_string(), result);
    }

    fn recipe_result(&self, id: &str, result: Result<RecipeRecord, FetchError>) {
        self.recipes.lock().unwrap().insert(id.to_string(), result);
    }

    /// Hold back the response for `key` until the returned sender fires.
    fn gate(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(key.to_string(), rx);
        tx
    }

    async fn wait_gate(&self, key: &str) {
        let gate = self.gates.lock().unwrap().remove(key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    fn recipe_calls(&self) -> usize {
        self.recipe_calls.load(Ordering::SeqCst)
    }
}

impl RecipeSource for ScriptedSource {
    async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, FetchError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate(query).await;
        let result = self.searches.lock().unwrap().get(query).cloned();
        result.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_recipe(&self, id: &str) -> Result<RecipeRecord, FetchError> {
        self.recipe_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate(id).await;
        let result = self.recipes.lock().unwrap().get(id).cloned();
        result.unwrap_or_else(|| Err(FetchError::Status(404)))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    ShowLoader(Region),
    ClearLoader(Region),
    ClearResults,
    Results(SearchPage),
    Highlight(String),
    ClearRecipe,
    Recipe(RecipeDetail, bool),
    Servings(RecipeDetail),
    ListItem(ShoppingListItem),
    DeleteListItem(ItemId),
    LikeButton(bool),
    Like(LikedRecipe),
    DeleteLike(String),
    LikeMenu(usize),
    Error(String),
}

#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<Call>>,
}

impl RecordingSink {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn rendered_pages(&self) -> Vec<SearchPage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Results(page) => Some(page),
                _ => None,
            })
            .collect()
    }

    fn errors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Error(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }
}

impl PresentationSink for RecordingSink {
    fn show_loader(&self, region: Region) {
        self.record(Call::ShowLoader(region));
    }
    fn clear_loader(&self, region: Region) {
        self.record(Call::ClearLoader(region));
    }
    fn clear_results(&self) {
        self.record(Call::ClearResults);
    }
    fn render_results(&self, page: &SearchPage) {
        self.record(Call::Results(page.clone()));
    }
    fn highlight_selected(&self, id: &str) {
        self.record(Call::Highlight(id.to_string()));
    }
    fn clear_recipe(&self) {
        self.record(Call::ClearRecipe);
    }
    fn render_recipe(&self, recipe: &RecipeDetail, liked: bool) {
        self.record(Call::Recipe(recipe.clone(), liked));
    }
    fn update_servings(&self, recipe: &RecipeDetail) {
        self.record(Call::Servings(recipe.clone()));
    }
    fn render_list_item(&self, item: &ShoppingListItem) {
        self.record(Call::ListItem(item.clone()));
    }
    fn delete_list_item(&self, id: ItemId) {
        self.record(Call::DeleteListItem(id));
    }
    fn toggle_like_button(&self, liked: bool) {
        self.record(Call::LikeButton(liked));
    }
    fn render_like(&self, like: &LikedRecipe) {
        self.record(Call::Like(like.clone()));
    }
    fn delete_like(&self, id: &str) {
        self.record(Call::DeleteLike(id.to_string()));
    }
    fn toggle_like_menu(&self, num_likes: usize) {
        self.record(Call::LikeMenu(num_likes));
    }
    fn show_error(&self, message: &str) {
        self.record(Call::Error(message.to_string()));
    }
}

type TestController = AppController<ScriptedSource, InMemoryKeyValueStore, RecordingSink>;

struct Harness {
    controller: TestController,
    source: Arc<ScriptedSource>,
    sink: Arc<RecordingSink>,
    store: Arc<InMemoryKeyValueStore>,
}

fn harness_with_store(store: InMemoryKeyValueStore) -> Harness {
    let source = Arc::new(ScriptedSource::default());
    let sink = Arc::new(RecordingSink::default());
    let store = Arc::new(store);
    let settings = ControllerSettings {
        page_size: 10,
        fetch_timeout: Duration::from_secs(5),
    };
    let controller = AppController::new(source.clone(), store.clone(), sink.clone(), settings);
    Harness {
        controller,
        source,
        sink,
        store,
    }
}

fn harness() -> Harness {
    harness_with_store(InMemoryKeyValueStore::new())
}

fn summaries(prefix: &str, n: usize) -> Vec<RecipeSummary> {
    (1..=n)
        .map(|i| RecipeSummary {
            id: format!("{prefix}{i}"),
            title: format!("{prefix} recipe {i}"),
            image_url: format!("http://img/{prefix}{i}.jpg"),
            publisher: "Closet Cooking".to_string(),
        })
        .collect()
}

fn record(id: &str) -> RecipeRecord {
    RecipeRecord {
        id: id.to_string(),
        title: format!("Recipe {id}"),
        publisher: "101 Cookbooks".to_string(),
        image_url: format!("http://img/{id}.jpg"),
        source_url: format!("http://src/{id}"),
        ingredients: vec![
            "4 cups flour".to_string(),
            "2 eggs".to_string(),
            "Salt to taste".to_string(),
        ],
    }
}

fn ids(page: &SearchPage) -> Vec<&str> {
    page.results.iter().map(|r| r.id.as_str()).collect()
}

/// Yield until `cond` holds, so a spawned flow can reach its fetch.
async fn until(cond: impl Fn() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

async fn load_recipe(h: &Harness, id: &str) {
    h.source.recipe_result(id, Ok(record(id)));
    h.controller.navigate(Some(id)).await.unwrap();
}

// ============================================================================
// Search flow
// ============================================================================

#[tokio::test]
async fn test_search_renders_first_page() {
    let h = harness();
    h.source.search_result("pasta", Ok(summaries("p", 23)));

    h.controller.submit_search("pasta").await.unwrap();

    let calls = h.sink.calls();
    assert_eq!(calls[0], Call::ClearResults);
    assert_eq!(calls[1], Call::ShowLoader(Region::Search));
    assert_eq!(calls[2], Call::ClearLoader(Region::Search));

    let pages = h.sink.rendered_pages();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].page, 1);
    assert_eq!(pages[0].total_pages, 3);
    assert_eq!(pages[0].results.len(), 10);
    assert_eq!(
        pages[0].affordances,
        Affordances {
            prev: None,
            next: Some(2),
        }
    );

    let query = h
        .controller
        .inspect(|s| s.search.as_ref().map(|s| s.query.clone()))
        .await;
    assert_eq!(query.as_deref(), Some("pasta"));
}

#[tokio::test]
async fn test_results_keep_provider_order() {
    let h = harness();
    let mut results = summaries("p", 3);
    results.reverse();
    h.source.search_result("pasta", Ok(results));

    h.controller.submit_search("pasta").await.unwrap();

    assert_eq!(ids(&h.sink.rendered_pages()[0]), vec!["p3", "p2", "p1"]);
}

#[tokio::test]
async fn test_empty_query_is_noop() {
    let h = harness();

    h.controller.submit_search("   ").await.unwrap();

    assert_eq!(h.source.search_calls(), 0);
    assert!(h.sink.calls().is_empty());
}

#[tokio::test]
async fn test_goto_page_rerenders_without_fetch() {
    let h = harness();
    h.source.search_result("pasta", Ok(summaries("p", 23)));
    h.controller.submit_search("pasta").await.unwrap();
    h.sink.clear();

    h.controller.goto_page(3).await.unwrap();

    assert_eq!(h.source.search_calls(), 1);
    let pages = h.sink.rendered_pages();
    assert_eq!(ids(&pages[0]), vec!["p21", "p22", "p23"]);
    assert_eq!(
        pages[0].affordances,
        Affordances {
            prev: Some(2),
            next: None,
        }
    );
    assert_eq!(h.sink.calls()[0], Call::ClearResults);

    h.controller.goto_page(2).await.unwrap();
    let pages = h.sink.rendered_pages();
    assert_eq!(
        pages[1].affordances,
        Affordances {
            prev: Some(1),
            next: Some(3),
        }
    );
}

#[tokio::test]
async fn test_goto_page_past_end_shows_last_page() {
    let h = harness();
    h.source.search_result("pasta", Ok(summaries("p", 23)));
    h.controller.submit_search("pasta").await.unwrap();
    h.sink.clear();

    h.controller.goto_page(99).await.unwrap();

    let pages = h.sink.rendered_pages();
    assert_eq!(pages[0].page, 3);
    assert_eq!(ids(&pages[0]), vec!["p21", "p22", "p23"]);
    assert_eq!(
        pages[0].affordances,
        Affordances {
            prev: Some(2),
            next: None,
        }
    );
    let page = h.controller.inspect(|s| s.search.as_ref().map(|s| s.page)).await;
    assert_eq!(page, Some(3));
}

#[tokio::test]
async fn test_goto_page_without_search_fails() {
    let h = harness();

    let err = h.controller.goto_page(2).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Precondition(PreconditionError::NoActiveSearch)
    ));
}

#[tokio::test]
async fn test_search_failure_shows_error_and_clears_loader() {
    let h = harness();
    h.source
        .search_result("pasta", Err(FetchError::Network("offline".to_string())));

    h.controller.submit_search("pasta").await.unwrap();

    let calls = h.sink.calls();
    assert!(calls.contains(&Call::ClearLoader(Region::Search)));
    assert_eq!(h.sink.errors(), vec![SEARCH_ERROR_MESSAGE.to_string()]);
    assert!(h.sink.rendered_pages().is_empty());
    assert!(h.controller.inspect(|s| s.search.is_none()).await);
}

#[tokio::test]
async fn test_new_search_discards_previous_session() {
    let h = harness();
    h.source.search_result("pasta", Ok(summaries("p", 5)));
    h.source
        .search_result("pizza", Err(FetchError::Status(503)));

    h.controller.submit_search("pasta").await.unwrap();
    h.controller.submit_search("pizza").await.unwrap();

    assert!(h.controller.inspect(|s| s.search.is_none()).await);
    assert!(h.controller.goto_page(1).await.is_err());
}

#[tokio::test]
async fn test_stale_search_result_is_ignored() {
    let h = harness();
    h.source.search_result("pasta", Ok(summaries("p", 23)));
    h.source.search_result("pizza", Ok(summaries("z", 4)));
    let release_pasta = h.source.gate("pasta");

    let first = {
        let controller = h.controller.clone();
        tokio::spawn(async move { controller.submit_search("pasta").await })
    };
    let source = h.source.clone();
    until(move || source.search_calls() == 1).await;

    h.controller.submit_search("pizza").await.unwrap();
    release_pasta.send(()).unwrap();
    first.await.unwrap().unwrap();

    let pages = h.sink.rendered_pages();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].query, "pizza");

    let query = h
        .controller
        .inspect(|s| s.search.as_ref().map(|s| s.query.clone()))
        .await;
    assert_eq!(query.as_deref(), Some("pizza"));
    assert!(h.controller.inspect(|s| s.pending_search.is_none()).await);
}

#[tokio::test]
async fn test_search_timeout_is_a_fetch_failure() {
    let source = Arc::new(ScriptedSource::default());
    let sink = Arc::new(RecordingSink::default());
    let settings = ControllerSettings {
        page_size: 10,
        fetch_timeout: Duration::from_millis(50),
    };
    let controller = AppController::new(
        source.clone(),
        Arc::new(InMemoryKeyValueStore::new()),
        sink.clone(),
        settings,
    );
    let _never = source.gate("pasta");

    controller.submit_search("pasta").await.unwrap();

    assert_eq!(sink.errors(), vec![SEARCH_ERROR_MESSAGE.to_string()]);
    assert!(sink.calls().contains(&Call::ClearLoader(Region::Search)));
}

// ============================================================================
// Recipe flow
// ============================================================================

#[tokio::test]
async fn test_navigate_loads_normalized_recipe() {
    let h = harness();
    h.source.recipe_result("47746", Ok(record("47746")));

    h.controller.navigate(Some("#47746")).await.unwrap();

    let calls = h.sink.calls();
    assert_eq!(calls[0], Call::ClearRecipe);
    assert_eq!(calls[1], Call::ShowLoader(Region::Recipe));
    assert!(!calls.iter().any(|c| matches!(c, Call::Highlight(_))));

    let (recipe, liked) = calls
        .iter()
        .find_map(|c| match c {
            Call::Recipe(r, liked) => Some((r.clone(), *liked)),
            _ => None,
        })
        .unwrap();
    assert!(!liked);
    assert_eq!(recipe.author, "101 Cookbooks");
    assert_eq!(recipe.servings, 4);
    assert_eq!(recipe.prep_time_minutes, 15);
    assert_eq!(recipe.ingredients[0].quantity, Some(4.0));
    assert_eq!(recipe.ingredients[0].unit.as_deref(), Some("cup"));
    assert_eq!(recipe.ingredients[2].quantity, None);

    let current = h
        .controller
        .inspect(|s| s.recipe.as_ref().map(|r| r.recipe.id.clone()))
        .await;
    assert_eq!(current.as_deref(), Some("47746"));
}

#[tokio::test]
async fn test_navigate_without_id_is_noop() {
    let h = harness();

    h.controller.navigate(None).await.unwrap();
    h.controller.navigate(Some("#")).await.unwrap();
    h.controller.dispatch(AppEvent::Navigate(None)).await.unwrap();

    assert_eq!(h.source.recipe_calls(), 0);
    assert!(h.sink.calls().is_empty());
}

#[tokio::test]
async fn test_navigate_highlights_when_search_exists() {
    let h = harness();
    h.source.search_result("pasta", Ok(summaries("p", 5)));
    h.controller.submit_search("pasta").await.unwrap();
    h.sink.clear();

    // Highlighting happens even if the fetch then fails
    h.controller.navigate(Some("p2")).await.unwrap();

    assert!(h.sink.calls().contains(&Call::Highlight("p2".to_string())));
    assert_eq!(h.sink.errors(), vec![RECIPE_ERROR_MESSAGE.to_string()]);

    h.controller.goto_page(1).await.unwrap();
    let pages = h.sink.rendered_pages();
    assert_eq!(pages.last().unwrap().selected.as_deref(), Some("p2"));
}

#[tokio::test]
async fn test_recipe_failure_keeps_previous_recipe() {
    let h = harness();
    load_recipe(&h, "r1").await;
    h.source
        .recipe_result("r2", Err(FetchError::Network("offline".to_string())));
    h.sink.clear();

    h.controller.navigate(Some("r2")).await.unwrap();

    assert_eq!(h.sink.errors(), vec![RECIPE_ERROR_MESSAGE.to_string()]);
    assert!(h.sink.calls().contains(&Call::ClearLoader(Region::Recipe)));
    let (current, current_id) = h
        .controller
        .inspect(|s| {
            (
                s.recipe.as_ref().map(|r| r.recipe.clone()),
                s.current_recipe_id.clone(),
            )
        })
        .await;
    let current = current.unwrap();
    assert_eq!(current.id, "r1");
    assert_eq!(current_id.as_deref(), Some("r1"));

    // What is on screen is the recipe later actions apply to
    assert_eq!(h.sink.calls().last(), Some(&Call::Recipe(current.clone(), false)));

    h.controller.toggle_like().await.unwrap();
    assert!(h.controller.inspect(|s| s.likes.is_liked("r1")).await);
    assert!(!h.controller.inspect(|s| s.likes.is_liked("r2")).await);
}

#[tokio::test]
async fn test_unparseable_recipe_shows_error() {
    let h = harness();
    let mut broken = record("r1");
    broken.ingredients = vec!["1/0 cup water".to_string()];
    h.source.recipe_result("r1", Ok(broken));

    h.controller.navigate(Some("r1")).await.unwrap();

    assert_eq!(h.sink.errors(), vec![RECIPE_ERROR_MESSAGE.to_string()]);
    assert!(h.controller.inspect(|s| s.recipe.is_none()).await);
}

#[tokio::test]
async fn test_stale_recipe_result_is_ignored() {
    let h = harness();
    h.source.recipe_result("slow", Ok(record("slow")));
    h.source.recipe_result("fast", Ok(record("fast")));
    let release_slow = h.source.gate("slow");

    let first = {
        let controller = h.controller.clone();
        tokio::spawn(async move { controller.navigate(Some("slow")).await })
    };
    let source = h.source.clone();
    until(move || source.recipe_calls() == 1).await;

    h.controller.navigate(Some("fast")).await.unwrap();
    release_slow.send(()).unwrap();
    first.await.unwrap().unwrap();

    let rendered: Vec<String> = h
        .sink
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Recipe(r, _) => Some(r.id),
            _ => None,
        })
        .collect();
    assert_eq!(rendered, vec!["fast".to_string()]);
    let current = h
        .controller
        .inspect(|s| s.recipe.as_ref().map(|r| r.recipe.id.clone()))
        .await;
    assert_eq!(current.as_deref(), Some("fast"));
}

// ============================================================================
// Servings flow
// ============================================================================

#[tokio::test]
async fn test_servings_rescale_and_floor() {
    let h = harness();
    load_recipe(&h, "r1").await;
    h.sink.clear();

    h.controller
        .change_servings(ServingsChange::Increase)
        .await
        .unwrap();
    let quantity = h
        .controller
        .inspect(|s| s.recipe.as_ref().unwrap().recipe.ingredients[0].quantity)
        .await;
    assert_eq!(quantity, Some(5.0));

    for _ in 0..4 {
        h.controller
            .dispatch(AppEvent::ToggleServings(ServingsChange::Decrease))
            .await
            .unwrap();
    }
    let (servings, quantity) = h
        .controller
        .inspect(|s| {
            let r = &s.recipe.as_ref().unwrap().recipe;
            (r.servings, r.ingredients[0].quantity)
        })
        .await;
    assert_eq!(servings, 1);
    assert_eq!(quantity, Some(1.0));

    let renders_before = h.sink.calls().len();
    h.controller
        .change_servings(ServingsChange::Decrease)
        .await
        .unwrap();
    assert_eq!(h.sink.calls().len(), renders_before);
    let quantity = h
        .controller
        .inspect(|s| s.recipe.as_ref().unwrap().recipe.ingredients[0].quantity)
        .await;
    assert_eq!(quantity, Some(1.0));
}

#[tokio::test]
async fn test_servings_without_recipe_fails() {
    let h = harness();
    assert!(matches!(
        h.controller.change_servings(ServingsChange::Increase).await,
        Err(CoreError::Precondition(PreconditionError::NoActiveRecipe))
    ));
}

// ============================================================================
// List flow
// ============================================================================

#[tokio::test]
async fn test_add_to_list_requires_recipe() {
    let h = harness();
    assert!(matches!(
        h.controller.add_to_list().await,
        Err(CoreError::Precondition(PreconditionError::NoActiveRecipe))
    ));
    assert!(h.controller.inspect(|s| s.list.is_none()).await);
}

#[tokio::test]
async fn test_add_to_list_appends_without_merging() {
    let h = harness();
    load_recipe(&h, "r1").await;
    h.sink.clear();

    h.controller.dispatch(AppEvent::AddToList).await.unwrap();
    h.controller.add_to_list().await.unwrap();

    let items: Vec<ShoppingListItem> = h
        .sink
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::ListItem(item) => Some(item),
            _ => None,
        })
        .collect();
    assert_eq!(items.len(), 6);
    assert_eq!(items[0].name, items[3].name);
    assert_ne!(items[0].id, items[3].id);
    assert_eq!(h.controller.inspect(|s| s.list.as_ref().unwrap().len()).await, 6);

    // The list outlives the recipe it was filled from
    load_recipe(&h, "r2").await;
    h.controller.add_to_list().await.unwrap();
    assert_eq!(h.controller.inspect(|s| s.list.as_ref().unwrap().len()).await, 9);
}

#[tokio::test]
async fn test_delete_and_update_list_items() {
    let h = harness();
    load_recipe(&h, "r1").await;
    h.controller.add_to_list().await.unwrap();
    let (first, second) = h
        .controller
        .inspect(|s| {
            let items = s.list.as_ref().unwrap().items();
            (items[0].id, items[1].id)
        })
        .await;

    h.controller
        .dispatch(AppEvent::DeleteListItem(first))
        .await
        .unwrap();
    assert!(h.sink.calls().contains(&Call::DeleteListItem(first)));

    h.controller
        .dispatch(AppEvent::UpdateListItem {
            id: second,
            quantity: 3.5,
        })
        .await
        .unwrap();
    let quantity = h
        .controller
        .inspect(|s| s.list.as_ref().unwrap().get(second).unwrap().quantity)
        .await;
    assert_eq!(quantity, Some(3.5));

    assert!(matches!(
        h.controller.delete_list_item(first).await,
        Err(CoreError::Precondition(PreconditionError::ListItemNotFound(id))) if id == first
    ));
}

#[tokio::test]
async fn test_list_item_ops_before_any_list_fail() {
    let h = harness();
    let id = ItemId::generate();

    assert!(h.controller.delete_list_item(id).await.is_err());
    assert!(h.controller.update_list_item(id, 1.0).await.is_err());
}

// ============================================================================
// Like flow
// ============================================================================

#[tokio::test]
async fn test_toggle_like_twice_restores_state() {
    let h = harness();
    load_recipe(&h, "r1").await;
    h.sink.clear();

    h.controller.toggle_like().await.unwrap();
    assert!(h.controller.inspect(|s| s.likes.is_liked("r1")).await);

    h.controller.dispatch(AppEvent::ToggleLike).await.unwrap();
    assert!(!h.controller.inspect(|s| s.likes.is_liked("r1")).await);
    assert_eq!(h.controller.inspect(|s| s.likes.num_likes()).await, 0);

    let like = LikedRecipe {
        id: "r1".to_string(),
        title: "Recipe r1".to_string(),
        author: "101 Cookbooks".to_string(),
        image_url: "http://img/r1.jpg".to_string(),
    };
    assert_eq!(
        h.sink.calls(),
        vec![
            Call::LikeButton(true),
            Call::Like(like),
            Call::LikeMenu(1),
            Call::LikeButton(false),
            Call::DeleteLike("r1".to_string()),
            Call::LikeMenu(0),
        ]
    );

    assert_eq!(h.store.write_count(), 2);
    assert_eq!(h.store.read(LIKES_KEY).unwrap(), Some("[]".to_string()));
}

#[tokio::test]
async fn test_toggle_like_without_recipe_fails() {
    let h = harness();
    assert!(matches!(
        h.controller.toggle_like().await,
        Err(CoreError::Precondition(PreconditionError::NoActiveRecipe))
    ));
    assert_eq!(h.store.write_count(), 0);
}

// ============================================================================
// Startup
// ============================================================================

#[tokio::test]
async fn test_start_restores_likes_and_loads_initial_recipe() {
    let persisted = r#"[
        {"id":"r1","title":"Recipe r1","author":"A","image_url":"http://img/r1.jpg"},
        {"id":"r9","title":"Recipe r9","author":"B","image_url":"http://img/r9.jpg"}
    ]"#;
    let h = harness_with_store(InMemoryKeyValueStore::with_value(LIKES_KEY, persisted));
    h.source.recipe_result("r1", Ok(record("r1")));

    h.controller.start(Some("#r1")).await.unwrap();

    let calls = h.sink.calls();
    assert_eq!(calls[0], Call::LikeMenu(2));
    assert!(matches!(&calls[1], Call::Like(l) if l.id == "r1"));
    assert!(matches!(&calls[2], Call::Like(l) if l.id == "r9"));
    assert!(calls
        .iter()
        .any(|c| matches!(c, Call::Recipe(r, true) if r.id == "r1")));

    // Unliking a restored recipe writes the remaining collection back
    h.controller.toggle_like().await.unwrap();
    let raw = h.store.read(LIKES_KEY).unwrap().unwrap();
    let remaining: Vec<LikedRecipe> = serde_json::from_str(&raw).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "r9");
}

#[tokio::test]
async fn test_start_with_corrupt_likes_starts_empty() {
    let h = harness_with_store(InMemoryKeyValueStore::with_value(LIKES_KEY, "{oops"));

    h.controller.start(None).await.unwrap();

    assert_eq!(h.sink.calls(), vec![Call::LikeMenu(0)]);
    assert!(h.sink.errors().is_empty());
    assert_eq!(h.controller.inspect(|s| s.likes.num_likes()).await, 0);
}

#[tokio::test]
async fn test_likes_survive_restart_with_redb() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("larder.redb");

    {
        let db = larder_db::init_database(&path).unwrap();
        let store = Arc::new(larder_db::RedbKeyValueStore::new(db));
        let source = Arc::new(ScriptedSource::default());
        source.recipe_result("r1", Ok(record("r1")));
        let controller = AppController::new(
            source,
            store,
            Arc::new(RecordingSink::default()),
            ControllerSettings::default(),
        );

        controller.start(Some("r1")).await.unwrap();
        controller.toggle_like().await.unwrap();
    }

    let db = larder_db::init_database(&path).unwrap();
    let store = Arc::new(larder_db::RedbKeyValueStore::new(db));
    let sink = Arc::new(RecordingSink::default());
    let controller = AppController::new(
        Arc::new(ScriptedSource::default()),
        store,
        sink.clone(),
        ControllerSettings::default(),
    );

    controller.start(None).await.unwrap();

    assert!(controller.inspect(|s| s.likes.is_liked("r1")).await);
    assert_eq!(sink.calls()[0], Call::LikeMenu(1));
}

/// Store whose stored value cannot be decoded as text.
struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Corrupt("invalid utf-8".to_string()))
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_start_with_unreadable_likes_still_loads_recipe() {
    let source = Arc::new(ScriptedSource::default());
    source.recipe_result("r1", Ok(record("r1")));
    let sink = Arc::new(RecordingSink::default());
    let controller = AppController::new(
        source.clone(),
        Arc::new(UnreadableStore),
        sink.clone(),
        ControllerSettings::default(),
    );

    controller.start(Some("r1")).await.unwrap();

    assert_eq!(source.recipe_calls(), 1);
    let calls = sink.calls();
    assert_eq!(calls[0], Call::LikeMenu(0));
    assert!(calls
        .iter()
        .any(|c| matches!(c, Call::Recipe(r, false) if r.id == "r1")));
    assert!(sink.errors().is_empty());
}

#[tokio::test]
async fn test_start_with_failing_store_loads_recipe_then_reports() {
    struct OfflineStore;

    impl KeyValueStore for OfflineStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Database("disk gone".to_string()))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Database("disk gone".to_string()))
        }
    }

    let source = Arc::new(ScriptedSource::default());
    source.recipe_result("r1", Ok(record("r1")));
    let controller = AppController::new(
        source.clone(),
        Arc::new(OfflineStore),
        Arc::new(RecordingSink::default()),
        ControllerSettings::default(),
    );

    let err = controller.start(Some("r1")).await.unwrap_err();

    assert!(matches!(err, CoreError::Storage(StorageError::Database(_))));
    assert_eq!(source.recipe_calls(), 1);
    assert!(controller.inspect(|s| s.recipe.is_some()).await);
}

