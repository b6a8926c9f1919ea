use larder_core::{ItemId, ServingsChange};

/// Interaction events emitted by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SubmitSearch(String),
    GotoPage(usize),
    /// Navigation changed. Carries the raw fragment (`"#47746"`), if any.
    Navigate(Option<String>),
    ToggleServings(ServingsChange),
    AddToList,
    DeleteListItem(ItemId),
    UpdateListItem { id: ItemId, quantity: f64 },
    ToggleLike,
}

impl AppEvent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::SubmitSearch(_) => "submit-search",
            AppEvent::GotoPage(_) => "goto-page",
            AppEvent::Navigate(_) => "navigate",
            AppEvent::ToggleServings(_) => "toggle-servings",
            AppEvent::AddToList => "add-to-list",
            AppEvent::DeleteListItem(_) => "delete-list-item",
            AppEvent::UpdateListItem { .. } => "update-list-item",
            AppEvent::ToggleLike => "toggle-like",
        }
    }
}
