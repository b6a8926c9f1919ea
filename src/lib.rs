pub mod config;
pub mod controller;
pub mod events;
pub mod sink;
pub mod state;
pub mod terminal;

pub use config::Config;
pub use controller::{
    AppController, ControllerSettings, RECIPE_ERROR_MESSAGE, SEARCH_ERROR_MESSAGE,
};
pub use events::AppEvent;
pub use sink::{PresentationSink, Region, SearchPage};
pub use state::{AppState, RecipeSession, SearchSession, Ticket};
pub use terminal::{parse_command, Command, TerminalSink};
