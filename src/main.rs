use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use larder::terminal::HELP;
use larder::{parse_command, AppController, AppEvent, Command, Config, TerminalSink};
use larder_db::{init_database, RedbKeyValueStore};
use larder_source::HttpRecipeSource;

#[tokio::main]
async fn main() {
    // Initialize tracing; stdout belongs to the terminal sink
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Optional: LARDER_API_URL, LARDER_DB_PATH");
            eprintln!("Optional: LARDER_PAGE_SIZE, LARDER_FETCH_TIMEOUT_SECS (positive integers)");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting Larder");
    tracing::info!("Recipe API: {}", config.api_url);
    tracing::info!("Database path: {}", config.db_path.display());

    // Initialize database
    let db = match init_database(&config.db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Database error: {}", e);
            std::process::exit(1);
        }
    };
    let store = Arc::new(RedbKeyValueStore::new(db));

    let source = match HttpRecipeSource::with_timeout(config.api_url.clone(), config.fetch_timeout)
    {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("HTTP client error: {}", e);
            std::process::exit(1);
        }
    };

    let controller = AppController::new(
        source,
        store,
        Arc::new(TerminalSink::new()),
        config.controller_settings(),
    );

    // A recipe id on the command line plays the role of the initial navigation target
    let initial_recipe = std::env::args().nth(1);
    if let Err(e) = controller.start(initial_recipe.as_deref()).await {
        tracing::error!("Startup failed: {}", e);
    }

    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };

        let event = match parse_command(&line) {
            Ok(Some(Command::Event(event))) => event,
            Ok(Some(Command::Help)) => {
                println!("{HELP}");
                continue;
            }
            Ok(Some(Command::Quit)) => break,
            Ok(None) => continue,
            Err(msg) => {
                eprintln!("{msg}");
                continue;
            }
        };

        // Fetching flows run in the background so input stays responsive;
        // a newer submission supersedes an older one still in flight.
        let fetches = matches!(event, AppEvent::SubmitSearch(_) | AppEvent::Navigate(_));
        if fetches {
            let controller = controller.clone();
            tokio::spawn(async move {
                if let Err(e) = controller.dispatch(event).await {
                    tracing::error!("{}", e);
                }
            });
        } else if let Err(e) = controller.dispatch(event).await {
            tracing::error!("{}", e);
        }
    }

    tracing::info!("Bye");
}
