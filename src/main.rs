use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use crossbeam_channel::Receiver;
use neurally::db::{init_db, SqliteFlashcardStore};
use neurally::models::AiResponse;
use neurally::{
    draw, handle_key, logger, spawn_ai_worker, AiBackends, App, AppConfig, OpenRouterClient,
    QuestionSource, SearchProvider,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

fn build_backends(config: &AppConfig) -> AiBackends {
    if !config.ai_enabled {
        logger::log("OPENROUTER_API_KEY not set, running offline");
        return AiBackends::default();
    }
    match OpenRouterClient::new(config.model.clone()) {
        Ok(client) => {
            let client = Arc::new(client);
            let questions: Arc<dyn QuestionSource> = client.clone();
            let search: Arc<dyn SearchProvider> = client;
            AiBackends {
                questions: Some(questions),
                search: Some(search),
            }
        }
        Err(e) => {
            logger::log(&format!("Failed to create AI client: {}", e));
            AiBackends::default()
        }
    }
}

fn open_store(config: &AppConfig) -> Option<SqliteFlashcardStore> {
    match init_db(&config.db_path()) {
        Ok(conn) => Some(SqliteFlashcardStore::new(conn)),
        Err(e) => {
            logger::log(&format!(
                "Failed to open database at {}: {}",
                config.db_path().display(),
                e
            ));
            None
        }
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    responses: &Receiver<AiResponse>,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| draw(f, app))?;

        while let Ok(response) = responses.try_recv() {
            app.process_ai_response(response);
        }

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            handle_key(app, key);
        }
    }

    Ok(())
}

fn main() -> io::Result<()> {
    let config = AppConfig::from_env();
    if let Err(e) = logger::init(&config.log_path) {
        eprintln!("Logging disabled: {}", e);
    }
    logger::log("Starting neurally");

    let (request_tx, request_rx) = crossbeam_channel::unbounded();
    let (response_tx, response_rx) = crossbeam_channel::unbounded();
    let request_tx = match spawn_ai_worker(response_tx, request_rx, build_backends(&config)) {
        Ok(_) => Some(request_tx),
        Err(e) => {
            logger::log(&format!("Failed to spawn AI worker: {}", e));
            None
        }
    };

    let store = open_store(&config);
    let mut app = App::new(config, store, request_tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &response_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    logger::log("Exiting neurally");
    result
}
