use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::stdout;
use std::sync::Mutex;
use tracing::{info, warn};

use invaders::app::App;
use invaders::config;
use invaders::input::{DEFAULT_BINDINGS, InputManager};
use invaders::scores::{JsonScoreStore, MemoryScoreStore, ScoreStore};

/// Logs go to a file; stdout belongs to the terminal UI. A log file that
/// cannot be created just means no logs.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let path = config::log_path();
    match File::create(&path) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .init();
        }
        Err(e) => eprintln!("could not open log file {}: {e}", path.display()),
    }
}

/// The JSON file store, or an in-memory one when the file is unusable
fn open_store() -> Box<dyn ScoreStore> {
    let store = JsonScoreStore::new(config::scores_path());
    match store.load() {
        Ok(records) => {
            info!(path = %store.path().display(), records = records.len(), "score file opened");
            Box::new(store)
        }
        Err(e) => {
            warn!(error = %e, "score file unusable, scores will not be saved");
            Box::new(MemoryScoreStore::new())
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    info!(supports_keyboard_enhancement, "starting");

    let store = open_store();
    let input = InputManager::new(DEFAULT_BINDINGS.to_vec(), supports_keyboard_enhancement);

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Release events need the enhancement flags, pushed after entering the alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(store, input).run(&mut terminal);

    // Cleanup
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
