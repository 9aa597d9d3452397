use std::env;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::catalog;

mod event_loop;
mod logging;
mod settings;
mod startup;

const USAGE: &str = "usage: beatbox <catalog.json>\n       beatbox --print-config";

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();

    let arg = env::args().nth(1);
    match arg.as_deref() {
        Some("--print-config") => {
            if let Some(w) = &settings_warning {
                eprintln!("beatbox: {w}");
            }
            print!("{}", settings.to_toml()?);
            return Ok(());
        }
        Some("-h" | "--help") | None => {
            println!("{USAGE}");
            return Ok(());
        }
        Some(_) => {}
    }
    let catalog_path = arg.unwrap_or_default();

    let log_file = logging::init_logging(&settings.log);
    if let Some(w) = &settings_warning {
        warn!("{w}");
    }
    info!(log_file = ?log_file, "beatbox starting");

    let tracks = catalog::load_tracks(Path::new(&catalog_path))?;
    let mut app = App::new(tracks);
    app.set_source(catalog_path.clone());

    let quit = Arc::new(AtomicBool::new(false));
    let mut session = startup::build_session(&settings, quit.clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut session,
        &quit,
        &mut state,
    );

    // Fade out and release the media surface before giving the terminal back.
    session.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
