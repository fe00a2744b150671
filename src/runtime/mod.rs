use std::env;
use std::sync::Arc;

use crossbeam_channel::unbounded;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::coordinator::CoordinatorService;
use crate::engine::RodioEngine;
use crate::library::DirectoryLibrary;
use crate::mpris::ControlCmd;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, problem) = settings::load_settings();
    let log_file = logging::init(&settings.logging);
    if let Some(problem) = problem {
        warn!("{problem}");
    }
    info!(log = ?log_file, "tapedeck starting");

    let root = startup::library_root(env::args().nth(1), &settings.library);
    let library = Arc::new(DirectoryLibrary::new(root.clone(), settings.library.clone()));
    let engine = RodioEngine::new(&settings.engine)?;
    let coordinator = CoordinatorService::spawn(engine, library, &settings.playback);
    coordinator.load_library();

    let mut app = App::new();
    app.set_library_root(root.display().to_string());

    let (control_tx, control_rx) = unbounded::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &coordinator,
            &mpris,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    coordinator.dispose();
    info!("tapedeck stopped");
    run_result
}
