use std::env;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::controller::Controller;

mod event_loop;
mod logging;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();

    if let Err(e) = logging::init_logging(&settings.logging) {
        eprintln!("staccato: cannot open log file, logging disabled: {e}");
    }
    info!("starting");
    if let Some(msg) = &config_warning {
        warn!("{msg}");
    }

    let device = startup::open_device()?;
    let mut controller = Controller::new(device, settings.library.clone());
    let mut app = App::new(settings.ui.cover_size);

    let folders = startup::startup_folders(env::args().skip(1));
    startup::apply_playback_defaults(&mut controller, &mut app, &settings, &folders);
    if let Some(msg) = config_warning {
        app.set_status(msg);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut controller);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
